//! Review verdicts the status service can report, and their display text.

use watch_common::error::WatchError;
use watch_common::types::WorkItemRecord;

/// Closed set of review outcomes. Any other status code is a contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    pub fn from_code(code: &str) -> Result<Self, WatchError> {
        match code {
            "approved" => Ok(Verdict::Approved),
            "reviewing" => Ok(Verdict::Reviewing),
            "rejected" => Ok(Verdict::Rejected),
            other => Err(WatchError::UnknownVerdict(other.to_string())),
        }
    }

    pub fn text(self) -> &'static str {
        match self {
            Verdict::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Verdict::Reviewing => "Работа взята на проверку ревьюером.",
            Verdict::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.text())
    }
}

/// Chat text announcing the current verdict for a work item.
pub fn status_message(record: &WorkItemRecord) -> Result<String, WatchError> {
    let verdict = Verdict::from_code(&record.status_code)?;
    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        record.name, verdict
    ))
}

/// Telegram refuses `sendMessage` texts longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Chat text for a failed cycle, never longer than [`MAX_MESSAGE_CHARS`].
pub fn error_message(error: &WatchError) -> String {
    let text = format!("Сбой в работе программы: {error}");
    match text.char_indices().nth(MAX_MESSAGE_CHARS - 1) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text,
    }
}
