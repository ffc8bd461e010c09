//! Change detection for outgoing notifications.
//!
//! A message is delivered only when its text differs from the last text that
//! was actually delivered on the same channel (status or error). State lives in
//! memory only; after a restart the first message is always considered new.

/// `true` when `candidate` should be delivered given the last delivered text.
pub fn changed(candidate: &str, previous: &str) -> bool {
    candidate != previous
}

/// Last successfully delivered text for one notification kind.
#[derive(Debug, Clone, Default)]
pub struct LastSent {
    text: String,
}

impl LastSent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_new(&self, candidate: &str) -> bool {
        changed(candidate, &self.text)
    }

    /// Call only after the transport accepted `text`.
    pub fn record(&mut self, text: String) {
        self.text = text;
    }
}
