use serde_json::Value;
use thiserror::Error;

/// Failures of a single poll cycle.
///
/// Every variant is recovered by the poll loop: it is logged, rendered into one
/// error notification, and the loop continues on the next tick. The `Display`
/// text is what ends up in the chat, so it is written for the reader of that chat.
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Запрос {endpoint} с параметрами {params} не выполнен: {detail}")]
    Transport {
        endpoint: String,
        params: String,
        detail: String,
    },

    #[error("Запрос {endpoint} с параметрами {params} вернул код ответа {code}")]
    StatusCode {
        endpoint: String,
        params: String,
        code: u16,
    },

    #[error(
        "Запрос {endpoint} с параметрами {params} отклонён сервисом: code={code}, error={error}"
    )]
    RemoteDenied {
        endpoint: String,
        params: String,
        /// `null` when the service did not send the field.
        code: Value,
        error: Value,
    },

    #[error("Неверный формат ответа: {0}")]
    Shape(String),

    #[error("Неожиданный статус {0}")]
    UnknownVerdict(String),
}

/// Startup configuration errors. These are fatal and checked exactly once.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required credentials: {}", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("{name} has invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_names_endpoint_and_params() {
        let err = WatchError::Transport {
            endpoint: "https://status.example/api/".to_string(),
            params: "from_date=1000".to_string(),
            detail: "connection refused".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("https://status.example/api/"));
        assert!(text.contains("from_date=1000"));
        assert!(text.contains("connection refused"));
    }

    #[test]
    fn test_remote_denied_renders_missing_fields_as_null() {
        let err = WatchError::RemoteDenied {
            endpoint: "https://status.example/api/".to_string(),
            params: "from_date=1".to_string(),
            code: Value::String("not_authenticated".to_string()),
            error: Value::Null,
        };
        let text = err.to_string();
        assert!(text.contains("code=\"not_authenticated\""));
        assert!(text.contains("error=null"));
    }

    #[test]
    fn test_missing_credentials_lists_every_name() {
        let err = ConfigError::MissingCredentials {
            missing: vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"],
        };
        assert_eq!(
            err.to_string(),
            "missing required credentials: PRACTICUM_TOKEN, TELEGRAM_CHAT_ID"
        );
    }
}
