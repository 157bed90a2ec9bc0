use thiserror::Error;

/// HTTP status the Bot API returns when another consumer is already
/// long-polling with the same token.
pub const CONFLICT_STATUS: u16 = 409;

/// Top-level error type for courier.
#[derive(Debug, Error)]
pub enum CourierError {
    /// The server answered with a status above 400.
    #[error("http status {status}")]
    Http { status: u16 },

    /// Connection failure, timeout, or unreadable body.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response envelope reported `ok = false`.
    #[error("api error {code}: {description}")]
    Api { code: i64, description: String },

    /// The response did not match the expected shape.
    #[error("{0}")]
    Decode(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Update poller lifecycle error.
    #[error("poller error: {0}")]
    Poller(String),
}

impl CourierError {
    /// Whether this error means a second consumer is polling the same bot.
    ///
    /// Fatal for an update poller: retrying only fights the other consumer.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Http { status } => *status == CONFLICT_STATUS,
            Self::Api { code, .. } => *code == i64::from(CONFLICT_STATUS),
            _ => false,
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_from_http_status() {
        assert!(CourierError::Http { status: 409 }.is_conflict());
        assert!(!CourierError::Http { status: 502 }.is_conflict());
    }

    #[test]
    fn test_conflict_from_envelope_code() {
        let err = CourierError::Api {
            code: 409,
            description: "Conflict: terminated by other getUpdates request".into(),
        };
        assert!(err.is_conflict());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_transport_is_not_conflict() {
        let err = CourierError::Transport("connection reset".into());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_display() {
        let err = CourierError::Api {
            code: 111,
            description: "Bad Request".into(),
        };
        assert_eq!(err.to_string(), "api error 111: Bad Request");
        assert_eq!(CourierError::Http { status: 502 }.to_string(), "http status 502");
    }
}
