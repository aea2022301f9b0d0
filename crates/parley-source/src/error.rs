use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status} from message API: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed page payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl FetchError {
    /// Transport and status failures are worth retrying; a payload that does
    /// not deserialize will not get better on the next attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_transient() {
        let err = FetchError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert!(err.is_transient());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_malformed_is_not_transient() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        assert!(!FetchError::from(parse_err).is_transient());
    }
}
