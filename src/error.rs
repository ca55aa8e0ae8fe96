use thiserror::Error;

#[derive(Debug, Error)]
pub enum TimingError {
    #[error("invalid parameter for '{entity}': {reason}")]
    InvalidParameter { entity: String, reason: String },

    #[error("either service or client must be active (service '{service}', client '{client}')")]
    InvalidConfiguration { client: String, service: String },

    #[error("system has no relations")]
    EmptySystem,

    #[error("no path from '{from}' to '{to}'")]
    Unreachable { from: String, to: String },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed edge list: {0}")]
    Csv(#[from] csv::Error),
}

impl TimingError {
    pub(crate) fn invalid(entity: &str, reason: impl Into<String>) -> Self {
        TimingError::InvalidParameter {
            entity: entity.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TimingError>;
