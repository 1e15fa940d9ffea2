use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeskError {
    #[error("Study API error: {0}")]
    Api(#[from] study_sdk::ApiError),
    #[error("Invariant: {0}")]
    Invariant(String),
}

impl DeskError {
    /// Text to surface for a failed flow: the backend's own detail when the
    /// response carried one, otherwise the flow's fallback line.
    #[must_use]
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            Self::Api(error) => error.backend_detail(),
            Self::Invariant(_) => None,
        }
        .unwrap_or_else(|| fallback.to_string())
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
