use crate::participant::ParticipantId;

/// Failure reported by the media engine or one of its local tracks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("media engine rejected {operation}: {reason}")]
    Rejected { operation: &'static str, reason: String },
    #[error("media engine is not available")]
    Unavailable,
}

impl EngineError {
    pub fn rejected(operation: &'static str, reason: impl ToString) -> Self {
        Self::Rejected {
            operation,
            reason: reason.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderingError {
    #[error("dominant speaker {0} has no rank in the filmstrip")]
    MissingRank(ParticipantId),
}

#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    #[error("failed to load avatar")]
    Http(#[from] reqwest::Error),
    #[error("{url} is not an image ({content_type})")]
    NotAnImage { url: url::Url, content_type: String },
}
