use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("coaching API key missing: set {0}")]
    MissingApiKey(String),

    #[error("coaching request timed out after {0}s: the model is taking too long to respond")]
    Timeout(u64),

    #[error("coaching request failed: {0}")]
    Http(String),

    #[error("coaching API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response format from coaching API: {0}")]
    UnexpectedResponse(String),

    #[error("week {0} is outside the cycle")]
    WeekOutOfRange(u32),
}
