use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalystError {
    #[error("no cycle yet: run 'catalyst init'")]
    NoCycle,

    #[error("goal not found: {0}")]
    GoalNotFound(String),

    #[error("tactic not found: {0}")]
    TacticNotFound(String),

    #[error("week out of range: {0} (expected 1-12)")]
    WeekOutOfRange(u32),

    #[error("invalid frequency '{0}': expected 'daily' or 'weekly'")]
    InvalidFrequency(String),

    #[error("invalid block kind '{0}': expected 'strategic', 'buffer' or 'breakout'")]
    InvalidBlockKind(String),

    #[error("invalid start hour {0}: expected 0-23")]
    InvalidHour(u32),

    #[error("invalid user key '{0}': must be 1-128 characters of [A-Za-z0-9_-]")]
    InvalidUserKey(String),

    #[error("invalid cycle document: {0}")]
    InvalidDocument(String),

    #[error("remote store error: {0}")]
    Remote(String),

    #[error("remote store returned {status}: {body}")]
    RemoteStatus { status: u16, body: String },

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CatalystError>;
