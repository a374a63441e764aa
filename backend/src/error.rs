use tokio::task::JoinError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(String),
    #[error("failed to bind socket: {0}")]
    SocketBind(String),
    #[error("background task failed: {0}")]
    Async(String),
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("session store error: {0}")]
    SessionStore(String),
    /// No verified, logged-in session for the current request. Covers a missing
    /// session, an expired one and a failed lookup alike.
    #[error("session unavailable")]
    SessionUnavailable,
}

impl From<sqlx::Error> for Error {
    fn from(value: sqlx::Error) -> Self {
        Error::Database(format!("{:?}", value))
    }
}

impl From<JoinError> for Error {
    fn from(value: JoinError) -> Self {
        Error::Async(format!("{:?}", value))
    }
}

impl From<tower_sessions::session::Error> for Error {
    fn from(value: tower_sessions::session::Error) -> Self {
        Error::SessionStore(format!("{:?}", value))
    }
}
