#[derive(Debug, thiserror::Error)]
pub enum WatchlistError {
    #[error("Database error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Browser session error: {0}")]
    Session(String),
}

impl WatchlistError {
    pub fn session(err: impl std::fmt::Display) -> Self {
        WatchlistError::Session(err.to_string())
    }
}
