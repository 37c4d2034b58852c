#[derive(Debug, thiserror::Error)]
pub enum CrawlerError {
    #[error("Database error")]
    DatabaseError(#[from] sqlx::error::Error),

    #[error("Http error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Json error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid date {0:?}, expected DD<delimiter>MM<delimiter>YYYY")]
    InvalidDate(String),

    #[error("Missing datePublished metadata")]
    MissingPublishedDate,

    #[error("Invalid datePublished metadata {0:?}")]
    InvalidPublishedDate(String),

    #[error("Service error: {0}")]
    ServiceError(String),
}

/// Raised when the entity tagger could not produce a result, as opposed to
/// producing an empty one.
#[derive(Debug, thiserror::Error)]
#[error("Tagging failed: {0}")]
pub struct TaggingFailed(pub String);

impl From<reqwest::Error> for TaggingFailed {
    fn from(e: reqwest::Error) -> Self {
        TaggingFailed(e.to_string())
    }
}
