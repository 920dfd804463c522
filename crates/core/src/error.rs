use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid response from {backend}: {details}")]
    BackendResponse { backend: String, details: String },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("index not available yet: {0}")]
    NotReady(String),
}

#[derive(Debug, Error)]
pub enum CandidateError {
    #[error("field `{field}` is malformed: {details}")]
    MalformedField { field: String, details: String },

    #[error("answer dashboard rejected registration: {0}")]
    Store(String),
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("invalid stage config: {0}")]
    InvalidConfig(String),

    #[error("stage initialization failed: {0}")]
    Init(#[source] SearchError),

    #[error("document query failed: {0}")]
    Query(#[source] SearchError),

    #[error("answer candidate build failed: {0}")]
    Build(#[from] CandidateError),
}
