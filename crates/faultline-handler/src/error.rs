use thiserror::Error;

/// Errors raised while converting or writing an error body
#[derive(Debug, Error)]
pub enum RenderError {
    /// Converter could not build a representation
    #[error("conversion failed: {0}")]
    Conversion(String),

    /// JSON serialization failed
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Form encoding failed
    #[error("form encoding failed: {0}")]
    Form(#[from] serde_urlencoded::ser::Error),

    /// Content type could not be used as a header value
    #[error("invalid header value: {0}")]
    Header(#[from] http::header::InvalidHeaderValue),
}

/// Errors raised while building components from configuration
#[derive(Debug, Error)]
pub enum BuildError {
    /// Configured status is not a usable HTTP status
    #[error("invalid status {status} for {context}")]
    InvalidStatus { status: u16, context: String },
}
