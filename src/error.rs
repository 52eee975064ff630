use thiserror::Error;

/// Crate-wide error type covering every failure a request handler can see.
///
/// Upstream paper-search failures never appear here: the arXiv client folds
/// them into a structured `SearchResult` with `status: error`, since paper
/// search is best-effort from the caller's point of view.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (startup only)
    #[error("Configuration error: {0}")]
    Config(String),

    // Client errors (permanent - caller must fix the request)
    #[error("Invalid input: {field} - {reason}")]
    InvalidInput { field: String, reason: String },

    // Every model in the fallback list failed for one chat request
    #[error("All models failed. Last error: {last_error}. Please try again in a few moments.")]
    ModelsExhausted { last_error: String },

    // Transport-level failure talking to an upstream provider
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    // I/O errors (listener binding, shutdown)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // General service error
    #[error("Service error: {0}")]
    Service(String),
}

/// Coarse error classes the HTTP boundary maps onto status codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorClass {
    /// Request is malformed - 400, caller must change it
    Validation,
    /// Every upstream model was tried and failed - 503, retry later
    Exhausted,
    /// Our fault - 500, logged server-side
    Internal,
}

impl Error {
    /// Classify for status-code mapping at the HTTP boundary.
    pub fn class(&self) -> ErrorClass {
        match self {
            Error::InvalidInput { .. } => ErrorClass::Validation,
            Error::ModelsExhausted { .. } => ErrorClass::Exhausted,
            Error::Config(_)
            | Error::Http(_)
            | Error::Serde(_)
            | Error::Io(_)
            | Error::Service(_) => ErrorClass::Internal,
        }
    }

    /// Message safe to place in a client-facing error body. Internal faults
    /// collapse to a generic string; their details stay in the server log.
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidInput { reason, .. } => reason.clone(),
            Error::ModelsExhausted { .. } => self.to_string(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Convenience constructor for missing/empty request fields.
    pub fn missing_field(field: &str) -> Self {
        Error::InvalidInput {
            field: field.to_string(),
            reason: format!("{field} parameter is required"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
