//! Failure categories of a single lookup.

/// Reasons an identifier is rejected before any request is issued.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("Please enter an identification number.")]
    Missing,
    #[error("The identification must contain only digits.")]
    NotNumeric,
    #[error("The identification must have between 9 and 12 digits (got {len}).")]
    InvalidLength { len: usize },
}

/// Every way a query can end without a rendered record.
///
/// All variants are terminal for the current query and none is retried.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    InputInvalid(#[from] InputError),

    #[error("The identification does not exist in the Hacienda registry.")]
    NotFound,

    #[error("Timeout: the query took too long ({after:?}). Check your internet connection.")]
    Timeout { after: std::time::Duration },

    #[error(
        "Connection error. Possible causes:\n\
         • No internet connection\n\
         • Hacienda API unavailable\n\
         \nTechnical detail: {detail}"
    )]
    ConnectionFailed { detail: String },

    #[error("HTTP error {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("Error processing the response: {0}")]
    MalformedResponse(String),

    #[error("Connection error: {0}")]
    TransportError(String),

    #[error("Error processing data: {0}")]
    ProcessingError(String),
}
