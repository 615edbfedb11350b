/// Domain-level error taxonomy shared by every service.
///
/// The api crate wraps this in its HTTP error type and maps each
/// variant to a status code and a stable error code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Malformed or forbidden input. The message names the violated
    /// rule and is safe to show to callers.
    #[error("{0}")]
    Validation(String),

    /// A pagination cursor that failed to decode, whatever the reason.
    /// Parse detail is deliberately not carried: callers must not be
    /// able to distinguish bad base64 from bad JSON from a bad id.
    #[error("Invalid cursor format")]
    InvalidCursor,

    /// A structurally valid cursor whose embedded sort order differs
    /// from the request's. Direction is never inferred from the cursor.
    #[error("Cursor order does not match request order")]
    CursorOrderMismatch,

    /// No matching entity.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
}
