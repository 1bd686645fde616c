use thiserror::Error;

/// Failures reading or writing the durable visit log.
///
/// These never cross the store's public API: the store falls back to its
/// volatile copy and logs a warning instead of failing the request.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed visit log: {0}")]
    Malformed(#[from] serde_json::Error),
}
