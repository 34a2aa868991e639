use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while producing an invoice document.
///
/// Cosmetic asset problems (missing logo, undecodable QR bytes) are handled
/// inside the emitter by skipping the affected instruction and never surface
/// here; only fatal conditions do.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid order payload: {0}")]
    Validation(String),
    #[error("failed to open output sink {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("pdf backend error: {0}")]
    Backend(String),
    #[error("qr encoding failed: {0}")]
    Qr(String),
}

pub type RenderResult<T> = Result<T, RenderError>;
