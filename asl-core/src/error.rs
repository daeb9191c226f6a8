use asl_shared::DataError;
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionError {
    /// Frame rejected before classification; no recognizer state was touched.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] DataError),
}
