#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("invalid sha256 hex {0:?}")]
    InvalidHex(String),

    #[error("sha256 must be {expected} bytes long, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, VerifyError>;
