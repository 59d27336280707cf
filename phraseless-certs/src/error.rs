use thiserror::Error;

/// Error types for the phraseless-certs crate
///
/// A certificate that fails cryptographic verification is not an error:
/// verification reports `false` (or [`crate::Verification::Invalid`]).
/// These variants cover malformed input and misuse only.
#[derive(Error, Debug)]
pub enum CertError {
    #[error("Invalid certificate name: {0}")]
    InvalidName(String),

    #[error("Certificate name is not valid UTF-8")]
    NonUtf8Name,

    #[error("Malformed certificate: {0}")]
    Malformed(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Certificate chain is empty")]
    EmptyChain,

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Untrusted anchor: {0}")]
    UntrustedAnchor(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<base64::DecodeError> for CertError {
    fn from(err: base64::DecodeError) -> Self {
        CertError::Malformed(format!("Base64 decode error: {}", err))
    }
}

impl From<std::array::TryFromSliceError> for CertError {
    fn from(err: std::array::TryFromSliceError) -> Self {
        CertError::Malformed(err.to_string())
    }
}

/// Result type for phraseless-certs operations
pub type Result<T> = std::result::Result<T, CertError>;
