use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Unknown encryption mode: {0}")]
    UnknownEncryption(String),

    #[error("Invalid key length: expected 16, 24 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Encrypted data too short: expected at least {expected} bytes, got {got}")]
    DataTooShort { expected: usize, got: usize },

    #[error("Invalid padding")]
    InvalidPadding,

    #[error("Cipher initialization failed: {0}")]
    CipherInit(String),

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}
