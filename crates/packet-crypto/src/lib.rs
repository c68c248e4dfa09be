//! Symmetric encryption overlay for serialized packets.
//!
//! AES-128/192/256 in CBC (PKCS#7) or CTR mode. Every ciphertext carries its
//! random IV as a 16-byte prefix.

pub mod aes_modes;
pub mod error;
pub mod types;

pub use aes_modes::{decrypt, encrypt, encrypt_with_iv, generate_iv, Cipher};
pub use error::CryptoError;
pub use types::{
    CipherKey, CipherMode, AES_BLOCK_SIZE, AES_KEY_LENGTHS, CBC_MODE, CTR_MODE, IV_LENGTH,
};

/// Generate a random key of `len` bytes (16, 24 or 32).
pub fn generate_key(len: usize) -> Result<CipherKey, CryptoError> {
    CipherKey::generate(len)
}
