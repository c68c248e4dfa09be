use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// AES block length in bytes. The IV has the same length.
pub const AES_BLOCK_SIZE: usize = 16;

/// IV length in bytes, prefixed to every ciphertext.
pub const IV_LENGTH: usize = AES_BLOCK_SIZE;

/// Accepted AES key lengths in bytes (AES-128, AES-192, AES-256).
pub const AES_KEY_LENGTHS: &[usize] = &[16, 24, 32];

/// Numeric identifier of [`CipherMode::Cbc`].
pub const CBC_MODE: u8 = 1;

/// Numeric identifier of [`CipherMode::Ctr`].
pub const CTR_MODE: u8 = 2;

/// Block cipher mode for the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CipherMode {
    /// Cipher block chaining with PKCS#7 padding.
    Cbc,
    /// Counter mode (128-bit big-endian counter seeded by the IV), no padding.
    Ctr,
}

impl CipherMode {
    /// Resolve a numeric mode identifier (`CBC_MODE` or `CTR_MODE`).
    pub fn from_id(id: u8) -> Result<Self, CryptoError> {
        match id {
            CBC_MODE => Ok(CipherMode::Cbc),
            CTR_MODE => Ok(CipherMode::Ctr),
            other => Err(CryptoError::UnknownEncryption(other.to_string())),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            CipherMode::Cbc => CBC_MODE,
            CipherMode::Ctr => CTR_MODE,
        }
    }

    /// Whether plaintext is padded to a block multiple before encryption.
    pub fn is_padded(self) -> bool {
        matches!(self, CipherMode::Cbc)
    }
}

impl FromStr for CipherMode {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cbc" => Ok(CipherMode::Cbc),
            "ctr" => Ok(CipherMode::Ctr),
            _ => Err(CryptoError::UnknownEncryption(s.to_string())),
        }
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CipherMode::Cbc => "cbc",
            CipherMode::Ctr => "ctr",
        })
    }
}

/// Shared symmetric key. Zeroized on drop and redacted in `Debug`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CipherKey(Vec<u8>);

impl CipherKey {
    /// Wrap raw key material. Must be 16, 24 or 32 bytes.
    pub fn new(bytes: &[u8]) -> Result<Self, CryptoError> {
        if !AES_KEY_LENGTHS.contains(&bytes.len()) {
            return Err(CryptoError::InvalidKeyLength(bytes.len()));
        }
        Ok(Self(bytes.to_vec()))
    }

    /// Generate a random key of `len` bytes.
    pub fn generate(len: usize) -> Result<Self, CryptoError> {
        if !AES_KEY_LENGTHS.contains(&len) {
            return Err(CryptoError::InvalidKeyLength(len));
        }
        let mut bytes = vec![0u8; len];
        getrandom::getrandom(&mut bytes).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherKey(<{} bytes redacted>)", self.0.len())
    }
}
