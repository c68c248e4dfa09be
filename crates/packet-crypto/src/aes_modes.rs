//! AES-CBC / AES-CTR encryption of serialized packets.
//!
//! Wire format: [IV:16][ciphertext]
//! No header: mode and key are agreed out of band. CBC ciphertext is
//! PKCS#7-padded to a block multiple; CTR ciphertext has the plaintext's length.

use std::fmt;

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit, StreamCipher};
use aes::{Aes128, Aes192, Aes256};

use crate::error::CryptoError;
use crate::types::{CipherKey, CipherMode, AES_BLOCK_SIZE, IV_LENGTH};

type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes192CbcEnc = cbc::Encryptor<Aes192>;
type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;
type Aes192CbcDec = cbc::Decryptor<Aes192>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type Aes128Ctr = ctr::Ctr128BE<Aes128>;
type Aes192Ctr = ctr::Ctr128BE<Aes192>;
type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// Generate a random IV.
pub fn generate_iv() -> Result<[u8; IV_LENGTH], CryptoError> {
    let mut iv = [0u8; IV_LENGTH];
    getrandom::getrandom(&mut iv).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(iv)
}

/// Encrypt under a fresh random IV.
///
/// Returns: [IV:16][ciphertext]
pub fn encrypt(plaintext: &[u8], key: &CipherKey, mode: CipherMode) -> Result<Vec<u8>, CryptoError> {
    let iv = generate_iv()?;
    encrypt_with_iv(plaintext, key, mode, &iv)
}

/// Encrypt under a caller-chosen IV. Reusing an IV with the same key breaks
/// confidentiality; outside known-answer tests use [`encrypt`].
pub fn encrypt_with_iv(
    plaintext: &[u8],
    key: &CipherKey,
    mode: CipherMode,
    iv: &[u8; IV_LENGTH],
) -> Result<Vec<u8>, CryptoError> {
    let body = match mode {
        CipherMode::Cbc => cbc_encrypt(key.as_bytes(), iv, plaintext)?,
        CipherMode::Ctr => {
            let mut buf = plaintext.to_vec();
            ctr_apply(key.as_bytes(), iv, &mut buf)?;
            buf
        }
    };

    let mut result = Vec::with_capacity(IV_LENGTH + body.len());
    result.extend_from_slice(iv);
    result.extend_from_slice(&body);
    Ok(result)
}

/// Decrypt [IV:16][ciphertext]. For CBC the padding is validated and removed.
pub fn decrypt(data: &[u8], key: &CipherKey, mode: CipherMode) -> Result<Vec<u8>, CryptoError> {
    let min_length = match mode {
        CipherMode::Cbc => IV_LENGTH + AES_BLOCK_SIZE,
        CipherMode::Ctr => IV_LENGTH,
    };
    if data.len() < min_length {
        return Err(CryptoError::DataTooShort {
            expected: min_length,
            got: data.len(),
        });
    }

    let (iv, body) = data.split_at(IV_LENGTH);
    match mode {
        CipherMode::Cbc => {
            if body.len() % AES_BLOCK_SIZE != 0 {
                return Err(CryptoError::InvalidPadding);
            }
            cbc_decrypt(key.as_bytes(), iv, body)
        }
        CipherMode::Ctr => {
            let mut buf = body.to_vec();
            ctr_apply(key.as_bytes(), iv, &mut buf)?;
            Ok(buf)
        }
    }
}

fn init_error(e: impl fmt::Display) -> CryptoError {
    CryptoError::CipherInit(e.to_string())
}

fn cbc_encrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let out = match key.len() {
        16 => Aes128CbcEnc::new_from_slices(key, iv)
            .map_err(init_error)?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
        24 => Aes192CbcEnc::new_from_slices(key, iv)
            .map_err(init_error)?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
        32 => Aes256CbcEnc::new_from_slices(key, iv)
            .map_err(init_error)?
            .encrypt_padded_vec_mut::<Pkcs7>(data),
        got => return Err(CryptoError::InvalidKeyLength(got)),
    };
    Ok(out)
}

fn cbc_decrypt(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let out = match key.len() {
        16 => Aes128CbcDec::new_from_slices(key, iv)
            .map_err(init_error)?
            .decrypt_padded_vec_mut::<Pkcs7>(data),
        24 => Aes192CbcDec::new_from_slices(key, iv)
            .map_err(init_error)?
            .decrypt_padded_vec_mut::<Pkcs7>(data),
        32 => Aes256CbcDec::new_from_slices(key, iv)
            .map_err(init_error)?
            .decrypt_padded_vec_mut::<Pkcs7>(data),
        got => return Err(CryptoError::InvalidKeyLength(got)),
    };
    out.map_err(|_| CryptoError::InvalidPadding)
}

fn ctr_apply(key: &[u8], iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
    match key.len() {
        16 => Aes128Ctr::new_from_slices(key, iv)
            .map_err(init_error)?
            .apply_keystream(buf),
        24 => Aes192Ctr::new_from_slices(key, iv)
            .map_err(init_error)?
            .apply_keystream(buf),
        32 => Aes256Ctr::new_from_slices(key, iv)
            .map_err(init_error)?
            .apply_keystream(buf),
        got => return Err(CryptoError::InvalidKeyLength(got)),
    }
    Ok(())
}

/// Key and mode bundled for repeated use.
#[derive(Clone)]
pub struct Cipher {
    key: CipherKey,
    mode: CipherMode,
}

impl Cipher {
    /// Create a cipher from raw key material.
    ///
    /// # Arguments
    /// * `key` - 16, 24 or 32 bytes of key material
    /// * `mode` - CBC or CTR
    pub fn new(key: &[u8], mode: CipherMode) -> Result<Self, CryptoError> {
        Ok(Self {
            key: CipherKey::new(key)?,
            mode,
        })
    }

    /// Create a cipher from a numeric mode identifier (`CBC_MODE`, `CTR_MODE`).
    pub fn from_mode_id(key: &[u8], mode: u8) -> Result<Self, CryptoError> {
        Self::new(key, CipherMode::from_id(mode)?)
    }

    pub fn with_key(key: CipherKey, mode: CipherMode) -> Self {
        Self { key, mode }
    }

    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        encrypt(plaintext, &self.key, self.mode)
    }

    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        decrypt(data, &self.key, self.mode)
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cipher")
            .field("key", &self.key)
            .field("mode", &self.mode)
            .finish()
    }
}
