//! Encrypted envelopes.
//!
//! Encode: packet → envelope text → encrypt → [IV:16][ciphertext]
//! Decode: [IV:16][ciphertext] → decrypt → envelope text → packet

use packet_crypto::{Cipher, CipherKey, CipherMode};
use zeroize::Zeroize;

use crate::codec::{Codec, Encoding, Envelope};
use crate::error::Result;
use crate::record::Packet;

/// A [`Codec`] with an AES overlay.
#[derive(Debug, Clone)]
pub struct SafeCodec {
    codec: Codec,
    cipher: Cipher,
}

impl SafeCodec {
    pub fn new(codec: Codec, cipher: Cipher) -> Self {
        Self { codec, cipher }
    }

    /// Build from raw key material.
    ///
    /// # Arguments
    /// * `key` - 16, 24 or 32 bytes selecting AES-128, AES-192 or AES-256
    /// * `mode` - CBC or CTR
    /// * `encoding` - envelope text form
    pub fn from_key(key: &[u8], mode: CipherMode, encoding: Encoding) -> Result<Self> {
        Ok(Self::new(Codec::new(encoding), Cipher::new(key, mode)?))
    }

    /// Encrypted codec that also locks attribute value types on decode.
    pub fn inspected(key: CipherKey, mode: CipherMode, encoding: Encoding) -> Self {
        Self::new(Codec::inspected(encoding), Cipher::with_key(key, mode))
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    pub fn cipher(&self) -> &Cipher {
        &self.cipher
    }

    /// Serialize and encrypt `packet` under a fresh IV.
    pub fn encode<P: Packet + ?Sized>(&self, packet: &P) -> Result<Vec<u8>> {
        let mut plain = self.codec.encode(packet)?;
        let encrypted = self.cipher.encrypt(&plain);
        plain.zeroize();
        let encrypted = encrypted?;
        tracing::trace!(
            mode = %self.cipher.mode(),
            bytes = encrypted.len(),
            "encrypted packet"
        );
        Ok(encrypted)
    }

    /// Decrypt `data` and decode it into `packet`. Padding and length
    /// failures surface as `PacketError::Crypto` before any parsing.
    pub fn decode<P: Packet + ?Sized>(
        &self,
        packet: &mut P,
        data: impl AsRef<[u8]>,
    ) -> Result<()> {
        let data = data.as_ref();
        tracing::trace!(mode = %self.cipher.mode(), bytes = data.len(), "decrypting packet");
        let mut plain = self.cipher.decrypt(data)?;
        let result = self.codec.decode(packet, &plain);
        plain.zeroize();
        result
    }
}

impl Envelope for SafeCodec {
    fn encode<P: Packet + ?Sized>(&self, packet: &P) -> Result<Vec<u8>> {
        SafeCodec::encode(self, packet)
    }

    fn decode<P: Packet + ?Sized>(&self, packet: &mut P, data: &[u8]) -> Result<()> {
        SafeCodec::decode(self, packet, data)
    }
}
