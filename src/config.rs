//! Codec settings loadable from JSON.

use packet_crypto::{Cipher, CipherMode};
use serde::{Deserialize, Serialize};

use crate::codec::{Codec, Encoding, Validation};
use crate::error::{PacketError, Result};
use crate::safe::SafeCodec;
use crate::transport::DEFAULT_BUFFER_SIZE;

/// Settings shared by both parties of a connection.
///
/// ```json
/// { "encoding": "literal", "validation": "typed", "buffer_size": 4096, "cipher_mode": "ctr" }
/// ```
///
/// Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PacketConfig {
    pub encoding: Encoding,
    pub validation: Validation,
    /// Maximum bytes read per `receive_from`.
    pub buffer_size: usize,
    /// Mode used by [`PacketConfig::safe_codec`].
    pub cipher_mode: CipherMode,
}

impl Default for PacketConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::Json,
            validation: Validation::Plain,
            buffer_size: DEFAULT_BUFFER_SIZE,
            cipher_mode: CipherMode::Cbc,
        }
    }
}

impl PacketConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|e| PacketError::Config(e.to_string()))?;
        if config.buffer_size == 0 {
            return Err(PacketError::Config("buffer_size must be positive".to_string()));
        }
        Ok(config)
    }

    pub fn codec(&self) -> Codec {
        Codec::new(self.encoding).with_validation(self.validation)
    }

    /// Encrypted codec using `key` (16, 24 or 32 bytes).
    pub fn safe_codec(&self, key: &[u8]) -> Result<SafeCodec> {
        let cipher = Cipher::new(key, self.cipher_mode)?;
        Ok(SafeCodec::new(self.codec(), cipher))
    }
}
