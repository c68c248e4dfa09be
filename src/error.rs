use packet_crypto::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PacketError {
    #[error("Not serializable: {0}")]
    NotSerializable(String),

    #[error("Unknown packet: {0}")]
    UnknownPacket(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown serializer: {0}")]
    UnknownSerializer(u8),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PacketError>;

/// Coarse classification of a [`PacketError`].
///
/// `UnknownPacket` and `InvalidData` describe bad input from the other party.
/// The rest are programming, configuration or environment failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotSerializable,
    UnknownPacket,
    InvalidData,
    UnknownEncryption,
    Configuration,
    Io,
}

impl PacketError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PacketError::NotSerializable(_) => ErrorKind::NotSerializable,
            PacketError::UnknownPacket(_) => ErrorKind::UnknownPacket,
            PacketError::InvalidData(_) => ErrorKind::InvalidData,
            PacketError::UnknownSerializer(_) | PacketError::Config(_) => ErrorKind::Configuration,
            PacketError::Crypto(e) => match e {
                // Undecryptable payloads are bad input, same as a malformed envelope.
                CryptoError::DataTooShort { .. } | CryptoError::InvalidPadding => {
                    ErrorKind::InvalidData
                }
                CryptoError::UnknownEncryption(_) => ErrorKind::UnknownEncryption,
                CryptoError::InvalidKeyLength(_) | CryptoError::CipherInit(_) => {
                    ErrorKind::Configuration
                }
                CryptoError::RngFailed(_) => ErrorKind::Io,
            },
            PacketError::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether the error was caused by the received bytes rather than by
    /// local configuration. Only these are absorbed by `receive_from`.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::UnknownPacket | ErrorKind::InvalidData
        )
    }
}
