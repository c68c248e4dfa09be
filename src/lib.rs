//! Tagged, schema-constrained packet envelopes.
//!
//! A packet travels as `{tag: {attribute: value, ...}}` in JSON or in a
//! restricted literal syntax, optionally encrypted with AES-CBC or AES-CTR.
//! Decoding only succeeds when the tag and the exact attribute set match;
//! typed codecs additionally require every value to keep its type.

pub mod codec;
pub mod config;
pub mod error;
mod inspect;
pub mod json;
pub mod record;
pub mod safe;
pub mod schema;
pub mod transport;

pub use codec::{
    packet_serializer, set_packet_serializer, Codec, Encoding, Envelope, Validation,
    JSON_SERIALIZER, LITERAL_SERIALIZER,
};
pub use config::PacketConfig;
pub use error::{ErrorKind, PacketError, Result};
pub use record::{Packet, Record};
pub use safe::SafeCodec;
pub use schema::{schema, NonePolicy, Schema, SchemaBuilder};
pub use transport::{receive_from, send_to, Connection, DEFAULT_BUFFER_SIZE};

pub use packet_crypto::{
    generate_key, Cipher, CipherKey, CipherMode, CryptoError, CBC_MODE, CTR_MODE,
};
pub use packet_literal::{literal_eval, to_literal, LiteralError, Value};
