//! Envelope encoding and decoding.
//!
//! Encode: packet → {tag: attributes} → JSON or literal text
//! Decode: text → {tag: attributes} → checks → packet (all or nothing)

use std::fmt;
use std::str::FromStr;

use packet_literal::{literal_eval, to_literal, Value};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{PacketError, Result};
use crate::inspect;
use crate::json;
use crate::record::Packet;
use crate::transport::{self, Connection};

/// Numeric identifier of [`Encoding::Json`].
pub const JSON_SERIALIZER: u8 = 0;

/// Numeric identifier of [`Encoding::Literal`].
pub const LITERAL_SERIALIZER: u8 = 1;

// ============================================================================
// Encoding / Validation
// ============================================================================

/// Text form of the envelope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// JSON text. String keys only; no bytes, sets or complex numbers.
    #[default]
    Json,
    /// Restricted literal text, read back by `packet_literal::literal_eval`.
    Literal,
}

impl Encoding {
    /// Resolve a numeric serializer identifier.
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            JSON_SERIALIZER => Ok(Encoding::Json),
            LITERAL_SERIALIZER => Ok(Encoding::Literal),
            other => Err(PacketError::UnknownSerializer(other)),
        }
    }

    pub fn id(self) -> u8 {
        match self {
            Encoding::Json => JSON_SERIALIZER,
            Encoding::Literal => LITERAL_SERIALIZER,
        }
    }
}

impl FromStr for Encoding {
    type Err = PacketError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Encoding::Json),
            "literal" => Ok(Encoding::Literal),
            _ => Err(PacketError::Config(format!("Unknown encoding '{s}'"))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Json => "json",
            Encoding::Literal => "literal",
        })
    }
}

/// Checks applied to a decoded envelope beyond the attribute-set match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Validation {
    /// Attribute names only.
    #[default]
    Plain,
    /// Attribute names, then the runtime type of every value.
    Typed,
}

// ============================================================================
// Process-wide default
// ============================================================================

static DEFAULT_ENCODING: RwLock<Encoding> = parking_lot::const_rwlock(Encoding::Json);

/// Set the encoding used by [`Codec::default`].
///
/// Setup-time only. Codecs capture the encoding when they are created, so a
/// switch does not affect codecs that already exist, and callers must not
/// race it against other threads creating codecs.
pub fn set_packet_serializer(id: u8) -> Result<()> {
    let encoding = Encoding::from_id(id)?;
    *DEFAULT_ENCODING.write() = encoding;
    tracing::debug!(%encoding, "default packet serializer changed");
    Ok(())
}

/// The encoding currently used by [`Codec::default`].
pub fn packet_serializer() -> Encoding {
    *DEFAULT_ENCODING.read()
}

// ============================================================================
// Envelope trait
// ============================================================================

/// Shared encode/decode seam of [`Codec`] and [`crate::SafeCodec`].
pub trait Envelope {
    fn encode<P: Packet + ?Sized>(&self, packet: &P) -> Result<Vec<u8>>;

    fn decode<P: Packet + ?Sized>(&self, packet: &mut P, data: &[u8]) -> Result<()>;

    /// Encode `packet` and send it. Returns `None` when there is no connection.
    fn send_to<P, C>(&self, packet: &P, conn: Option<&mut C>) -> Result<Option<usize>>
    where
        P: Packet + ?Sized,
        C: Connection + ?Sized,
    {
        transport::send_to(self, packet, conn)
    }

    /// Receive one payload into `packet`. Returns `false` when there is no
    /// connection, nothing was read, or the payload was rejected.
    fn receive_from<P, C>(
        &self,
        packet: &mut P,
        conn: Option<&mut C>,
        buffer_size: usize,
    ) -> Result<bool>
    where
        P: Packet + ?Sized,
        C: Connection + ?Sized,
    {
        transport::receive_from(self, packet, conn, buffer_size)
    }
}

// ============================================================================
// Codec
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Codec {
    encoding: Encoding,
    validation: Validation,
}

impl Default for Codec {
    /// A plain codec using the process-wide default encoding.
    fn default() -> Self {
        Self::new(packet_serializer())
    }
}

impl Codec {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            validation: Validation::Plain,
        }
    }

    /// A codec that also locks attribute value types on decode.
    pub fn inspected(encoding: Encoding) -> Self {
        Self::new(encoding).with_validation(Validation::Typed)
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    /// Serialize `packet` as `{tag: {attr: value, ...}}`.
    pub fn encode<P: Packet + ?Sized>(&self, packet: &P) -> Result<Vec<u8>> {
        Ok(self.dumps_str(packet)?.into_bytes())
    }

    /// Like [`Codec::encode`], returning the text.
    pub fn dumps_str<P: Packet + ?Sized>(&self, packet: &P) -> Result<String> {
        let attributes = packet
            .attributes()
            .into_iter()
            .map(|(name, value)| (Value::Str(name), value))
            .collect();
        let envelope = Value::Dict(vec![(
            Value::Str(packet.tag().to_string()),
            Value::Dict(attributes),
        )]);

        let text = match self.encoding {
            Encoding::Json => {
                let json = json::to_json(&envelope)?;
                serde_json::to_string(&json)
                    .map_err(|e| PacketError::NotSerializable(e.to_string()))?
            }
            Encoding::Literal => {
                let text = to_literal(&envelope);
                literal_eval(&text).map_err(|e| PacketError::NotSerializable(e.to_string()))?;
                text
            }
        };
        tracing::debug!(
            tag = packet.tag(),
            encoding = %self.encoding,
            bytes = text.len(),
            "encoded packet"
        );
        Ok(text)
    }

    /// Parse `data` and overwrite every attribute of `packet`.
    ///
    /// Nothing is written unless the envelope is well formed, carries the
    /// packet's tag and exactly its attribute set, and (for typed codecs)
    /// every value keeps its attribute's type.
    pub fn decode<P: Packet + ?Sized>(
        &self,
        packet: &mut P,
        data: impl AsRef<[u8]>,
    ) -> Result<()> {
        let data = data.as_ref();
        let envelope = self.parse(data)?;
        let values = unwrap_envelope(&*packet, envelope)?;
        if self.validation == Validation::Typed {
            inspect::check_types(&*packet, &values)?;
        }
        tracing::debug!(
            tag = packet.tag(),
            encoding = %self.encoding,
            bytes = data.len(),
            "decoded packet"
        );
        packet.overwrite(values);
        Ok(())
    }

    fn parse(&self, data: &[u8]) -> Result<Value> {
        match self.encoding {
            Encoding::Json => {
                let json: serde_json::Value = serde_json::from_slice(data)
                    .map_err(|e| PacketError::UnknownPacket(e.to_string()))?;
                json::from_json(json)
            }
            Encoding::Literal => {
                let text = std::str::from_utf8(data)
                    .map_err(|e| PacketError::UnknownPacket(e.to_string()))?;
                literal_eval(text).map_err(|e| PacketError::UnknownPacket(e.to_string()))
            }
        }
    }
}

impl Envelope for Codec {
    fn encode<P: Packet + ?Sized>(&self, packet: &P) -> Result<Vec<u8>> {
        Codec::encode(self, packet)
    }

    fn decode<P: Packet + ?Sized>(&self, packet: &mut P, data: &[u8]) -> Result<()> {
        Codec::decode(self, packet, data)
    }
}

/// Take `{tag: {name: value}}` apart and match it against `packet`.
fn unwrap_envelope<P: Packet + ?Sized>(
    packet: &P,
    envelope: Value,
) -> Result<Vec<(String, Value)>> {
    let mut top = match envelope {
        Value::Dict(pairs) => pairs,
        other => {
            return Err(PacketError::UnknownPacket(format!(
                "Expected dictionary data, got {}",
                other.type_name()
            )))
        }
    };
    if top.len() != 1 {
        return Err(PacketError::UnknownPacket(format!(
            "Expected a single tag, got {} keys",
            top.len()
        )));
    }
    let (tag, inner) = top.remove(0);
    if tag.as_str() != Some(packet.tag()) {
        return Err(PacketError::InvalidData(format!(
            "Expected data with tag '{}'",
            packet.tag()
        )));
    }
    let Value::Dict(pairs) = inner else {
        return Err(PacketError::InvalidData("Expected dictionary data".to_string()));
    };

    let mut values = Vec::with_capacity(pairs.len());
    for (key, value) in pairs {
        match key {
            Value::Str(name) => values.push((name, value)),
            other => {
                return Err(PacketError::InvalidData(format!(
                    "Attribute names must be strings, got {}",
                    other.type_name()
                )))
            }
        }
    }

    let expected = packet.attribute_names();
    let matches = values.len() == expected.len()
        && values
            .iter()
            .all(|(name, _)| expected.contains(&name.as_str()));
    if !matches {
        return Err(PacketError::InvalidData("Attributes do not match".to_string()));
    }
    Ok(values)
}
