//! Packet instances and the trait the codecs operate on.

use std::sync::Arc;

use packet_literal::Value;

use crate::error::{PacketError, Result};
use crate::schema::{NonePolicy, Schema};

// ============================================================================
// Packet trait
// ============================================================================

/// A tagged set of named attributes that can be carried in an envelope.
///
/// [`Record`] is the stock implementation. Applications may implement this
/// for their own structs as long as the attribute set is stable between
/// encode and decode.
pub trait Packet {
    /// Top-level key of the envelope. Both parties must agree on it.
    fn tag(&self) -> &str;

    /// Current attribute names, in encoding order.
    fn attribute_names(&self) -> Vec<&str>;

    fn attribute(&self, name: &str) -> Option<&Value>;

    /// Overwrite attributes with already-validated values. Called by the
    /// codecs only after every check passed.
    fn overwrite(&mut self, values: Vec<(String, Value)>);

    fn attributes(&self) -> Vec<(String, Value)> {
        self.attribute_names()
            .into_iter()
            .filter_map(|name| {
                self.attribute(name)
                    .map(|value| (name.to_string(), value.clone()))
            })
            .collect()
    }

    fn none_policy(&self) -> NonePolicy {
        NonePolicy::Wildcard
    }
}

// ============================================================================
// Record
// ============================================================================

/// An instance of a [`Schema`].
///
/// Declared fields are always present. Extra attributes can be attached
/// explicitly with [`Record::attach`]; attributes are never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    schema: Arc<Schema>,
    values: Vec<(String, Value)>,
}

impl Record {
    /// Create a record holding the schema defaults.
    pub fn new(schema: &Arc<Schema>) -> Self {
        let values = schema
            .fields()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect();
        Self {
            schema: Arc::clone(schema),
            values,
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.iter().any(|(n, _)| n == name)
    }

    /// Set an existing attribute. Unknown names are rejected.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        let slot = self
            .values
            .iter_mut()
            .find(|(n, _)| n == name)
            .ok_or_else(|| PacketError::InvalidData(format!("Unknown attribute '{name}'")))?;
        slot.1 = value.into();
        Ok(())
    }

    /// Add an attribute outside the schema, or replace one. The attribute
    /// becomes part of this record's attribute set.
    pub fn attach(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.values.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.values.push((name, value)),
        }
    }

    /// The attribute mapping as a dict value.
    pub fn to_value(&self) -> Value {
        Value::Dict(
            self.values
                .iter()
                .map(|(name, value)| (Value::Str(name.clone()), value.clone()))
                .collect(),
        )
    }
}

impl Packet for Record {
    fn tag(&self) -> &str {
        self.schema.tag()
    }

    fn attribute_names(&self) -> Vec<&str> {
        self.values.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn attribute(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }

    fn overwrite(&mut self, values: Vec<(String, Value)>) {
        for (name, value) in values {
            self.attach(name, value);
        }
    }

    fn attributes(&self) -> Vec<(String, Value)> {
        self.values.clone()
    }

    fn none_policy(&self) -> NonePolicy {
        self.schema.none_policy()
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Dict(
            record
                .values
                .into_iter()
                .map(|(name, value)| (Value::Str(name), value))
                .collect(),
        )
    }
}

impl From<&Record> for Value {
    fn from(record: &Record) -> Self {
        record.to_value()
    }
}
