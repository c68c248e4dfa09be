//! Record type descriptors.
//!
//! A [`Schema`] is built once per record type and shared by every instance
//! through an `Arc`. It fixes the tag, the declared fields in order and the
//! default value of each field.

use std::sync::Arc;

use packet_literal::Value;

// ============================================================================
// NonePolicy
// ============================================================================

/// How type-checked decoding treats attributes whose current value is none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum NonePolicy {
    /// A none-valued attribute accepts a value of any type.
    #[default]
    Wildcard,
    /// None is a type of its own: a none-valued attribute accepts only none.
    Strict,
}

// ============================================================================
// Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    tag: String,
    fields: Vec<(String, Value)>,
    none_policy: NonePolicy,
}

impl Schema {
    /// Tag written as the single top-level key of every envelope.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Declared fields with their defaults, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    pub fn default_value(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn none_policy(&self) -> NonePolicy {
        self.none_policy
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Start a schema for records tagged `tag`.
pub fn schema(tag: impl Into<String>) -> SchemaBuilder {
    SchemaBuilder {
        tag: tag.into(),
        fields: Vec::new(),
        none_policy: NonePolicy::default(),
    }
}

pub struct SchemaBuilder {
    tag: String,
    fields: Vec<(String, Value)>,
    none_policy: NonePolicy,
}

impl SchemaBuilder {
    /// Declare a field. Declaring a name twice replaces its default and
    /// keeps its original position.
    pub fn field(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        let name = name.into();
        let default = default.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = default,
            None => self.fields.push((name, default)),
        }
        self
    }

    pub fn none_policy(mut self, policy: NonePolicy) -> Self {
        self.none_policy = policy;
        self
    }

    pub fn build(self) -> Arc<Schema> {
        Arc::new(Schema {
            tag: self.tag,
            fields: self.fields,
            none_policy: self.none_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_keep_declaration_order() {
        let s = schema("Dummy")
            .field("b", Value::None)
            .field("a", 1)
            .field("c", "text")
            .build();
        assert_eq!(s.tag(), "Dummy");
        assert_eq!(s.field_names().collect::<Vec<_>>(), vec!["b", "a", "c"]);
        assert_eq!(s.default_value("a"), Some(&Value::Int(1)));
        assert!(s.contains("c"));
        assert!(!s.contains("d"));
        assert_eq!(s.none_policy(), NonePolicy::Wildcard);
    }

    #[test]
    fn redeclared_field_replaces_default() {
        let s = schema("Dummy").field("a", 1).field("b", 2).field("a", 3).build();
        assert_eq!(s.len(), 2);
        assert_eq!(
            s.fields().collect::<Vec<_>>(),
            vec![("a", &Value::Int(3)), ("b", &Value::Int(2))]
        );
    }

    #[test]
    fn strict_none_policy() {
        let s = schema("Dummy").none_policy(NonePolicy::Strict).build();
        assert_eq!(s.none_policy(), NonePolicy::Strict);
        assert!(s.is_empty());
    }
}
