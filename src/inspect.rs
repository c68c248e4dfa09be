//! Type-constrained decoding.
//!
//! A decoded value may replace an attribute only if it has the same runtime
//! type as the attribute's current value. None-valued attributes follow the
//! packet's [`NonePolicy`].

use packet_literal::Value;

use crate::error::{PacketError, Result};
use crate::record::Packet;
use crate::schema::NonePolicy;

/// Check every incoming value against the packet's current values.
pub(crate) fn check_types<P: Packet + ?Sized>(
    packet: &P,
    incoming: &[(String, Value)],
) -> Result<()> {
    let policy = packet.none_policy();
    for (name, new) in incoming {
        let Some(current) = packet.attribute(name) else {
            continue;
        };
        if !accepts(current, new, policy) {
            return Err(PacketError::InvalidData(format!(
                "Attribute '{name}' expects {}, got {}",
                current.type_name(),
                new.type_name()
            )));
        }
    }
    Ok(())
}

fn accepts(current: &Value, new: &Value, policy: NonePolicy) -> bool {
    match (current, policy) {
        (Value::None, NonePolicy::Wildcard) => true,
        _ => current.type_name() == new.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::schema::schema;

    fn record(policy: NonePolicy) -> Record {
        Record::new(
            &schema("Dummy")
                .field("a", 1)
                .field("b", Value::None)
                .none_policy(policy)
                .build(),
        )
    }

    fn incoming(a: Value, b: Value) -> Vec<(String, Value)> {
        vec![("a".to_string(), a), ("b".to_string(), b)]
    }

    #[test]
    fn same_type_accepted() {
        let r = record(NonePolicy::Wildcard);
        check_types(&r, &incoming(Value::Int(5), Value::None)).unwrap();
    }

    #[test]
    fn different_type_rejected() {
        let r = record(NonePolicy::Wildcard);
        let err = check_types(&r, &incoming("5".into(), Value::None)).unwrap_err();
        assert!(matches!(err, PacketError::InvalidData(_)));
        assert!(err.to_string().contains("expects int, got str"));
        // Numbers of different kinds are different types.
        assert!(check_types(&r, &incoming(Value::Float(5.0), Value::None)).is_err());
        assert!(check_types(&r, &incoming(Value::Bool(true), Value::None)).is_err());
        // None does not satisfy a non-none attribute.
        assert!(check_types(&r, &incoming(Value::None, Value::None)).is_err());
    }

    #[test]
    fn wildcard_none_accepts_anything() {
        let r = record(NonePolicy::Wildcard);
        check_types(&r, &incoming(Value::Int(1), "not None".into())).unwrap();
        check_types(&r, &incoming(Value::Int(1), Value::List(vec![]))).unwrap();
    }

    #[test]
    fn strict_none_accepts_only_none() {
        let r = record(NonePolicy::Strict);
        check_types(&r, &incoming(Value::Int(1), Value::None)).unwrap();
        let err = check_types(&r, &incoming(Value::Int(1), "not None".into())).unwrap_err();
        assert!(err.to_string().contains("expects NoneType, got str"));
    }
}
