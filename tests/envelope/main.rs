//! End-to-end tests for the packet envelope.

mod encrypted;
mod inspected;
mod round_trip;
mod tcp;

use packet::{schema, NonePolicy, Record, Value};

// ============================================================================
// Helpers
// ============================================================================

pub fn inner() -> Record {
    Record::new(
        &schema("InnerClass")
            .field("inner_a", 1)
            .field("inner_b", 2)
            .field("inner_c", 3)
            .build(),
    )
}

/// `a = 1, b = None, c = InnerClass()`.
pub fn dummy(policy: NonePolicy) -> Record {
    Record::new(
        &schema("DummyPacket")
            .field("a", 1)
            .field("b", Value::None)
            .field("c", inner())
            .none_policy(policy)
            .build(),
    )
}

pub fn random_key(len: usize) -> Vec<u8> {
    let mut key = vec![0u8; len];
    getrandom::getrandom(&mut key).unwrap();
    key
}
