use packet::{Codec, Encoding, NonePolicy, Packet, PacketError, Value};

use crate::{dummy, inner};

fn changed() -> packet::Record {
    let mut packet = dummy(NonePolicy::Wildcard);
    packet.set("a", 123).unwrap();
    let mut c = inner();
    c.set("inner_a", 123).unwrap();
    packet.set("c", c).unwrap();
    packet
}

#[test]
fn both_encodings_round_trip() {
    for encoding in [Encoding::Json, Encoding::Literal] {
        let codec = Codec::new(encoding);
        let sender = changed();
        let mut receiver = dummy(NonePolicy::Wildcard);
        codec.decode(&mut receiver, codec.encode(&sender).unwrap()).unwrap();

        assert_eq!(receiver.attributes(), sender.attributes());
        assert_eq!(receiver.get("a"), Some(&Value::Int(123)));
        assert_eq!(
            receiver.get("c").and_then(|c| c.get("inner_a")),
            Some(&Value::Int(123))
        );
    }
}

#[test]
fn literal_carries_what_json_cannot() {
    let codec = Codec::new(Encoding::Literal);
    let mut sender = dummy(NonePolicy::Wildcard);
    sender
        .set("b", Value::set(vec![Value::Bytes(b"k".to_vec()), Value::Complex { re: 0.0, im: 1.0 }]))
        .unwrap();

    let mut receiver = dummy(NonePolicy::Wildcard);
    codec.decode(&mut receiver, codec.encode(&sender).unwrap()).unwrap();
    assert_eq!(receiver.get("b"), sender.get("b"));

    assert!(matches!(
        Codec::new(Encoding::Json).encode(&sender).unwrap_err(),
        PacketError::NotSerializable(_)
    ));
}

#[test]
fn literal_text_from_a_peer() {
    let codec = Codec::new(Encoding::Literal);
    let mut packet = dummy(NonePolicy::Wildcard);
    codec
        .decode(
            &mut packet,
            "{'DummyPacket': {'c': {'inner_a': 0x10}, 'a': -1 + 2j, 'b': set([1, 1, 2])}}",
        )
        .unwrap();
    assert_eq!(packet.get("a"), Some(&Value::Complex { re: -1.0, im: 2.0 }));
    assert_eq!(packet.get("b"), Some(&Value::set(vec![1.into(), 2.into()])));
}

#[test]
fn rejection_leaves_packet_untouched() {
    let codec = Codec::new(Encoding::Json);
    let original = dummy(NonePolicy::Wildcard);
    let mut packet = original.clone();

    let wrong_tag = r#"{"OtherPacket": {"a": 2, "b": null, "c": {}}}"#;
    let missing = r#"{"DummyPacket": {"a": 2, "b": null}}"#;
    let extra = r#"{"DummyPacket": {"a": 2, "b": null, "c": {}, "d": 4}}"#;
    for data in [wrong_tag, missing, extra] {
        let err = codec.decode(&mut packet, data).unwrap_err();
        assert!(matches!(err, PacketError::InvalidData(_)), "{data}: {err}");
        assert_eq!(packet, original);
    }
}

#[test]
fn hostile_literal_input_is_refused() {
    let codec = Codec::new(Encoding::Literal);
    let mut packet = dummy(NonePolicy::Wildcard);
    for data in [
        "__import__('os')",
        "open('f')",
        "{'DummyPacket': {'a': 1 == 1, 'b': None, 'c': {}}}",
        "{'DummyPacket': {'a': x, 'b': None, 'c': {}}}",
        "{'DummyPacket': {'a': ().__class__, 'b': None, 'c': {}}}",
        "{'DummyPacket': {'a': [1][0], 'b': None, 'c': {}}}",
        "{'DummyPacket': {'a': 1, 'b': None, 'c': {}}} and True",
    ] {
        let err = codec.decode(&mut packet, data).unwrap_err();
        assert!(matches!(err, PacketError::UnknownPacket(_)), "{data}: {err}");
    }
    assert_eq!(packet, dummy(NonePolicy::Wildcard));
}

#[test]
fn deep_nesting_is_refused() {
    let codec = Codec::new(Encoding::Literal);
    let deep = format!(
        "{{'DummyPacket': {{'a': {}1{}, 'b': None, 'c': {{}}}}}}",
        "[".repeat(5000),
        "]".repeat(5000)
    );
    assert!(matches!(
        codec.decode(&mut dummy(NonePolicy::Wildcard), deep).unwrap_err(),
        PacketError::UnknownPacket(_)
    ));
}
