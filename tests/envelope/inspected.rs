use packet::{Codec, Encoding, ErrorKind, NonePolicy, PacketError, Value};

use crate::dummy;

#[test]
fn int_attribute_accepts_only_ints() {
    let codec = Codec::inspected(Encoding::Json);
    let mut sender = dummy(NonePolicy::Wildcard);
    let mut receiver = dummy(NonePolicy::Wildcard);

    sender.set("a", 99).unwrap();
    codec.decode(&mut receiver, codec.encode(&sender).unwrap()).unwrap();
    assert_eq!(receiver.get("a"), Some(&Value::Int(99)));

    sender.set("a", "99").unwrap();
    let err = codec
        .decode(&mut receiver, codec.encode(&sender).unwrap())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidData);
    assert_eq!(receiver.get("a"), Some(&Value::Int(99)));
}

#[test]
fn plain_codec_does_not_lock_types() {
    let codec = Codec::new(Encoding::Json);
    let mut sender = dummy(NonePolicy::Wildcard);
    sender.set("a", "anything").unwrap();
    let mut receiver = dummy(NonePolicy::Wildcard);
    codec.decode(&mut receiver, codec.encode(&sender).unwrap()).unwrap();
    assert_eq!(receiver.get("a"), Some(&Value::from("anything")));
}

#[test]
fn none_attribute_is_wildcard_by_default() {
    let codec = Codec::inspected(Encoding::Literal);
    let mut sender = dummy(NonePolicy::Wildcard);
    sender.set("b", "not None").unwrap();

    let mut receiver = dummy(NonePolicy::Wildcard);
    codec.decode(&mut receiver, codec.encode(&sender).unwrap()).unwrap();
    assert_eq!(receiver.get("b"), Some(&Value::from("not None")));
}

#[test]
fn strict_none_attribute_is_locked() {
    let codec = Codec::inspected(Encoding::Json);
    let mut sender = dummy(NonePolicy::Strict);
    let mut receiver = dummy(NonePolicy::Strict);

    sender.set("a", 123).unwrap();
    codec.decode(&mut receiver, codec.encode(&sender).unwrap()).unwrap();
    assert_eq!(receiver.get("a"), Some(&Value::Int(123)));
    assert_eq!(receiver.get("b"), Some(&Value::None));

    sender.set("b", "not None").unwrap();
    let err = codec
        .decode(&mut receiver, codec.encode(&sender).unwrap())
        .unwrap_err();
    assert!(matches!(err, PacketError::InvalidData(_)));
    assert_eq!(receiver.get("b"), Some(&Value::None));
}

#[test]
fn nested_record_is_a_dict() {
    let codec = Codec::inspected(Encoding::Json);
    let mut sender = dummy(NonePolicy::Wildcard);
    let mut receiver = dummy(NonePolicy::Wildcard);

    sender.set("c", Value::dict(vec![("other".into(), 1.into())])).unwrap();
    codec.decode(&mut receiver, codec.encode(&sender).unwrap()).unwrap();

    sender.set("c", Value::List(vec![])).unwrap();
    assert!(codec
        .decode(&mut receiver, codec.encode(&sender).unwrap())
        .is_err());
}
