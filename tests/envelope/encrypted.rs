use packet::{
    CipherKey, CipherMode, Encoding, NonePolicy, PacketConfig, PacketError, SafeCodec, Value,
};

use crate::{dummy, random_key};

const MODES: [CipherMode; 2] = [CipherMode::Cbc, CipherMode::Ctr];

#[test]
fn every_key_size_round_trips() {
    for len in [16, 24, 32] {
        let key = random_key(len);
        for mode in MODES {
            let codec = SafeCodec::from_key(&key, mode, Encoding::Literal).unwrap();
            let mut sender = dummy(NonePolicy::Wildcard);
            sender.set("b", Value::Bytes(vec![0, 1, 2])).unwrap();

            let mut receiver = dummy(NonePolicy::Wildcard);
            codec.decode(&mut receiver, codec.encode(&sender).unwrap()).unwrap();
            assert_eq!(receiver, sender);
        }
    }
}

#[test]
fn wrong_key_is_detected() {
    for mode in MODES {
        let sender = SafeCodec::from_key(&random_key(32), mode, Encoding::Json).unwrap();
        let receiver = SafeCodec::from_key(&random_key(32), mode, Encoding::Json).unwrap();
        let mut packet = dummy(NonePolicy::Wildcard);
        packet.set("a", 7).unwrap();
        let wire = sender.encode(&packet).unwrap();

        let mut target = dummy(NonePolicy::Wildcard);
        let err = receiver.decode(&mut target, &wire).unwrap_err();
        assert!(err.is_data_error(), "{mode}: {err}");
        assert_eq!(target, dummy(NonePolicy::Wildcard));
    }
}

#[test]
fn mode_mismatch_is_detected() {
    let key = random_key(16);
    let cbc = SafeCodec::from_key(&key, CipherMode::Cbc, Encoding::Json).unwrap();
    let ctr = SafeCodec::from_key(&key, CipherMode::Ctr, Encoding::Json).unwrap();
    let wire = cbc.encode(&dummy(NonePolicy::Wildcard)).unwrap();
    assert!(ctr.decode(&mut dummy(NonePolicy::Wildcard), &wire).is_err());
}

#[test]
fn tampered_ciphertext_is_detected() {
    let codec = SafeCodec::from_key(&random_key(32), CipherMode::Cbc, Encoding::Json).unwrap();
    let mut wire = codec.encode(&dummy(NonePolicy::Wildcard)).unwrap();
    wire.truncate(wire.len() - 3);
    let err = codec
        .decode(&mut dummy(NonePolicy::Wildcard), &wire)
        .unwrap_err();
    assert!(matches!(err, PacketError::Crypto(_)));
    assert!(err.is_data_error());
}

#[test]
fn inspected_safe_codec_locks_types() {
    let key = CipherKey::new(&random_key(24)).unwrap();
    let codec = SafeCodec::inspected(key, CipherMode::Ctr, Encoding::Json);
    let mut sender = dummy(NonePolicy::Strict);
    sender.set("b", 1.5).unwrap();
    let mut receiver = dummy(NonePolicy::Strict);
    assert!(matches!(
        codec
            .decode(&mut receiver, codec.encode(&sender).unwrap())
            .unwrap_err(),
        PacketError::InvalidData(_)
    ));
}

#[test]
fn config_builds_safe_codec() {
    let config = PacketConfig::from_json(r#"{"cipher_mode": "ctr", "encoding": "literal"}"#).unwrap();
    let key = random_key(32);
    let a = config.safe_codec(&key).unwrap();
    let b = config.safe_codec(&key).unwrap();
    let mut receiver = dummy(NonePolicy::Wildcard);
    b.decode(&mut receiver, a.encode(&dummy(NonePolicy::Wildcard)).unwrap())
        .unwrap();
    assert_eq!(receiver, dummy(NonePolicy::Wildcard));
}
