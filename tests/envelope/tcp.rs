use std::net::{TcpListener, TcpStream};
use std::thread;

use packet::{
    CipherMode, Encoding, Envelope, NonePolicy, SafeCodec, Value, DEFAULT_BUFFER_SIZE,
};

use crate::{dummy, random_key};

fn connected_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let client = thread::spawn(move || TcpStream::connect(addr).unwrap());
    let (server, _) = listener.accept().unwrap();
    (client.join().unwrap(), server)
}

#[test]
fn encrypted_packet_over_tcp() {
    let key = random_key(32);
    let codec = SafeCodec::from_key(&key, CipherMode::Cbc, Encoding::Json).unwrap();
    let (mut client, mut server) = connected_pair();

    let sender_codec = codec.clone();
    let sender = thread::spawn(move || {
        let mut packet = dummy(NonePolicy::Wildcard);
        packet.set("a", 123).unwrap();
        sender_codec.send_to(&packet, Some(&mut client)).unwrap()
    });
    let sent = sender.join().unwrap();
    assert!(sent.is_some());

    let mut received = dummy(NonePolicy::Wildcard);
    assert!(codec
        .receive_from(&mut received, Some(&mut server), DEFAULT_BUFFER_SIZE)
        .unwrap());
    assert_eq!(received.get("a"), Some(&Value::Int(123)));
}

#[test]
fn closed_connection_receives_nothing() {
    let codec = SafeCodec::from_key(&random_key(16), CipherMode::Ctr, Encoding::Json).unwrap();
    let (client, mut server) = connected_pair();
    drop(client);

    let mut packet = dummy(NonePolicy::Wildcard);
    assert!(!codec
        .receive_from(&mut packet, Some(&mut server), DEFAULT_BUFFER_SIZE)
        .unwrap());
}
