//! Chunked Transport Tests
//!
//! The same client behaviour, with every read and write moving one byte.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;

use common::{frame, start_scripted, unique_key, FakeServer};
use otter::protocol::MessageType;
use otter::{ChunkedTransport, Client, Config, OtterError, TcpTransport};
use proptest::prelude::*;

fn chunked_client_for(addr: String) -> Client {
    let config = Config::builder()
        .addr(addr)
        .transport(Arc::new(ChunkedTransport::new(Arc::new(TcpTransport::default()))))
        .build();
    Client::with_config(config).unwrap()
}

#[test]
fn test_ping_one_byte_per_write() {
    let mut client = FakeServer::shared().chunked_client();
    client.ping().unwrap();
}

#[test]
fn test_put_get_delete_scenario() {
    let mut client = FakeServer::shared().chunked_client();

    client.put("k1", "v1").unwrap();
    assert_eq!(client.get("k1").unwrap(), b"v1");

    client.delete("k1").unwrap();
    assert!(client.get("k1").unwrap_err().is_not_found());

    client.echo(&[1, 2, 3, 4, 5]).unwrap();
}

#[test]
fn test_echo_full_buffer() {
    let mut client = FakeServer::shared().chunked_client();
    let message: Vec<u8> = (0..client.buffer_capacity()).map(|i| i as u8).collect();
    client.echo(&message).unwrap();
}

#[test]
fn test_mixed_transports_share_state() {
    let server = FakeServer::shared();
    let mut plain = server.client();
    let mut chunked = server.chunked_client();
    let key = unique_key("mixed");

    chunked.put(&key, "from-chunked").unwrap();
    assert_eq!(plain.get(&key).unwrap(), b"from-chunked");

    plain.delete(&key).unwrap();
    assert!(chunked.get(&key).unwrap_err().is_not_found());
}

#[test]
fn test_oversized_response_rejected() {
    let mut reply = frame(MessageType::Echo, &[]);
    reply[4..8].copy_from_slice(&1025u32.to_be_bytes());
    let mut client = chunked_client_for(start_scripted(reply));

    assert!(matches!(
        client.echo(b"hello").unwrap_err(),
        OtterError::PayloadTooLarge { size: 1025, capacity: 1024 }
    ));
    assert!(client.is_broken());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_put_then_get_chunked(
        value in proptest::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut client = FakeServer::shared().chunked_client();
        let key = unique_key("chunked-prop");

        client.put(&key, &value).unwrap();
        prop_assert_eq!(client.get(&key).unwrap(), value);
    }

    #[test]
    fn prop_echo_identity_chunked(message in proptest::collection::vec(any::<u8>(), 0..=1024)) {
        let mut client = FakeServer::shared().chunked_client();
        prop_assert!(client.echo(&message).is_ok());
    }
}
