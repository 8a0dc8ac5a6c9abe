//! Shared test fixtures
//!
//! An in-process Otter server speaking the wire protocol over TCP, backed by
//! a HashMap, plus a scripted server that answers with crafted bytes.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread;

use parking_lot::Mutex;

use otter::protocol::{
    Header, MessageType, PayloadParser, RequestBuilder, StatusCode, HEADER_SIZE, U16_SIZE,
    U32_SIZE,
};
use otter::transport::read_full;
use otter::{ChunkedTransport, Client, Config};

type Store = Arc<Mutex<HashMap<Vec<u8>, Vec<u8>>>>;

/// In-memory server handling Echo/Get/Put/Delete
pub struct FakeServer {
    addr: SocketAddr,
    store: Store,
}

impl FakeServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind fake server");
        let addr = listener.local_addr().expect("local addr");
        let store: Store = Arc::new(Mutex::new(HashMap::new()));

        let accept_store = Arc::clone(&store);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let store = Arc::clone(&accept_store);
                thread::spawn(move || serve(stream, store));
            }
        });

        Self { addr, store }
    }

    /// Server shared by every test in the binary
    pub fn shared() -> &'static FakeServer {
        static SERVER: OnceLock<FakeServer> = OnceLock::new();
        SERVER.get_or_init(FakeServer::start)
    }

    pub fn addr(&self) -> String {
        self.addr.to_string()
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    pub fn client(&self) -> Client {
        Client::connect(self.addr()).expect("connect to fake server")
    }

    pub fn chunked_client(&self) -> Client {
        let config = Config::builder()
            .addr(self.addr())
            .transport(Arc::new(ChunkedTransport::default()))
            .build();
        Client::with_config(config).expect("connect to fake server")
    }
}

/// Unique key per call within the test binary
pub fn unique_key(prefix: &str) -> String {
    static NEXT: AtomicUsize = AtomicUsize::new(0);
    format!("{}-{}", prefix, NEXT.fetch_add(1, Ordering::Relaxed))
}

fn serve(mut stream: TcpStream, store: Store) {
    loop {
        let mut head = [0u8; HEADER_SIZE];
        if read_full(&mut stream, &mut head).is_err() {
            return;
        }
        let request = Header::decode(&head);

        let mut payload = vec![0u8; request.payload_size as usize];
        if read_full(&mut stream, &mut payload).is_err() {
            return;
        }

        let mut parser = PayloadParser::new(&payload);
        let mut reply = RequestBuilder::new(&mut stream);

        match request.message_type {
            MessageType::Echo => {
                reply.write_header(Header::new(MessageType::Echo, payload.len() as u32));
                reply.write_raw_bytes(&payload);
            }
            MessageType::Get => {
                let Some(key) = parser.read_string() else { return };
                match store.lock().get(key) {
                    Some(value) => {
                        let size = U16_SIZE + U32_SIZE + value.len();
                        reply.write_header(Header::new(MessageType::Data, size as u32));
                        reply.write_u16(StatusCode::OK);
                        reply.write_string(value);
                    }
                    None => {
                        reply.write_header(Header::new(MessageType::Data, U16_SIZE as u32));
                        reply.write_u16(StatusCode::NOT_FOUND);
                    }
                }
            }
            MessageType::Put => {
                let Some(key) = parser.read_string() else { return };
                let Some(value) = parser.read_string() else { return };
                store.lock().insert(key.to_vec(), value.to_vec());
                reply.write_header(Header::new(MessageType::Ack, U16_SIZE as u32));
                reply.write_u16(StatusCode::OK);
            }
            MessageType::Delete => {
                let Some(key) = parser.read_string() else { return };
                store.lock().remove(key);
                reply.write_header(Header::new(MessageType::Ack, U16_SIZE as u32));
                reply.write_u16(StatusCode::OK);
            }
            _ => return,
        }

        if reply.flush().is_err() {
            return;
        }
    }
}

/// Answer the first request on every connection with `reply` verbatim
pub fn start_scripted(reply: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind scripted server");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(stream) = stream else { break };
            let reply = reply.clone();
            thread::spawn(move || answer_once(stream, &reply));
        }
    });

    addr.to_string()
}

fn answer_once(mut stream: TcpStream, reply: &[u8]) {
    let mut head = [0u8; HEADER_SIZE];
    if read_full(&mut stream, &mut head).is_err() {
        return;
    }
    let mut payload = vec![0u8; Header::decode(&head).payload_size as usize];
    if read_full(&mut stream, &mut payload).is_err() {
        return;
    }

    let _ = stream.write_all(reply);
    let _ = stream.flush();
    // Hold the connection until the client hangs up
    let mut sink = [0u8; 64];
    while matches!(stream.read(&mut sink), Ok(n) if n > 0) {}
}

/// Encode a frame by hand
pub fn frame(message_type: MessageType, payload: &[u8]) -> Vec<u8> {
    let mut out = Header::new(message_type, payload.len() as u32).encode().to_vec();
    out.extend_from_slice(payload);
    out
}
