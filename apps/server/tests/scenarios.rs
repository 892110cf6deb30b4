// [apps/server/tests/scenarios.rs]
//! End-to-end scenarios driving a full in-process server over a loopback
//! TLS connection with a self-signed test certificate.

use denul_blobstore::BlobStore;
use denul_protocol::Server;
use denul_server_lib::serve;
use denul_wire::{read_message, write_message, DeleteOpcode, GetOpcode, Message, ServerHelloOpcode, StoreOpcode};
use flate2::read::DeflateDecoder;
use rustls::pki_types::ServerName;
use sha2::{Digest, Sha256};
use std::io::Read;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio_rustls::TlsConnector;

const TEST_DOMAIN: &str = "localhost";

/// Boots a server over an ephemeral loopback port and returns everything
/// a test client needs to connect to it.
struct Harness {
    addr: std::net::SocketAddr,
    connector: TlsConnector,
    _db_dir: tempfile::TempDir,
}

impl Harness {
    async fn start() -> Self {
        let db_dir = tempfile::tempdir().unwrap();
        let db_path = db_dir.path().join("denul.db");
        let blob_map = BlobStore::open(db_path.to_str().unwrap()).await.unwrap();
        let server = Server::bootstrap(blob_map, 3, 15, 1000).await.unwrap();

        let rcgen::CertifiedKey { cert, key_pair } =
            rcgen::generate_simple_self_signed([TEST_DOMAIN.to_string()]).unwrap();
        let cert_der = cert.der().clone();
        let key_der = rustls::pki_types::PrivateKeyDer::Pkcs8(key_pair.serialize_der().into());

        let tls_config = rustls::ServerConfig::builder()
            .with_no_client_auth()
            .with_single_cert(vec![cert_der.clone()], key_der)
            .unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(serve(listener, Arc::new(tls_config), server, denul_wire::DEFAULT_MAX_MESSAGE_BYTES));

        let mut roots = rustls::RootCertStore::empty();
        roots.add(cert_der).unwrap();
        let client_config = rustls::ClientConfig::builder()
            .with_root_certificates(roots)
            .with_no_client_auth();
        let connector = TlsConnector::from(Arc::new(client_config));

        Harness {
            addr,
            connector,
            _db_dir: db_dir,
        }
    }

    async fn connect(&self) -> tokio_rustls::client::TlsStream<TcpStream> {
        let tcp = TcpStream::connect(self.addr).await.unwrap();
        let server_name = ServerName::try_from(TEST_DOMAIN).unwrap();
        self.connector.connect(server_name, tcp).await.unwrap()
    }
}

fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

fn h(bytes: &[u8]) -> String {
    hex::encode(sha256(bytes))
}

fn decompress(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    DeflateDecoder::new(bytes).read_to_end(&mut out).unwrap();
    out
}

async fn roundtrip(stream: &mut tokio_rustls::client::TlsStream<TcpStream>, request: Message) -> Message {
    write_message(stream, &request).await.unwrap();
    read_message(stream, denul_wire::DEFAULT_MAX_MESSAGE_BYTES).await.unwrap()
}

#[tokio::test]
async fn scenario_1_valid_handshake() {
    let harness = Harness::start().await;
    let mut stream = harness.connect().await;

    let reply = roundtrip(
        &mut stream,
        Message::ClientHello {
            client_proto: "1.0".into(),
        },
    )
    .await;

    match reply {
        Message::ServerHello { server_proto, opcode, data } => {
            assert_eq!(server_proto, "1.0");
            assert_eq!(opcode, ServerHelloOpcode::CLIENT_HELLO_OK);
            assert!(!data.is_empty());
            denul_vicbf::Vicbf::deserialize(&decompress(&data)).unwrap();
        }
        _ => panic!("expected ServerHello"),
    }
}

#[tokio::test]
async fn scenario_2_rejected_handshake() {
    let harness = Harness::start().await;
    let mut stream = harness.connect().await;

    let reply = roundtrip(
        &mut stream,
        Message::ClientHello {
            client_proto: "2.0".into(),
        },
    )
    .await;

    match reply {
        Message::ServerHello { opcode, data, .. } => {
            assert_eq!(opcode, ServerHelloOpcode::CLIENT_HELLO_PROTO_NOT_SUPPORTED);
            assert_eq!(data, b"0".to_vec());
        }
        _ => panic!("expected ServerHello"),
    }
}

#[tokio::test]
async fn scenario_3_store_then_observe() {
    let harness = Harness::start().await;
    let mut stream = harness.connect().await;

    let n = b"eight byt";
    let a = sha256(n);
    let k = h(&a);
    let v = "deadbeefdeadbeefdeadbeefdeadbeef";

    let reply = roundtrip(
        &mut stream,
        Message::Store {
            key: k.clone(),
            value: v.as_bytes().to_vec(),
        },
    )
    .await;
    assert!(matches!(reply, Message::StoreReply { opcode, .. } if opcode == StoreOpcode::STORE_OK));

    let hello = roundtrip(
        &mut stream,
        Message::ClientHello {
            client_proto: "1.0".into(),
        },
    )
    .await;
    let Message::ServerHello { data, .. } = hello else { panic!("expected ServerHello") };
    let filter = denul_vicbf::Vicbf::deserialize(&decompress(&data)).unwrap();

    let raw_key: [u8; 32] = hex::decode(&k).unwrap().try_into().unwrap();
    assert!(filter.contains(&raw_key));
    assert!(!filter.contains(&a));
}

#[tokio::test]
async fn scenario_4_bad_key_format() {
    let harness = Harness::start().await;
    let mut stream = harness.connect().await;

    let reply = roundtrip(
        &mut stream,
        Message::Store {
            key: "deadbeefdecafbad".into(),
            value: b"deadbeefdecafbad".to_vec(),
        },
    )
    .await;
    assert!(matches!(reply, Message::StoreReply { opcode, .. } if opcode == StoreOpcode::STORE_FAIL_KEY_FMT));
}

#[tokio::test]
async fn scenario_5_duplicate_key() {
    let harness = Harness::start().await;
    let mut stream = harness.connect().await;

    let n = b"dup-preimage-8b!";
    let a = sha256(n);
    let k = h(&a);

    let first = roundtrip(
        &mut stream,
        Message::Store { key: k.clone(), value: b"v1".to_vec() },
    )
    .await;
    assert!(matches!(first, Message::StoreReply { opcode, .. } if opcode == StoreOpcode::STORE_OK));

    let second = roundtrip(
        &mut stream,
        Message::Store { key: k.clone(), value: b"v2".to_vec() },
    )
    .await;
    assert!(matches!(second, Message::StoreReply { opcode, .. } if opcode == StoreOpcode::STORE_FAIL_KEY_TAKEN));
}

#[tokio::test]
async fn scenario_6_delete_happy_path() {
    let harness = Harness::start().await;
    let mut stream = harness.connect().await;

    let n = b"delete-happy-path";
    let a = sha256(n);
    let k = h(&a);

    roundtrip(&mut stream, Message::Store { key: k.clone(), value: b"v".to_vec() }).await;

    let delete_reply = roundtrip(
        &mut stream,
        Message::Delete { key: k.clone(), auth: a.to_vec() },
    )
    .await;
    assert!(matches!(delete_reply, Message::DeleteReply { opcode, .. } if opcode == DeleteOpcode::DELETE_OK));

    let get_reply = roundtrip(&mut stream, Message::Get { key: k.clone() }).await;
    assert!(matches!(get_reply, Message::GetReply { opcode, .. } if opcode == GetOpcode::GET_FAIL_UNKNOWN_KEY));
}

#[tokio::test]
async fn scenario_7_delete_bad_auth() {
    let harness = Harness::start().await;
    let mut stream = harness.connect().await;

    let n = b"delete-bad-auth-pr";
    let a = sha256(n);
    let k = h(&a);

    roundtrip(&mut stream, Message::Store { key: k.clone(), value: b"v".to_vec() }).await;

    let delete_reply = roundtrip(
        &mut stream,
        Message::Delete { key: k.clone(), auth: k.clone().into_bytes() },
    )
    .await;
    assert!(matches!(delete_reply, Message::DeleteReply { opcode, .. } if opcode == DeleteOpcode::DELETE_FAIL_AUTH));

    let get_reply = roundtrip(&mut stream, Message::Get { key: k.clone() }).await;
    assert!(matches!(get_reply, Message::GetReply { opcode, .. } if opcode == GetOpcode::GET_OK));
}

#[tokio::test]
async fn scenario_8_delete_missing() {
    let harness = Harness::start().await;
    let mut stream = harness.connect().await;

    let n = b"never-stored-at-all";
    let a = sha256(n);
    let k = h(&a);

    let delete_reply = roundtrip(&mut stream, Message::Delete { key: k, auth: a.to_vec() }).await;
    assert!(matches!(delete_reply, Message::DeleteReply { opcode, .. } if opcode == DeleteOpcode::DELETE_FAIL_NOT_FOUND));
}
