// [libs/infra/wire/src/message.rs]
//! The tagged-union message envelope exchanged over the wire.

use serde::{Deserialize, Serialize};

/// One message, exactly one variant populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    /// Client's opening proposal of the protocol version it speaks.
    ClientHello {
        /// e.g. `"1.0"`.
        client_proto: String,
    },
    /// Server's handshake reply, carrying the compressed VICBF image.
    ServerHello {
        /// The server's own protocol version, currently always `"1.0"`.
        server_proto: String,
        /// A [`ServerHelloOpcode`] value.
        opcode: u8,
        /// `deflate(serialize(VICBF))` on success, a single `b"0"` placeholder otherwise.
        data: Vec<u8>,
    },
    /// Request to store `value` under the content-addressed `key`.
    Store {
        /// 64-character lowercase hex SHA-256 digest.
        key: String,
        /// Opaque payload bytes.
        value: Vec<u8>,
    },
    /// Reply to [`Message::Store`].
    StoreReply {
        /// Echoes the request's key.
        key: String,
        /// A [`StoreOpcode`] value.
        opcode: u8,
    },
    /// Request to delete `key`, authorized by presenting its preimage.
    Delete {
        /// 64-character lowercase hex SHA-256 digest.
        key: String,
        /// Preimage whose SHA-256 must equal `key`.
        auth: Vec<u8>,
    },
    /// Reply to [`Message::Delete`].
    DeleteReply {
        /// Echoes the request's key.
        key: String,
        /// A [`DeleteOpcode`] value.
        opcode: u8,
    },
    /// Request to fetch the value stored under `key`.
    Get {
        /// 64-character lowercase hex SHA-256 digest.
        key: String,
    },
    /// Reply to [`Message::Get`].
    GetReply {
        /// Echoes the request's key.
        key: String,
        /// A [`GetOpcode`] value.
        opcode: u8,
        /// Populated on success, empty otherwise.
        value: Vec<u8>,
    },
}

/// Opcodes carried by [`Message::ServerHello`].
#[non_exhaustive]
pub struct ServerHelloOpcode;
impl ServerHelloOpcode {
    /// Handshake accepted; `data` holds the compressed VICBF image.
    pub const CLIENT_HELLO_OK: u8 = 0;
    /// Client proposed a protocol version this server does not speak.
    pub const CLIENT_HELLO_PROTO_NOT_SUPPORTED: u8 = 1;
}

/// Opcodes carried by [`Message::StoreReply`].
#[non_exhaustive]
pub struct StoreOpcode;
impl StoreOpcode {
    /// Stored successfully.
    pub const STORE_OK: u8 = 0;
    /// `key` was not a 64-character lowercase hex string.
    pub const STORE_FAIL_KEY_FMT: u8 = 1;
    /// `key` already has a value.
    pub const STORE_FAIL_KEY_TAKEN: u8 = 2;
    /// An unexpected storage failure occurred.
    pub const STORE_FAIL_UNKNOWN: u8 = 3;
}

/// Opcodes carried by [`Message::DeleteReply`].
#[non_exhaustive]
pub struct DeleteOpcode;
impl DeleteOpcode {
    /// Deleted successfully.
    pub const DELETE_OK: u8 = 0;
    /// `key` was not a 64-character lowercase hex string.
    pub const DELETE_FAIL_KEY_FMT: u8 = 1;
    /// `key` is not a member of the membership summary.
    pub const DELETE_FAIL_NOT_FOUND: u8 = 2;
    /// `sha256(auth)` did not match `key`.
    pub const DELETE_FAIL_AUTH: u8 = 3;
}

/// Opcodes carried by [`Message::GetReply`].
#[non_exhaustive]
pub struct GetOpcode;
impl GetOpcode {
    /// Found; `value` is populated.
    pub const GET_OK: u8 = 0;
    /// `key` was not a 64-character lowercase hex string.
    pub const GET_FAIL_KEY_FMT: u8 = 1;
    /// No blob is stored under `key`.
    pub const GET_FAIL_UNKNOWN_KEY: u8 = 2;
}
