// [libs/core/protocol/src/server.rs]
//! The protocol handler: dispatches wire messages against the blob map
//! and the membership summary, keeping both in lockstep.

use crate::hashing::{authenticates, encode_key, parse_key, sha256};
use denul_blobstore::{BlobStore, DbError};
use denul_vicbf::{CachedVicbf, Vicbf};
use denul_wire::{DeleteOpcode, GetOpcode, Message, ServerHelloOpcode, StoreOpcode};
use tracing::{error, instrument, warn};

/// The protocol version this server speaks.
pub const SERVER_PROTO: &str = "1.0";

/// Owns the blob map and the membership summary and is the sole mutator
/// of both. Callers are expected to reach every method through a single
/// owning task so that a `Store`/`Delete` cannot interleave with another.
pub struct Server {
    blob_map: BlobStore,
    vicbf: CachedVicbf,
    thresh_up: usize,
    entry_count: usize,
    warned_threshold: bool,
}

impl Server {
    /// Boots the server: opens the blob map, sizes a fresh VICBF from the
    /// current key count, reinserts every key, and warms the serialization
    /// cache.
    #[instrument(skip(blob_map))]
    pub async fn bootstrap(
        blob_map: BlobStore,
        k: usize,
        l: u8,
        min_slots: usize,
    ) -> Result<Self, DbError> {
        let keys = blob_map.all_keys().await?;
        let n0 = keys.len();
        let baseline = 2 * n0 + min_slots;
        let m = 10 * baseline;
        let thresh_up = 2 * baseline;

        let mut filter = Vicbf::new(m, k, l).expect("startup sizing always yields valid parameters");
        for key in &keys {
            filter.insert(key);
        }

        let vicbf = CachedVicbf::new(filter);
        vicbf.get();

        Ok(Self {
            blob_map,
            vicbf,
            thresh_up,
            entry_count: n0,
            warned_threshold: false,
        })
    }

    /// Dispatches one request to its handler. Returns `None` for unknown
    /// message shapes used as requests (e.g. a reply sent by a client),
    /// which are silently ignored per the protocol contract.
    #[instrument(skip(self, request))]
    pub async fn handle(&mut self, request: Message) -> Option<Message> {
        match request {
            Message::ClientHello { client_proto } => Some(self.handle_client_hello(&client_proto)),
            Message::Store { key, value } => Some(self.handle_store(&key, &value).await),
            Message::Delete { key, auth } => Some(self.handle_delete(&key, &auth).await),
            Message::Get { key } => Some(self.handle_get(&key).await),
            _ => None,
        }
    }

    fn handle_client_hello(&self, client_proto: &str) -> Message {
        if client_proto == SERVER_PROTO {
            Message::ServerHello {
                server_proto: SERVER_PROTO.into(),
                opcode: ServerHelloOpcode::CLIENT_HELLO_OK,
                data: self.vicbf.get(),
            }
        } else {
            Message::ServerHello {
                server_proto: SERVER_PROTO.into(),
                opcode: ServerHelloOpcode::CLIENT_HELLO_PROTO_NOT_SUPPORTED,
                data: b"0".to_vec(),
            }
        }
    }

    async fn handle_store(&mut self, key: &str, value: &[u8]) -> Message {
        let Some(raw_key) = parse_key(key) else {
            return Message::StoreReply {
                key: key.to_string(),
                opcode: StoreOpcode::STORE_FAIL_KEY_FMT,
            };
        };

        match self.blob_map.insert(&raw_key, value).await {
            Ok(()) => {
                self.vicbf.insert(&raw_key);
                self.entry_count += 1;
                self.check_threshold();
                Message::StoreReply {
                    key: key.to_string(),
                    opcode: StoreOpcode::STORE_OK,
                }
            }
            Err(DbError::KeyTaken) => Message::StoreReply {
                key: key.to_string(),
                opcode: StoreOpcode::STORE_FAIL_KEY_TAKEN,
            },
            Err(err) => {
                error!(%err, "store failed");
                Message::StoreReply {
                    key: key.to_string(),
                    opcode: StoreOpcode::STORE_FAIL_UNKNOWN,
                }
            }
        }
    }

    async fn handle_delete(&mut self, key: &str, auth: &[u8]) -> Message {
        let Some(raw_key) = parse_key(key) else {
            return Message::DeleteReply {
                key: key.to_string(),
                opcode: DeleteOpcode::DELETE_FAIL_KEY_FMT,
            };
        };

        if !self.vicbf.contains(&raw_key) {
            return Message::DeleteReply {
                key: key.to_string(),
                opcode: DeleteOpcode::DELETE_FAIL_NOT_FOUND,
            };
        }

        if !authenticates(auth, &raw_key) {
            return Message::DeleteReply {
                key: key.to_string(),
                opcode: DeleteOpcode::DELETE_FAIL_AUTH,
            };
        }

        if let Err(err) = self.blob_map.delete(&raw_key).await {
            error!(%err, "delete failed after authentication succeeded");
        }
        if let Err(err) = self.vicbf.remove(&raw_key) {
            error!(%err, "filter corruption on remove of a present element");
        }
        self.entry_count = self.entry_count.saturating_sub(1);

        Message::DeleteReply {
            key: key.to_string(),
            opcode: DeleteOpcode::DELETE_OK,
        }
    }

    async fn handle_get(&self, key: &str) -> Message {
        let Some(raw_key) = parse_key(key) else {
            return Message::GetReply {
                key: key.to_string(),
                opcode: GetOpcode::GET_FAIL_KEY_FMT,
                value: Vec::new(),
            };
        };

        match self.blob_map.get(&raw_key).await {
            Ok(Some(value)) => Message::GetReply {
                key: key.to_string(),
                opcode: GetOpcode::GET_OK,
                value,
            },
            Ok(None) => Message::GetReply {
                key: key.to_string(),
                opcode: GetOpcode::GET_FAIL_UNKNOWN_KEY,
                value: Vec::new(),
            },
            Err(err) => {
                error!(%err, "get failed");
                Message::GetReply {
                    key: key.to_string(),
                    opcode: GetOpcode::GET_FAIL_UNKNOWN_KEY,
                    value: Vec::new(),
                }
            }
        }
    }

    fn check_threshold(&mut self) {
        if !self.warned_threshold && self.entry_count >= self.thresh_up {
            warn!(
                entries = self.entry_count,
                threshold = self.thresh_up,
                "entry count crossed VICBF resize threshold; restart with a larger --vicbf-min-slots"
            );
            self.warned_threshold = true;
        }
    }
}

/// Computes the preimage-derived content address for `auth`, matching the
/// scheme the protocol handler enforces: `key = hex(sha256(auth))`.
pub fn derive_key(auth: &[u8]) -> String {
    encode_key(&sha256(auth))
}
