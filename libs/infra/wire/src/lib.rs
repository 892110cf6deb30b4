// [libs/infra/wire/src/lib.rs]
#![deny(missing_docs)]

//! Length-prefixed tagged-message wire codec for the Denul protocol.
//!
//! This crate owns the envelope type, its opcode enumerations, and the
//! async framing functions that read and write exactly one message at a
//! time. It knows nothing about sockets beyond `AsyncRead`/`AsyncWrite`,
//! and nothing about the protocol handler's semantics.

/// Failure modes of the framed message codec.
pub mod errors;
/// The tagged-union message envelope and its opcode enumerations.
pub mod message;
/// Async read/write framing around a single message.
pub mod codec;

pub use crate::codec::{read_message, write_message, DEFAULT_MAX_MESSAGE_BYTES};
pub use crate::errors::WireError;
pub use crate::message::{DeleteOpcode, GetOpcode, Message, ServerHelloOpcode, StoreOpcode};
