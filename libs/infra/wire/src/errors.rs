// [libs/infra/wire/src/errors.rs]

use thiserror::Error;

/// Failure modes of the framed message codec. Every variant here is a
/// fatal, connection-ending error: the codec never attempts to
/// resynchronize mid-stream.
#[derive(Error, Debug)]
pub enum WireError {
    /// The socket closed or errored before a full frame could be read.
    #[error("[WIRE_IO_FAULT]: {0}")]
    Io(#[from] std::io::Error),

    /// The declared frame length exceeded the configured maximum.
    #[error("[WIRE_FRAME_TOO_LARGE]: declared {declared} bytes, max is {max}")]
    FrameTooLarge {
        /// Length the peer declared in the frame prefix.
        declared: u32,
        /// The configured ceiling.
        max: u32,
    },

    /// The frame body did not decode as a valid [`crate::message::Message`].
    #[error("[WIRE_DECODE_FAULT]: {0}")]
    Decode(#[from] bincode::Error),
}
