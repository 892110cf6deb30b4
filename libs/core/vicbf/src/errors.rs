// [libs/core/vicbf/src/errors.rs]

use thiserror::Error;

/// Failure modes of the variable-increment counting Bloom filter.
#[derive(Error, Debug)]
pub enum FilterError {
    /// Construction was attempted with parameters that can never answer a
    /// membership query meaningfully (zero slots or zero hash positions).
    #[error("[VICBF_CONSTRUCTION_FAULT]: m and k must both be nonzero (m={m}, k={k})")]
    InvalidParameters { m: usize, k: usize },

    /// The serialized image is too short, carries an unsupported wire
    /// version, or its counter payload length does not match its header.
    #[error("[VICBF_DECODE_FAULT]: malformed filter image -> {0}")]
    MalformedFilter(String),

    /// `remove` was asked to subtract an increment from a counter that
    /// does not hold at least that much -- the element was never
    /// inserted, was already removed, or a slot it shares with another
    /// element saturated and lost precision.
    #[error("[VICBF_COUNTER_FAULT]: CorruptedRemoval on slot {slot} (held {held}, needed {needed})")]
    CorruptedRemoval { slot: usize, held: u8, needed: u8 },
}
