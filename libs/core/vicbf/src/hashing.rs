// [libs/core/vicbf/src/hashing.rs]
//! Deterministic (slot, increment) derivation for a single element.
//!
//! The scheme is part of the wire contract (see [`crate::filter::WIRE_VERSION`])
//! and must not change without a version bump: every `(slot_i, inc_i)` pair a
//! peer computes for a given `(element, m, k, l)` must match ours exactly.

use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// Fixed, non-secret SipHash key. Independence across hash positions is the
/// goal here, not unpredictability -- the key is baked into the binary so
/// every peer derives the same slots.
const HASH_KEY: (u64, u64) = (0x564f_4c45_4d49_4330, 0x444e_554c_5650_5254);

/// Derives the `k` `(slot, increment)` pairs for `element` under filter
/// parameters `m` (slot count) and `l` (increment ceiling, inclusive).
///
/// `slot` is always `< m`; `increment` is always in `1..=l`.
pub fn derive_positions(element: &[u8], k: usize, m: usize, l: u8) -> Vec<(usize, u8)> {
    (0..k as u64)
        .map(|i| {
            let mut hasher = SipHasher13::new_with_keys(HASH_KEY.0, HASH_KEY.1);
            hasher.write(element);
            hasher.write_u64(i);
            let digest = hasher.finish();

            let slot = ((digest >> 32) % m as u64) as usize;
            let increment = ((digest & 0xFFFF_FFFF) % l as u64) as u8 + 1;
            (slot, increment)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_across_calls() {
        let a = derive_positions(b"hello", 3, 1000, 15);
        let b = derive_positions(b"hello", 3, 1000, 15);
        assert_eq!(a, b);
    }

    #[test]
    fn slots_in_range() {
        for seed in 0u32..500 {
            for (slot, inc) in derive_positions(&seed.to_le_bytes(), 5, 97, 7) {
                assert!(slot < 97);
                assert!((1..=7).contains(&inc));
            }
        }
    }

    #[test]
    fn distinct_positions_usually_differ_per_index() {
        let positions = derive_positions(b"distinctness-probe", 4, 10_000, 15);
        let slots: std::collections::HashSet<_> = positions.iter().map(|(s, _)| *s).collect();
        assert!(slots.len() >= 3, "positions collapsed too aggressively: {positions:?}");
    }
}
