// [libs/core/vicbf/src/filter.rs]
//! The variable-increment counting Bloom filter itself.

use crate::errors::FilterError;
use crate::hashing::derive_positions;

/// Wire format version. Bump this if the header layout, the counter
/// packing, or the hashing scheme in [`crate::hashing`] ever changes.
pub const WIRE_VERSION: u8 = 1;

/// Counters saturate at this value regardless of the configured increment
/// ceiling `l` -- this is the 4-bit counter width the original design
/// budgeted for.
const COUNTER_MAX: u8 = 15;

/// A variable-increment counting Bloom filter.
///
/// Each of the `k` hash positions for an inserted element draws its own
/// increment from `1..=l` instead of a fixed `+1`, which lowers the
/// false-positive rate for a given memory budget at the cost of a little
/// extra bookkeeping per slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vicbf {
    m: usize,
    k: usize,
    l: u8,
    counters: Vec<u8>,
}

impl Vicbf {
    /// Allocates a filter with `m` counter slots and `k` hash positions
    /// per element, drawing increments from `1..=l`.
    pub fn new(m: usize, k: usize, l: u8) -> Result<Self, FilterError> {
        if m == 0 || k == 0 {
            return Err(FilterError::InvalidParameters { m, k });
        }
        Ok(Self {
            m,
            k,
            l: l.max(1),
            counters: vec![0u8; m],
        })
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn l(&self) -> u8 {
        self.l
    }

    fn positions(&self, element: &[u8]) -> Vec<(usize, u8)> {
        derive_positions(element, self.k, self.m, self.l)
    }

    /// Inserts `element`. Not idempotent: inserting the same element twice
    /// doubles its contribution to the affected slots (and so may saturate
    /// them sooner).
    pub fn insert(&mut self, element: &[u8]) {
        for (slot, inc) in self.positions(element) {
            self.counters[slot] = self.counters[slot].saturating_add(inc).min(COUNTER_MAX);
        }
    }

    /// Removes `element`, inverting a prior `insert`.
    ///
    /// Precondition: `element` was inserted exactly once since the last
    /// reset, and none of its slots have since saturated against another
    /// element's insertions. Violating this precondition is reported as
    /// [`FilterError::CorruptedRemoval`] and the filter is left untouched.
    pub fn remove(&mut self, element: &[u8]) -> Result<(), FilterError> {
        let positions = self.positions(element);
        for &(slot, inc) in &positions {
            if self.counters[slot] < inc {
                return Err(FilterError::CorruptedRemoval {
                    slot,
                    held: self.counters[slot],
                    needed: inc,
                });
            }
        }
        for (slot, inc) in positions {
            self.counters[slot] -= inc;
        }
        Ok(())
    }

    /// Tests membership. False positives are possible; false negatives are
    /// not, for any element that was inserted and not subsequently removed,
    /// provided none of its slots saturated.
    pub fn contains(&self, element: &[u8]) -> bool {
        self.positions(element)
            .into_iter()
            .all(|(slot, inc)| self.counters[slot] >= inc)
    }

    /// Serializes the filter to its self-describing wire image:
    /// `version(u8) || m(u32 BE) || k(u8) || l(u8) || packed_counters`,
    /// where counters are packed two per byte (4 bits each, high nibble
    /// first), zero-padded in the final byte if `m` is odd.
    pub fn serialize(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(7 + self.counters.len().div_ceil(2));
        out.push(WIRE_VERSION);
        out.extend_from_slice(&(self.m as u32).to_be_bytes());
        out.push(self.k as u8);
        out.push(self.l);

        for pair in self.counters.chunks(2) {
            let high = pair[0] & 0x0F;
            let low = pair.get(1).copied().unwrap_or(0) & 0x0F;
            out.push((high << 4) | low);
        }
        out
    }

    /// Reconstructs a filter from a [`Vicbf::serialize`] image.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, FilterError> {
        if bytes.len() < 7 {
            return Err(FilterError::MalformedFilter("image shorter than header".into()));
        }
        let version = bytes[0];
        if version != WIRE_VERSION {
            return Err(FilterError::MalformedFilter(format!(
                "unsupported wire version {version}"
            )));
        }
        let m = u32::from_be_bytes(bytes[1..5].try_into().unwrap()) as usize;
        let k = bytes[5] as usize;
        let l = bytes[6];
        if m == 0 || k == 0 {
            return Err(FilterError::InvalidParameters { m, k });
        }

        let packed = &bytes[7..];
        let expected_packed_len = m.div_ceil(2);
        if packed.len() != expected_packed_len {
            return Err(FilterError::MalformedFilter(format!(
                "expected {expected_packed_len} packed counter bytes, found {}",
                packed.len()
            )));
        }

        let mut counters = Vec::with_capacity(m);
        for &byte in packed {
            counters.push((byte >> 4) & 0x0F);
            counters.push(byte & 0x0F);
        }
        counters.truncate(m);

        Ok(Self { m, k, l: l.max(1), counters })
    }
}
