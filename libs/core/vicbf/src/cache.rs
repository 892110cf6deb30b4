// [libs/core/vicbf/src/cache.rs]
//! Memoized, compressed serialization of a [`Vicbf`].
//!
//! `CachedVicbf` is the only supported way to mutate a filter in this
//! crate: every mutating method invalidates the memo in the same call, so
//! no caller can observe a filter/cache pair that has drifted apart.

use crate::errors::FilterError;
use crate::filter::Vicbf;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::Write;
use std::sync::Mutex;

/// A [`Vicbf`] paired with a lazily-computed, deflate-compressed image of
/// its serialized form.
pub struct CachedVicbf {
    filter: Vicbf,
    memo: Mutex<Option<Vec<u8>>>,
}

impl CachedVicbf {
    pub fn new(filter: Vicbf) -> Self {
        Self {
            filter,
            memo: Mutex::new(None),
        }
    }

    /// Returns `deflate(serialize(filter))`, computing and storing it if
    /// this is the first read since the last mutation.
    pub fn get(&self) -> Vec<u8> {
        let mut memo = self.memo.lock().expect("vicbf cache mutex poisoned");
        if let Some(bytes) = memo.as_ref() {
            return bytes.clone();
        }
        let compressed = compress(&self.filter.serialize());
        *memo = Some(compressed.clone());
        compressed
    }

    /// Inserts `element` into the filter and invalidates the memo.
    pub fn insert(&mut self, element: &[u8]) {
        self.filter.insert(element);
        self.invalidate();
    }

    /// Removes `element` from the filter and invalidates the memo, unless
    /// the removal itself fails (in which case the filter, and therefore
    /// the cache, is unchanged and stays valid).
    pub fn remove(&mut self, element: &[u8]) -> Result<(), FilterError> {
        self.filter.remove(element)?;
        self.invalidate();
        Ok(())
    }

    pub fn contains(&self, element: &[u8]) -> bool {
        self.filter.contains(element)
    }

    pub fn filter(&self) -> &Vicbf {
        &self.filter
    }

    fn invalidate(&mut self) {
        *self.memo.get_mut().expect("vicbf cache mutex poisoned") = None;
    }
}

fn compress(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(6));
    encoder
        .write_all(bytes)
        .expect("writing to an in-memory deflate encoder cannot fail");
    encoder.finish().expect("finishing an in-memory deflate stream cannot fail")
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::DeflateDecoder;
    use std::io::Read;

    fn decompress(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        DeflateDecoder::new(bytes).read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn get_is_stable_until_mutation() {
        let mut cache = CachedVicbf::new(Vicbf::new(1000, 3, 15).unwrap());
        let first = cache.get();
        let second = cache.get();
        assert_eq!(first, second);

        cache.insert(b"mutator");
        let third = cache.get();
        assert_ne!(first, third);
    }

    #[test]
    fn cached_image_matches_current_filter_state() {
        let mut cache = CachedVicbf::new(Vicbf::new(1000, 3, 15).unwrap());
        cache.insert(b"coherent");
        let image = cache.get();
        let restored = Vicbf::deserialize(&decompress(&image)).unwrap();
        assert_eq!(restored, *cache.filter());
    }

    #[test]
    fn failed_remove_leaves_cache_valid() {
        let mut cache = CachedVicbf::new(Vicbf::new(1000, 3, 15).unwrap());
        cache.insert(b"present");
        let before = cache.get();

        assert!(cache.remove(b"absent").is_err());
        let after = cache.get();
        assert_eq!(before, after, "a failed removal must not invalidate the cache");
    }
}
