// [libs/core/protocol/src/hashing.rs]
//! Key-format validation and the content-addressing scheme: `key = sha256(auth)`.

use sha2::{Digest, Sha256};

/// Length of a key's hex representation: 32 bytes, two hex digits each.
const KEY_HEX_LEN: usize = 64;

/// Parses `candidate` as a well-formed key: exactly 64 lowercase hex
/// characters, decoding to a 32-byte digest.
pub fn parse_key(candidate: &str) -> Option<[u8; 32]> {
    if candidate.len() != KEY_HEX_LEN || !candidate.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()) {
        return None;
    }
    let decoded = hex::decode(candidate).ok()?;
    decoded.try_into().ok()
}

/// Hex-encodes a 32-byte key back to its lowercase wire representation.
pub fn encode_key(key: &[u8; 32]) -> String {
    hex::encode(key)
}

/// `sha256(data)`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// True if `sha256(auth) == key`.
pub fn authenticates(auth: &[u8], key: &[u8; 32]) -> bool {
    sha256(auth) == *key
}
