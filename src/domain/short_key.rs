//! Short key format.
//!
//! A short key is exactly [`SHORT_KEY_LENGTH`] characters drawn from the
//! 62-character [`ALPHABET`], giving 62^6 (about 56.8 billion) distinct keys.

/// Characters a short key may contain.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Number of characters in every short key.
pub const SHORT_KEY_LENGTH: usize = 6;

/// Returns true if `key` has the exact length and alphabet of a generated key.
///
/// Used by the resolver to answer "not found" for garbage input without
/// touching the store.
pub fn is_well_formed(key: &str) -> bool {
    key.len() == SHORT_KEY_LENGTH && key.bytes().all(|b| b.is_ascii_alphanumeric())
}
