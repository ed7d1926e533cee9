//! Opaque API token keys.

use rand::RngExt;

/// Length of a token key in characters.
pub const TOKEN_KEY_LEN: usize = 40;

const HEX: &[u8] = b"0123456789abcdef";

/// Generate a fresh random token key: 40 lowercase hex characters.
pub fn generate_token_key() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_KEY_LEN)
        .map(|_| HEX[rng.random_range(0..HEX.len())] as char)
        .collect()
}

/// `true` when `key` has the shape of a generated token key.
///
/// Lets callers skip the database lookup for obviously bogus keys.
pub fn is_well_formed(key: &str) -> bool {
    key.len() == TOKEN_KEY_LEN && key.bytes().all(|b| HEX.contains(&b))
}
