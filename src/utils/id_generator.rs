use rand::Rng;

/// Base62 alphabet (0-9, A-Z, a-z); every character is url-safe
pub const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generates a short id of `length` characters drawn uniformly from the base62 alphabet
pub fn generate_short_id<R: Rng>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
