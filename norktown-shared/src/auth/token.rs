/// Session token utilities
///
/// The login cookie carries a random token; the database stores only its
/// SHA-256 hash, so a leaked database dump cannot be replayed as cookies.
///
/// # Token Format
///
/// 32 random base62 characters ([A-Za-z0-9]), a key space of roughly 2^190.
///
/// # Example
///
/// ```
/// use norktown_shared::auth::token::{generate_session_token, hash_session_token};
///
/// let (token, hash) = generate_session_token();
/// assert_eq!(token.len(), 32);
/// assert_eq!(hash, hash_session_token(&token));
/// ```

use rand::Rng;
use sha2::{Digest, Sha256};

/// Length of a session token in characters
pub const SESSION_TOKEN_LENGTH: usize = 32;

/// Generates a new session token
///
/// Returns a tuple of (plaintext_token, sha256_hash). The plaintext goes
/// into the Set-Cookie header; the hash goes into the session table.
pub fn generate_session_token() -> (String, String) {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();

    let token: String = (0..SESSION_TOKEN_LENGTH)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect();

    let hash = hash_session_token(&token);

    (token, hash)
}

/// Hashes a session token with SHA-256
///
/// Returns the hex-encoded digest (64 characters). Deterministic, so the
/// middleware can hash an incoming cookie value and look it up directly.
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_session_token_shape() {
        let (token, hash) = generate_session_token();

        assert_eq!(token.len(), SESSION_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_eq!(hash.len(), 64);
    }

    #[test]
    fn test_generate_session_token_is_random() {
        let (token1, _) = generate_session_token();
        let (token2, _) = generate_session_token();

        assert_ne!(token1, token2);
    }

    #[test]
    fn test_hash_session_token_deterministic() {
        let hash1 = hash_session_token("some-token");
        let hash2 = hash_session_token("some-token");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash_session_token("other-token"));
    }

    #[test]
    fn test_generated_hash_matches_recomputed_hash() {
        let (token, hash) = generate_session_token();
        assert_eq!(hash, hash_session_token(&token));
    }
}
