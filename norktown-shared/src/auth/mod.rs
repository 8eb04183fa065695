/// Authentication utilities
///
/// This module provides the authentication primitives for Norktown:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Session token generation and SHA-256 storage hashing
/// - [`middleware`]: Cookie parsing, session loading, and the admin guard
///
/// # Example
///
/// ```no_run
/// use norktown_shared::auth::password::{hash_password, verify_password};
/// use norktown_shared::auth::token::generate_session_token;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let (token, token_hash) = generate_session_token();
/// assert_ne!(token, token_hash);
/// # Ok(())
/// # }
/// ```

pub mod middleware;
pub mod password;
pub mod token;
