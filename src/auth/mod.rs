use rand::rngs::OsRng;
use rand::RngCore;

pub mod session;

pub use session::SessionStore;

/// Number of random bytes behind a session token (hex doubles it).
pub const SESSION_TOKEN_BYTES: usize = 16;

#[derive(Debug)]
pub enum TokenError {
    Entropy(String),
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Entropy(msg) => write!(f, "Session token generation error: {}", msg),
        }
    }
}

impl std::error::Error for TokenError {}

/// Draws a fresh session token from the operating system RNG, hex-encoded.
pub fn generate_session_token() -> Result<String, TokenError> {
    let mut buf = [0u8; SESSION_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut buf)
        .map_err(|e| TokenError::Entropy(e.to_string()))?;

    Ok(hex::encode(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_32_lowercase_hex_chars() {
        let token = generate_session_token().unwrap();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn token_decodes_to_random_bytes() {
        let token = generate_session_token().unwrap();
        let bytes = hex::decode(&token).unwrap();
        assert_eq!(bytes.len(), SESSION_TOKEN_BYTES);
    }

    #[test]
    fn tokens_differ() {
        let a = generate_session_token().unwrap();
        let b = generate_session_token().unwrap();
        assert_ne!(a, b);
    }
}
