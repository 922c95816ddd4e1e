use base64::{Engine as _, engine::general_purpose};
use rand::RngCore;
use rand::rngs::OsRng;

/// Number of random bytes behind each refresh token.
const REFRESH_TOKEN_BYTES: usize = 32;

/// Generates an opaque refresh-token value.
///
/// The value is 256 bits from the operating system RNG, encoded as URL-safe
/// base64 without padding so it can travel in JSON bodies and headers as is.
pub fn generate_refresh_token() -> String {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tokens_are_url_safe() {
        let token = generate_refresh_token();
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<String> = (0..100).map(|_| generate_refresh_token()).collect();
        assert_eq!(tokens.len(), 100);
    }
}
