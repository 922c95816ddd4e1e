//! JWT token utilities for authentication and authorization.
//!
//! Access tokens are HS256-signed and carry the caller's identity. They are
//! never stored; every verification recomputes the signature and checks the
//! expiry with no leeway.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// JWT Claims structure containing the authenticated user's identity
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: String,
    /// Token issued at timestamp
    pub iat: usize,
    /// Token expiration timestamp
    pub exp: usize,
}

/// JWT token utility for creating and validating access tokens
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtUtils {
    /// Create a new JwtUtils instance from the configured signing secret
    pub fn new(secret: &str) -> Self {
        let encoding_key = EncodingKey::from_secret(secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        // Only HS256 is accepted, which rules out algorithm substitution.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        JwtUtils {
            encoding_key,
            decoding_key,
            validation,
        }
    }

    /// Issue a signed access token valid for `ttl`
    pub fn issue_access_token(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
        ttl: Duration,
    ) -> Result<String, ServiceError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| ServiceError::signing("access token lifetime out of range"))?;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            iat: now.timestamp().max(0) as usize,
            exp: exp.timestamp().max(0) as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServiceError::signing(e.to_string()))
    }

    /// Validate and decode an access token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::ExpiredToken,
                _ => ServiceError::InvalidToken,
            })
    }
}

impl Claims {
    pub fn user_id(&self) -> &str {
        &self.sub
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtUtils {
        JwtUtils::new("test-secret")
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let jwt = jwt();
        let token = jwt
            .issue_access_token("u1", "ann@x.com", "user", Duration::seconds(900))
            .unwrap();

        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id(), "u1");
        assert_eq!(claims.email(), "ann@x.com");
        assert_eq!(claims.role(), "user");
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_expired_token_rejected() {
        let jwt = jwt();
        let token = jwt
            .issue_access_token("u1", "ann@x.com", "user", Duration::seconds(-5))
            .unwrap();

        let err = jwt.verify_access_token(&token).unwrap_err();
        assert!(matches!(err, ServiceError::ExpiredToken));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtUtils::new("other-secret")
            .issue_access_token("u1", "ann@x.com", "user", Duration::seconds(900))
            .unwrap();

        let err = jwt().verify_access_token(&token).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidToken));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let jwt = jwt();
        let token = jwt
            .issue_access_token("u1", "ann@x.com", "user", Duration::seconds(900))
            .unwrap();
        let forged = jwt
            .issue_access_token("u1", "ann@x.com", "admin", Duration::seconds(900))
            .unwrap();

        // Splice the admin payload onto the original signature.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        let err = jwt.verify_access_token(&spliced).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidToken));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: "u1".to_string(),
            email: "ann@x.com".to_string(),
            role: "user".to_string(),
            iat: now,
            exp: now + 900,
        };
        let token = encode(
            &Header::new(Algorithm::HS384),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = jwt().verify_access_token(&token).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidToken));
    }

    #[test]
    fn test_overflowing_ttl_is_signing_error() {
        let err = jwt()
            .issue_access_token("u1", "ann@x.com", "user", Duration::days(100_000_000))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Signing { .. }));
    }

    #[test]
    fn test_garbage_rejected() {
        let jwt = jwt();
        for token in ["", "not-a-token", "a.b.c"] {
            let err = jwt.verify_access_token(token).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidToken));
        }
    }
}
