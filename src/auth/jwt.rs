//! Session Token Service
//! Mission: Issue and verify signed, time-limited session tokens

use crate::auth::models::{Claims, User};
use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Signature is valid but `exp` is in the past.
    Expired,
    /// Signature does not match the server secret (tampered or foreign token).
    InvalidSignature,
    /// Not a decodable token at all.
    Malformed,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Expired => write!(f, "token expired"),
            TokenError::InvalidSignature => write!(f, "invalid token signature"),
            TokenError::Malformed => write!(f, "malformed token"),
        }
    }
}

impl std::error::Error for TokenError {}

/// JWT handler for session token operations.
///
/// The signing secret is loaded once at startup and lives for the whole
/// process. Rotating it invalidates every outstanding session.
pub struct JwtHandler {
    secret: String,
    ttl_hours: i64,
}

impl JwtHandler {
    /// Create a handler with the default 24-hour session lifetime.
    pub fn new(secret: String) -> Self {
        Self::with_ttl_hours(secret, 24)
    }

    /// Create a handler with an explicit session lifetime in hours.
    pub fn with_ttl_hours(secret: String, ttl_hours: i64) -> Self {
        Self { secret, ttl_hours }
    }

    /// Issue a signed session token for a user.
    pub fn issue(&self, user: &User) -> Result<String> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(chrono::Duration::hours(self.ttl_hours))
            .context("Invalid expiry timestamp")?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        debug!(
            "Issuing session token for {} ({}), expires in {}h",
            user.username, user.id, self.ttl_hours
        );

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign session token")
    }

    /// Verify a session token and extract its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => {
                debug!("Verified session token for {}", data.claims.username);
                Ok(data.claims)
            }
            Err(err) => Err(match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::UserRole;

    fn create_test_user() -> User {
        User {
            id: 7,
            username: "testadmin".to_string(),
            password_hash: "hash".to_string(),
            role: UserRole::Admin,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        let user = create_test_user();

        let token = handler.issue(&user).unwrap();
        assert!(!token.is_empty());

        let claims = handler.verify(&token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.username, user.username);
        assert_eq!(claims.role, UserRole::Admin);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_expired_token_rejected_even_with_valid_signature() {
        let handler = JwtHandler::with_ttl_hours("test-secret-key-12345".to_string(), -2);
        let user = create_test_user();

        let token = handler.issue(&user).unwrap();

        assert_eq!(handler.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());
        let user = create_test_user();

        let token = handler.issue(&user).unwrap();

        // Flip one byte in the signature segment
        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.as_bytes()[0] == b'A' { "B" } else { "A" };
        let tampered = format!("{}.{}{}", head, flipped, &sig[1..]);
        assert_ne!(tampered, token);

        assert_eq!(
            handler.verify(&tampered),
            Err(TokenError::InvalidSignature)
        );
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let issuer = JwtHandler::new("secret-one".to_string());
        let verifier = JwtHandler::new("secret-two".to_string());
        let user = create_test_user();

        let token = issuer.issue(&user).unwrap();

        assert_eq!(verifier.verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let handler = JwtHandler::new("test-secret-key-12345".to_string());

        assert_eq!(handler.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(
            handler.verify("still.not.a-token"),
            Err(TokenError::Malformed)
        );
    }
}
