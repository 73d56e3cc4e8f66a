//! Session token issuance and verification.
//!
//! Tokens are HS256 JSON Web Tokens carried in the session cookie.
//! Verification never surfaces an error to callers: missing, malformed,
//! expired and badly-signed tokens all collapse to [`Verification::Unverified`].

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims carried by a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (username).
    pub sub: String,
    /// Stable user identifier, used as the rate-limit identity.
    pub user_id: String,
    /// Issued at (Unix timestamp).
    pub iat: usize,
    /// Expiration time (Unix timestamp).
    pub exp: usize,
}

/// Outcome of verifying an inbound session token.
#[derive(Debug, Clone)]
pub enum Verification {
    /// Signature and expiry checked out.
    Verified(SessionClaims),
    /// Anything else: absent, malformed, expired, bad signature.
    Unverified,
}

/// Error type for session issuance.
///
/// Verification has no error type on purpose; it returns [`Verification`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to sign session token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens with a shared HMAC secret.
pub struct SessionVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_hours: i64,
}

impl SessionVerifier {
    /// Create a verifier from the configured secret and session lifetime.
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            ttl_hours,
        }
    }

    /// Issue a signed session token for a user.
    pub fn issue(&self, username: &str, user_id: &str) -> Result<String, SessionError> {
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::hours(self.ttl_hours);
        let claims = SessionClaims {
            sub: username.to_string(),
            user_id: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: exp.timestamp() as usize,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    /// Verify an optional inbound token.
    ///
    /// Failures are logged at debug level and collapse to
    /// [`Verification::Unverified`]; nothing propagates to the caller.
    pub fn verify(&self, token: Option<&str>) -> Verification {
        let Some(token) = token else {
            return Verification::Unverified;
        };

        match decode::<SessionClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Verification::Verified(data.claims),
            Err(err) => {
                tracing::debug!(error = %err, "Session verification failed");
                Verification::Unverified
            }
        }
    }

    /// Session lifetime in seconds, for the Set-Cookie Max-Age attribute.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verifier() -> SessionVerifier {
        SessionVerifier::new("test-secret", 12)
    }

    #[test]
    fn test_issue_then_verify_round_trip() {
        let v = verifier();
        let token = v.issue("demouser", "user_001").unwrap();

        match v.verify(Some(&token)) {
            Verification::Verified(claims) => {
                assert_eq!(claims.sub, "demouser");
                assert_eq!(claims.user_id, "user_001");
                assert!(claims.exp > claims.iat);
            }
            Verification::Unverified => panic!("fresh token should verify"),
        }
    }

    #[test]
    fn test_missing_token_unverified() {
        assert!(matches!(verifier().verify(None), Verification::Unverified));
    }

    #[test]
    fn test_wrong_segment_count_unverified() {
        // Two segments instead of three; must be treated like a missing
        // token, not a panic.
        let v = verifier();
        assert!(matches!(
            v.verify(Some("header.payload")),
            Verification::Unverified
        ));
        assert!(matches!(v.verify(Some("garbage")), Verification::Unverified));
    }

    #[test]
    fn test_wrong_key_unverified() {
        let token = SessionVerifier::new("other-secret", 12)
            .issue("demouser", "user_001")
            .unwrap();
        assert!(matches!(
            verifier().verify(Some(&token)),
            Verification::Unverified
        ));
    }

    #[test]
    fn test_expired_token_unverified() {
        // ttl of -2 hours puts exp well past the default leeway.
        let v = SessionVerifier::new("test-secret", 12);
        let expired = SessionVerifier::new("test-secret", -2)
            .issue("demouser", "user_001")
            .unwrap();
        assert!(matches!(v.verify(Some(&expired)), Verification::Unverified));
    }
}
