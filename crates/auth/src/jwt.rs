//! HS256 JWT issuance and verification.
//!
//! The signing secret is explicit constructor input; nothing here reads the
//! environment or global state.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use pickpoint_core::UserId;

use crate::{JwtClaims, Role};

/// Default token lifetime (matches the original service's 24h tokens).
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to encode token")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Symmetric HS256 codec for access tokens.
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for `user_id` with `role`, valid for [`TOKEN_TTL_HOURS`].
    pub fn issue(&self, user_id: UserId, role: Role, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = JwtClaims {
            sub: user_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(TokenError::Encode)
    }

    /// Verify signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<JwtClaims, TokenError> {
        let data = decode::<JwtClaims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map_err(TokenError::Invalid)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_verify_round_trip() {
        let codec = JwtCodec::new(b"test-secret");
        let user_id = UserId::new();

        let token = codec.issue(user_id, Role::Moderator, Utc::now()).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Moderator);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let codec = JwtCodec::new(b"test-secret");
        let other = JwtCodec::new(b"other-secret");

        let token = codec.issue(UserId::new(), Role::Employee, Utc::now()).unwrap();
        assert!(matches!(other.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn verify_rejects_expired_token() {
        let codec = JwtCodec::new(b"test-secret");
        let issued = Utc::now() - Duration::hours(TOKEN_TTL_HOURS + 1);

        let token = codec.issue(UserId::new(), Role::Employee, issued).unwrap();
        assert!(matches!(codec.verify(&token), Err(TokenError::Invalid(_))));
    }
}
