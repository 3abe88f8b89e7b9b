use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use crate::config::JwtConfig;
use crate::state::AppState;

/// TTL applied when the caller does not supply one.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(15 * 60);

/// The whole token envelope: who, until when.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Verification failure. Malformed, forged and expired tokens are
/// indistinguishable to the caller.
#[derive(Debug, Error)]
#[error("invalid or expired token")]
pub struct InvalidToken;

/// HS256 signing/verification keys derived from the deployment-wide secret,
/// plus the TTL the login flow uses.
#[derive(Clone)]
pub struct TokenKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub session_ttl: Duration,
}

impl TokenKeys {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            session_ttl: Duration::from_secs((config.ttl_minutes as u64) * 60),
        }
    }

    /// Mint a signed token binding `subject` until now + ttl.
    pub fn mint(&self, subject: &str, ttl: Option<Duration>) -> anyhow::Result<String> {
        let ttl = ttl.unwrap_or(DEFAULT_TOKEN_TTL);
        let exp = OffsetDateTime::now_utc() + TimeDuration::seconds(ttl.as_secs() as i64);
        let claims = Claims {
            sub: subject.to_owned(),
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(subject, "session token minted");
        Ok(token)
    }

    /// Check signature and expiry, returning the subject.
    pub fn verify(&self, token: &str) -> Result<String, InvalidToken> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|_| InvalidToken)?;
        Ok(data.claims.sub)
    }
}

impl FromRef<AppState> for TokenKeys {
    fn from_ref(state: &AppState) -> Self {
        Self::new(&state.config.jwt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> TokenKeys {
        TokenKeys::new(&JwtConfig {
            secret: secret.into(),
            ttl_minutes: 30,
        })
    }

    #[test]
    fn mint_and_verify_roundtrip() {
        let keys = make_keys("dev-secret");
        let token = keys
            .mint("alice", Some(Duration::from_secs(60)))
            .expect("mint");
        assert_eq!(keys.verify(&token).expect("verify"), "alice");
    }

    #[test]
    fn default_ttl_token_verifies() {
        let keys = make_keys("dev-secret");
        let token = keys.mint("bob", None).expect("mint");
        assert_eq!(keys.verify(&token).expect("verify"), "bob");
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = make_keys("dev-secret");
        let claims = Claims {
            sub: "carol".into(),
            exp: (OffsetDateTime::now_utc() - TimeDuration::minutes(2)).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).expect("encode");
        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let keys = make_keys("dev-secret");
        let token = keys.mint("dave", None).expect("mint");

        // Flip the first character of the signature segment.
        let dot = token.rfind('.').expect("token has a signature segment");
        let mut bytes = token.into_bytes();
        bytes[dot + 1] = if bytes[dot + 1] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).expect("still ascii");

        assert!(keys.verify(&tampered).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let keys = make_keys("dev-secret");
        let other = make_keys("other-secret");
        let token = keys.mint("erin", None).expect("mint");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        let keys = make_keys("dev-secret");
        assert!(keys.verify("not-a-token").is_err());
        assert!(keys.verify("").is_err());
    }
}
