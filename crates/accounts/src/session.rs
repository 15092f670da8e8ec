//! Signed session tokens (HS256 JWT) with server-side revocation.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use kindaebay_core::AccountId;

use crate::account::Account;

/// Two weeks.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 14 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: AccountId,
    pub username: String,
    /// Token id; revocation is keyed on it.
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has expired")]
    Expired,
    #[error("session has been revoked")]
    Revoked,
    #[error("invalid session token")]
    Invalid,
    #[error("session expiry is out of range")]
    ExpiryOutOfRange,
    #[error("failed to sign session token: {0}")]
    Encode(String),
}

pub struct SessionManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
    /// Revoked token ids mapped to their expiry (unix seconds).
    revoked: RwLock<HashMap<Uuid, i64>>,
}

impl core::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl SessionManager {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
            revoked: RwLock::new(HashMap::new()),
        }
    }

    /// Sign a fresh session for `account`.
    pub fn issue(&self, account: &Account, now: DateTime<Utc>) -> Result<(String, SessionClaims), SessionError> {
        let expires = now
            .checked_add_signed(self.ttl)
            .ok_or(SessionError::ExpiryOutOfRange)?;
        let claims = SessionClaims {
            sub: account.id_typed(),
            username: account.username().to_string(),
            jti: Uuid::now_v7(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::Encode(e.to_string()))?;
        Ok((token, claims))
    }

    /// Verify signature, expiry (against `now`) and revocation.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, SessionError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the caller's clock below.
        validation.validate_exp = false;

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| SessionError::Invalid)?;

        if claims.exp <= claims.iat {
            return Err(SessionError::Invalid);
        }
        if now.timestamp() >= claims.exp {
            return Err(SessionError::Expired);
        }

        let revoked = self.revoked.read().map_err(|_| SessionError::Invalid)?;
        if revoked.contains_key(&claims.jti) {
            return Err(SessionError::Revoked);
        }

        Ok(claims)
    }

    /// Invalidate a session before its expiry. Expired revocations are pruned.
    pub fn revoke(&self, claims: &SessionClaims, now: DateTime<Utc>) {
        let Ok(mut revoked) = self.revoked.write() else {
            tracing::warn!("session revocation list lock poisoned");
            return;
        };
        let now = now.timestamp();
        revoked.retain(|_, exp| *exp > now);
        revoked.insert(claims.jti, claims.exp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        Account::new(AccountId::new(), "testuser", "testUser@case.edu", "hash", Utc::now())
    }

    fn manager() -> SessionManager {
        SessionManager::new(b"test-secret", Duration::seconds(DEFAULT_SESSION_TTL_SECS))
    }

    #[test]
    fn issued_token_validates() {
        let sessions = manager();
        let who = account();
        let now = Utc::now();

        let (token, issued) = sessions.issue(&who, now).unwrap();
        let claims = sessions.validate(&token, now).unwrap();

        assert_eq!(claims, issued);
        assert_eq!(claims.sub, who.id_typed());
        assert_eq!(claims.username, "testuser");
        assert_eq!(claims.exp - claims.iat, DEFAULT_SESSION_TTL_SECS);
    }

    #[test]
    fn expired_token_is_rejected() {
        let sessions = manager();
        let now = Utc::now();
        let (token, _) = sessions.issue(&account(), now).unwrap();

        let later = now + Duration::seconds(DEFAULT_SESSION_TTL_SECS);
        assert_eq!(sessions.validate(&token, later), Err(SessionError::Expired));
    }

    #[test]
    fn revoked_token_is_rejected() {
        let sessions = manager();
        let now = Utc::now();
        let (token, claims) = sessions.issue(&account(), now).unwrap();

        sessions.revoke(&claims, now);
        assert_eq!(sessions.validate(&token, now), Err(SessionError::Revoked));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let now = Utc::now();
        let (token, _) = SessionManager::new(b"other-secret", Duration::hours(1))
            .issue(&account(), now)
            .unwrap();

        assert_eq!(manager().validate(&token, now), Err(SessionError::Invalid));
        assert_eq!(manager().validate("garbage", now), Err(SessionError::Invalid));
    }

    #[test]
    fn unrepresentable_expiry_is_an_error() {
        let sessions = SessionManager::new(b"s", Duration::seconds(10_000_000_000_000));
        assert_eq!(
            sessions.issue(&account(), Utc::now()).map(|(_, claims)| claims),
            Err(SessionError::ExpiryOutOfRange)
        );
    }

    #[test]
    fn revocation_list_prunes_expired_entries() {
        let sessions = SessionManager::new(b"s", Duration::seconds(60));
        let now = Utc::now();
        let (_, first) = sessions.issue(&account(), now).unwrap();
        sessions.revoke(&first, now);

        let later = now + Duration::seconds(120);
        let (_, second) = sessions.issue(&account(), later).unwrap();
        sessions.revoke(&second, later);

        let revoked = sessions.revoked.read().unwrap();
        assert_eq!(revoked.len(), 1);
        assert!(revoked.contains_key(&second.jti));
    }
}
