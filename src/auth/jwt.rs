//! HS256 bearer tokens
//!
//! Access and refresh tokens are signed with different secrets and carry a
//! `kind` claim, so one can never stand in for the other.

use super::{AuthError, AuthResult};
use crate::config::ServerConfig;
use crate::models::{Person, Role, UserId};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Token payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
    pub employee_id: String,
    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Issues and verifies access and refresh tokens
pub struct TokenIssuer {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
    /// Lifetime of tokens issued at login/registration
    pub session_ttl: Duration,
    /// Lifetime of tokens issued from a refresh token
    pub refreshed_ttl: Duration,
    /// Lifetime of refresh tokens
    pub refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(access_secret: &str, refresh_secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            access: KeyPair::new(access_secret),
            refresh: KeyPair::new(refresh_secret),
            validation,
            session_ttl: Duration::hours(24),
            refreshed_ttl: Duration::hours(1),
            refresh_ttl: Duration::days(7),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(&config.jwt_secret, &config.jwt_refresh_secret)
    }

    /// Access token for a fresh login or registration
    pub fn issue_session(&self, person: &Person) -> AuthResult<String> {
        self.issue(person, TokenKind::Access, self.session_ttl)
    }

    /// Short-lived access token minted from a refresh token
    pub fn issue_refreshed(&self, person: &Person) -> AuthResult<String> {
        self.issue(person, TokenKind::Access, self.refreshed_ttl)
    }

    pub fn issue_refresh(&self, person: &Person) -> AuthResult<String> {
        self.issue(person, TokenKind::Refresh, self.refresh_ttl)
    }

    /// Sign a token of the given kind with an explicit lifetime
    pub fn issue(&self, person: &Person, kind: TokenKind, ttl: Duration) -> AuthResult<String> {
        let now = Utc::now();
        let claims = Claims {
            user_id: person.id,
            email: person.email.clone(),
            role: person.role,
            employee_id: person.employee_id.clone(),
            kind,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        let keys = match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn verify_access(&self, token: &str) -> AuthResult<Claims> {
        self.verify(token, TokenKind::Access)
    }

    pub fn verify_refresh(&self, token: &str) -> AuthResult<Claims> {
        self.verify(token, TokenKind::Refresh)
    }

    fn verify(&self, token: &str, kind: TokenKind) -> AuthResult<Claims> {
        let keys = match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        };
        let data = decode::<Claims>(token, &keys.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid,
            }
        })?;
        if data.claims.kind != kind {
            return Err(AuthError::Invalid);
        }
        Ok(data.claims)
    }
}
