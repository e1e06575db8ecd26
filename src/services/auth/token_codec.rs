//! Signed identity tokens (HS256 JWT) carrying `{ username, isAdmin }`.
//!
//! Responsibility:
//! - Principal ⇄ token の変換 (issue / decode)
//! - The shared secret is injected at construction; nothing here reads the environment.
//! - `isAdmin` is normalized to a strict bool on both sides of the wire.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::repos::user_repo::UserRow;

#[derive(Debug, Error)]
pub enum TokenCodecError {
    #[error("signing secret is missing or empty")]
    MissingSecret,
    #[error("failed to sign token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
    #[error("token ttl of {0}s does not fit an exp timestamp")]
    TtlOutOfRange(u64),
}

/// Upper bound accepted for a token lifetime (10 years).
pub const MAX_TOKEN_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// Returned by [`TokenCodec::decode`] for bad signatures, malformed tokens and expired tokens alike.
#[derive(Debug, Error)]
#[error("invalid token: {0}")]
pub struct InvalidTokenError(#[from] jsonwebtoken::errors::Error);

impl InvalidTokenError {
    pub fn kind(&self) -> &jsonwebtoken::errors::ErrorKind {
        self.0.kind()
    }
}

/// Identity asserted by a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    username: String,
    is_admin: bool,
}

impl Principal {
    pub fn new(username: impl Into<String>, is_admin: bool) -> Self {
        Self {
            username: username.into(),
            is_admin,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}

/// Loosely typed user record a token can be issued from.
///
/// `isAdmin` is kept as raw JSON so that values like `"yes"` or `1` can be
/// observed (and rejected) instead of being coerced by serde.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: Value,
}

impl From<UserRecord> for Principal {
    fn from(record: UserRecord) -> Self {
        if record.is_admin.is_null() {
            tracing::warn!(
                username = %record.username,
                "issuing token for a record without isAdmin; treating as non-admin"
            );
        }
        // Only the literal `true` grants admin.
        let is_admin = record.is_admin == Value::Bool(true);
        Principal::new(record.username, is_admin)
    }
}

impl From<&UserRow> for Principal {
    fn from(row: &UserRow) -> Self {
        Principal::new(row.username.clone(), row.is_admin)
    }
}

#[derive(Debug, Serialize)]
struct IssuedClaims<'a> {
    username: &'a str,
    #[serde(rename = "isAdmin")]
    is_admin: bool,
    iat: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
struct DecodedClaims {
    username: String,
    #[serde(rename = "isAdmin", default)]
    is_admin: Value,
}

/// HS256 token signer/verifier bound to one process-wide secret.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: Option<u64>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("ttl_seconds", &self.ttl_seconds)
            .field("leeway", &self.validation.leeway)
            .finish()
    }
}

impl TokenCodec {
    /// `ttl_seconds = None` issues tokens without an `exp` claim (never expire).
    pub fn new(
        secret: &[u8],
        ttl_seconds: Option<u64>,
        leeway_seconds: u64,
    ) -> Result<Self, TokenCodecError> {
        if secret.is_empty() {
            return Err(TokenCodecError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is checked when present but not required.
        validation.required_spec_claims.clear();
        validation.leeway = leeway_seconds;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
        })
    }

    pub fn ttl_seconds(&self) -> Option<u64> {
        self.ttl_seconds
    }

    pub fn issue(&self, principal: &Principal) -> Result<String, TokenCodecError> {
        let now = chrono::Utc::now().timestamp();
        let exp = match self.ttl_seconds {
            Some(ttl) => Some(
                i64::try_from(ttl)
                    .ok()
                    .and_then(|ttl| now.checked_add(ttl))
                    .ok_or(TokenCodecError::TtlOutOfRange(ttl))?,
            ),
            None => None,
        };
        let claims = IssuedClaims {
            username: principal.username(),
            is_admin: principal.is_admin(),
            iat: now,
            exp,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenCodecError::Sign)
    }

    pub fn issue_for_record(&self, record: UserRecord) -> Result<String, TokenCodecError> {
        self.issue(&Principal::from(record))
    }

    /// Verify signature (and `exp`, if present) and return the embedded principal.
    ///
    /// A missing or non-boolean `isAdmin` decodes as `false`.
    pub fn decode(&self, token: &str) -> Result<Principal, InvalidTokenError> {
        let data =
            jsonwebtoken::decode::<DecodedClaims>(token, &self.decoding_key, &self.validation)?;
        let claims = data.claims;

        Ok(Principal::new(
            claims.username,
            claims.is_admin == Value::Bool(true),
        ))
    }
}
