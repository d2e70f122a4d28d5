//! Password policy, argon2 hashing and bearer-token signing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm as Argon2Algorithm, Argon2, Params, Version};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

use super::domain::{AccountId, IdentityAssertion, Role};
use super::error::TrackingError;

const PASSWORD_MIN_LENGTH: usize = 8;
const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Strength rules applied to new passwords: minimum length, one character from each class,
/// and nothing outside letters, digits and the accepted symbols.
pub fn check_password_strength(password: &str) -> Result<(), TrackingError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(TrackingError::validation(format!(
            "Password must be at least {PASSWORD_MIN_LENGTH} characters"
        )));
    }

    let is_symbol = |c: char| PASSWORD_SYMBOLS.contains(c);
    if let Some(invalid) = password
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || is_symbol(*c)))
    {
        return Err(TrackingError::validation(format!(
            "Password contains unsupported character '{invalid}' (allowed symbols: {PASSWORD_SYMBOLS})"
        )));
    }

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(is_symbol);

    if has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(TrackingError::validation(
            "Password must contain uppercase, lowercase, digit, and special character",
        ))
    }
}

/// Argon2id hasher producing PHC strings.
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialHasher {
    /// Custom cost parameters; memory is in KiB.
    pub fn with_cost(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, TrackingError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| TrackingError::Credential(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Argon2Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, password: &str) -> Result<String, TrackingError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| TrackingError::Credential(err.to_string()))
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, TrackingError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|err| TrackingError::Credential(err.to_string()))?;
        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(TrackingError::Credential(err.to_string())),
        }
    }
}

/// Claims carried by bearer tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(rename = "userId")]
    pub user_id: AccountId,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HS512 token issuer/verifier bound to one shared secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(&config.jwt_secret, config.token_ttl_secs)
    }

    pub fn issue(&self, identity: &IdentityAssertion) -> Result<IssuedToken, TrackingError> {
        self.issue_at(identity, Utc::now())
    }

    pub fn issue_at(
        &self,
        identity: &IdentityAssertion,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, TrackingError> {
        let iat = issued_at.timestamp();
        let exp = iat.saturating_add(self.ttl_secs);
        let claims = TokenClaims {
            sub: identity.email.clone(),
            user_id: identity.account_id,
            role: identity.role,
            iat,
            exp,
        };

        let token = encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|err| TrackingError::Credential(err.to_string()))?;
        let expires_at = DateTime::<Utc>::from_timestamp(exp, 0)
            .ok_or_else(|| TrackingError::Credential("token expiry out of range".to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Resolves a bearer token into the identity it was issued for.
    pub fn verify(&self, token: &str) -> Result<IdentityAssertion, TrackingError> {
        let validation = Validation::new(Algorithm::HS512);
        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map_err(|err| TrackingError::unauthorized(format!("Invalid bearer token: {err}")))?;

        Ok(IdentityAssertion {
            account_id: data.claims.user_id,
            email: data.claims.sub,
            role: data.claims.role,
        })
    }
}
