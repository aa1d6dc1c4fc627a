use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{SecurityConfig, MAX_TOKEN_EXPIRY_HOURS};

/// The only algorithm tokens are signed or accepted with
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Fixed claim schema. Decoding fails as a whole if any field is missing or mistyped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i64,
    pub user_account: String,
    pub iat: i64,
    pub exp: i64,
}

/// Identity extracted from a validated token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: i64,
    pub role: String,
}

impl Principal {
    pub fn has_role(&self, role: &str) -> bool {
        self.role == role
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    Signature,

    #[error("token uses a disallowed signing algorithm")]
    Algorithm,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Issues and validates self-contained HS256 session tokens.
///
/// Holds no state besides the signing keys; there is no revocation, so a token
/// stays valid until `exp` regardless of logout.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
}

impl TokenCodec {
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            lifetime,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            security.token_secret.as_bytes(),
            Duration::hours(security.token_expiry_hours.min(MAX_TOKEN_EXPIRY_HOURS) as i64),
        )
    }

    pub fn issue(&self, principal_id: i64, role: &str, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let claims = Claims {
            user_id: principal_id,
            user_account: role.to_string(),
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(self.lifetime)
                .ok_or_else(|| TokenError::Encoding(format!("expiry overflows after {}", now)))?
                .timestamp(),
        };

        let token = encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.exp,
        })
    }

    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, TokenError> {
        let claims = self.decode_claims(token)?;

        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(Principal {
            id: claims.user_id,
            role: claims.user_account,
        })
    }

    /// Signature and schema check only; expiry is left to the caller.
    pub fn decode_claims(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &Self::validation())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::Signature,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => TokenError::Algorithm,
                _ => TokenError::Malformed,
            })
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is judged against the injected clock in `validate`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        validation
    }
}
