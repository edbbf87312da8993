//! Bearer token verification
//!
//! Tokens are minted by the back-office login service; this server only
//! checks them. HS256 with a shared secret, issuer and audience pinned.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role name granting administrative visibility and write access
pub const ADMIN_ROLE: &str = "admin";

const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret: String,
    pub issuer: String,
    pub audience: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl JwtConfig {
    /// `JWT_SECRET`, `JWT_ISSUER` and `JWT_AUDIENCE`
    ///
    /// A missing or short secret falls back to a random key, which no
    /// issued token verifies against: every caller is then a guest.
    pub fn from_env() -> Self {
        let secret = match secret_from_env() {
            Ok(secret) => secret,
            Err(e) => {
                tracing::error!(error = %e, "JWT secret unusable, using a random key");
                random_secret()
            }
        };

        Self {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "menu-server".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "menu-clients".into()),
        }
    }
}

fn secret_from_env() -> Result<String, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= MIN_SECRET_LEN => Ok(secret),
        Ok(_) => Err(JwtError::Config(format!(
            "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
        ))),
        #[cfg(debug_assertions)]
        Err(_) => {
            tracing::warn!("JWT_SECRET not set, generating a temporary key");
            Ok(random_secret())
        }
        #[cfg(not(debug_assertions))]
        Err(_) => Err(JwtError::Config("JWT_SECRET must be set".into())),
    }
}

/// 64 hex characters from the system RNG
fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    if SystemRandom::new().fill(&mut bytes).is_err() {
        tracing::error!("System RNG unavailable");
    }
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Claims read from an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub username: String,
    pub role: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Token expired")]
    Expired,

    #[error("Invalid signature")]
    BadSignature,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

#[derive(Clone)]
pub struct JwtService {
    key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("issuer", &self.validation.iss)
            .field("audience", &self.validation.aud)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn with_config(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&config.audience]);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iss", "aud"]);

        Self {
            key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                ErrorKind::InvalidSignature => JwtError::BadSignature,
                _ => JwtError::Invalid(e.to_string()),
            })
    }

    /// Token part of an `Authorization: Bearer <token>` header value
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Authenticated user, inserted into request extensions by
/// [`require_admin`](super::require_admin)
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "unit-test-secret-key-that-is-long-enough";

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            issuer: "menu-server".to_string(),
            audience: "menu-clients".to_string(),
        }
    }

    fn mint(secret: &str, role: &str, audience: &str, ttl_secs: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "u1".into(),
            username: "manager".into(),
            role: role.into(),
            exp: now + ttl_secs,
            iat: now,
            iss: "menu-server".into(),
            aud: audience.into(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_admin_token_verifies() {
        let jwt = JwtService::with_config(&config(SECRET));
        let claims = jwt
            .validate_token(&mint(SECRET, ADMIN_ROLE, "menu-clients", 600))
            .unwrap();
        assert_eq!(claims.sub, "u1");
        assert!(CurrentUser::from(claims).is_admin());

        let staff = jwt
            .validate_token(&mint(SECRET, "staff", "menu-clients", 600))
            .unwrap();
        assert!(!CurrentUser::from(staff).is_admin());
    }

    #[test]
    fn test_rejections() {
        let jwt = JwtService::with_config(&config(SECRET));

        let foreign = mint("another-secret-key-that-is-long-enough", ADMIN_ROLE, "menu-clients", 600);
        assert!(matches!(jwt.validate_token(&foreign), Err(JwtError::BadSignature)));

        let expired = mint(SECRET, ADMIN_ROLE, "menu-clients", -3600);
        assert!(matches!(jwt.validate_token(&expired), Err(JwtError::Expired)));

        let other_audience = mint(SECRET, ADMIN_ROLE, "kiosk", 600);
        assert!(matches!(jwt.validate_token(&other_audience), Err(JwtError::Invalid(_))));

        assert!(matches!(jwt.validate_token("garbage"), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }

    #[test]
    fn test_random_secret() {
        let secret = random_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.len() >= MIN_SECRET_LEN);
        assert_ne!(secret, random_secret());
    }
}
