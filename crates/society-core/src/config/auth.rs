//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Where the resolved principal's role comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleSource {
    /// Role as stored on the freshly fetched row (role-now).
    #[default]
    Row,
    /// Role as carried in the token claim (role-at-issuance).
    Claim,
}

/// Token and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token TTL in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// Name of the cookie that may carry the token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Whether the auth cookie is marked `Secure`.
    #[serde(default)]
    pub secure_cookie: bool,
    /// Role source policy used by the identity resolver.
    #[serde(default)]
    pub role_source: RoleSource,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_minutes: default_token_ttl(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
            role_source: RoleSource::default(),
        }
    }
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION_PLEASE".to_string()
}

fn default_token_ttl() -> u64 {
    24 * 60
}

fn default_cookie_name() -> String {
    "token".to_string()
}
