//! Authentication port.
//!
//! Sessions are issued by an external identity service; this side only
//! validates Bearer tokens and checks roles for the editorial endpoints.

use uuid::Uuid;

/// Roles allowed to post, pin and delete timeline entries.
pub const EDITORIAL_ROLES: &[&str] = &["editor", "admin"];

/// Claims carried by an access token.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    /// Display name used as the byline of entries the user posts.
    pub name: String,
    pub roles: Vec<String>,
    pub exp: i64,
}

impl TokenClaims {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_editor(&self) -> bool {
        EDITORIAL_ROLES.iter().any(|role| self.has_role(role))
    }
}

/// Validates Bearer tokens of editorial requests.
pub trait TokenService: Send + Sync {
    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Insufficient permissions")]
    InsufficientPermissions,
}
