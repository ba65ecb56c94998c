//! Bearer-token identity: token verification, the authenticated principal and
//! the request extractor.

pub mod jwks;
pub mod jwt;
pub mod middleware;

use std::sync::Arc;

use uuid::Uuid;

use crate::config::AuthConfig;
use crate::models::users::{self, Roles};
use jwks::JwksCache;
use jwt::Claims;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Authorization header must be: Bearer <token>")]
    MalformedHeader,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Signing key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("Invalid claims: {0}")]
    InvalidClaims(String),
}

/// The verified caller, passed explicitly into every owner-scoped operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    pub id: Uuid,
    pub role: Roles,
}

impl From<&users::Model> for Principal {
    fn from(user: &users::Model) -> Self {
        Self {
            id: user.id,
            role: user.role,
        }
    }
}

/// Verifies bearer tokens in whichever mode the process was configured for.
#[derive(Clone)]
pub enum TokenVerifier {
    Secret(String),
    Jwks(Arc<JwksCache>),
}

impl TokenVerifier {
    pub fn from_config(config: &AuthConfig) -> Self {
        match config {
            AuthConfig::Secret(secret) => TokenVerifier::Secret(secret.clone()),
            AuthConfig::Supabase {
                project_ref,
                anon_key,
            } => TokenVerifier::Jwks(Arc::new(JwksCache::new(project_ref, anon_key))),
        }
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        match self {
            TokenVerifier::Secret(secret) => jwt::validate_with_secret(token, secret),
            TokenVerifier::Jwks(cache) => cache.validate_token(token).await,
        }
    }

    /// Recorded on users created from this verifier's tokens.
    pub fn provider(&self) -> &'static str {
        match self {
            TokenVerifier::Secret(_) => "jwt",
            TokenVerifier::Jwks(_) => "supabase",
        }
    }
}
