use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthError;

/// Identity token claims.
///
/// `sub` is the user's UUID. `user_metadata` carries profile info from the
/// OAuth provider when the token was issued by Supabase.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    /// Expiration (Unix timestamp).
    pub exp: usize,
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
    /// Provider role (e.g. "authenticated"), not the application role.
    pub role: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub user_metadata: Option<UserMetadata>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, AuthError> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| AuthError::InvalidClaims(format!("invalid UUID in sub claim: {e}")))
    }

    /// Best-effort display name: top-level `name`, then metadata.
    pub fn display_name(&self) -> Option<String> {
        self.name.clone().or_else(|| {
            self.user_metadata
                .as_ref()
                .and_then(|m| m.full_name.clone().or_else(|| m.name.clone()))
        })
    }

    pub fn avatar_url(&self) -> Option<String> {
        self.picture.clone().or_else(|| {
            self.user_metadata
                .as_ref()
                .and_then(|m| m.avatar_url.clone().or_else(|| m.picture.clone()))
        })
    }

    /// Prefer the top-level email, fall back to metadata.
    pub fn user_email(&self) -> Option<String> {
        self.email
            .clone()
            .or_else(|| self.user_metadata.as_ref().and_then(|m| m.email.clone()))
    }
}

/// Validate an HS256 token signed with `secret` and return its claims.
pub fn validate_with_secret(token: &str, secret: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(data.claims)
}
