use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, web};
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::{AuthError, Principal, TokenVerifier};
use crate::db::users::find_or_create_from_auth;
use crate::error::ApiError;
use crate::models::users::{self, CreateUserFromAuth, Roles};

/// The user behind a verified bearer token. Created on first sight.
pub struct AuthenticatedUser(pub users::Model);

impl AuthenticatedUser {
    pub fn principal(&self) -> Principal {
        Principal::from(&self.0)
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingHeader)?;

    header
        .strip_prefix("Bearer ")
        .map(str::to_string)
        .ok_or(AuthError::MalformedHeader)
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = bearer_token(&req)?;

            let verifier = req
                .app_data::<web::Data<TokenVerifier>>()
                .ok_or_else(|| ApiError::Internal("Token verifier not configured".to_string()))?;

            let claims = verifier.verify(&token).await?;
            let user_id = claims.user_id()?;
            let email = claims
                .user_email()
                .ok_or_else(|| AuthError::InvalidClaims("no email in token claims".to_string()))?;

            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| ApiError::Internal("Database not configured".to_string()))?;

            let user = find_or_create_from_auth(
                db.get_ref(),
                CreateUserFromAuth {
                    id: user_id,
                    email,
                    name: claims.display_name(),
                    image: claims.avatar_url(),
                    auth_provider: verifier.provider().to_string(),
                    role: Roles::User,
                },
            )
            .await?;

            Ok(AuthenticatedUser(user))
        })
    }
}
