use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{RedisCache, keys};
use crate::config::CacheConfig;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::users::{UpdateProfile, UserResponse};

/// GET /api/user/profile — the caller's profile, served from cache when warm.
pub async fn get_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    cache_config: web::Data<CacheConfig>,
) -> Result<HttpResponse, ApiError> {
    let id = user.0.id;
    let cache_key = keys::user(id);

    match cache.get::<UserResponse>(&cache_key).await {
        Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached)),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache error: {}", e),
    }

    let profile = user_db::get_user_by_id(db.get_ref(), id)
        .await?
        .map(UserResponse::from)
        .ok_or_else(|| ApiError::NotFound(format!("User {id} not found")))?;

    if let Err(e) = cache.set(&cache_key, &profile, cache_config.user_ttl).await {
        tracing::warn!("Cache error: {}", e);
    }

    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/user/profile — update the caller's profile fields.
pub async fn update_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<UpdateProfile>,
) -> Result<HttpResponse, ApiError> {
    let id = user.0.id;
    let updated = user_db::update_profile(db.get_ref(), id, body.into_inner()).await?;

    if let Err(e) = cache.delete(&keys::user(id)).await {
        tracing::warn!("Failed to invalidate profile cache: {}", e);
    }
    tracing::info!(user_id = %id, "Profile updated");

    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}
