use actix_web::{HttpResponse, web};
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{RedisCache, keys};
use crate::config::CacheConfig;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::LimitQuery;
use crate::models::users::{ClientSummary, CreateClient, UpdateClient, UserResponse};

pub const DEFAULT_CLIENT_LIMIT: u64 = 10;

fn email_conflict(e: DbErr) -> ApiError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ApiError::Conflict("A user with this email already exists".to_string())
        }
        _ => e.into(),
    }
}

async fn invalidate_clients(cache: &RedisCache) {
    if let Err(e) = cache.delete_pattern(keys::CLIENTS_PATTERN).await {
        tracing::warn!("Failed to invalidate clients cache: {}", e);
    }
}

/// GET /api/clients — clients with their most recent invoice amount.
/// Query params: ?limit=10
pub async fn get_clients(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    cache_config: web::Data<CacheConfig>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.limit_or(DEFAULT_CLIENT_LIMIT);
    let cache_key = keys::clients(limit);

    match cache.get::<Vec<ClientSummary>>(&cache_key).await {
        Ok(Some(cached)) => return Ok(HttpResponse::Ok().json(cached)),
        Ok(None) => {}
        Err(e) => tracing::warn!("Cache error: {}", e),
    }

    let clients = user_db::get_client_summaries(db.get_ref(), limit).await?;
    if let Err(e) = cache.set(&cache_key, &clients, cache_config.clients_ttl).await {
        tracing::warn!("Cache error: {}", e);
    }

    Ok(HttpResponse::Ok().json(clients))
}

/// POST /api/clients — create a client record.
pub async fn create_client(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<CreateClient>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().validate()?;

    if user_db::email_exists(db.get_ref(), &input.email).await? {
        return Err(ApiError::Conflict(
            "A user with this email already exists".to_string(),
        ));
    }

    let client = user_db::insert_client(db.get_ref(), input)
        .await
        .map_err(email_conflict)?;
    invalidate_clients(&cache).await;
    tracing::info!(client_id = %client.id, "Client created");

    Ok(HttpResponse::Created().json(UserResponse::from(client)))
}

/// PUT /api/clients/{id}
pub async fn update_client(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateClient>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let client = user_db::update_client(db.get_ref(), id, body.into_inner())
        .await
        .map_err(email_conflict)?;
    invalidate_clients(&cache).await;

    Ok(HttpResponse::Ok().json(UserResponse::from(client)))
}

/// DELETE /api/clients/{id}
pub async fn delete_client(
    _user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = user_db::delete_client(db.get_ref(), id).await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Client {id} not found")));
    }
    invalidate_clients(&cache).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Client {id} deleted"),
    })))
}
