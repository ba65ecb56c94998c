use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::calendar_events as event_db;
use crate::error::ApiError;
use crate::models::calendar_events::CalendarEventInput;

/// GET /api/calendar — the caller's standalone events, earliest first.
pub async fn get_events(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let events = event_db::get_events_by_owner(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(events))
}

/// POST /api/calendar — create an event.
pub async fn create_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CalendarEventInput>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().validate()?;
    let event = event_db::insert_event(db.get_ref(), user.0.id, input).await?;
    Ok(HttpResponse::Created().json(event))
}

/// GET /api/calendar/{id}
pub async fn get_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let event = event_db::get_event_for_owner(db.get_ref(), id, user.0.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Calendar event {id} not found")))?;
    Ok(HttpResponse::Ok().json(event))
}

/// PUT /api/calendar/{id} — replace an event.
pub async fn update_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CalendarEventInput>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner().validate()?;
    let event = event_db::update_event(db.get_ref(), id, user.0.id, input).await?;
    Ok(HttpResponse::Ok().json(event))
}

/// DELETE /api/calendar/{id}
pub async fn delete_event(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = event_db::delete_event(db.get_ref(), id, user.0.id).await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Calendar event {id} not found")));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Calendar event {id} deleted"),
    })))
}
