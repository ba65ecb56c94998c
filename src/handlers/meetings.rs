use actix_web::{HttpResponse, web};
use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::meetings as meeting_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::LimitQuery;
use crate::models::meetings::CreateMeeting;

const DEFAULT_MEETING_LIMIT: u64 = 5;

/// GET /api/meetings — upcoming meetings with client names.
/// Query params: ?limit=5
pub async fn get_upcoming(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.limit_or(DEFAULT_MEETING_LIMIT);
    let meetings =
        meeting_db::get_upcoming_meetings(db.get_ref(), user.0.id, Utc::now(), limit).await?;
    Ok(HttpResponse::Ok().json(meetings))
}

/// POST /api/meetings — schedule a meeting with a client.
pub async fn create_meeting(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateMeeting>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().validate()?;

    if user_db::get_client_by_id(db.get_ref(), input.client_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(format!(
            "Client {} not found",
            input.client_id
        )));
    }

    let meeting = meeting_db::insert_meeting(db.get_ref(), user.0.id, input).await?;
    Ok(HttpResponse::Created().json(meeting))
}
