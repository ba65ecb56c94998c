use actix_web::{HttpResponse, web};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::board::{Board, BoardChange, ProjectStore, Reconciler, create_with_unique_title};
use crate::db::projects as project_db;
use crate::error::ApiError;
use crate::models::LimitQuery;
use crate::models::projects::{
    BoardFilter, CreateProject, MoveProject, ProjectPatch, ProjectStatus, ScheduleProject,
    UpdateProject,
};

/// Load the caller's whole board.
async fn load_board(db: &DatabaseConnection, owner_id: Uuid) -> Result<Board, ApiError> {
    let projects = db.list_projects_by_owner(owner_id).await?;
    Ok(Board::new(projects))
}

/// GET /api/projects — list the caller's projects, soonest end date first.
/// Query params: ?limit=5
pub async fn get_projects(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<LimitQuery>,
) -> Result<HttpResponse, ApiError> {
    let limit = query.clamped();
    let projects = project_db::get_projects_by_end_date(db.get_ref(), user.0.id, limit).await?;
    Ok(HttpResponse::Ok().json(projects))
}

/// POST /api/projects — create a project at the end of its status column.
pub async fn create_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateProject>,
) -> Result<HttpResponse, ApiError> {
    let owner = user.principal();
    let mut input = body.into_inner().validate(Utc::now())?;

    let board = load_board(db.get_ref(), owner.id).await?;
    input.position = board.append_position(input.status);

    let project = create_with_unique_title(db.get_ref(), owner.id, input).await?;
    tracing::info!(owner_id = %owner.id, project_id = %project.id, title = %project.title, "Project created");

    Ok(HttpResponse::Created().json(project))
}

/// GET /api/projects/{id} — a single project of the caller.
pub async fn get_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let project = project_db::get_project_for_owner(db.get_ref(), id, user.0.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {id} not found")))?;
    Ok(HttpResponse::Ok().json(project))
}

/// PUT /api/projects/{id} — edit-form update.
///
/// A status change through the form places the project at the end of its
/// new column.
pub async fn update_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProject>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let owner = user.principal();

    let board = load_board(db.get_ref(), owner.id).await?;
    let patch = board.plan_edit(id, ProjectPatch::from(body.into_inner()))?;

    if patch.is_empty() {
        return Ok(HttpResponse::Ok().json(board.get(id)));
    }

    let project = db.update_project(id, owner.id, patch).await?;
    tracing::info!(owner_id = %owner.id, project_id = %id, "Project updated");

    Ok(HttpResponse::Ok().json(project))
}

/// DELETE /api/projects/{id} — delete a project and its invoices.
pub async fn delete_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    ProjectStore::delete_project(db.get_ref(), id, user.0.id).await?;
    tracing::info!(owner_id = %user.0.id, project_id = %id, "Project deleted");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Project {id} deleted"),
    })))
}

/// GET /api/projects/board — status columns in board order.
/// Query params: ?search=&type=&priority=
pub async fn get_board(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<BoardFilter>,
) -> Result<HttpResponse, ApiError> {
    let board = load_board(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(board.columns(&query)))
}

/// GET /api/projects/calendar — every project as an all-day event.
pub async fn get_calendar(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let board = load_board(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(board.calendar(Utc::now())))
}

/// PUT /api/projects/{id}/move — drag a card within or across columns.
pub async fn move_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<MoveProject>,
) -> Result<HttpResponse, ApiError> {
    let project_id = path.into_inner();
    let owner = user.principal();
    let MoveProject {
        source,
        destination,
    } = body.into_inner();

    let mut board = load_board(db.get_ref(), owner.id).await?;
    let project = Reconciler::new(db.get_ref(), owner.id)
        .submit(
            &mut board,
            BoardChange::Move {
                project_id,
                source,
                destination,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(project))
}

/// PUT /api/projects/{id}/schedule — drag the project's calendar event.
pub async fn schedule_project(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<ScheduleProject>,
) -> Result<HttpResponse, ApiError> {
    let project_id = path.into_inner();
    let owner = user.principal();

    let mut board = load_board(db.get_ref(), owner.id).await?;
    let project = Reconciler::new(db.get_ref(), owner.id)
        .submit(
            &mut board,
            BoardChange::Reschedule {
                project_id,
                start: body.start,
            },
        )
        .await?;

    Ok(HttpResponse::Ok().json(project))
}

#[derive(Serialize)]
struct Repositioned {
    id: Uuid,
    position: f64,
}

/// POST /api/projects/board/{status}/rebalance — re-space one column.
pub async fn rebalance_column(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<ProjectStatus>,
) -> Result<HttpResponse, ApiError> {
    let status = path.into_inner();
    let owner = user.principal();

    let mut board = load_board(db.get_ref(), owner.id).await?;
    let positions = Reconciler::new(db.get_ref(), owner.id)
        .rebalance(&mut board, status)
        .await?;

    let positions: Vec<Repositioned> = positions
        .into_iter()
        .map(|(id, position)| Repositioned { id, position })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "status": status,
        "positions": positions,
    })))
}
