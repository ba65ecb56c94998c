use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::board::ProjectStore;
use crate::error::StoreError;
use crate::models::projects::{self, NewProject, ProjectPatch};

/// Insert a new project owned by `owner_id`.
pub async fn insert_project(
    db: &DatabaseConnection,
    owner_id: Uuid,
    input: NewProject,
) -> Result<projects::Model, DbErr> {
    let new_project = projects::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        company: Set(input.company),
        location: Set(input.location),
        description: Set(input.description),
        project_type: Set(input.project_type),
        status: Set(input.status),
        priority: Set(input.priority),
        budget: Set(input.budget),
        client: Set(input.client),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        position: Set(input.position),
        user_id: Set(owner_id),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_project.insert(db).await
}

/// Fetch every project of an owner in board order.
pub async fn get_projects_by_owner(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .filter(projects::Column::UserId.eq(owner_id))
        .order_by_asc(projects::Column::Position)
        .order_by_asc(projects::Column::CreatedAt)
        .order_by_asc(projects::Column::Id)
        .all(db)
        .await
}

/// Fetch an owner's projects ordered by end date, soonest first.
pub async fn get_projects_by_end_date(
    db: &DatabaseConnection,
    owner_id: Uuid,
    limit: Option<u64>,
) -> Result<Vec<projects::Model>, DbErr> {
    projects::Entity::find()
        .filter(projects::Column::UserId.eq(owner_id))
        .order_by_asc(projects::Column::EndDate)
        .limit(limit)
        .all(db)
        .await
}

/// Fetch a single project if it belongs to `owner_id`.
pub async fn get_project_for_owner(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(id)
        .filter(projects::Column::UserId.eq(owner_id))
        .one(db)
        .await
}

/// Write the fields set in `patch`.
pub async fn update_project(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
    patch: ProjectPatch,
) -> Result<projects::Model, DbErr> {
    let project = get_project_for_owner(db, id, owner_id)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Project {id} not found")))?;

    let mut active: projects::ActiveModel = project.into();

    if let Some(title) = patch.title {
        active.title = Set(title);
    }
    if let Some(company) = patch.company {
        active.company = Set(company);
    }
    if let Some(description) = patch.description {
        active.description = Set(description);
    }
    if let Some(location) = patch.location {
        active.location = Set(location);
    }
    if let Some(project_type) = patch.project_type {
        active.project_type = Set(project_type);
    }
    if let Some(status) = patch.status {
        active.status = Set(status);
    }
    if let Some(priority) = patch.priority {
        active.priority = Set(priority);
    }
    if let Some(budget) = patch.budget {
        active.budget = Set(budget);
    }
    if let Some(client) = patch.client {
        active.client = Set(client);
    }
    if let Some(start_date) = patch.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = patch.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(position) = patch.position {
        active.position = Set(position);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a project if it belongs to `owner_id`.
pub async fn delete_project(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<DeleteResult, DbErr> {
    projects::Entity::delete_many()
        .filter(projects::Column::Id.eq(id))
        .filter(projects::Column::UserId.eq(owner_id))
        .exec(db)
        .await
}

/// Write several positions in one transaction.
pub async fn reposition_projects(
    db: &DatabaseConnection,
    owner_id: Uuid,
    positions: &[(Uuid, f64)],
) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    for (id, position) in positions {
        let result = projects::Entity::update_many()
            .col_expr(projects::Column::Position, Expr::value(*position))
            .filter(projects::Column::Id.eq(*id))
            .filter(projects::Column::UserId.eq(owner_id))
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            // Dropping `txn` rolls back the rows already written.
            return Err(DbErr::RecordNotFound(format!("Project {id} not found")));
        }
    }

    txn.commit().await
}

fn store_error(e: DbErr, id: Uuid) -> StoreError {
    match e {
        DbErr::RecordNotFound(_) => StoreError::NotFound(id),
        e => StoreError::from(e),
    }
}

#[async_trait]
impl ProjectStore for DatabaseConnection {
    async fn list_projects_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Vec<projects::Model>, StoreError> {
        Ok(get_projects_by_owner(self, owner_id).await?)
    }

    async fn create_project(
        &self,
        owner_id: Uuid,
        input: NewProject,
    ) -> Result<projects::Model, StoreError> {
        let title = input.title.clone();
        insert_project(self, owner_id, input).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                StoreError::DuplicateTitle(title)
            } else {
                StoreError::from(e)
            }
        })
    }

    async fn update_project(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ProjectPatch,
    ) -> Result<projects::Model, StoreError> {
        let title = patch.title.clone();
        update_project(self, id, owner_id, patch)
            .await
            .map_err(|e| match (e.sql_err(), title) {
                (Some(SqlErr::UniqueConstraintViolation(_)), Some(title)) => {
                    StoreError::DuplicateTitle(title)
                }
                _ => store_error(e, id),
            })
    }

    async fn delete_project(&self, id: Uuid, owner_id: Uuid) -> Result<(), StoreError> {
        match delete_project(self, id, owner_id).await? {
            result if result.rows_affected > 0 => Ok(()),
            _ => Err(StoreError::NotFound(id)),
        }
    }

    async fn reposition_projects(
        &self,
        owner_id: Uuid,
        positions: &[(Uuid, f64)],
    ) -> Result<(), StoreError> {
        reposition_projects(self, owner_id, positions)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotFound(msg) => StoreError::Persistence(msg),
                e => StoreError::from(e),
            })
    }
}
