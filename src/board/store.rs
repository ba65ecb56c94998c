use async_trait::async_trait;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::Project;
use crate::models::projects::{NewProject, ProjectPatch};

/// Upper bound on ` (n)` suffixes tried before giving up on a title.
const MAX_TITLE_SUFFIX: u32 = 1000;

/// Durable storage for projects, always scoped to the owning user.
///
/// Implemented for `sea_orm::DatabaseConnection` in `crate::db::projects`.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn list_projects_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, StoreError>;

    /// Fails with [`StoreError::DuplicateTitle`] when the owner already has a
    /// project with this title.
    async fn create_project(
        &self,
        owner_id: Uuid,
        input: NewProject,
    ) -> Result<Project, StoreError>;

    /// Fails with [`StoreError::NotFound`] when `id` does not exist or belongs
    /// to someone else.
    async fn update_project(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Project, StoreError>;

    async fn delete_project(&self, id: Uuid, owner_id: Uuid) -> Result<(), StoreError>;

    /// Write several positions at once. Either every row is updated or none.
    async fn reposition_projects(
        &self,
        owner_id: Uuid,
        positions: &[(Uuid, f64)],
    ) -> Result<(), StoreError>;
}

/// Insert `input`, suffixing the title with ` (1)`, ` (2)`, ... until the
/// store accepts it.
pub async fn create_with_unique_title<S>(
    store: &S,
    owner_id: Uuid,
    input: NewProject,
) -> Result<Project, StoreError>
where
    S: ProjectStore + ?Sized,
{
    let base = input.title.clone();
    let mut candidate = input;

    for counter in 1..=MAX_TITLE_SUFFIX {
        match store.create_project(owner_id, candidate.clone()).await {
            Err(StoreError::DuplicateTitle(taken)) => {
                tracing::debug!(%owner_id, title = %taken, "Project title taken, retrying");
                candidate.title = format!("{base} ({counter})");
            }
            other => return other,
        }
    }

    Err(StoreError::DuplicateTitle(base))
}
