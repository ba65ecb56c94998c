use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use sea_orm::Iterable;
use serde::Serialize;
use uuid::Uuid;

use crate::board::calendar::{self, ProjectEvent};
use crate::board::position;
use crate::models::Project;
use crate::error::BoardError;
use crate::models::projects::{BoardFilter, ProjectPatch, ProjectStatus};

/// One owner's projects, held once and projected two ways: status columns
/// ordered by position, and calendar events.
///
/// Both projections read the same collection, so a change made through one is
/// visible through the other without reloading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Board {
    projects: Vec<Project>,
}

/// A status column as returned by `GET /api/projects/board`.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn {
    pub status: ProjectStatus,
    pub count: usize,
    pub projects: Vec<Project>,
}

/// Column order: position, then creation time, then id.
pub fn board_order(a: &Project, b: &Project) -> Ordering {
    a.position
        .total_cmp(&b.position)
        .then_with(|| a.created_at.cmp(&b.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

impl Board {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn get(&self, id: Uuid) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: Uuid) -> Option<&mut Project> {
        self.projects.iter_mut().find(|p| p.id == id)
    }

    /// Projects in `status`, in board order.
    pub fn column(&self, status: ProjectStatus) -> Vec<&Project> {
        let mut column: Vec<&Project> = self
            .projects
            .iter()
            .filter(|p| p.status == status)
            .collect();
        column.sort_by(|a, b| board_order(a, b));
        column
    }

    /// Ids in `status`, in board order.
    pub fn column_ids(&self, status: ProjectStatus) -> Vec<Uuid> {
        self.column(status).into_iter().map(|p| p.id).collect()
    }

    /// Ascending positions of `status`, leaving out `except`.
    pub fn sibling_positions(&self, status: ProjectStatus, except: Option<Uuid>) -> Vec<f64> {
        self.column(status)
            .into_iter()
            .filter(|p| Some(p.id) != except)
            .map(|p| p.position)
            .collect()
    }

    /// Index of `id` inside its own column.
    pub fn index_of(&self, id: Uuid) -> Option<usize> {
        let project = self.get(id)?;
        self.column(project.status).iter().position(|p| p.id == id)
    }

    /// Position for a project appended to the end of `status`.
    pub fn append_position(&self, status: ProjectStatus) -> f64 {
        position::append(&self.sibling_positions(status, None))
    }

    /// Prepare an edit-form update for project `id`.
    ///
    /// The patch is checked against the stored project. When it changes the
    /// status, the project goes to the end of its new column.
    pub fn plan_edit(&self, id: Uuid, mut patch: ProjectPatch) -> Result<ProjectPatch, BoardError> {
        let current = self.get(id).ok_or(BoardError::UnknownProject(id))?;
        patch.validate_against(current).map_err(BoardError::Invalid)?;

        if let Some(status) = patch.status.filter(|s| *s != current.status) {
            patch.position = Some(self.append_position(status));
        }
        Ok(patch)
    }

    /// Every status column in board order, narrowed by `filter`.
    ///
    /// Filtering only hides projects; it never changes their positions.
    pub fn columns(&self, filter: &BoardFilter) -> Vec<BoardColumn> {
        ProjectStatus::iter()
            .map(|status| {
                let projects: Vec<Project> = self
                    .column(status)
                    .into_iter()
                    .filter(|p| filter.matches(p))
                    .cloned()
                    .collect();
                BoardColumn {
                    status,
                    count: projects.len(),
                    projects,
                }
            })
            .collect()
    }

    /// One calendar event per project.
    pub fn calendar(&self, now: DateTime<Utc>) -> Vec<ProjectEvent> {
        self.projects
            .iter()
            .map(|p| calendar::project_event(p, now))
            .collect()
    }

    /// Replace the local copy of `project` (matched by id), or add it.
    pub fn upsert(&mut self, project: Project) {
        match self.get_mut(project.id) {
            Some(slot) => *slot = project,
            None => self.projects.push(project),
        }
    }
}
