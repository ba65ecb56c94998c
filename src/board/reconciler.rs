//! Applies board changes optimistically and reconciles them with the store.
//!
//! Every change runs through the same phases:
//!
//! ```text
//! Idle -> Applying -> Persisting -> Committed
//!                               \-> RolledBack
//! ```
//!
//! `Applying` mutates the local [`Board`] right away. `Persisting` issues
//! exactly one store update carrying the full `{status, position}` or
//! `{start_date, end_date}` tuple. If the store fails, the moved project is
//! restored from its snapshot and the error is returned. Nothing is retried.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::board::store::ProjectStore;
use crate::board::view::Board;
use crate::board::{calendar, position};
use crate::error::BoardError;
use crate::models::Project;
use crate::models::projects::{BoardSlot, ProjectPatch, ProjectStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Applying,
    Persisting,
    Committed,
    RolledBack,
}

/// A change requested from the board or the calendar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoardChange {
    /// Drag within or across status columns.
    Move {
        project_id: Uuid,
        source: BoardSlot,
        destination: BoardSlot,
    },
    /// Drag of the project's calendar event to a new start.
    Reschedule {
        project_id: Uuid,
        start: DateTime<Utc>,
    },
}

impl BoardChange {
    pub fn project_id(&self) -> Uuid {
        match *self {
            BoardChange::Move { project_id, .. } | BoardChange::Reschedule { project_id, .. } => {
                project_id
            }
        }
    }
}

/// One change and the local state needed to undo it.
#[derive(Debug)]
pub struct PendingChange {
    change: BoardChange,
    phase: Phase,
    snapshot: Option<Project>,
    patch: ProjectPatch,
}

impl PendingChange {
    pub fn new(change: BoardChange) -> Self {
        Self {
            change,
            phase: Phase::Idle,
            snapshot: None,
            patch: ProjectPatch::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The update the store must persist. Empty until [`apply`](Self::apply).
    pub fn patch(&self) -> &ProjectPatch {
        &self.patch
    }

    /// Idle -> Applying -> Persisting.
    ///
    /// Mutates `board` in place. Fails without touching the board when the
    /// project is not on it or the resulting dates would be out of order.
    pub fn apply(&mut self, board: &mut Board, now: DateTime<Utc>) -> Result<(), BoardError> {
        debug_assert_eq!(self.phase, Phase::Idle, "change applied twice");
        let project_id = self.change.project_id();
        let project = board
            .get(project_id)
            .ok_or(BoardError::UnknownProject(project_id))?;

        let patch = match self.change {
            BoardChange::Move {
                source,
                destination,
                ..
            } => plan_move(board, project, source, destination),
            BoardChange::Reschedule { start, .. } => {
                let (start_date, end_date) = calendar::shifted_dates(project, start, now);
                let patch = ProjectPatch::schedule(start_date, end_date);
                patch
                    .validate_against(project)
                    .map_err(BoardError::Invalid)?;
                patch
            }
        };

        self.phase = Phase::Applying;
        self.snapshot = Some(project.clone());
        self.patch = patch;

        if let Some(local) = board.get_mut(project_id) {
            self.patch.apply_to(local);
        }
        self.phase = Phase::Persisting;
        Ok(())
    }

    /// Persisting -> Committed. The stored row replaces the local copy.
    pub fn commit(&mut self, board: &mut Board, persisted: Project) -> Project {
        board.upsert(persisted.clone());
        self.snapshot = None;
        self.phase = Phase::Committed;
        persisted
    }

    /// Persisting -> RolledBack. The project is restored exactly as it was
    /// before [`apply`](Self::apply).
    pub fn roll_back(&mut self, board: &mut Board) {
        if let Some(snapshot) = self.snapshot.take() {
            board.upsert(snapshot);
        }
        self.phase = Phase::RolledBack;
    }
}

/// Work out the `{status, position}` tuple for a move.
///
/// `destination.index` counts positions in the destination column with the
/// moved project already taken out.
fn plan_move(
    board: &Board,
    project: &Project,
    source: BoardSlot,
    destination: BoardSlot,
) -> ProjectPatch {
    let current = BoardSlot {
        status: project.status,
        index: board.index_of(project.id).unwrap_or_default(),
    };
    if current != source {
        tracing::warn!(
            project_id = %project.id,
            ?source,
            ?current,
            "Move source does not match the board; moving from the current slot"
        );
    }

    if current == destination {
        return ProjectPatch::placement(destination.status, project.position);
    }

    let siblings = board.sibling_positions(destination.status, Some(project.id));
    if position::gap_exhausted(&siblings, destination.index) {
        tracing::warn!(
            status = ?destination.status,
            index = destination.index,
            "Position gap exhausted; the column needs a rebalance"
        );
    }

    ProjectPatch::placement(
        destination.status,
        position::allocate(&siblings, destination.index),
    )
}

/// Runs board changes for one owner against a [`ProjectStore`].
pub struct Reconciler<'a, S: ?Sized> {
    store: &'a S,
    owner_id: Uuid,
}

impl<'a, S> Reconciler<'a, S>
where
    S: ProjectStore + ?Sized,
{
    pub fn new(store: &'a S, owner_id: Uuid) -> Self {
        Self { store, owner_id }
    }

    pub async fn submit(&self, board: &mut Board, change: BoardChange) -> Result<Project, BoardError> {
        self.submit_at(board, change, Utc::now()).await
    }

    /// Same as [`submit`](Self::submit) with an explicit clock, used for
    /// projects that have no start date yet.
    pub async fn submit_at(
        &self,
        board: &mut Board,
        change: BoardChange,
        now: DateTime<Utc>,
    ) -> Result<Project, BoardError> {
        let project_id = change.project_id();
        let mut pending = PendingChange::new(change);
        pending.apply(board, now)?;

        tracing::debug!(owner_id = %self.owner_id, %project_id, patch = ?pending.patch(), "Persisting board change");

        match self
            .store
            .update_project(project_id, self.owner_id, pending.patch().clone())
            .await
        {
            Ok(persisted) => {
                tracing::info!(owner_id = %self.owner_id, %project_id, "Board change committed");
                Ok(pending.commit(board, persisted))
            }
            Err(e) => {
                pending.roll_back(board);
                tracing::warn!(owner_id = %self.owner_id, %project_id, error = %e, "Board change rolled back");
                Err(BoardError::RolledBack(e))
            }
        }
    }

    /// Re-space every project in `status` to evenly spaced positions, keeping
    /// their order. All rows are written in one store call; the local board is
    /// only updated once that call succeeds.
    pub async fn rebalance(
        &self,
        board: &mut Board,
        status: ProjectStatus,
    ) -> Result<Vec<(Uuid, f64)>, BoardError> {
        let ids = board.column_ids(status);
        let spaced = position::respace(ids.len());
        let positions: Vec<(Uuid, f64)> = ids.into_iter().zip(spaced).collect();

        self.store
            .reposition_projects(self.owner_id, &positions)
            .await?;

        for (id, pos) in &positions {
            if let Some(project) = board.get_mut(*id) {
                project.position = *pos;
            }
        }

        tracing::info!(owner_id = %self.owner_id, ?status, count = positions.len(), "Column rebalanced");
        Ok(positions)
    }
}
