//! Board reconciliation against an in-memory project store.
//!
//! Run with: `cargo test --test board_test`
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crm_backend::board::calendar::Palette;
use crm_backend::board::{
    Board, BoardChange, PendingChange, Phase, ProjectStore, Reconciler, create_with_unique_title,
};
use crm_backend::error::{BoardError, StoreError, ValidationError};
use crm_backend::models::Project;
use crm_backend::models::projects::{
    BoardFilter, BoardSlot, NewProject, ProjectPatch, ProjectPriority, ProjectStatus, ProjectType,
    UpdateProject,
};

// ── In-memory store ──

#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<Project>>,
    fail_next: Mutex<Option<StoreError>>,
    updates: Mutex<Vec<(Uuid, ProjectPatch)>>,
}

impl MemoryStore {
    fn with(rows: Vec<Project>) -> Self {
        Self {
            rows: Mutex::new(rows),
            ..Self::default()
        }
    }

    fn fail_next(&self, error: StoreError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    fn injected_failure(&self) -> Result<(), StoreError> {
        match self.fail_next.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn row(&self, id: Uuid) -> Option<Project> {
        self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned()
    }

    fn updates(&self) -> Vec<(Uuid, ProjectPatch)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list_projects_by_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, StoreError> {
        self.injected_failure()?;
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn create_project(&self, owner_id: Uuid, input: NewProject) -> Result<Project, StoreError> {
        self.injected_failure()?;
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|p| p.user_id == owner_id && p.title == input.title)
        {
            return Err(StoreError::DuplicateTitle(input.title));
        }

        let project = Project {
            id: Uuid::new_v4(),
            title: input.title,
            company: input.company,
            location: input.location,
            description: input.description,
            project_type: input.project_type,
            status: input.status,
            priority: input.priority,
            budget: input.budget,
            client: input.client,
            start_date: input.start_date,
            end_date: input.end_date,
            position: input.position,
            user_id: owner_id,
            created_at: Utc::now(),
            updated_at: None,
        };
        rows.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ProjectPatch,
    ) -> Result<Project, StoreError> {
        self.updates.lock().unwrap().push((id, patch.clone()));
        self.injected_failure()?;

        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner_id)
            .ok_or(StoreError::NotFound(id))?;
        patch.apply_to(row);
        row.updated_at = Some(Utc::now());
        Ok(row.clone())
    }

    async fn delete_project(&self, id: Uuid, owner_id: Uuid) -> Result<(), StoreError> {
        self.injected_failure()?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|p| !(p.id == id && p.user_id == owner_id));
        if rows.len() == before {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn reposition_projects(
        &self,
        owner_id: Uuid,
        positions: &[(Uuid, f64)],
    ) -> Result<(), StoreError> {
        self.injected_failure()?;
        let mut rows = self.rows.lock().unwrap();
        if positions
            .iter()
            .any(|(id, _)| !rows.iter().any(|p| p.id == *id && p.user_id == owner_id))
        {
            return Err(StoreError::Persistence("unknown project".to_string()));
        }
        for (id, position) in positions {
            if let Some(row) = rows.iter_mut().find(|p| p.id == *id) {
                row.position = *position;
            }
        }
        Ok(())
    }
}

// ── Fixtures ──

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap()
}

fn project(owner: Uuid, title: &str, status: ProjectStatus, position: f64, seq: i64) -> Project {
    Project {
        id: Uuid::new_v4(),
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Remote".to_string(),
        description: String::new(),
        project_type: ProjectType::Contract,
        status,
        priority: ProjectPriority::Medium,
        budget: Some(1200.0),
        client: None,
        start_date: Some(at(1)),
        end_date: Some(at(5)),
        position,
        user_id: owner,
        created_at: at(1) + Duration::seconds(seq),
        updated_at: None,
    }
}

fn open_column(owner: Uuid) -> (Project, Project, Project) {
    (
        project(owner, "P1", ProjectStatus::Open, 0.0, 1),
        project(owner, "P2", ProjectStatus::Open, 1.0, 2),
        project(owner, "P3", ProjectStatus::Open, 2.0, 3),
    )
}

fn slot(status: ProjectStatus, index: usize) -> BoardSlot {
    BoardSlot { status, index }
}

async fn load(store: &MemoryStore, owner: Uuid) -> Board {
    Board::new(store.list_projects_by_owner(owner).await.unwrap())
}

// ── Moves ──

#[tokio::test]
async fn test_open_to_review_scenario() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let store = MemoryStore::with(vec![p1.clone(), p2.clone(), p3.clone()]);
    let mut board = load(&store, owner).await;
    let reconciler = Reconciler::new(&store, owner);

    let moved = reconciler
        .submit(
            &mut board,
            BoardChange::Move {
                project_id: p3.id,
                source: slot(ProjectStatus::Open, 2),
                destination: slot(ProjectStatus::Open, 0),
            },
        )
        .await
        .unwrap();

    assert_eq!(moved.position, -1.0);
    assert_eq!(
        board.column_ids(ProjectStatus::Open),
        vec![p3.id, p1.id, p2.id]
    );

    let moved = reconciler
        .submit(
            &mut board,
            BoardChange::Move {
                project_id: p1.id,
                source: slot(ProjectStatus::Open, 1),
                destination: slot(ProjectStatus::Review, 0),
            },
        )
        .await
        .unwrap();

    assert_eq!(moved.position, 0.0);
    assert_eq!(moved.status, ProjectStatus::Review);
    assert_eq!(board.column_ids(ProjectStatus::Review), vec![p1.id]);
    assert_eq!(board.column_ids(ProjectStatus::Open), vec![p3.id, p2.id]);

    // The store agrees with the local board.
    assert_eq!(store.row(p1.id).unwrap().status, ProjectStatus::Review);
    assert_eq!(store.row(p3.id).unwrap().position, -1.0);
}

#[tokio::test]
async fn test_move_sends_one_update_with_status_and_position() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let store = MemoryStore::with(vec![p1.clone(), p2, p3]);
    let mut board = load(&store, owner).await;

    Reconciler::new(&store, owner)
        .submit(
            &mut board,
            BoardChange::Move {
                project_id: p1.id,
                source: slot(ProjectStatus::Open, 0),
                destination: slot(ProjectStatus::InProgress, 0),
            },
        )
        .await
        .unwrap();

    let updates = store.updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(
        updates[0],
        (p1.id, ProjectPatch::placement(ProjectStatus::InProgress, 0.0))
    );
}

#[tokio::test]
async fn test_move_never_renumbers_siblings() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let review = project(owner, "R1", ProjectStatus::Review, 10.0, 4);
    let store = MemoryStore::with(vec![p1.clone(), p2.clone(), p3.clone(), review.clone()]);
    let mut board = load(&store, owner).await;

    Reconciler::new(&store, owner)
        .submit(
            &mut board,
            BoardChange::Move {
                project_id: p2.id,
                source: slot(ProjectStatus::Open, 1),
                destination: slot(ProjectStatus::Review, 0),
            },
        )
        .await
        .unwrap();

    for untouched in [&p1, &p3, &review] {
        assert_eq!(board.get(untouched.id), Some(untouched));
        assert_eq!(store.row(untouched.id).as_ref(), Some(untouched));
    }
    assert_eq!(board.get(p2.id).unwrap().position, 9.0);
}

#[tokio::test]
async fn test_moved_project_lands_at_requested_index() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let p4 = project(owner, "P4", ProjectStatus::Open, 3.0, 4);
    let store = MemoryStore::with(vec![p1.clone(), p2.clone(), p3.clone(), p4.clone()]);
    let mut board = load(&store, owner).await;
    let reconciler = Reconciler::new(&store, owner);

    // P1 from the head to index 2 of the remaining [P2, P3, P4].
    reconciler
        .submit(
            &mut board,
            BoardChange::Move {
                project_id: p1.id,
                source: slot(ProjectStatus::Open, 0),
                destination: slot(ProjectStatus::Open, 2),
            },
        )
        .await
        .unwrap();
    assert_eq!(
        board.column_ids(ProjectStatus::Open),
        vec![p2.id, p3.id, p1.id, p4.id]
    );

    // Reloading from the store gives the same order.
    let reloaded = load(&store, owner).await;
    assert_eq!(
        reloaded.column_ids(ProjectStatus::Open),
        board.column_ids(ProjectStatus::Open)
    );
}

#[tokio::test]
async fn test_move_to_current_slot_keeps_position() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let store = MemoryStore::with(vec![p1, p2.clone(), p3]);
    let mut board = load(&store, owner).await;

    let moved = Reconciler::new(&store, owner)
        .submit(
            &mut board,
            BoardChange::Move {
                project_id: p2.id,
                source: slot(ProjectStatus::Open, 1),
                destination: slot(ProjectStatus::Open, 1),
            },
        )
        .await
        .unwrap();

    assert_eq!(moved.position, p2.position);
    assert_eq!(moved.status, ProjectStatus::Open);
}

#[tokio::test]
async fn test_stale_source_moves_from_actual_slot() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let store = MemoryStore::with(vec![p1.clone(), p2.clone(), p3.clone()]);
    let mut board = load(&store, owner).await;

    // The caller believes P3 is in REVIEW; it is at OPEN index 2.
    let moved = Reconciler::new(&store, owner)
        .submit(
            &mut board,
            BoardChange::Move {
                project_id: p3.id,
                source: slot(ProjectStatus::Review, 0),
                destination: slot(ProjectStatus::Open, 1),
            },
        )
        .await
        .unwrap();

    assert_eq!(moved.position, 0.5);
    assert_eq!(
        board.column_ids(ProjectStatus::Open),
        vec![p1.id, p3.id, p2.id]
    );
}

#[tokio::test]
async fn test_equal_positions_tie_break_on_creation_time() {
    let owner = Uuid::new_v4();
    let older = project(owner, "Older", ProjectStatus::Open, 1.0, 1);
    let newer = project(owner, "Newer", ProjectStatus::Open, 1.0, 2);
    let board = Board::new(vec![newer.clone(), older.clone()]);

    assert_eq!(
        board.column_ids(ProjectStatus::Open),
        vec![older.id, newer.id]
    );
}

// ── Rollback ──

#[tokio::test]
async fn test_failed_move_restores_board_exactly() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let store = MemoryStore::with(vec![p1.clone(), p2, p3]);
    let mut board = load(&store, owner).await;
    let before = board.clone();

    store.fail_next(StoreError::Persistence("connection reset".to_string()));
    let result = Reconciler::new(&store, owner)
        .submit(
            &mut board,
            BoardChange::Move {
                project_id: p1.id,
                source: slot(ProjectStatus::Open, 0),
                destination: slot(ProjectStatus::Completed, 0),
            },
        )
        .await;

    assert_eq!(
        result,
        Err(BoardError::RolledBack(StoreError::Persistence(
            "connection reset".to_string()
        )))
    );
    assert_eq!(board, before);
    assert_eq!(store.updates().len(), 1, "no retry after a failure");
    assert_eq!(store.row(p1.id).unwrap().status, ProjectStatus::Open);
}

#[tokio::test]
async fn test_move_of_vanished_project_rolls_back_with_not_found() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let store = MemoryStore::with(vec![p1.clone(), p2, p3]);
    let mut board = load(&store, owner).await;
    let before = board.clone();

    // Deleted elsewhere after this board was loaded.
    store.delete_project(p1.id, owner).await.unwrap();

    let result = Reconciler::new(&store, owner)
        .submit(
            &mut board,
            BoardChange::Move {
                project_id: p1.id,
                source: slot(ProjectStatus::Open, 0),
                destination: slot(ProjectStatus::Open, 2),
            },
        )
        .await;

    assert_eq!(
        result,
        Err(BoardError::RolledBack(StoreError::NotFound(p1.id)))
    );
    assert_eq!(board, before);
}

#[tokio::test]
async fn test_unknown_project_is_rejected_before_applying() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let store = MemoryStore::with(vec![p1, p2, p3]);
    let mut board = load(&store, owner).await;
    let before = board.clone();
    let stranger = Uuid::new_v4();

    let result = Reconciler::new(&store, owner)
        .submit(
            &mut board,
            BoardChange::Move {
                project_id: stranger,
                source: slot(ProjectStatus::Open, 0),
                destination: slot(ProjectStatus::Open, 1),
            },
        )
        .await;

    assert_eq!(result, Err(BoardError::UnknownProject(stranger)));
    assert_eq!(board, before);
    assert!(store.updates().is_empty());
}

#[test]
fn test_pending_change_walks_the_phases() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let mut board = Board::new(vec![p1.clone(), p2, p3]);
    let before = board.clone();

    let mut pending = PendingChange::new(BoardChange::Move {
        project_id: p1.id,
        source: slot(ProjectStatus::Open, 0),
        destination: slot(ProjectStatus::Review, 0),
    });
    assert_eq!(pending.phase(), Phase::Idle);

    pending.apply(&mut board, Utc::now()).unwrap();
    assert_eq!(pending.phase(), Phase::Persisting);
    assert_eq!(board.get(p1.id).unwrap().status, ProjectStatus::Review);
    assert_eq!(
        *pending.patch(),
        ProjectPatch::placement(ProjectStatus::Review, 0.0)
    );

    pending.roll_back(&mut board);
    assert_eq!(pending.phase(), Phase::RolledBack);
    assert_eq!(board, before);
}

// ── Calendar bridge ──

#[tokio::test]
async fn test_calendar_drag_shifts_both_dates() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let store = MemoryStore::with(vec![p1.clone(), p2, p3]);
    let mut board = load(&store, owner).await;

    let moved = Reconciler::new(&store, owner)
        .submit(
            &mut board,
            BoardChange::Reschedule {
                project_id: p1.id,
                start: at(10),
            },
        )
        .await
        .unwrap();

    assert_eq!(moved.start_date, Some(at(10)));
    assert_eq!(moved.end_date, Some(at(14)));
    assert_eq!(moved.status, p1.status);
    assert_eq!(moved.position, p1.position);

    // The calendar projection reflects the board immediately.
    let event = board
        .calendar(Utc::now())
        .into_iter()
        .find(|e| e.id == p1.id)
        .unwrap();
    assert_eq!(event.start, at(10));
    assert_eq!(event.end, at(14));
    assert!(event.all_day);

    assert_eq!(
        store.updates(),
        vec![(p1.id, ProjectPatch::schedule(Some(at(10)), Some(at(14))))]
    );
}

#[tokio::test]
async fn test_calendar_drag_without_start_pulls_end_up_to_new_start() {
    let owner = Uuid::new_v4();
    let mut undated = project(owner, "Undated", ProjectStatus::Open, 0.0, 1);
    undated.start_date = None;
    undated.end_date = Some(at(3));
    let store = MemoryStore::with(vec![undated.clone()]);
    let mut board = load(&store, owner).await;

    let moved = Reconciler::new(&store, owner)
        .submit_at(
            &mut board,
            BoardChange::Reschedule {
                project_id: undated.id,
                start: at(4),
            },
            at(1),
        )
        .await
        .unwrap();

    // The end date would fall before the new start, so it is pulled up to it.
    assert_eq!(moved.start_date, Some(at(4)));
    assert_eq!(moved.end_date, Some(at(4)));
}

#[tokio::test]
async fn test_calendar_drag_without_start_never_saves_end_before_start() {
    let owner = Uuid::new_v4();
    let mut undated = project(owner, "Undated", ProjectStatus::Open, 0.0, 1);
    undated.start_date = None;
    undated.end_date = Some(at(3));
    let store = MemoryStore::with(vec![undated.clone()]);
    let mut board = load(&store, owner).await;

    let moved = Reconciler::new(&store, owner)
        .submit_at(
            &mut board,
            BoardChange::Reschedule {
                project_id: undated.id,
                start: at(20),
            },
            at(10),
        )
        .await
        .unwrap();

    assert_eq!(moved.start_date, Some(at(20)));
    assert_eq!(moved.end_date, Some(at(20)));
    let row = store.row(undated.id).unwrap();
    assert!(row.end_date >= row.start_date);
}

#[tokio::test]
async fn test_calendar_drag_without_start_keeps_later_end() {
    let owner = Uuid::new_v4();
    let mut undated = project(owner, "Undated", ProjectStatus::Open, 0.0, 1);
    undated.start_date = None;
    undated.end_date = Some(at(25));
    let store = MemoryStore::with(vec![undated.clone()]);
    let mut board = load(&store, owner).await;

    let moved = Reconciler::new(&store, owner)
        .submit_at(
            &mut board,
            BoardChange::Reschedule {
                project_id: undated.id,
                start: at(20),
            },
            at(10),
        )
        .await
        .unwrap();

    assert_eq!(moved.start_date, Some(at(20)));
    assert_eq!(moved.end_date, Some(at(25)));
}

#[tokio::test]
async fn test_calendar_drag_with_inverted_dates_is_rejected_before_applying() {
    let owner = Uuid::new_v4();
    let mut inverted = project(owner, "Inverted", ProjectStatus::Open, 0.0, 1);
    inverted.start_date = Some(at(5));
    inverted.end_date = Some(at(2));
    let store = MemoryStore::with(vec![inverted.clone()]);
    let mut board = load(&store, owner).await;
    let before = board.clone();

    let mut pending = PendingChange::new(BoardChange::Reschedule {
        project_id: inverted.id,
        start: at(10),
    });
    assert_eq!(
        pending.apply(&mut board, at(1)),
        Err(BoardError::Invalid(ValidationError::EndBeforeStart))
    );
    assert_eq!(pending.phase(), Phase::Idle);
    assert_eq!(board, before);

    let result = Reconciler::new(&store, owner)
        .submit(
            &mut board,
            BoardChange::Reschedule {
                project_id: inverted.id,
                start: at(10),
            },
        )
        .await;
    assert_eq!(
        result,
        Err(BoardError::Invalid(ValidationError::EndBeforeStart))
    );
    assert_eq!(board, before);
    assert!(store.updates().is_empty());
}

#[tokio::test]
async fn test_failed_calendar_drag_restores_dates() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let store = MemoryStore::with(vec![p1.clone(), p2, p3]);
    let mut board = load(&store, owner).await;
    let before = board.clone();

    store.fail_next(StoreError::Persistence("timeout".to_string()));
    let result = Reconciler::new(&store, owner)
        .submit(
            &mut board,
            BoardChange::Reschedule {
                project_id: p1.id,
                start: at(20),
            },
        )
        .await;

    assert!(matches!(result, Err(BoardError::RolledBack(_))));
    assert_eq!(board, before);
    let event = board
        .calendar(Utc::now())
        .into_iter()
        .find(|e| e.id == p1.id)
        .unwrap();
    assert_eq!(event.start, at(1));
}

// ── Edit form ──

#[test]
fn test_edit_status_change_appends_to_new_column() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let reviewed = project(owner, "Reviewed", ProjectStatus::Review, 10.0, 4);
    let board = Board::new(vec![p1.clone(), p2.clone(), p3.clone(), reviewed.clone()]);

    let to_review = UpdateProject {
        status: Some(ProjectStatus::Review),
        ..UpdateProject::default()
    };
    let patch = board.plan_edit(p1.id, to_review.into()).unwrap();
    assert_eq!(patch.status, Some(ProjectStatus::Review));
    assert_eq!(patch.position, Some(11.0));

    let to_done = UpdateProject {
        status: Some(ProjectStatus::Completed),
        ..UpdateProject::default()
    };
    let patch = board.plan_edit(p2.id, to_done.into()).unwrap();
    assert_eq!(patch.position, Some(0.0));

    // Planning never touches the board itself.
    assert_eq!(board.get(p3.id).unwrap().position, 2.0);
    assert_eq!(board.get(reviewed.id).unwrap().position, 10.0);
}

#[test]
fn test_edit_without_status_change_keeps_position() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let board = Board::new(vec![p1.clone(), p2, p3]);

    let renamed = UpdateProject {
        title: Some("Renamed".to_string()),
        ..UpdateProject::default()
    };
    let patch = board.plan_edit(p1.id, renamed.into()).unwrap();
    assert_eq!(patch.title.as_deref(), Some("Renamed"));
    assert_eq!(patch.position, None);

    let same_status = UpdateProject {
        status: Some(ProjectStatus::Open),
        ..UpdateProject::default()
    };
    let patch = board.plan_edit(p1.id, same_status.into()).unwrap();
    assert_eq!(patch.position, None);
}

#[test]
fn test_edit_is_validated_against_stored_project() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let board = Board::new(vec![p1.clone(), p2, p3]);

    let early_end = UpdateProject {
        end_date: Some(Some(at(1) - Duration::days(1))),
        ..UpdateProject::default()
    };
    assert_eq!(
        board.plan_edit(p1.id, early_end.into()),
        Err(BoardError::Invalid(ValidationError::EndBeforeStart))
    );

    let stranger = Uuid::new_v4();
    assert_eq!(
        board.plan_edit(stranger, ProjectPatch::default()),
        Err(BoardError::UnknownProject(stranger))
    );
}

#[test]
fn test_calendar_event_colours_follow_priority() {
    let owner = Uuid::new_v4();
    let mut high = project(owner, "High", ProjectStatus::Open, 0.0, 1);
    high.priority = ProjectPriority::High;
    let mut low = project(owner, "Low", ProjectStatus::Open, 1.0, 2);
    low.priority = ProjectPriority::Low;
    let mut undated = project(owner, "Undated", ProjectStatus::Open, 2.0, 3);
    undated.start_date = None;
    undated.end_date = None;

    let now = at(7);
    let events = Board::new(vec![high.clone(), low.clone(), undated.clone()]).calendar(now);

    assert_eq!(events[0].background_color, Palette::RED.background);
    assert_eq!(events[0].border_color, Palette::RED.border);
    assert_eq!(events[1].text_color, Palette::GREEN.text);
    assert_eq!(events[2].background_color, Palette::YELLOW.background);
    assert_eq!((events[2].start, events[2].end), (now, now));
}

// ── Columns, creation, rebalance ──

#[test]
fn test_filtered_columns_keep_positions() {
    let owner = Uuid::new_v4();
    let (p1, mut p2, p3) = open_column(owner);
    p2.title = "Website redesign".to_string();
    let board = Board::new(vec![p1, p2.clone(), p3]);

    let filter = BoardFilter {
        search: Some("WEBSITE".to_string()),
        ..BoardFilter::default()
    };
    let columns = board.columns(&filter);

    assert_eq!(columns.len(), 5);
    let open = columns
        .iter()
        .find(|c| c.status == ProjectStatus::Open)
        .unwrap();
    assert_eq!(open.count, 1);
    assert_eq!(open.projects[0].id, p2.id);
    assert_eq!(open.projects[0].position, 1.0);
}

#[tokio::test]
async fn test_duplicate_titles_get_numbered_suffixes() {
    let owner = Uuid::new_v4();
    let store = MemoryStore::with(vec![
        project(owner, "Site", ProjectStatus::Open, 0.0, 1),
        project(owner, "Site (1)", ProjectStatus::Open, 1.0, 2),
    ]);

    let input = NewProject {
        title: "Site".to_string(),
        company: "Acme".to_string(),
        location: String::new(),
        description: String::new(),
        project_type: ProjectType::FullTime,
        status: ProjectStatus::Open,
        priority: ProjectPriority::Medium,
        budget: None,
        client: None,
        start_date: Some(at(1)),
        end_date: None,
        position: 2.0,
    };

    let created = create_with_unique_title(&store, owner, input.clone())
        .await
        .unwrap();
    assert_eq!(created.title, "Site (2)");

    // Another owner may reuse the plain title.
    let other = create_with_unique_title(&store, Uuid::new_v4(), input)
        .await
        .unwrap();
    assert_eq!(other.title, "Site");
}

#[tokio::test]
async fn test_rebalance_respaces_without_reordering() {
    let owner = Uuid::new_v4();
    let a = project(owner, "A", ProjectStatus::Open, -1.0, 1);
    let b = project(owner, "B", ProjectStatus::Open, 0.0, 2);
    let c = project(owner, "C", ProjectStatus::Open, 0.0000001, 3);
    let other = project(owner, "Other", ProjectStatus::Review, 5.0, 4);
    let store = MemoryStore::with(vec![c.clone(), a.clone(), b.clone(), other.clone()]);
    let mut board = load(&store, owner).await;

    let positions = Reconciler::new(&store, owner)
        .rebalance(&mut board, ProjectStatus::Open)
        .await
        .unwrap();

    assert_eq!(
        positions,
        vec![(a.id, 0.0), (b.id, 1000.0), (c.id, 2000.0)]
    );
    assert_eq!(
        board.column_ids(ProjectStatus::Open),
        vec![a.id, b.id, c.id]
    );
    assert_eq!(store.row(c.id).unwrap().position, 2000.0);
    assert_eq!(board.get(other.id), Some(&other));
}

#[tokio::test]
async fn test_failed_rebalance_leaves_board_untouched() {
    let owner = Uuid::new_v4();
    let (p1, p2, p3) = open_column(owner);
    let store = MemoryStore::with(vec![p1, p2, p3]);
    let mut board = load(&store, owner).await;
    let before = board.clone();

    store.fail_next(StoreError::Persistence("deadlock".to_string()));
    let result = Reconciler::new(&store, owner)
        .rebalance(&mut board, ProjectStatus::Open)
        .await;

    assert!(matches!(result, Err(BoardError::Store(_))));
    assert_eq!(board, before);
}
