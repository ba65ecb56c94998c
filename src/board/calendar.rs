//! Calendar projection of board projects.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::Project;
use crate::models::projects::{ProjectPriority, ProjectStatus};

/// Colours of a calendar event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
}

impl Palette {
    pub const RED: Palette = Palette {
        background: "#fee2e2",
        border: "#ef4444",
        text: "#991b1b",
    };
    pub const YELLOW: Palette = Palette {
        background: "#fef3c7",
        border: "#f59e0b",
        text: "#92400e",
    };
    pub const GREEN: Palette = Palette {
        background: "#dcfce7",
        border: "#22c55e",
        text: "#166534",
    };
    /// Fallback for events that carry no colour of their own.
    pub const GRAY: Palette = Palette {
        background: "#f3f4f6",
        border: "#9ca3af",
        text: "#1f2937",
    };
}

impl From<ProjectPriority> for Palette {
    fn from(priority: ProjectPriority) -> Self {
        match priority {
            ProjectPriority::High => Palette::RED,
            ProjectPriority::Medium => Palette::YELLOW,
            ProjectPriority::Low => Palette::GREEN,
        }
    }
}

/// A project rendered as an all-day calendar event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectEvent {
    /// Same id as the project, so selecting the event edits the project.
    pub id: Uuid,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub all_day: bool,
    pub background_color: &'static str,
    pub border_color: &'static str,
    pub text_color: &'static str,
    pub company: String,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
}

/// Where a project shows up on the calendar. A project without a start date
/// is displayed at `now`; that default is never written back.
pub fn displayed_span(project: &Project, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = project.start_date.unwrap_or(now);
    let end = project.end_date.unwrap_or(start);
    (start, end)
}

pub fn project_event(project: &Project, now: DateTime<Utc>) -> ProjectEvent {
    let (start, end) = displayed_span(project, now);
    let palette = Palette::from(project.priority);

    ProjectEvent {
        id: project.id,
        title: project.title.clone(),
        start,
        end,
        all_day: true,
        background_color: palette.background,
        border_color: palette.border,
        text_color: palette.text,
        company: project.company.clone(),
        status: project.status,
        priority: project.priority,
    }
}

/// New `{start_date, end_date}` after the project's event is dragged so that it
/// starts at `new_start`. Both ends move by the same delta; a missing end date
/// stays missing.
///
/// Without a stored start there is no span to preserve: the end date is kept
/// unless it would fall before `new_start`, in which case it becomes `new_start`.
pub fn shifted_dates(
    project: &Project,
    new_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    if project.start_date.is_none() {
        return (Some(new_start), project.end_date.map(|end| end.max(new_start)));
    }

    let (start, _) = displayed_span(project, now);
    let delta = new_start - start;
    (Some(new_start), project.end_date.map(|end| end + delta))
}
