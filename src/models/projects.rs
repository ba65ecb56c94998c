use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Board column a project sits in. Declaration order is the column order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    #[sea_orm(string_value = "OPEN")]
    Open,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "REVIEW")]
    Review,
    #[sea_orm(string_value = "COMPLETED")]
    Completed,
    #[sea_orm(string_value = "ON_HOLD")]
    OnHold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectType {
    #[sea_orm(string_value = "FULL_TIME")]
    FullTime,
    #[sea_orm(string_value = "PART_TIME")]
    PartTime,
    #[sea_orm(string_value = "CONTRACT")]
    Contract,
    #[sea_orm(string_value = "INTERNSHIP")]
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectPriority {
    #[sea_orm(string_value = "LOW")]
    Low,
    #[sea_orm(string_value = "MEDIUM")]
    Medium,
    #[sea_orm(string_value = "HIGH")]
    High,
}

/// SeaORM entity for the `projects` table.
///
/// `position` only orders projects relative to each other inside one status
/// column; it carries no business meaning.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub company: String,
    pub location: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    #[sea_orm(column_type = "Double", nullable)]
    pub budget: Option<f64>,
    pub client: Option<String>,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Double")]
    pub position: f64,
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoices::Entity")]
    Invoices,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for `POST /api/projects`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub budget: Option<f64>,
    pub client: Option<String>,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
}

impl CreateProject {
    /// Apply defaults and check invariants, producing a row ready for the store.
    ///
    /// The returned project sits at position `0`; callers place it on the board
    /// before inserting.
    pub fn validate(self, now: DateTimeUtc) -> Result<NewProject, ValidationError> {
        let title = self.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::Missing("title"));
        }
        let company = self.company.trim().to_string();
        if company.is_empty() {
            return Err(ValidationError::Missing("company"));
        }
        check_budget(self.budget)?;

        let start_date = self.start_date.unwrap_or(now);
        check_dates(Some(start_date), self.end_date)?;

        Ok(NewProject {
            title,
            company,
            location: self.location.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            project_type: self.project_type.unwrap_or(ProjectType::FullTime),
            status: self.status.unwrap_or(ProjectStatus::Open),
            priority: self.priority.unwrap_or(ProjectPriority::Medium),
            budget: self.budget,
            client: self.client.filter(|c| !c.trim().is_empty()),
            start_date: Some(start_date),
            end_date: self.end_date,
            position: 0.0,
        })
    }
}

/// A validated project waiting to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub project_type: ProjectType,
    pub status: ProjectStatus,
    pub priority: ProjectPriority,
    pub budget: Option<f64>,
    pub client: Option<String>,
    pub start_date: Option<DateTimeUtc>,
    pub end_date: Option<DateTimeUtc>,
    pub position: f64,
}

/// Request body for `PUT /api/projects/{id}` (the edit form).
///
/// Nullable fields distinguish "leave unchanged" (absent) from "clear"
/// (explicit `null`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub budget: Option<Option<f64>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub client: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub start_date: Option<Option<DateTimeUtc>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub end_date: Option<Option<DateTimeUtc>>,
}

impl From<UpdateProject> for ProjectPatch {
    fn from(u: UpdateProject) -> Self {
        Self {
            title: u.title.map(|t| t.trim().to_string()),
            company: u.company.map(|c| c.trim().to_string()),
            description: u.description,
            location: u.location,
            project_type: u.project_type,
            status: u.status,
            priority: u.priority,
            budget: u.budget,
            client: u.client,
            start_date: u.start_date,
            end_date: u.end_date,
            position: None,
        }
    }
}

/// The set of fields one store update writes. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub project_type: Option<ProjectType>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<ProjectPriority>,
    pub budget: Option<Option<f64>>,
    pub client: Option<Option<String>>,
    pub start_date: Option<Option<DateTimeUtc>>,
    pub end_date: Option<Option<DateTimeUtc>>,
    pub position: Option<f64>,
}

impl ProjectPatch {
    /// The `{status, position}` tuple written by a board move.
    pub fn placement(status: ProjectStatus, position: f64) -> Self {
        Self {
            status: Some(status),
            position: Some(position),
            ..Self::default()
        }
    }

    /// The `{start_date, end_date}` tuple written by a calendar drag.
    pub fn schedule(start_date: Option<DateTimeUtc>, end_date: Option<DateTimeUtc>) -> Self {
        Self {
            start_date: Some(start_date),
            end_date: Some(end_date),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check that applying this patch to `current` leaves a valid project.
    pub fn validate_against(&self, current: &Model) -> Result<(), ValidationError> {
        if matches!(&self.title, Some(t) if t.is_empty()) {
            return Err(ValidationError::Missing("title"));
        }
        if matches!(&self.company, Some(c) if c.is_empty()) {
            return Err(ValidationError::Missing("company"));
        }
        if let Some(budget) = self.budget {
            check_budget(budget)?;
        }

        let start = self.start_date.unwrap_or(current.start_date);
        let end = self.end_date.unwrap_or(current.end_date);
        check_dates(start, end)
    }

    /// Write the patched fields into `project`.
    pub fn apply_to(&self, project: &mut Model) {
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(company) = &self.company {
            project.company = company.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(location) = &self.location {
            project.location = location.clone();
        }
        if let Some(project_type) = self.project_type {
            project.project_type = project_type;
        }
        if let Some(status) = self.status {
            project.status = status;
        }
        if let Some(priority) = self.priority {
            project.priority = priority;
        }
        if let Some(budget) = self.budget {
            project.budget = budget;
        }
        if let Some(client) = &self.client {
            project.client = client.clone();
        }
        if let Some(start_date) = self.start_date {
            project.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            project.end_date = end_date;
        }
        if let Some(position) = self.position {
            project.position = position;
        }
    }
}

/// Request body for `PUT /api/projects/{id}/move`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MoveProject {
    pub source: BoardSlot,
    pub destination: BoardSlot,
}

/// A column and a 0-based index inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSlot {
    pub status: ProjectStatus,
    pub index: usize,
}

/// Request body for `PUT /api/projects/{id}/schedule`: the new start of the
/// dragged calendar event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduleProject {
    pub start: DateTimeUtc,
}

/// Query parameters for `GET /api/projects/board`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardFilter {
    pub search: Option<String>,
    #[serde(rename = "type")]
    pub project_type: Option<ProjectType>,
    pub priority: Option<ProjectPriority>,
}

impl BoardFilter {
    /// Case-insensitive search over title, company and location plus exact
    /// type and priority matches.
    pub fn matches(&self, project: &Model) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                project.title.to_lowercase().contains(&term)
                    || project.company.to_lowercase().contains(&term)
                    || project.location.to_lowercase().contains(&term)
            }
        };

        matches_search
            && self.project_type.is_none_or(|t| t == project.project_type)
            && self.priority.is_none_or(|p| p == project.priority)
    }
}

fn check_budget(budget: Option<f64>) -> Result<(), ValidationError> {
    match budget {
        Some(b) if !b.is_finite() || b < 0.0 => Err(ValidationError::NegativeBudget),
        _ => Ok(()),
    }
}

fn check_dates(
    start: Option<DateTimeUtc>,
    end: Option<DateTimeUtc>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::EndBeforeStart),
        _ => Ok(()),
    }
}
