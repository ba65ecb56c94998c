use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// SeaORM entity for the `calendar_events` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "calendar_events")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub start: DateTimeUtc,
    pub end: Option<DateTimeUtc>,
    pub all_day: bool,
    pub color: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for creating or replacing a calendar event.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarEventInput {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub start: DateTimeUtc,
    pub end: Option<DateTimeUtc>,
    #[serde(default)]
    pub all_day: bool,
    pub color: Option<String>,
}

impl CalendarEventInput {
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(ValidationError::Missing("title"));
        }
        if matches!(self.end, Some(end) if end < self.start) {
            return Err(ValidationError::EndBeforeStart);
        }
        Ok(self)
    }
}
