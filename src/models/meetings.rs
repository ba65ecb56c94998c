use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// SeaORM entity for the `meetings` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meetings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub date: DateTimeUtc,
    pub client_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ClientId",
        to = "super::users::Column::Id"
    )]
    Client,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Owner,
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMeeting {
    #[serde(default)]
    pub title: String,
    pub date: DateTimeUtc,
    pub client_id: Uuid,
}

impl CreateMeeting {
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(ValidationError::Missing("title"));
        }
        Ok(self)
    }
}

/// Upcoming meeting joined with the client's display name.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingSummary {
    pub id: Uuid,
    pub title: String,
    pub date: DateTimeUtc,
    pub client_name: Option<String>,
}
