use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// SeaORM entity for the `payment_methods` table.
///
/// At most one row per user has `is_default = true`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment_methods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "type")]
    #[serde(rename = "type")]
    pub method_type: String,
    pub last4: String,
    pub expiry_month: i32,
    pub expiry_year: i32,
    pub is_default: bool,
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

/// Request body for `POST /api/payment-methods`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentMethod {
    #[serde(rename = "type", default)]
    pub method_type: String,
    #[serde(default)]
    pub last4: String,
    pub expiry_month: i32,
    pub expiry_year: i32,
    #[serde(default)]
    pub is_default: bool,
}

impl CreatePaymentMethod {
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.method_type = self.method_type.trim().to_string();
        if self.method_type.is_empty() {
            return Err(ValidationError::Missing("type"));
        }
        if self.last4.len() != 4 || !self.last4.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidLast4);
        }
        if !(1..=12).contains(&self.expiry_month) {
            return Err(ValidationError::InvalidExpiryMonth);
        }
        Ok(self)
    }
}
