use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "OVERDUE")]
    Overdue,
}

/// SeaORM entity for the `invoices` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub invoice_number: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub status: InvoiceStatus,
    pub due_date: DateTimeUtc,
    pub project_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Project,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Project.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Build an invoice number: `INV-` + the last six digits of the millisecond
/// timestamp + a three digit nonce.
pub fn invoice_number(now: DateTimeUtc, nonce: u16) -> String {
    let millis = now.timestamp_millis().rem_euclid(1_000_000);
    format!("INV-{millis:06}-{:03}", nonce % 1000)
}

// ── DTOs ──

/// Request body for `POST /api/invoices`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub project_id: Uuid,
    pub amount: f64,
    pub status: Option<InvoiceStatus>,
    pub due_date: DateTimeUtc,
}

impl CreateInvoice {
    pub fn validate(self) -> Result<Self, ValidationError> {
        check_amount(self.amount)?;
        Ok(self)
    }
}

/// Request body for `PUT /api/invoices/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoice {
    pub amount: f64,
    pub status: Option<InvoiceStatus>,
    pub due_date: DateTimeUtc,
}

impl UpdateInvoice {
    pub fn validate(self) -> Result<Self, ValidationError> {
        check_amount(self.amount)?;
        Ok(self)
    }
}

/// An invoice with the title of the project it bills.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceResponse {
    #[serde(flatten)]
    pub invoice: Model,
    pub project_title: Option<String>,
}

fn check_amount(amount: f64) -> Result<(), ValidationError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositiveAmount)
    }
}
