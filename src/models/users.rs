use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// The `Roles` enum maps to a Postgres TEXT column stored as uppercase strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Roles {
    #[sea_orm(string_value = "USER")]
    User,
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "CLIENT")]
    Client,
}

/// SeaORM entity for the `users` table.
///
/// Account holders and the clients they manage share this table; clients are
/// rows with `role = CLIENT` and never sign in.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub image: Option<String>,
    pub role: Roles,
    pub auth_provider: String,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::projects::Entity")]
    Projects,
    #[sea_orm(has_many = "super::invoices::Entity")]
    Invoices,
    #[sea_orm(has_many = "super::payment_methods::Entity")]
    PaymentMethods,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl Related<super::payment_methods::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentMethods.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used internally by the auth middleware to create a user from JWT claims.
#[derive(Debug, Clone)]
pub struct CreateUserFromAuth {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub auth_provider: String,
    pub role: Roles,
}

/// Used by `PUT /api/user/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
}

/// Request body for `POST /api/clients`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    #[serde(default)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

impl CreateClient {
    /// Check required fields and fill in `name` from first/last name when absent.
    pub fn validate(mut self) -> Result<Self, ValidationError> {
        self.email = self.email.trim().to_string();
        if self.email.is_empty() {
            return Err(ValidationError::Missing("email"));
        }
        if !self.email.contains('@') {
            return Err(ValidationError::Malformed(format!(
                "{:?} is not an email address",
                self.email
            )));
        }

        if self.name.is_none() {
            let joined = [self.first_name.as_deref(), self.last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            if !joined.is_empty() {
                self.name = Some(joined);
            }
        }

        Ok(self)
    }
}

/// Request body for `PUT /api/clients/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClient {
    pub email: Option<String>,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

/// A safe user representation for API responses (never leaks internal fields).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub country: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub role: Roles,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            name: m.name,
            first_name: m.first_name,
            last_name: m.last_name,
            phone: m.phone,
            country: m.country,
            location: m.location,
            image: m.image,
            role: m.role,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Row of the clients list: a client and the amount of their latest invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
    pub recent_amount: Option<f64>,
}

impl ClientSummary {
    /// Pair each client with the first amount listed for it.
    ///
    /// `amounts` holds `(client id, invoice amount)` newest first, so the
    /// first hit per client is its latest invoice.
    pub fn collect(clients: Vec<Model>, amounts: &[(Uuid, f64)]) -> Vec<Self> {
        let mut latest = std::collections::HashMap::new();
        for (client_id, amount) in amounts {
            latest.entry(*client_id).or_insert(*amount);
        }

        clients
            .into_iter()
            .map(|client| ClientSummary {
                recent_amount: latest.get(&client.id).copied(),
                id: client.id,
                name: client.name,
                email: client.email,
            })
            .collect()
    }
}
