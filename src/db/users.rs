use sea_orm::*;
use uuid::Uuid;

use crate::models::invoices;
use crate::models::projects;
use crate::models::users::{
    self, ClientSummary, CreateClient, CreateUserFromAuth, Roles, UpdateClient, UpdateProfile,
};

/// Create a new user from identity token claims (called by auth middleware).
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateUserFromAuth,
) -> Result<users::Model, DbErr> {
    // Try to find the user first (by identity provider subject).
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    // First request with this token subject.
    let (first_name, last_name) = split_name(input.name.as_deref());
    let new_user = users::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        name: Set(input.name),
        first_name: Set(first_name),
        last_name: Set(last_name),
        phone: Set(None),
        country: Set(None),
        location: Set(None),
        image: Set(input.image),
        role: Set(input.role),
        auth_provider: Set(input.auth_provider),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Update the profile fields a user edits on the profile page.
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateProfile,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();

    if let Some(first_name) = input.first_name {
        active.first_name = Set(Some(first_name));
    }
    if let Some(last_name) = input.last_name {
        active.last_name = Set(Some(last_name));
    }
    if let Some(phone) = input.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(country) = input.country {
        active.country = Set(Some(country));
    }
    if let Some(location) = input.location {
        active.location = Set(Some(location));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Whether any user already uses `email`.
pub async fn email_exists(db: &DatabaseConnection, email: &str) -> Result<bool, DbErr> {
    let count = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Insert a client record (a user with the `CLIENT` role).
pub async fn insert_client(
    db: &DatabaseConnection,
    input: CreateClient,
) -> Result<users::Model, DbErr> {
    let new_client = users::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(input.email),
        name: Set(input.name),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        phone: Set(input.phone),
        country: Set(input.country),
        location: Set(input.location),
        image: Set(input.image),
        role: Set(Roles::Client),
        auth_provider: Set("none".to_string()),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_client.insert(db).await
}

/// Fetch a single client by ID. Users with other roles are not returned.
pub async fn get_client_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id)
        .filter(users::Column::Role.eq(Roles::Client))
        .one(db)
        .await
}

/// List clients together with the amount of the latest invoice on their projects.
pub async fn get_client_summaries(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<ClientSummary>, DbErr> {
    let clients = users::Entity::find()
        .filter(users::Column::Role.eq(Roles::Client))
        .order_by_asc(users::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?;

    let client_ids: Vec<Uuid> = clients.iter().map(|c| c.id).collect();
    let amounts: Vec<(Uuid, f64)> = invoices::Entity::find()
        .find_also_related(projects::Entity)
        .filter(projects::Column::UserId.is_in(client_ids))
        .order_by_desc(invoices::Column::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(invoice, project)| project.map(|p| (p.user_id, invoice.amount)))
        .collect();

    Ok(ClientSummary::collect(clients, &amounts))
}

/// Update a client record.
pub async fn update_client(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateClient,
) -> Result<users::Model, DbErr> {
    let client = get_client_by_id(db, id)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Client {id} not found")))?;

    let mut active: users::ActiveModel = client.into();

    if let Some(email) = input.email {
        active.email = Set(email);
    }
    if let Some(name) = input.name {
        active.name = Set(Some(name));
    }
    if let Some(first_name) = input.first_name {
        active.first_name = Set(Some(first_name));
    }
    if let Some(last_name) = input.last_name {
        active.last_name = Set(Some(last_name));
    }
    if let Some(phone) = input.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(country) = input.country {
        active.country = Set(Some(country));
    }
    if let Some(location) = input.location {
        active.location = Set(Some(location));
    }
    if let Some(image) = input.image {
        active.image = Set(Some(image));
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a client by ID.
pub async fn delete_client(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    users::Entity::delete_many()
        .filter(users::Column::Id.eq(id))
        .filter(users::Column::Role.eq(Roles::Client))
        .exec(db)
        .await
}

/// Split a display name into first name and the rest.
fn split_name(name: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return (None, None);
    };
    match name.split_once(' ') {
        Some((first, rest)) => (Some(first.to_string()), Some(rest.trim().to_string())),
        None => (Some(name.to_string()), None),
    }
}
