use sea_orm::*;
use uuid::Uuid;

use crate::models::calendar_events::{self, CalendarEventInput};

/// Insert a calendar event owned by `owner_id`.
pub async fn insert_event(
    db: &DatabaseConnection,
    owner_id: Uuid,
    input: CalendarEventInput,
) -> Result<calendar_events::Model, DbErr> {
    let new_event = calendar_events::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        description: Set(input.description),
        start: Set(input.start),
        end: Set(input.end),
        all_day: Set(input.all_day),
        color: Set(input.color),
        user_id: Set(owner_id),
        created_at: Set(chrono::Utc::now()),
    };

    new_event.insert(db).await
}

/// Fetch all events of an owner, earliest first.
pub async fn get_events_by_owner(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Vec<calendar_events::Model>, DbErr> {
    calendar_events::Entity::find()
        .filter(calendar_events::Column::UserId.eq(owner_id))
        .order_by_asc(calendar_events::Column::Start)
        .all(db)
        .await
}

pub async fn get_event_for_owner(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<calendar_events::Model>, DbErr> {
    calendar_events::Entity::find_by_id(id)
        .filter(calendar_events::Column::UserId.eq(owner_id))
        .one(db)
        .await
}

/// Replace every editable field of an event.
pub async fn update_event(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
    input: CalendarEventInput,
) -> Result<calendar_events::Model, DbErr> {
    let event = get_event_for_owner(db, id, owner_id)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Calendar event {id} not found")))?;

    let mut active: calendar_events::ActiveModel = event.into();
    active.title = Set(input.title);
    active.description = Set(input.description);
    active.start = Set(input.start);
    active.end = Set(input.end);
    active.all_day = Set(input.all_day);
    active.color = Set(input.color);

    active.update(db).await
}

pub async fn delete_event(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<DeleteResult, DbErr> {
    calendar_events::Entity::delete_many()
        .filter(calendar_events::Column::Id.eq(id))
        .filter(calendar_events::Column::UserId.eq(owner_id))
        .exec(db)
        .await
}
