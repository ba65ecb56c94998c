use std::collections::HashMap;

use sea_orm::prelude::DateTimeUtc;
use sea_orm::*;
use uuid::Uuid;

use crate::models::meetings::{self, CreateMeeting, MeetingSummary};
use crate::models::users;

pub async fn insert_meeting(
    db: &DatabaseConnection,
    owner_id: Uuid,
    input: CreateMeeting,
) -> Result<meetings::Model, DbErr> {
    let new_meeting = meetings::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(input.title),
        date: Set(input.date),
        client_id: Set(input.client_id),
        user_id: Set(owner_id),
        created_at: Set(chrono::Utc::now()),
    };

    new_meeting.insert(db).await
}

/// Fetch the owner's meetings that have not started yet, soonest first, with
/// the client's name.
pub async fn get_upcoming_meetings(
    db: &DatabaseConnection,
    owner_id: Uuid,
    now: DateTimeUtc,
    limit: u64,
) -> Result<Vec<MeetingSummary>, DbErr> {
    let meetings = meetings::Entity::find()
        .filter(meetings::Column::UserId.eq(owner_id))
        .filter(meetings::Column::Date.gte(now))
        .order_by_asc(meetings::Column::Date)
        .limit(limit)
        .all(db)
        .await?;

    let client_ids: Vec<Uuid> = meetings.iter().map(|m| m.client_id).collect();
    let names: HashMap<Uuid, Option<String>> = if client_ids.is_empty() {
        HashMap::new()
    } else {
        users::Entity::find()
            .filter(users::Column::Id.is_in(client_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.id, u.name))
            .collect()
    };

    Ok(meetings
        .into_iter()
        .map(|m| MeetingSummary {
            client_name: names.get(&m.client_id).cloned().flatten(),
            id: m.id,
            title: m.title,
            date: m.date,
        })
        .collect())
}
