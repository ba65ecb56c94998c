use sea_orm::prelude::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::models::payment_methods::{self, CreatePaymentMethod};

/// Clear the default flag on every payment method of `owner_id`.
async fn clear_default<C: ConnectionTrait>(conn: &C, owner_id: Uuid) -> Result<(), DbErr> {
    payment_methods::Entity::update_many()
        .col_expr(payment_methods::Column::IsDefault, Expr::value(false))
        .filter(payment_methods::Column::UserId.eq(owner_id))
        .filter(payment_methods::Column::IsDefault.eq(true))
        .exec(conn)
        .await?;
    Ok(())
}

/// Insert a payment method. When it is the default, the previous default is
/// cleared in the same transaction.
pub async fn insert_payment_method(
    db: &DatabaseConnection,
    owner_id: Uuid,
    input: CreatePaymentMethod,
) -> Result<payment_methods::Model, DbErr> {
    let txn = db.begin().await?;

    if input.is_default {
        clear_default(&txn, owner_id).await?;
    }

    let method = payment_methods::ActiveModel {
        id: Set(Uuid::new_v4()),
        method_type: Set(input.method_type),
        last4: Set(input.last4),
        expiry_month: Set(input.expiry_month),
        expiry_year: Set(input.expiry_year),
        is_default: Set(input.is_default),
        user_id: Set(owner_id),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(method)
}

/// Fetch an owner's payment methods, default first.
pub async fn get_payment_methods_by_owner(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Vec<payment_methods::Model>, DbErr> {
    payment_methods::Entity::find()
        .filter(payment_methods::Column::UserId.eq(owner_id))
        .order_by_desc(payment_methods::Column::IsDefault)
        .order_by_desc(payment_methods::Column::CreatedAt)
        .all(db)
        .await
}

/// Make one payment method the owner's default.
pub async fn set_default_payment_method(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<payment_methods::Model, DbErr> {
    let txn = db.begin().await?;

    let method = payment_methods::Entity::find_by_id(id)
        .filter(payment_methods::Column::UserId.eq(owner_id))
        .one(&txn)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Payment method {id} not found")))?;

    clear_default(&txn, owner_id).await?;

    let mut active: payment_methods::ActiveModel = method.into();
    active.is_default = Set(true);
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

pub async fn delete_payment_method(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<DeleteResult, DbErr> {
    payment_methods::Entity::delete_many()
        .filter(payment_methods::Column::Id.eq(id))
        .filter(payment_methods::Column::UserId.eq(owner_id))
        .exec(db)
        .await
}
