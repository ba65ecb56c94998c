use sea_orm::*;
use uuid::Uuid;

use crate::models::invoices::{self, CreateInvoice, InvoiceResponse, InvoiceStatus, UpdateInvoice};
use crate::models::projects;

/// Three digit nonce for invoice numbers.
fn invoice_nonce() -> u16 {
    (Uuid::new_v4().as_u128() % 1000) as u16
}

/// Insert an invoice for a project. The caller has already checked that the
/// project belongs to `owner_id`.
pub async fn insert_invoice(
    db: &DatabaseConnection,
    owner_id: Uuid,
    input: CreateInvoice,
) -> Result<invoices::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_invoice = invoices::ActiveModel {
        id: Set(Uuid::new_v4()),
        invoice_number: Set(invoices::invoice_number(now, invoice_nonce())),
        amount: Set(input.amount),
        status: Set(input.status.unwrap_or(InvoiceStatus::Pending)),
        due_date: Set(input.due_date),
        project_id: Set(input.project_id),
        user_id: Set(owner_id),
        created_at: Set(now),
        updated_at: Set(None),
    };

    new_invoice.insert(db).await
}

/// Fetch an owner's invoices, newest first, with the billed project's title.
pub async fn get_invoices_by_owner(
    db: &DatabaseConnection,
    owner_id: Uuid,
) -> Result<Vec<InvoiceResponse>, DbErr> {
    let rows = invoices::Entity::find()
        .filter(invoices::Column::UserId.eq(owner_id))
        .order_by_desc(invoices::Column::CreatedAt)
        .find_also_related(projects::Entity)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(invoice, project)| InvoiceResponse {
            invoice,
            project_title: project.map(|p| p.title),
        })
        .collect())
}

pub async fn get_invoice_for_owner(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<Option<invoices::Model>, DbErr> {
    invoices::Entity::find_by_id(id)
        .filter(invoices::Column::UserId.eq(owner_id))
        .one(db)
        .await
}

pub async fn update_invoice(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
    input: UpdateInvoice,
) -> Result<invoices::Model, DbErr> {
    let invoice = get_invoice_for_owner(db, id, owner_id)
        .await?
        .ok_or(DbErr::RecordNotFound(format!("Invoice {id} not found")))?;

    let mut active: invoices::ActiveModel = invoice.into();
    active.amount = Set(input.amount);
    if let Some(status) = input.status {
        active.status = Set(status);
    }
    active.due_date = Set(input.due_date);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

pub async fn delete_invoice(
    db: &DatabaseConnection,
    id: Uuid,
    owner_id: Uuid,
) -> Result<DeleteResult, DbErr> {
    invoices::Entity::delete_many()
        .filter(invoices::Column::Id.eq(id))
        .filter(invoices::Column::UserId.eq(owner_id))
        .exec(db)
        .await
}
