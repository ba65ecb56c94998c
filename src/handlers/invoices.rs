use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::cache::{RedisCache, keys};
use crate::db::invoices as invoice_db;
use crate::db::projects as project_db;
use crate::error::ApiError;
use crate::models::invoices::{CreateInvoice, InvoiceResponse, UpdateInvoice};

/// Client summaries show the latest invoice amount, so any invoice write
/// makes them stale.
async fn invalidate_clients(cache: &RedisCache) {
    if let Err(e) = cache.delete_pattern(keys::CLIENTS_PATTERN).await {
        tracing::warn!("Failed to invalidate clients cache: {}", e);
    }
}

/// GET /api/invoices — the caller's invoices, newest first.
pub async fn get_invoices(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let invoices = invoice_db::get_invoices_by_owner(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(invoices))
}

/// POST /api/invoices — bill one of the caller's projects.
pub async fn create_invoice(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    body: web::Json<CreateInvoice>,
) -> Result<HttpResponse, ApiError> {
    let owner_id = user.0.id;
    let input = body.into_inner().validate()?;

    let project = project_db::get_project_for_owner(db.get_ref(), input.project_id, owner_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Project {} not found", input.project_id)))?;

    let invoice = invoice_db::insert_invoice(db.get_ref(), owner_id, input).await?;
    tracing::info!(%owner_id, invoice_number = %invoice.invoice_number, "Invoice created");
    invalidate_clients(&cache).await;

    Ok(HttpResponse::Created().json(InvoiceResponse {
        invoice,
        project_title: Some(project.title),
    }))
}

/// PUT /api/invoices/{id}
pub async fn update_invoice(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateInvoice>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let input = body.into_inner().validate()?;
    let invoice = invoice_db::update_invoice(db.get_ref(), id, user.0.id, input).await?;
    invalidate_clients(&cache).await;

    Ok(HttpResponse::Ok().json(invoice))
}

/// DELETE /api/invoices/{id}
pub async fn delete_invoice(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    cache: web::Data<Arc<RedisCache>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = invoice_db::delete_invoice(db.get_ref(), id, user.0.id).await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Invoice {id} not found")));
    }
    invalidate_clients(&cache).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Invoice {id} deleted"),
    })))
}
