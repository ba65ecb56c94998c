use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::payment_methods as payment_db;
use crate::error::ApiError;
use crate::models::payment_methods::CreatePaymentMethod;

/// GET /api/payment-methods — default first.
pub async fn get_payment_methods(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let methods = payment_db::get_payment_methods_by_owner(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(methods))
}

/// POST /api/payment-methods
pub async fn create_payment_method(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreatePaymentMethod>,
) -> Result<HttpResponse, ApiError> {
    let input = body.into_inner().validate()?;
    let method = payment_db::insert_payment_method(db.get_ref(), user.0.id, input).await?;
    Ok(HttpResponse::Created().json(method))
}

/// PUT /api/payment-methods/{id}/default — make this method the default.
pub async fn set_default(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let method = payment_db::set_default_payment_method(db.get_ref(), id, user.0.id).await?;
    tracing::info!(user_id = %user.0.id, payment_method_id = %id, "Default payment method changed");

    Ok(HttpResponse::Ok().json(method))
}

/// DELETE /api/payment-methods/{id}
pub async fn delete_payment_method(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let result = payment_db::delete_payment_method(db.get_ref(), id, user.0.id).await?;

    if result.rows_affected == 0 {
        return Err(ApiError::NotFound(format!("Payment method {id} not found")));
    }
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Payment method {id} deleted"),
    })))
}
