use axum::{
    body::Body as AxumBody, extract::State, http::Request, middleware::Next, response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::db::services as db_services;
use crate::web::models::AuthenticatedUser;
use crate::web::{AppState, error::AppError};

/// Gate for administrative routes. Runs after [`super::auth::auth`] and
/// re-checks the admin flag against the database, so a revoked flag takes
/// effect on the next request rather than at token expiry.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = req
        .extensions()
        .get::<AuthenticatedUser>()
        .cloned()
        .ok_or_else(|| AppError::Forbidden("Access denied".to_string()))?;

    let employee = db_services::find_by_id(&state.db_pool, auth_user.id).await?;

    match employee {
        Some(employee) if employee.is_admin => Ok(next.run(req).await),
        _ => {
            warn!(employee = %auth_user.employee_code, "non-admin session rejected on admin route");
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }
}
