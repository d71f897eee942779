use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::entities::employee;
use crate::db::services::{self as db_services, EmployeeChanges};
use crate::services::auth_service;
use crate::web::routes::totals_routes::user_totals_handler;
use crate::web::{AppState, error::AppError};

// --- Request/Response Structs ---

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
    #[serde(rename = "employeeID")]
    pub employee_code: String,
    pub password: String,
    pub dob: NaiveDate,
    #[serde(rename = "isAdmin", default)]
    pub is_admin: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    #[serde(rename = "employeeID")]
    pub employee_code: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "isAdmin")]
    pub is_admin: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct AdminEmployeeResponse {
    pub id: i32,
    pub name: String,
    #[serde(rename = "employeeID")]
    pub employee_code: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl From<employee::Model> for AdminEmployeeResponse {
    fn from(model: employee::Model) -> Self {
        AdminEmployeeResponse {
            id: model.id,
            name: model.name,
            employee_code: model.employee_code,
            is_admin: model.is_admin,
        }
    }
}

// --- Route Handlers ---

async fn list_users_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<AdminEmployeeResponse>>, AppError> {
    let employees = db_services::list_all(&app_state.db_pool).await?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

async fn create_user_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    if payload.name.trim().is_empty()
        || payload.employee_code.trim().is_empty()
        || payload.password.is_empty()
    {
        return Err(AppError::InvalidInput(
            "Name, employee ID, and password are required fields.".to_string(),
        ));
    }

    let employee = auth_service::create_employee(
        &app_state.db_pool,
        &payload.name,
        &payload.employee_code,
        &payload.password,
        payload.is_admin,
        payload.dob,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User created successfully",
            "user": AdminEmployeeResponse::from(employee),
        })),
    ))
}

async fn update_user_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEmployeeRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if matches!(&payload.name, Some(name) if name.trim().is_empty()) {
        return Err(AppError::InvalidInput("Name must not be empty.".to_string()));
    }
    if matches!(&payload.employee_code, Some(code) if code.trim().is_empty()) {
        return Err(AppError::InvalidInput(
            "Employee ID must not be empty.".to_string(),
        ));
    }

    let password_hash = match payload.password {
        Some(password) => {
            if password.len() < 8 {
                return Err(AppError::InvalidInput(
                    "Password must be at least 8 characters long.".to_string(),
                ));
            }
            let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)
                .map_err(|e| AppError::PasswordHashingError(e.to_string()))?;
            Some(hash)
        }
        None => None,
    };

    let updated = db_services::update_employee(
        &app_state.db_pool,
        id,
        EmployeeChanges {
            name: payload.name,
            employee_code: payload.employee_code,
            password_hash,
            is_admin: payload.is_admin,
        },
    )
    .await?
    .ok_or(AppError::UserNotFound)?;

    Ok(Json(serde_json::json!({
        "message": "User updated successfully",
        "user": AdminEmployeeResponse::from(updated),
    })))
}

async fn delete_user_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<serde_json::Value>, AppError> {
    let delete_result = db_services::delete_employee(&app_state.db_pool, id).await?;

    if delete_result.rows_affected == 0 {
        return Err(AppError::UserNotFound);
    }

    Ok(Json(
        serde_json::json!({ "message": "User deleted successfully" }),
    ))
}

// --- Router ---

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/user_totals", get(user_totals_handler))
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            axum::routing::put(update_user_handler).delete(delete_user_handler),
        )
}
