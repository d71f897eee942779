use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use std::sync::Arc;

use crate::db::services as db_services;
use crate::services::auth_service;
use crate::web::models::{
    EmployeeSummary, ForgotPasswordRequest, LoginRequest, SignupRequest, UpdatePasswordRequest,
};
use crate::web::{AppState, error::AppError};

// --- Route Handlers ---

async fn signup_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    auth_service::register_employee(&app_state.db_pool, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "User successfully registered" })),
    ))
}

async fn login_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let login_response =
        auth_service::login(&app_state.db_pool, payload, &app_state.config.jwt_secret).await?;

    let auth_cookie = Cookie::build(("token", login_response.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(true)
        .build();

    let mut response = Json(login_response).into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        auth_cookie.to_string().parse().unwrap(),
    );

    Ok(response)
}

async fn forgot_password_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let employee = auth_service::verify_recovery_identity(
        &app_state.db_pool,
        &payload.employee_code,
        payload.dob,
    )
    .await?;

    Ok(Json(serde_json::json!({
        "message": "User verification successful",
        "employeeID": employee.employee_code,
    })))
}

async fn update_password_handler(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    auth_service::update_password(
        &app_state.db_pool,
        &payload.employee_code,
        &payload.new_password,
    )
    .await?;

    Ok(Json(
        serde_json::json!({ "message": "Password updated successfully" }),
    ))
}

async fn fetch_users_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<EmployeeSummary>>, AppError> {
    let employees = db_services::list_all(&app_state.db_pool).await?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}

// --- Routers ---

pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(signup_handler))
        .route("/login", post(login_handler))
        .route("/forgot_password", post(forgot_password_handler))
        .route("/update_password", post(update_password_handler))
}

pub fn protected_router() -> Router<Arc<AppState>> {
    Router::new().route("/fetch_users", get(fetch_users_handler))
}
