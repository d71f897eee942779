use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use uuid::Uuid;

use crate::db::services::{self as db_services, NewRecord, RecordChanges};
use crate::web::models::{AddRecordRequest, AuthenticatedUser, RecordResponse, UpdateRecordRequest};
use crate::web::{AppState, error::AppError};

fn ensure_non_negative(field: &str, value: i32) -> Result<(), AppError> {
    if value < 0 {
        return Err(AppError::InvalidInput(format!(
            "{field} must be a non-negative number"
        )));
    }
    Ok(())
}

// --- Route Handlers ---

async fn add_record_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<AddRecordRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    if payload.file_name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "fileName is a required field".to_string(),
        ));
    }
    ensure_non_negative("companyIVR", payload.company_ivr)?;
    ensure_non_negative("directDial", payload.direct_dial)?;
    ensure_non_negative("rpcVM", payload.rpc_vm)?;
    ensure_non_negative("notVerified", payload.not_verified)?;

    db_services::insert_record(
        &app_state.db_pool,
        auth_user.id,
        NewRecord {
            date: payload.date,
            file_name: payload.file_name,
            company_ivr: payload.company_ivr,
            direct_dial: payload.direct_dial,
            rpc_vm: payload.rpc_vm,
            not_verified: payload.not_verified,
        },
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Record added successfully" })),
    ))
}

async fn get_records_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<RecordResponse>>, AppError> {
    let records = db_services::records_for_employee(&app_state.db_pool, auth_user.id).await?;
    Ok(Json(records.into_iter().map(Into::into).collect()))
}

async fn update_record_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(record_id): Path<Uuid>,
    Json(payload): Json<UpdateRecordRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    for (field, value) in [
        ("companyIVR", payload.company_ivr),
        ("directDial", payload.direct_dial),
        ("rpcVM", payload.rpc_vm),
        ("notVerified", payload.not_verified),
    ] {
        if let Some(value) = value {
            ensure_non_negative(field, value)?;
        }
    }

    let updated = db_services::update_record(
        &app_state.db_pool,
        auth_user.id,
        record_id,
        RecordChanges {
            date: payload.date,
            file_name: payload.file_name,
            company_ivr: payload.company_ivr,
            direct_dial: payload.direct_dial,
            rpc_vm: payload.rpc_vm,
            not_verified: payload.not_verified,
        },
    )
    .await?;

    if updated.is_none() {
        return Err(AppError::NotFound("Record not found".to_string()));
    }

    Ok(Json(
        serde_json::json!({ "message": "Record updated successfully" }),
    ))
}

async fn delete_record_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
    Path(record_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let delete_result =
        db_services::delete_record(&app_state.db_pool, auth_user.id, record_id).await?;

    if delete_result.rows_affected == 0 {
        return Err(AppError::NotFound("Record not found".to_string()));
    }

    Ok(Json(
        serde_json::json!({ "message": "Record deleted successfully" }),
    ))
}

// --- Router ---

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/add_record", post(add_record_handler))
        .route("/get_records", get(get_records_handler))
        .route("/update_record/{record_id}", put(update_record_handler))
        .route("/delete_record/{record_id}", delete(delete_record_handler))
}
