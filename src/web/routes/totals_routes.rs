use axum::{
    Json, Router,
    extract::{Extension, Query, State},
    routing::get,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::services as db_services;
use crate::services::totals_service::{self, AggregateTotals, EmployeeTotals, InvalidPeriod, Period};
use crate::web::models::AuthenticatedUser;
use crate::web::{AppState, error::AppError};

// --- Request/Response Structs ---

/// The caller's own totals for the three standing periods.
#[derive(Debug, Serialize)]
pub struct TotalsOverview {
    pub today: AggregateTotals,
    pub week: AggregateTotals,
    pub month: AggregateTotals,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserTotalsResponse {
    #[serde(rename = "userTotals")]
    pub user_totals: Vec<EmployeeTotals>,
}

// --- Route Handlers ---

async fn totals_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<TotalsOverview>, AppError> {
    let records = db_services::records_for_employee(&app_state.db_pool, auth_user.id).await?;
    let now = Utc::now();

    Ok(Json(TotalsOverview {
        today: totals_service::totals_for_period(&records, Period::Daily, now),
        week: totals_service::totals_for_period(&records, Period::Weekly, now),
        month: totals_service::totals_for_period(&records, Period::Monthly, now),
    }))
}

/// Cross-employee rollup for one period. Also mounted under `/api/admin`;
/// both views share this handler so the boundary computation cannot drift
/// between them.
pub(crate) async fn user_totals_handler(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<UserTotalsResponse>, AppError> {
    let period: Period = query
        .period
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|e: InvalidPeriod| AppError::InvalidInput(e.to_string()))?;

    let employees = db_services::all_with_records(&app_state.db_pool).await?;
    let (start, end) = totals_service::period_bounds(period, Utc::now());

    Ok(Json(UserTotalsResponse {
        user_totals: totals_service::rollup(&employees, start, end),
    }))
}

// --- Router ---

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/totals", get(totals_handler))
        .route("/user_totals", get(user_totals_handler))
}
