use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct StockAgingQuery {
    pub branch_id: Uuid,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ExpiringSoonQuery {
    pub branch_id: Uuid,
    /// Defaults to the configured expiring-soon window.
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct BatchProfitQuery {
    pub branch_id: Uuid,
    pub product_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct DiscountImpactQuery {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Create the reports router
pub fn reports_router() -> Router<AppState> {
    Router::new()
        .route("/stock-aging", get(stock_aging))
        .route("/expiring-soon", get(expiring_soon))
        .route("/batch-profit", get(batch_profit))
        .route("/discount-impact", get(discount_impact))
}

/// Active stock grouped into age buckets
#[utoipa::path(
    get,
    path = "/api/v1/reports/stock-aging",
    params(StockAgingQuery),
    responses((status = 200, description = "Aging buckets returned")),
    tag = "reports"
)]
pub async fn stock_aging(
    State(state): State<AppState>,
    Query(query): Query<StockAgingQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let buckets = state
        .services
        .reports
        .stock_aging(query.branch_id, query.product_id)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": buckets }))))
}

/// Batches expiring within a window
#[utoipa::path(
    get,
    path = "/api/v1/reports/expiring-soon",
    params(ExpiringSoonQuery),
    responses((status = 200, description = "Expiring batches returned")),
    tag = "reports"
)]
pub async fn expiring_soon(
    State(state): State<AppState>,
    Query(query): Query<ExpiringSoonQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let days = query
        .days
        .unwrap_or(state.config.pricing.expiring_soon_days);
    let batches = state
        .services
        .reports
        .expiring_soon(query.branch_id, days)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": batches }))))
}

/// Realized profit per batch
#[utoipa::path(
    get,
    path = "/api/v1/reports/batch-profit",
    params(BatchProfitQuery),
    responses((status = 200, description = "Batch profit report returned")),
    tag = "reports"
)]
pub async fn batch_profit(
    State(state): State<AppState>,
    Query(query): Query<BatchProfitQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state
        .services
        .reports
        .batch_profit(query.branch_id, query.product_id)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": report }))))
}

/// Discount savings over a date range
#[utoipa::path(
    get,
    path = "/api/v1/reports/discount-impact",
    params(DiscountImpactQuery),
    responses((status = 200, description = "Discount impact report returned")),
    tag = "reports"
)]
pub async fn discount_impact(
    State(state): State<AppState>,
    Query(query): Query<DiscountImpactQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let report = state
        .services
        .reports
        .discount_impact(query.from, query.to)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": report }))))
}
