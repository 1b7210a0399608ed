use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::services::batch_pricing::{DeductionResult, NewBatch};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReceiveBatchRequest {
    pub product_id: Uuid,
    pub branch_id: Uuid,
    pub batch_number: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
    pub received_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub actor_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PlanAllocationRequest {
    pub product_id: Uuid,
    pub branch_id: Uuid,
    pub quantity: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DeductStockRequest {
    pub product_id: Uuid,
    pub branch_id: Uuid,
    pub quantity: Decimal,
    /// POS transaction reference the deduction belongs to.
    pub transaction_ref: String,
    pub actor_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct BatchFilters {
    pub product_id: Option<Uuid>,
    pub branch_id: Option<Uuid>,
    #[serde(default)]
    pub active_only: bool,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct PriceQuery {
    pub product_id: Uuid,
    pub branch_id: Uuid,
}

/// Create the inventory router
pub fn inventory_router() -> Router<AppState> {
    Router::new()
        .route("/batches", get(list_batches).post(receive_batch))
        .route("/batches/plan", post(plan_allocation))
        .route("/batches/deduct", post(deduct_stock))
        .route("/batches/price", get(get_prices))
        .route("/batches/:id", get(get_batch))
}

/// List inventory batches with optional filtering
#[utoipa::path(
    get,
    path = "/api/v1/inventory/batches",
    params(BatchFilters),
    responses(
        (status = 200, description = "Batch list returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn list_batches(
    State(state): State<AppState>,
    Query(filters): Query<BatchFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = filters.page.unwrap_or(1);
    let limit = filters.limit.unwrap_or(50);

    let (batches, total) = state
        .services
        .batch_pricing
        .list_batches(
            filters.product_id,
            filters.branch_id,
            filters.active_only,
            page,
            limit,
        )
        .await?;

    let response = json!({
        "success": true,
        "data": {
            "batches": batches,
            "total": total,
            "page": page,
            "per_page": limit,
        }
    });

    Ok((StatusCode::OK, Json(response)))
}

/// Receive a new inventory batch (goods receipt)
#[utoipa::path(
    post,
    path = "/api/v1/inventory/batches",
    request_body = ReceiveBatchRequest,
    responses(
        (status = 201, description = "Batch received"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn receive_batch(
    State(state): State<AppState>,
    Json(payload): Json<ReceiveBatchRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let batch = state
        .services
        .batch_pricing
        .receive_batch(
            NewBatch {
                product_id: payload.product_id,
                branch_id: payload.branch_id,
                batch_number: payload.batch_number,
                quantity: payload.quantity,
                purchase_price: payload.purchase_price,
                selling_price: payload.selling_price,
                received_date: payload.received_date,
                expiry_date: payload.expiry_date,
            },
            payload.actor_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": batch }))))
}

/// Get a single batch
#[utoipa::path(
    get,
    path = "/api/v1/inventory/batches/{id}",
    params(("id" = Uuid, Path, description = "Batch ID")),
    responses(
        (status = 200, description = "Batch returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_batch(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let batch = state.services.batch_pricing.get_batch(id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": batch }))))
}

/// Plan an allocation without mutating stock
#[utoipa::path(
    post,
    path = "/api/v1/inventory/batches/plan",
    request_body = PlanAllocationRequest,
    responses(
        (status = 200, description = "Allocation plan returned"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn plan_allocation(
    State(state): State<AppState>,
    Json(payload): Json<PlanAllocationRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let plan = state
        .services
        .batch_pricing
        .plan_allocation(payload.product_id, payload.branch_id, payload.quantity)
        .await?;

    let response = json!({
        "success": plan.is_satisfied(),
        "data": plan,
    });
    Ok((StatusCode::OK, Json(response)))
}

/// Deduct stock for a sale
#[utoipa::path(
    post,
    path = "/api/v1/inventory/batches/deduct",
    request_body = DeductStockRequest,
    responses(
        (status = 200, description = "Deduction outcome returned (full deduction or structured shortage)"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent modification", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn deduct_stock(
    State(state): State<AppState>,
    Json(payload): Json<DeductStockRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state
        .services
        .batch_pricing
        .deduct_stock(
            payload.product_id,
            payload.branch_id,
            payload.quantity,
            &payload.transaction_ref,
            payload.actor_id,
        )
        .await?;

    let response = match outcome {
        DeductionResult::Deducted(deduction) => json!({
            "success": true,
            "data": {
                "deductions": deduction.deductions,
                "total_quantity": deduction.total_quantity,
                "total_cost": deduction.total_cost,
                "transaction_ref": deduction.transaction_ref,
            }
        }),
        DeductionResult::Shortage(shortage) => {
            let message = shortage.message.clone();
            json!({
                "success": false,
                "shortage": shortage,
                "message": message,
            })
        }
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Current selling price and weighted averages for a product at a branch
#[utoipa::path(
    get,
    path = "/api/v1/inventory/batches/price",
    params(PriceQuery),
    responses(
        (status = 200, description = "Prices returned"),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn get_prices(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let svc = &state.services.batch_pricing;
    let selling_price = svc
        .get_selling_price(query.product_id, query.branch_id)
        .await?;
    let weighted_cost = svc
        .get_weighted_average_cost(query.product_id, query.branch_id)
        .await?;
    let weighted_price = svc
        .get_weighted_average_selling_price(query.product_id, query.branch_id)
        .await?;

    let response = json!({
        "success": true,
        "data": {
            "strategy": svc.strategy(),
            "selling_price": selling_price,
            "weighted_average_cost": weighted_cost,
            "weighted_average_selling_price": weighted_price,
        }
    });
    Ok((StatusCode::OK, Json(response)))
}
