use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::StaffRole;
use crate::entities::price_override_request::OverrideStatus;
use crate::errors::ServiceError;
use crate::services::pricing_control::{OverrideRequestInput, PricingControlInput};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPricingControlRequest {
    #[serde(flatten)]
    pub control: PricingControlInput,
    pub actor_id: Uuid,
    pub actor_role: StaffRole,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ValidatePriceQuery {
    pub product_id: Uuid,
    pub price: Decimal,
    pub branch_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ValidateDiscountQuery {
    pub product_id: Uuid,
    pub discount_percentage: Option<Decimal>,
    pub discount_amount: Option<Decimal>,
    pub branch_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DecideOverrideRequest {
    /// PIN verification happens at the session gateway; this carries the
    /// already-authenticated approver identity and role.
    pub approver_id: Uuid,
    pub approver_role: StaffRole,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct OverrideFilters {
    pub status: Option<OverrideStatus>,
    pub branch_id: Option<Uuid>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Create the pricing router
pub fn pricing_router() -> Router<AppState> {
    Router::new()
        .route("/controls", post(set_pricing_control))
        .route("/validate-price", get(validate_price))
        .route("/validate-discount", get(validate_discount))
        .route("/overrides", get(list_overrides).post(create_override))
        .route("/overrides/expire-stale", post(expire_stale))
        .route("/overrides/:id", get(get_override))
        .route("/overrides/:id/quick-approve", post(quick_approve))
        .route("/overrides/:id/reject", post(reject_override))
}

/// Upsert the pricing control for a product (optionally per branch)
#[utoipa::path(
    post,
    path = "/api/v1/pricing/controls",
    request_body = SetPricingControlRequest,
    responses(
        (status = 200, description = "Control upserted"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn set_pricing_control(
    State(state): State<AppState>,
    Json(payload): Json<SetPricingControlRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let control = state
        .services
        .pricing_control
        .set_pricing_control(payload.control, payload.actor_id, payload.actor_role)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": control }))))
}

/// Validate a proposed selling price against the applicable control
#[utoipa::path(
    get,
    path = "/api/v1/pricing/validate-price",
    params(ValidatePriceQuery),
    responses((status = 200, description = "Validation result returned")),
    tag = "pricing"
)]
pub async fn validate_price(
    State(state): State<AppState>,
    Query(query): Query<ValidatePriceQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let validation = state
        .services
        .pricing_control
        .validate_price(query.product_id, query.price, query.branch_id)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": validation }))))
}

/// Validate a proposed discount against the applicable control's caps
#[utoipa::path(
    get,
    path = "/api/v1/pricing/validate-discount",
    params(ValidateDiscountQuery),
    responses((status = 200, description = "Validation result returned")),
    tag = "pricing"
)]
pub async fn validate_discount(
    State(state): State<AppState>,
    Query(query): Query<ValidateDiscountQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let validation = state
        .services
        .pricing_control
        .validate_discount(
            query.product_id,
            query.discount_percentage,
            query.discount_amount,
            query.branch_id,
        )
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": validation }))))
}

/// Open a price override request
#[utoipa::path(
    post,
    path = "/api/v1/pricing/overrides",
    request_body = OverrideRequestInput,
    responses(
        (status = 201, description = "Override request created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn create_override(
    State(state): State<AppState>,
    Json(payload): Json<OverrideRequestInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let request = state
        .services
        .pricing_control
        .create_override_request(payload)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": request }))))
}

/// List override requests
#[utoipa::path(
    get,
    path = "/api/v1/pricing/overrides",
    params(OverrideFilters),
    responses((status = 200, description = "Override request list returned")),
    tag = "pricing"
)]
pub async fn list_overrides(
    State(state): State<AppState>,
    Query(filters): Query<OverrideFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = filters.page.unwrap_or(1);
    let limit = filters.limit.unwrap_or(50);
    let (requests, total) = state
        .services
        .pricing_control
        .list_override_requests(filters.status, filters.branch_id, page, limit)
        .await?;

    let response = json!({
        "success": true,
        "data": {
            "requests": requests,
            "total": total,
            "page": page,
            "per_page": limit,
        }
    });
    Ok((StatusCode::OK, Json(response)))
}

/// Get one override request (lazily expiring it when overdue)
#[utoipa::path(
    get,
    path = "/api/v1/pricing/overrides/{id}",
    params(("id" = Uuid, Path, description = "Override request ID")),
    responses(
        (status = 200, description = "Override request returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn get_override(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let request = state.services.pricing_control.get_override_request(id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": request }))))
}

/// Quick-approve an override (elevated roles only)
#[utoipa::path(
    post,
    path = "/api/v1/pricing/overrides/{id}/quick-approve",
    params(("id" = Uuid, Path, description = "Override request ID")),
    request_body = DecideOverrideRequest,
    responses(
        (status = 200, description = "Override approved"),
        (status = 400, description = "Request not pending", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn quick_approve(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecideOverrideRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let decision = state
        .services
        .pricing_control
        .quick_approve_with_pin(id, payload.approver_id, payload.approver_role)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": decision.success, "data": decision }))))
}

/// Reject an override request
#[utoipa::path(
    post,
    path = "/api/v1/pricing/overrides/{id}/reject",
    params(("id" = Uuid, Path, description = "Override request ID")),
    request_body = DecideOverrideRequest,
    responses(
        (status = 200, description = "Override rejected"),
        (status = 400, description = "Request not pending", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    tag = "pricing"
)]
pub async fn reject_override(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecideOverrideRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let decision = state
        .services
        .pricing_control
        .reject_override(id, payload.approver_id, payload.approver_role)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": decision.success, "data": decision }))))
}

/// Sweep pending override requests past their deadline
#[utoipa::path(
    post,
    path = "/api/v1/pricing/overrides/expire-stale",
    responses((status = 200, description = "Expired count returned")),
    tag = "pricing"
)]
pub async fn expire_stale(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let expired = state.services.pricing_control.expire_stale_requests().await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": { "expired": expired } }))))
}
