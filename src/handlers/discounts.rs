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
use crate::entities::transaction_discount::AppliedTo;
use crate::errors::ServiceError;
use crate::services::discounts::{CartItemInput, DiscountSpec, NewDiscount};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveDiscountsRequest {
    pub cart_items: Vec<CartItemInput>,
    pub branch_id: Uuid,
    #[serde(default)]
    pub actor_is_cashier: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ApplyDiscountRequest {
    pub transaction_id: String,
    pub spec: DiscountSpec,
    pub original_amount: Decimal,
    pub applied_to: AppliedTo,
    pub product_id: Option<Uuid>,
    pub item_index: Option<i32>,
    pub applied_by: Uuid,
    pub actor_role: StaffRole,
    pub approver_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDiscountRequest {
    #[serde(flatten)]
    pub discount: NewDiscount,
    pub actor_id: Uuid,
    pub actor_role: StaffRole,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct DiscountFilters {
    pub branch_id: Option<Uuid>,
    #[serde(default)]
    pub include_inactive: bool,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize, ToSchema, utoipa::IntoParams)]
pub struct ActorQuery {
    pub actor_id: Uuid,
    pub actor_role: StaffRole,
}

/// Create the discounts router
pub fn discounts_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_discounts).post(create_discount))
        .route("/resolve", post(resolve_discounts))
        .route("/apply", post(apply_discount))
        .route("/:id", get(get_discount).delete(deactivate_discount))
}

/// Resolve applicable discounts for a cart
#[utoipa::path(
    post,
    path = "/api/v1/discounts/resolve",
    request_body = ResolveDiscountsRequest,
    responses(
        (status = 200, description = "Resolution returned: per-line winners or one bill discount, never both"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse)
    ),
    tag = "discounts"
)]
pub async fn resolve_discounts(
    State(state): State<AppState>,
    Json(payload): Json<ResolveDiscountsRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let resolution = state
        .services
        .discounts
        .resolve_discounts(&payload.cart_items, payload.branch_id, payload.actor_is_cashier)
        .await?;

    Ok((StatusCode::OK, Json(json!({ "success": true, "data": resolution }))))
}

/// Record a discount against a transaction
#[utoipa::path(
    post,
    path = "/api/v1/discounts/apply",
    request_body = ApplyDiscountRequest,
    responses(
        (status = 201, description = "Transaction discount recorded"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 401, description = "Approval required", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    tag = "discounts"
)]
pub async fn apply_discount(
    State(state): State<AppState>,
    Json(payload): Json<ApplyDiscountRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let applied = state
        .services
        .discounts
        .apply_discount(
            &payload.transaction_id,
            payload.spec,
            payload.original_amount,
            payload.applied_to,
            payload.product_id,
            payload.item_index,
            payload.applied_by,
            payload.actor_role,
            payload.approver_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": applied }))))
}

/// Create a catalog discount
#[utoipa::path(
    post,
    path = "/api/v1/discounts",
    request_body = CreateDiscountRequest,
    responses(
        (status = 201, description = "Discount created"),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse)
    ),
    tag = "discounts"
)]
pub async fn create_discount(
    State(state): State<AppState>,
    Json(payload): Json<CreateDiscountRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let discount = state
        .services
        .discounts
        .create_discount(payload.discount, payload.actor_id, payload.actor_role)
        .await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "data": discount }))))
}

/// List catalog discounts
#[utoipa::path(
    get,
    path = "/api/v1/discounts",
    params(DiscountFilters),
    responses((status = 200, description = "Discount list returned")),
    tag = "discounts"
)]
pub async fn list_discounts(
    State(state): State<AppState>,
    Query(filters): Query<DiscountFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let page = filters.page.unwrap_or(1);
    let limit = filters.limit.unwrap_or(50);
    let (discounts, total) = state
        .services
        .discounts
        .list_discounts(filters.branch_id, filters.include_inactive, page, limit)
        .await?;

    let response = json!({
        "success": true,
        "data": {
            "discounts": discounts,
            "total": total,
            "page": page,
            "per_page": limit,
        }
    });
    Ok((StatusCode::OK, Json(response)))
}

/// Get one catalog discount
#[utoipa::path(
    get,
    path = "/api/v1/discounts/{id}",
    params(("id" = Uuid, Path, description = "Discount ID")),
    responses(
        (status = 200, description = "Discount returned"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "discounts"
)]
pub async fn get_discount(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let discount = state.services.discounts.get_discount(id).await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": discount }))))
}

/// Deactivate a catalog discount (applied instances stay on record)
#[utoipa::path(
    delete,
    path = "/api/v1/discounts/{id}",
    params(("id" = Uuid, Path, description = "Discount ID"), ActorQuery),
    responses(
        (status = 200, description = "Discount deactivated"),
        (status = 403, description = "Forbidden", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    tag = "discounts"
)]
pub async fn deactivate_discount(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(actor): Query<ActorQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let discount = state
        .services
        .discounts
        .deactivate_discount(id, actor.actor_id, actor.actor_role)
        .await?;
    Ok((StatusCode::OK, Json(json!({ "success": true, "data": discount }))))
}
