use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::inventory::list_batches,
        handlers::inventory::receive_batch,
        handlers::inventory::get_batch,
        handlers::inventory::plan_allocation,
        handlers::inventory::deduct_stock,
        handlers::inventory::get_prices,
        handlers::discounts::resolve_discounts,
        handlers::discounts::apply_discount,
        handlers::discounts::create_discount,
        handlers::discounts::list_discounts,
        handlers::discounts::get_discount,
        handlers::discounts::deactivate_discount,
        handlers::pricing::set_pricing_control,
        handlers::pricing::validate_price,
        handlers::pricing::validate_discount,
        handlers::pricing::create_override,
        handlers::pricing::list_overrides,
        handlers::pricing::get_override,
        handlers::pricing::quick_approve,
        handlers::pricing::reject_override,
        handlers::pricing::expire_stale,
        handlers::reports::stock_aging,
        handlers::reports::expiring_soon,
        handlers::reports::batch_profit,
        handlers::reports::discount_impact,
    ),
    components(schemas(
        crate::errors::ErrorResponse,
        crate::auth::StaffRole,
        crate::services::batch_pricing::PricingStrategy,
        crate::services::batch_pricing::AllocationPlan,
        crate::services::batch_pricing::AllocationLine,
        crate::services::batch_pricing::StockDeduction,
        crate::services::batch_pricing::StockShortage,
        crate::services::discounts::CartItemInput,
        crate::services::discounts::DiscountResolution,
        crate::services::discounts::DiscountSpec,
        crate::services::pricing_control::PriceValidation,
        crate::services::pricing_control::DiscountValidation,
    )),
    tags(
        (name = "inventory", description = "Batch ledger, allocation planning and stock deduction"),
        (name = "discounts", description = "Discount catalog, resolution and application"),
        (name = "pricing", description = "Pricing controls and the price override workflow"),
        (name = "reports", description = "Read-side aggregations"),
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at `/docs`, serving the spec at
/// `/api-docs/openapi.json`.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}
