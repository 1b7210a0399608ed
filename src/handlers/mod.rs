pub mod discounts;
pub mod inventory;
pub mod pricing;
pub mod reports;

use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub batch_pricing: Arc<crate::services::batch_pricing::BatchPricingService>,
    pub discounts: Arc<crate::services::discounts::DiscountService>,
    pub pricing_control: Arc<crate::services::pricing_control::PricingControlService>,
    pub audit: Arc<crate::services::audit::AuditLogService>,
    pub reports: Arc<crate::services::reports::ReportService>,
}

impl AppServices {
    /// Wires every service against the shared pool and event channel, with
    /// the pricing knobs taken from configuration once.
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, config: &AppConfig) -> Self {
        let cashier_ceiling = Decimal::from_f64(config.pricing.cashier_discount_ceiling_percent)
            .unwrap_or(Decimal::TEN);

        let batch_pricing = Arc::new(crate::services::batch_pricing::BatchPricingService::new(
            db_pool.clone(),
            event_sender.clone(),
            config.pricing.strategy,
        ));
        let discounts = Arc::new(crate::services::discounts::DiscountService::new(
            db_pool.clone(),
            event_sender.clone(),
            cashier_ceiling,
        ));
        let pricing_control = Arc::new(
            crate::services::pricing_control::PricingControlService::new(
                db_pool.clone(),
                event_sender,
                config.pricing.override_ttl_minutes,
            ),
        );
        let audit = Arc::new(crate::services::audit::AuditLogService::new(db_pool.clone()));
        let reports = Arc::new(crate::services::reports::ReportService::new(db_pool));

        Self {
            batch_pricing,
            discounts,
            pricing_control,
            audit,
            reports,
        }
    }
}
