//! Helper harness for spinning up services backed by an in-memory SQLite
//! database with the embedded migrations applied.
#![allow(dead_code)]

use std::sync::Arc;

use medipos_api::events::{self, EventSender};
use medipos_api::migrator::Migrator;
use medipos_api::services::batch_pricing::{BatchPricingService, PricingStrategy};
use medipos_api::services::discounts::DiscountService;
use medipos_api::services::pricing_control::PricingControlService;
use rust_decimal_macros::dec;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tokio::sync::mpsc;

/// A single-connection pool keeps the shared in-memory database alive for
/// the lifetime of the test.
pub async fn setup_db() -> Arc<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:".to_owned());
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations apply");
    Arc::new(db)
}

pub fn event_sender() -> EventSender {
    let (tx, rx) = mpsc::channel(256);
    tokio::spawn(events::process_events(rx));
    EventSender::new(tx)
}

pub fn batch_pricing(db: Arc<DatabaseConnection>, strategy: PricingStrategy) -> BatchPricingService {
    BatchPricingService::new(db, event_sender(), strategy)
}

pub fn discounts(db: Arc<DatabaseConnection>) -> DiscountService {
    DiscountService::new(db, event_sender(), dec!(10))
}

pub fn pricing_control(db: Arc<DatabaseConnection>, ttl_minutes: i64) -> PricingControlService {
    PricingControlService::new(db, event_sender(), ttl_minutes)
}
