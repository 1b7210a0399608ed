use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Domain events emitted after money- or stock-affecting operations commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Stock events
    BatchReceived {
        batch_id: Uuid,
        product_id: Uuid,
        branch_id: Uuid,
        quantity: Decimal,
    },
    StockDeducted {
        product_id: Uuid,
        branch_id: Uuid,
        quantity: Decimal,
        total_cost: Decimal,
        transaction_ref: String,
        batches_touched: Vec<Uuid>,
    },
    BatchDepleted {
        batch_id: Uuid,
        product_id: Uuid,
        branch_id: Uuid,
    },

    // Discount events
    DiscountApplied {
        transaction_id: String,
        discount_id: Option<Uuid>,
        discount_amount: Decimal,
        applied_by: Uuid,
    },

    // Pricing governance events
    PricingControlChanged {
        product_id: Uuid,
        branch_id: Option<Uuid>,
    },
    PriceOverrideRequested {
        request_id: Uuid,
        product_id: Uuid,
        requested_price: Decimal,
        expires_at: DateTime<Utc>,
    },
    PriceOverrideApproved {
        request_id: Uuid,
        approved_by: Uuid,
    },
    PriceOverrideRejected {
        request_id: Uuid,
        rejected_by: Uuid,
    },
}

/// Drains the event channel. Spawned once at startup; downstream delivery
/// (notification fan-out, terminal displays) hangs off this loop.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match &event {
            Event::StockDeducted {
                product_id,
                branch_id,
                quantity,
                transaction_ref,
                ..
            } => {
                info!(
                    product_id = %product_id,
                    branch_id = %branch_id,
                    quantity = %quantity,
                    transaction_ref = %transaction_ref,
                    "Stock deducted"
                );
            }
            Event::BatchDepleted { batch_id, .. } => {
                warn!(batch_id = %batch_id, "Batch fully depleted");
            }
            other => {
                info!(event = ?other, "Processed event");
            }
        }
    }
    info!("Event channel closed; event processor exiting");
}
