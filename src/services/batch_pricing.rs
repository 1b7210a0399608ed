//! Batch Pricing Service
//!
//! Batch-level inventory valuation and allocation: plans which batches
//! satisfy a requested quantity under the configured strategy, deducts stock
//! through conditional decrements, and answers cost/price lookups.
//!
//! The selection strategy is injected at construction from configuration and
//! never re-read per call.

use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::inventory_batch::{self, Entity as InventoryBatchEntity};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit::{AuditLogService, NewAuditEntry};
use crate::entities::audit_log::AuditAction;

lazy_static! {
    static ref STOCK_DEDUCTIONS: IntCounter = register_int_counter!(
        "pos_stock_deductions_total",
        "Total number of completed stock deductions"
    )
    .expect("metric can be created");
    static ref STOCK_SHORTAGES: IntCounter = register_int_counter!(
        "pos_stock_shortages_total",
        "Total number of deductions rejected for insufficient stock"
    )
    .expect("metric can be created");
    static ref STOCK_CONFLICTS: IntCounter = register_int_counter!(
        "pos_stock_decrement_conflicts_total",
        "Conditional decrements that lost a race to a concurrent deduction"
    )
    .expect("metric can be created");
}

/// Batch selection strategy. Configured once, globally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PricingStrategy {
    /// Oldest received lot first.
    Fifo,
    /// Soonest-to-expire first, batches without expiry last. For perishables.
    Fefo,
    /// Single blended cost/price across all active batches.
    WeightedAverage,
}

/// One line of an allocation plan. `batch_id` is unset for the synthetic
/// blended line produced under the weighted-average strategy.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AllocationLine {
    pub batch_id: Option<Uuid>,
    pub batch_number: Option<String>,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
}

/// Result of planning an allocation against a ledger snapshot. A non-zero
/// `unmet_quantity` means shortage: the plan is partial and the caller must
/// not proceed to deduction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AllocationPlan {
    pub strategy: PricingStrategy,
    pub requested_quantity: Decimal,
    pub lines: Vec<AllocationLine>,
    pub unmet_quantity: Decimal,
}

impl AllocationPlan {
    pub fn is_satisfied(&self) -> bool {
        self.unmet_quantity.is_zero()
    }
}

/// One batch actually drawn from during a deduction.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchDeduction {
    pub batch_id: Uuid,
    pub batch_number: String,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub selling_price: Decimal,
    pub depleted: bool,
}

/// Outcome of a completed deduction, fed into profit tracking.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockDeduction {
    pub transaction_ref: String,
    pub deductions: Vec<BatchDeduction>,
    pub total_quantity: Decimal,
    pub total_cost: Decimal,
}

/// Structured shortage report. Carries the partial plan so the caller can
/// decide to partial-fulfil, backorder, or reject.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockShortage {
    pub product_id: Uuid,
    pub branch_id: Uuid,
    pub requested_quantity: Decimal,
    pub available_quantity: Decimal,
    pub shortfall: Decimal,
    pub partial_plan: Vec<AllocationLine>,
    pub message: String,
}

/// Deduction either completes in full or reports a shortage; there is no
/// implicit partial fulfilment.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum DeductionResult {
    Deducted(StockDeduction),
    Shortage(StockShortage),
}

/// Validated input for goods receipt.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewBatch {
    pub product_id: Uuid,
    pub branch_id: Uuid,
    pub batch_number: String,
    pub quantity: Decimal,
    pub purchase_price: Decimal,
    pub selling_price: Decimal,
    pub received_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
}

// Internal per-batch draw used by deduction. Unlike the public plan this
// always names concrete batches, including under weighted-average where the
// physical draw runs oldest-first at blended cost.
struct PhysicalLine {
    batch_id: Uuid,
    batch_number: String,
    quantity: Decimal,
    purchase_price: Decimal,
    selling_price: Decimal,
}

struct PhysicalDraw {
    lines: Vec<PhysicalLine>,
    unmet_quantity: Decimal,
}

#[derive(Clone)]
pub struct BatchPricingService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
    strategy: PricingStrategy,
}

impl BatchPricingService {
    pub fn new(
        db_pool: Arc<DatabaseConnection>,
        event_sender: EventSender,
        strategy: PricingStrategy,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            strategy,
        }
    }

    pub fn strategy(&self) -> PricingStrategy {
        self.strategy
    }

    /// Active batches with stock for (product, branch), in strategy order.
    #[instrument(skip(self))]
    pub async fn get_available_batches(
        &self,
        product_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Vec<inventory_batch::Model>, ServiceError> {
        let db = &*self.db_pool;

        let mut batches = InventoryBatchEntity::find()
            .filter(inventory_batch::Column::ProductId.eq(product_id))
            .filter(inventory_batch::Column::BranchId.eq(branch_id))
            .filter(inventory_batch::Column::Active.eq(true))
            .filter(inventory_batch::Column::CurrentQuantity.gt(Decimal::ZERO))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        sort_batches(self.strategy, &mut batches);
        Ok(batches)
    }

    /// Plans which batches satisfy `required_quantity` without mutating
    /// anything. Deterministic for a fixed ledger snapshot.
    #[instrument(skip(self))]
    pub async fn plan_allocation(
        &self,
        product_id: Uuid,
        branch_id: Uuid,
        required_quantity: Decimal,
    ) -> Result<AllocationPlan, ServiceError> {
        if required_quantity <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Required quantity must be positive".to_string(),
            ));
        }

        let batches = self.get_available_batches(product_id, branch_id).await?;
        Ok(plan_from_snapshot(
            self.strategy,
            &batches,
            required_quantity,
        ))
    }

    /// Deducts `quantity` across batches inside a single transaction.
    ///
    /// Every batch decrement is a conditional update (`current_quantity >= q`
    /// enforced in the WHERE clause); a lost race rolls the whole deduction
    /// back and triggers exactly one re-plan before the call gives up and
    /// reports shortage. One audit row is written per batch touched.
    #[instrument(skip(self))]
    pub async fn deduct_stock(
        &self,
        product_id: Uuid,
        branch_id: Uuid,
        quantity: Decimal,
        transaction_ref: &str,
        actor_id: Option<Uuid>,
    ) -> Result<DeductionResult, ServiceError> {
        if quantity <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "Deduction quantity must be positive".to_string(),
            ));
        }

        for attempt in 0..2 {
            let batches = self.get_available_batches(product_id, branch_id).await?;
            let draw = physical_draw(&batches, quantity);

            if !draw.unmet_quantity.is_zero() {
                STOCK_SHORTAGES.inc();
                return Ok(DeductionResult::Shortage(shortage_report(
                    self.strategy,
                    product_id,
                    branch_id,
                    quantity,
                    &batches,
                )));
            }

            // Under weighted-average valuation the physical draw still runs
            // oldest-first, but every unit is costed at the blended rates.
            let blended = match self.strategy {
                PricingStrategy::WeightedAverage => weighted_unit_prices(&batches),
                _ => None,
            };

            match self
                .execute_deduction(&draw.lines, blended, transaction_ref, actor_id)
                .await
            {
                Ok(deduction) => {
                    STOCK_DEDUCTIONS.inc();
                    self.emit_deduction_events(product_id, branch_id, &deduction)
                        .await?;
                    return Ok(DeductionResult::Deducted(deduction));
                }
                Err(ServiceError::ConcurrencyConflict(batch_id)) => {
                    STOCK_CONFLICTS.inc();
                    warn!(
                        batch_id = %batch_id,
                        attempt = attempt,
                        "Conditional decrement lost a race; re-planning"
                    );
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        // Two consecutive lost races: concurrent sales are consuming this
        // product faster than we can plan. Report what is left as shortage.
        STOCK_SHORTAGES.inc();
        let batches = self.get_available_batches(product_id, branch_id).await?;
        Ok(DeductionResult::Shortage(shortage_report(
            self.strategy,
            product_id,
            branch_id,
            quantity,
            &batches,
        )))
    }

    async fn execute_deduction(
        &self,
        lines: &[PhysicalLine],
        blended: Option<(Decimal, Decimal)>,
        transaction_ref: &str,
        actor_id: Option<Uuid>,
    ) -> Result<StockDeduction, ServiceError> {
        let db = &*self.db_pool;
        let transaction_ref = transaction_ref.to_string();
        let planned: Vec<(Uuid, String, Decimal, Decimal, Decimal)> = lines
            .iter()
            .map(|l| {
                let (unit_cost, selling_price) =
                    blended.unwrap_or((l.purchase_price, l.selling_price));
                (
                    l.batch_id,
                    l.batch_number.clone(),
                    l.quantity,
                    unit_cost,
                    selling_price,
                )
            })
            .collect();

        db.transaction::<_, StockDeduction, ServiceError>(move |txn| {
            Box::pin(async move {
                let now = Utc::now();
                let mut deductions = Vec::with_capacity(planned.len());
                let mut total_cost = Decimal::ZERO;
                let mut total_quantity = Decimal::ZERO;

                for (batch_id, batch_number, qty, unit_cost, selling_price) in planned {
                    let result = InventoryBatchEntity::update_many()
                        .col_expr(
                            inventory_batch::Column::CurrentQuantity,
                            Expr::col(inventory_batch::Column::CurrentQuantity).sub(qty),
                        )
                        .col_expr(inventory_batch::Column::UpdatedAt, Expr::value(now))
                        .filter(inventory_batch::Column::Id.eq(batch_id))
                        .filter(inventory_batch::Column::Active.eq(true))
                        .filter(inventory_batch::Column::CurrentQuantity.gte(qty))
                        .exec(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    if result.rows_affected == 0 {
                        return Err(ServiceError::ConcurrencyConflict(batch_id));
                    }

                    let batch = InventoryBatchEntity::find_by_id(batch_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Batch {} not found", batch_id))
                        })?;

                    let depleted = batch.is_depleted();
                    if depleted {
                        let mut active: inventory_batch::ActiveModel = batch.clone().into();
                        active.active = Set(false);
                        active.updated_at = Set(now);
                        active.update(txn).await.map_err(ServiceError::db_error)?;
                    }

                    let line_cost = unit_cost * qty;
                    AuditLogService::record(
                        txn,
                        NewAuditEntry {
                            action: if depleted {
                                AuditAction::BatchDepleted
                            } else {
                                AuditAction::StockAdjustment
                            },
                            entity_type: "inventory_batch",
                            entity_id: batch_id.to_string(),
                            actor_id,
                            old_value: Some(serde_json::json!({
                                "current_quantity": batch.current_quantity + qty,
                            })),
                            new_value: Some(serde_json::json!({
                                "current_quantity": batch.current_quantity,
                                "active": !depleted,
                            })),
                            amount_impact: Some(-line_cost),
                            details: Some(format!("sale {}", transaction_ref)),
                        },
                    )
                    .await?;

                    total_cost += line_cost;
                    total_quantity += qty;
                    deductions.push(BatchDeduction {
                        batch_id,
                        batch_number,
                        quantity: qty,
                        unit_cost,
                        selling_price,
                        depleted,
                    });
                }

                Ok(StockDeduction {
                    transaction_ref,
                    deductions,
                    total_quantity,
                    total_cost,
                })
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }

    async fn emit_deduction_events(
        &self,
        product_id: Uuid,
        branch_id: Uuid,
        deduction: &StockDeduction,
    ) -> Result<(), ServiceError> {
        self.event_sender
            .send(Event::StockDeducted {
                product_id,
                branch_id,
                quantity: deduction.total_quantity,
                total_cost: deduction.total_cost,
                transaction_ref: deduction.transaction_ref.clone(),
                batches_touched: deduction.deductions.iter().map(|d| d.batch_id).collect(),
            })
            .await
            .map_err(ServiceError::EventError)?;

        for entry in deduction.deductions.iter().filter(|d| d.depleted) {
            self.event_sender
                .send(Event::BatchDepleted {
                    batch_id: entry.batch_id,
                    product_id,
                    branch_id,
                })
                .await
                .map_err(ServiceError::EventError)?;
        }
        Ok(())
    }

    /// Selling price the selector would charge next: first batch in strategy
    /// order, or the blended price under weighted-average. Zero when no
    /// active batch carries stock.
    #[instrument(skip(self))]
    pub async fn get_selling_price(
        &self,
        product_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Decimal, ServiceError> {
        let batches = self.get_available_batches(product_id, branch_id).await?;
        let price = match self.strategy {
            PricingStrategy::WeightedAverage => {
                weighted_unit_prices(&batches).map(|(_, p)| p).unwrap_or(Decimal::ZERO)
            }
            _ => batches
                .first()
                .map(|b| b.selling_price)
                .unwrap_or(Decimal::ZERO),
        };
        Ok(price)
    }

    /// Quantity-weighted average purchase cost across active batches.
    #[instrument(skip(self))]
    pub async fn get_weighted_average_cost(
        &self,
        product_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Decimal, ServiceError> {
        let batches = self.get_available_batches(product_id, branch_id).await?;
        Ok(weighted_unit_prices(&batches)
            .map(|(c, _)| c)
            .unwrap_or(Decimal::ZERO))
    }

    /// Quantity-weighted average selling price across active batches.
    #[instrument(skip(self))]
    pub async fn get_weighted_average_selling_price(
        &self,
        product_id: Uuid,
        branch_id: Uuid,
    ) -> Result<Decimal, ServiceError> {
        let batches = self.get_available_batches(product_id, branch_id).await?;
        Ok(weighted_unit_prices(&batches)
            .map(|(_, p)| p)
            .unwrap_or(Decimal::ZERO))
    }

    /// Goods receipt: creates a batch and audits it. Quantities and prices
    /// are validated here rather than trusted from the boundary.
    #[instrument(skip(self))]
    pub async fn receive_batch(
        &self,
        input: NewBatch,
        actor_id: Option<Uuid>,
    ) -> Result<inventory_batch::Model, ServiceError> {
        if input.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Received quantity must be positive".to_string(),
            ));
        }
        if input.purchase_price < Decimal::ZERO || input.selling_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Prices must not be negative".to_string(),
            ));
        }
        if let Some(expiry) = input.expiry_date {
            if expiry <= input.received_date {
                return Err(ServiceError::ValidationError(
                    "Expiry date must be after the received date".to_string(),
                ));
            }
        }
        if input.batch_number.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Batch number is required".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let now = Utc::now();
        let id = Uuid::new_v4();
        let quantity = input.quantity;
        let product_id = input.product_id;
        let branch_id = input.branch_id;

        let model = db
            .transaction::<_, inventory_batch::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let batch = inventory_batch::ActiveModel {
                        id: Set(id),
                        product_id: Set(input.product_id),
                        branch_id: Set(input.branch_id),
                        batch_number: Set(input.batch_number.clone()),
                        original_quantity: Set(input.quantity),
                        current_quantity: Set(input.quantity),
                        purchase_price: Set(input.purchase_price),
                        selling_price: Set(input.selling_price),
                        received_date: Set(input.received_date),
                        expiry_date: Set(input.expiry_date),
                        active: Set(true),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    let model = batch.insert(txn).await.map_err(ServiceError::db_error)?;

                    AuditLogService::record(
                        txn,
                        NewAuditEntry {
                            action: AuditAction::BatchReceived,
                            entity_type: "inventory_batch",
                            entity_id: model.id.to_string(),
                            actor_id,
                            old_value: None,
                            new_value: Some(serde_json::json!({
                                "batch_number": model.batch_number,
                                "quantity": model.original_quantity,
                                "purchase_price": model.purchase_price,
                            })),
                            amount_impact: Some(model.purchase_price * model.original_quantity),
                            details: None,
                        },
                    )
                    .await?;

                    Ok(model)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        self.event_sender
            .send(Event::BatchReceived {
                batch_id: model.id,
                product_id,
                branch_id,
                quantity,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(batch_id = %model.id, "Received inventory batch");
        Ok(model)
    }

    #[instrument(skip(self))]
    pub async fn get_batch(
        &self,
        batch_id: Uuid,
    ) -> Result<inventory_batch::Model, ServiceError> {
        let db = &*self.db_pool;
        InventoryBatchEntity::find_by_id(batch_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Batch {} not found", batch_id)))
    }

    /// Paginated batch listing, newest receipts first.
    #[instrument(skip(self))]
    pub async fn list_batches(
        &self,
        product_id: Option<Uuid>,
        branch_id: Option<Uuid>,
        active_only: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<inventory_batch::Model>, u64), ServiceError> {
        if page == 0 {
            return Err(ServiceError::ValidationError(
                "Page number must be greater than 0".to_string(),
            ));
        }
        if limit == 0 || limit > 1000 {
            return Err(ServiceError::ValidationError(
                "Limit must be between 1 and 1000".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let mut query = InventoryBatchEntity::find();
        if let Some(product_id) = product_id {
            query = query.filter(inventory_batch::Column::ProductId.eq(product_id));
        }
        if let Some(branch_id) = branch_id {
            query = query.filter(inventory_batch::Column::BranchId.eq(branch_id));
        }
        if active_only {
            query = query.filter(inventory_batch::Column::Active.eq(true));
        }
        query = query
            .order_by_desc(inventory_batch::Column::ReceivedDate)
            .order_by_asc(inventory_batch::Column::Id);

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let batches = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((batches, total))
    }
}

/// Orders a ledger snapshot by strategy. Ties always break on batch id so a
/// repeated call against an unchanged ledger yields an identical plan.
pub fn sort_batches(strategy: PricingStrategy, batches: &mut [inventory_batch::Model]) {
    match strategy {
        PricingStrategy::Fifo | PricingStrategy::WeightedAverage => {
            batches.sort_by(|a, b| {
                a.received_date
                    .cmp(&b.received_date)
                    .then_with(|| a.id.cmp(&b.id))
            });
        }
        PricingStrategy::Fefo => {
            batches.sort_by(|a, b| match (a.expiry_date, b.expiry_date) {
                (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.id.cmp(&b.id)),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => a.id.cmp(&b.id),
            });
        }
    }
}

/// Pure planning over an already-ordered snapshot.
pub fn plan_from_snapshot(
    strategy: PricingStrategy,
    batches: &[inventory_batch::Model],
    required_quantity: Decimal,
) -> AllocationPlan {
    if strategy == PricingStrategy::WeightedAverage {
        let available: Decimal = batches.iter().map(|b| b.current_quantity).sum();
        let covered = required_quantity.min(available);
        let lines = match weighted_unit_prices(batches) {
            Some((cost, price)) if covered > Decimal::ZERO => vec![AllocationLine {
                batch_id: None,
                batch_number: None,
                quantity: covered,
                purchase_price: cost,
                selling_price: price,
            }],
            _ => Vec::new(),
        };
        return AllocationPlan {
            strategy,
            requested_quantity: required_quantity,
            lines,
            unmet_quantity: (required_quantity - available).max(Decimal::ZERO),
        };
    }

    let draw = physical_draw(batches, required_quantity);
    AllocationPlan {
        strategy,
        requested_quantity: required_quantity,
        lines: draw
            .lines
            .into_iter()
            .map(|l| AllocationLine {
                batch_id: Some(l.batch_id),
                batch_number: Some(l.batch_number),
                quantity: l.quantity,
                purchase_price: l.purchase_price,
                selling_price: l.selling_price,
            })
            .collect(),
        unmet_quantity: draw.unmet_quantity,
    }
}

/// Greedy draw over an ordered snapshot: take from each batch until the
/// requirement is covered or the ledger runs dry.
fn physical_draw(batches: &[inventory_batch::Model], required_quantity: Decimal) -> PhysicalDraw {
    let mut remaining = required_quantity;
    let mut lines = Vec::new();

    for batch in batches {
        if remaining.is_zero() {
            break;
        }
        let take = batch.current_quantity.min(remaining);
        if take <= Decimal::ZERO {
            continue;
        }
        remaining -= take;
        lines.push(PhysicalLine {
            batch_id: batch.id,
            batch_number: batch.batch_number.clone(),
            quantity: take,
            purchase_price: batch.purchase_price,
            selling_price: batch.selling_price,
        });
    }

    PhysicalDraw {
        lines,
        unmet_quantity: remaining,
    }
}

/// Quantity-weighted (cost, selling price) across a snapshot, rounded to two
/// decimals. `None` when the snapshot holds no stock.
pub fn weighted_unit_prices(batches: &[inventory_batch::Model]) -> Option<(Decimal, Decimal)> {
    let total_qty: Decimal = batches.iter().map(|b| b.current_quantity).sum();
    if total_qty <= Decimal::ZERO {
        return None;
    }
    let cost_sum: Decimal = batches
        .iter()
        .map(|b| b.purchase_price * b.current_quantity)
        .sum();
    let price_sum: Decimal = batches
        .iter()
        .map(|b| b.selling_price * b.current_quantity)
        .sum();
    let round = |d: Decimal| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    Some((round(cost_sum / total_qty), round(price_sum / total_qty)))
}

fn shortage_report(
    strategy: PricingStrategy,
    product_id: Uuid,
    branch_id: Uuid,
    requested_quantity: Decimal,
    batches: &[inventory_batch::Model],
) -> StockShortage {
    let available: Decimal = batches.iter().map(|b| b.current_quantity).sum();
    let shortfall = (requested_quantity - available).max(Decimal::ZERO);
    let partial = plan_from_snapshot(strategy, batches, requested_quantity);
    StockShortage {
        product_id,
        branch_id,
        requested_quantity,
        available_quantity: available,
        shortfall,
        partial_plan: partial.lines,
        message: format!(
            "Insufficient stock for product {}: requested {}, available {}",
            product_id, requested_quantity, available
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn batch(
        id_byte: u8,
        qty: Decimal,
        purchase: Decimal,
        selling: Decimal,
        received: NaiveDate,
        expiry: Option<NaiveDate>,
    ) -> inventory_batch::Model {
        inventory_batch::Model {
            id: Uuid::from_bytes([id_byte; 16]),
            product_id: Uuid::from_bytes([0xAA; 16]),
            branch_id: Uuid::from_bytes([0xBB; 16]),
            batch_number: format!("B{}", id_byte),
            original_quantity: qty,
            current_quantity: qty,
            purchase_price: purchase,
            selling_price: selling,
            received_date: received,
            expiry_date: expiry,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fifo_plan_spans_batches_oldest_first() {
        let mut batches = vec![
            batch(2, dec!(10), dec!(110), dec!(150), date(2024, 2, 1), None),
            batch(1, dec!(5), dec!(100), dec!(140), date(2024, 1, 1), None),
        ];
        sort_batches(PricingStrategy::Fifo, &mut batches);
        let plan = plan_from_snapshot(PricingStrategy::Fifo, &batches, dec!(8));

        assert!(plan.is_satisfied());
        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.lines[0].quantity, dec!(5));
        assert_eq!(plan.lines[0].purchase_price, dec!(100));
        assert_eq!(plan.lines[1].quantity, dec!(3));
        assert_eq!(plan.lines[1].purchase_price, dec!(110));
    }

    #[test]
    fn shortage_reports_partial_plan_and_unmet() {
        let mut batches = vec![
            batch(1, dec!(5), dec!(100), dec!(140), date(2024, 1, 1), None),
            batch(2, dec!(10), dec!(110), dec!(150), date(2024, 2, 1), None),
        ];
        sort_batches(PricingStrategy::Fifo, &mut batches);
        let plan = plan_from_snapshot(PricingStrategy::Fifo, &batches, dec!(20));

        assert!(!plan.is_satisfied());
        assert_eq!(plan.unmet_quantity, dec!(5));
        assert_eq!(plan.lines.len(), 2);
        assert_eq!(plan.lines[0].quantity, dec!(5));
        assert_eq!(plan.lines[1].quantity, dec!(10));
    }

    #[test]
    fn weighted_average_blends_and_rounds() {
        let batches = vec![
            batch(1, dec!(5), dec!(100), dec!(140), date(2024, 1, 1), None),
            batch(2, dec!(10), dec!(110), dec!(150), date(2024, 2, 1), None),
        ];
        let (cost, price) = weighted_unit_prices(&batches).unwrap();
        assert_eq!(cost, dec!(106.67));
        assert_eq!(price, dec!(146.67));

        let plan = plan_from_snapshot(PricingStrategy::WeightedAverage, &batches, dec!(8));
        assert!(plan.is_satisfied());
        assert_eq!(plan.lines.len(), 1);
        assert!(plan.lines[0].batch_id.is_none());
        assert_eq!(plan.lines[0].purchase_price, dec!(106.67));
    }

    #[test]
    fn fefo_orders_by_expiry_nulls_last() {
        let mut batches = vec![
            batch(1, dec!(5), dec!(100), dec!(140), date(2024, 1, 1), None),
            batch(
                2,
                dec!(5),
                dec!(100),
                dec!(140),
                date(2024, 3, 1),
                Some(date(2025, 6, 1)),
            ),
            batch(
                3,
                dec!(5),
                dec!(100),
                dec!(140),
                date(2024, 2, 1),
                Some(date(2025, 1, 1)),
            ),
        ];
        sort_batches(PricingStrategy::Fefo, &mut batches);
        let ids: Vec<u8> = batches.iter().map(|b| b.id.as_bytes()[0]).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn planning_is_deterministic_on_ties() {
        let received = date(2024, 1, 1);
        let mut a = vec![
            batch(9, dec!(4), dec!(90), dec!(120), received, None),
            batch(3, dec!(4), dec!(95), dec!(125), received, None),
        ];
        let mut b = a.clone();
        b.reverse();

        sort_batches(PricingStrategy::Fifo, &mut a);
        sort_batches(PricingStrategy::Fifo, &mut b);
        let plan_a = plan_from_snapshot(PricingStrategy::Fifo, &a, dec!(6));
        let plan_b = plan_from_snapshot(PricingStrategy::Fifo, &b, dec!(6));

        let ids_a: Vec<_> = plan_a.lines.iter().map(|l| l.batch_id).collect();
        let ids_b: Vec<_> = plan_b.lines.iter().map(|l| l.batch_id).collect();
        assert_eq!(ids_a, ids_b);
        // Equal received dates resolve by batch id ascending.
        assert_eq!(plan_a.lines[0].batch_id, Some(Uuid::from_bytes([3; 16])));
    }

    #[test]
    fn zero_stock_has_no_weighted_price() {
        assert!(weighted_unit_prices(&[]).is_none());
    }
}
