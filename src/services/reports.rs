//! Read-side reporting over the pricing entities. Nothing here mutates
//! state; these aggregations sit outside the transactional core.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::inventory_batch::{self, Entity as InventoryBatchEntity};
use crate::entities::transaction_discount::{self, Entity as TransactionDiscountEntity};
use crate::errors::ServiceError;

/// One stock-aging bucket (days since receipt).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AgingBucket {
    pub label: &'static str,
    pub batch_count: u64,
    pub total_quantity: Decimal,
    pub stock_value: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExpiringBatch {
    pub batch_id: Uuid,
    pub product_id: Uuid,
    pub batch_number: String,
    pub current_quantity: Decimal,
    pub expiry_date: chrono::NaiveDate,
    pub days_until_expiry: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchProfit {
    pub batch_id: Uuid,
    pub batch_number: String,
    pub product_id: Uuid,
    pub sold_quantity: Decimal,
    pub unit_margin: Decimal,
    pub realized_profit: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchProfitReport {
    pub batches: Vec<BatchProfit>,
    pub total_profit: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiscountImpactLine {
    /// `None` groups the manual ad-hoc discounts.
    pub discount_id: Option<Uuid>,
    pub times_applied: u64,
    pub total_discount_amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiscountImpactReport {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub total_discount_amount: Decimal,
    pub times_applied: u64,
    pub by_discount: Vec<DiscountImpactLine>,
}

#[derive(Clone)]
pub struct ReportService {
    db_pool: Arc<DatabaseConnection>,
}

impl ReportService {
    pub fn new(db_pool: Arc<DatabaseConnection>) -> Self {
        Self { db_pool }
    }

    /// Active stock grouped into age buckets by received date.
    #[instrument(skip(self))]
    pub async fn stock_aging(
        &self,
        branch_id: Uuid,
        product_id: Option<Uuid>,
    ) -> Result<Vec<AgingBucket>, ServiceError> {
        let db = &*self.db_pool;
        let mut query = InventoryBatchEntity::find()
            .filter(inventory_batch::Column::BranchId.eq(branch_id))
            .filter(inventory_batch::Column::Active.eq(true))
            .filter(inventory_batch::Column::CurrentQuantity.gt(Decimal::ZERO));
        if let Some(product_id) = product_id {
            query = query.filter(inventory_batch::Column::ProductId.eq(product_id));
        }
        let batches = query.all(db).await.map_err(ServiceError::db_error)?;

        let today = Utc::now().date_naive();
        let mut buckets = [
            AgingBucket { label: "0-30", batch_count: 0, total_quantity: Decimal::ZERO, stock_value: Decimal::ZERO },
            AgingBucket { label: "31-60", batch_count: 0, total_quantity: Decimal::ZERO, stock_value: Decimal::ZERO },
            AgingBucket { label: "61-90", batch_count: 0, total_quantity: Decimal::ZERO, stock_value: Decimal::ZERO },
            AgingBucket { label: "90+", batch_count: 0, total_quantity: Decimal::ZERO, stock_value: Decimal::ZERO },
        ];

        for batch in &batches {
            let age_days = (today - batch.received_date).num_days();
            let idx = match age_days {
                d if d <= 30 => 0,
                d if d <= 60 => 1,
                d if d <= 90 => 2,
                _ => 3,
            };
            buckets[idx].batch_count += 1;
            buckets[idx].total_quantity += batch.current_quantity;
            buckets[idx].stock_value += batch.current_quantity * batch.purchase_price;
        }

        Ok(buckets.to_vec())
    }

    /// Active batches expiring within `within_days`, soonest first.
    #[instrument(skip(self))]
    pub async fn expiring_soon(
        &self,
        branch_id: Uuid,
        within_days: i64,
    ) -> Result<Vec<ExpiringBatch>, ServiceError> {
        let db = &*self.db_pool;
        let today = Utc::now().date_naive();
        let horizon = today + Duration::days(within_days);

        let batches = InventoryBatchEntity::find()
            .filter(inventory_batch::Column::BranchId.eq(branch_id))
            .filter(inventory_batch::Column::Active.eq(true))
            .filter(inventory_batch::Column::CurrentQuantity.gt(Decimal::ZERO))
            .filter(inventory_batch::Column::ExpiryDate.is_not_null())
            .filter(inventory_batch::Column::ExpiryDate.lte(horizon))
            .order_by_asc(inventory_batch::Column::ExpiryDate)
            .order_by_asc(inventory_batch::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(batches
            .into_iter()
            .filter_map(|b| {
                let expiry = b.expiry_date?;
                Some(ExpiringBatch {
                    batch_id: b.id,
                    product_id: b.product_id,
                    batch_number: b.batch_number,
                    current_quantity: b.current_quantity,
                    expiry_date: expiry,
                    days_until_expiry: (expiry - today).num_days(),
                })
            })
            .collect())
    }

    /// Realized profit per batch: sold quantity times the batch's margin.
    /// Depleted batches are kept (they are deactivated, never deleted) so the
    /// history stays complete.
    #[instrument(skip(self))]
    pub async fn batch_profit(
        &self,
        branch_id: Uuid,
        product_id: Option<Uuid>,
    ) -> Result<BatchProfitReport, ServiceError> {
        let db = &*self.db_pool;
        let mut query =
            InventoryBatchEntity::find().filter(inventory_batch::Column::BranchId.eq(branch_id));
        if let Some(product_id) = product_id {
            query = query.filter(inventory_batch::Column::ProductId.eq(product_id));
        }
        let batches = query
            .order_by_asc(inventory_batch::Column::ReceivedDate)
            .order_by_asc(inventory_batch::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut total_profit = Decimal::ZERO;
        let entries: Vec<BatchProfit> = batches
            .into_iter()
            .map(|b| {
                let sold = b.original_quantity - b.current_quantity;
                let margin = b.selling_price - b.purchase_price;
                let profit = sold * margin;
                total_profit += profit;
                BatchProfit {
                    batch_id: b.id,
                    batch_number: b.batch_number,
                    product_id: b.product_id,
                    sold_quantity: sold,
                    unit_margin: margin,
                    realized_profit: profit,
                }
            })
            .collect();

        Ok(BatchProfitReport {
            batches: entries,
            total_profit,
        })
    }

    /// Discount savings over a date range, grouped per catalog discount with
    /// manual ad-hoc discounts collected under `discount_id = None`.
    #[instrument(skip(self))]
    pub async fn discount_impact(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<DiscountImpactReport, ServiceError> {
        if from >= to {
            return Err(ServiceError::InvalidInput(
                "Report range must start before it ends".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let rows = TransactionDiscountEntity::find()
            .filter(transaction_discount::Column::CreatedAt.gte(from))
            .filter(transaction_discount::Column::CreatedAt.lt(to))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut grouped: BTreeMap<Option<Uuid>, (u64, Decimal)> = BTreeMap::new();
        let mut total = Decimal::ZERO;
        for row in &rows {
            let entry = grouped.entry(row.discount_id).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += row.discount_amount;
            total += row.discount_amount;
        }

        Ok(DiscountImpactReport {
            from,
            to,
            total_discount_amount: total,
            times_applied: rows.len() as u64,
            by_discount: grouped
                .into_iter()
                .map(|(discount_id, (count, amount))| DiscountImpactLine {
                    discount_id,
                    times_applied: count,
                    total_discount_amount: amount,
                })
                .collect(),
        })
    }
}
