//! Discount Service
//!
//! Catalog management plus the cart resolver that collapses every applicable
//! discount to at most one effective discount per line item, or one
//! bill-level discount when no line qualifies. Item and bill discounts are
//! never combined on the same transaction.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::StaffRole;
use crate::entities::audit_log::AuditAction;
use crate::entities::discount::{self, DiscountScope, DiscountType, Entity as DiscountEntity};
use crate::entities::transaction_discount::{self, AppliedTo};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit::{AuditLogService, NewAuditEntry};

lazy_static! {
    static ref DISCOUNTS_APPLIED: IntCounter = register_int_counter!(
        "pos_discounts_applied_total",
        "Total number of transaction discounts recorded"
    )
    .expect("metric can be created");
}

/// One cart line as presented to the resolver. The line amount is
/// `unit_price × quantity`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartItemInput {
    pub product_id: Uuid,
    pub category: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl CartItemInput {
    pub fn amount(&self) -> Decimal {
        self.unit_price * self.quantity
    }
}

/// A discount chosen by the resolver, with its computed amount.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AppliedDiscount {
    pub discount_id: Uuid,
    pub name: String,
    pub discount_type: DiscountType,
    pub value: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ItemDiscountChoice {
    pub item_index: usize,
    pub discount: AppliedDiscount,
}

/// Resolver output: per-line winners, or one bill discount, never both.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiscountResolution {
    pub item_discounts: Vec<ItemDiscountChoice>,
    pub bill_discount: Option<AppliedDiscount>,
    pub total_savings: Decimal,
}

/// Gate result for a (discount, role) pair. `RequiresApproval` is
/// escalatable through the override workflow; `Denied` is terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApplyPermission {
    Allowed,
    RequiresApproval,
    Denied,
}

/// What to record against a transaction: a catalog discount, or a manual
/// ad-hoc discount keyed in by an approver.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DiscountSpec {
    Catalog { discount_id: Uuid },
    Manual {
        discount_type: DiscountType,
        value: Decimal,
        reason: String,
    },
}

/// Payload for creating a catalog discount.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewDiscount {
    pub name: String,
    pub scope: DiscountScope,
    pub discount_type: DiscountType,
    pub value: Decimal,
    #[serde(default = "default_priority")]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub cashier_can_apply: bool,
    #[serde(default)]
    pub requires_approval: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub min_purchase_amount: Option<Decimal>,
    pub product_id: Option<Uuid>,
    pub category: Option<String>,
    pub branch_id: Option<Uuid>,
    #[serde(default)]
    pub is_period_based: bool,
    pub days_of_week: Option<String>,
    pub start_time: Option<chrono::NaiveTime>,
    pub end_time: Option<chrono::NaiveTime>,
}

fn default_priority() -> i32 {
    100
}
fn default_true() -> bool {
    true
}

#[derive(Clone)]
pub struct DiscountService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
    /// Highest percentage a cashier may apply without a manager approval.
    cashier_ceiling_percent: Decimal,
}

impl DiscountService {
    pub fn new(
        db_pool: Arc<DatabaseConnection>,
        event_sender: EventSender,
        cashier_ceiling_percent: Decimal,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            cashier_ceiling_percent,
        }
    }

    /// Resolves the effective discounts for a cart at the current instant.
    #[instrument(skip(self, cart_items))]
    pub async fn resolve_discounts(
        &self,
        cart_items: &[CartItemInput],
        branch_id: Uuid,
        actor_is_cashier: bool,
    ) -> Result<DiscountResolution, ServiceError> {
        if cart_items.is_empty() {
            return Err(ServiceError::InvalidInput(
                "Cart must contain at least one item".to_string(),
            ));
        }
        for item in cart_items {
            if item.quantity <= Decimal::ZERO || item.unit_price < Decimal::ZERO {
                return Err(ServiceError::InvalidInput(
                    "Cart items need a positive quantity and a non-negative price".to_string(),
                ));
            }
        }

        let db = &*self.db_pool;
        let catalog = DiscountEntity::find()
            .filter(discount::Column::Active.eq(true))
            .filter(
                Condition::any()
                    .add(discount::Column::BranchId.is_null())
                    .add(discount::Column::BranchId.eq(branch_id)),
            )
            .order_by_asc(discount::Column::Priority)
            .order_by_asc(discount::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(resolve_from_catalog(
            &catalog,
            cart_items,
            actor_is_cashier,
            Utc::now(),
        ))
    }

    /// Whether `role` may apply `discount` directly, needs an approval, or is
    /// blocked outright.
    pub fn can_apply(&self, discount: &discount::Model, role: StaffRole) -> ApplyPermission {
        if role.is_cashier() {
            if !discount.cashier_can_apply {
                return ApplyPermission::Denied;
            }
            if discount.discount_type == DiscountType::Percentage
                && discount.value > self.cashier_ceiling_percent
            {
                return ApplyPermission::RequiresApproval;
            }
        }
        if discount.requires_approval {
            ApplyPermission::RequiresApproval
        } else {
            ApplyPermission::Allowed
        }
    }

    /// Records an immutable `TransactionDiscount` row plus its audit entry.
    ///
    /// Manual specs always need an approver and a reason, and land with
    /// `discount_id = NULL`.
    #[instrument(skip(self, spec))]
    pub async fn apply_discount(
        &self,
        transaction_id: &str,
        spec: DiscountSpec,
        original_amount: Decimal,
        applied_to: AppliedTo,
        product_id: Option<Uuid>,
        item_index: Option<i32>,
        applied_by: Uuid,
        actor_role: StaffRole,
        approver_id: Option<Uuid>,
    ) -> Result<transaction_discount::Model, ServiceError> {
        if original_amount < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Original amount must not be negative".to_string(),
            ));
        }
        if transaction_id.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Transaction reference is required".to_string(),
            ));
        }

        let (discount_id, discount_type, value, reason, required_approval) = match &spec {
            DiscountSpec::Catalog { discount_id } => {
                let db = &*self.db_pool;
                let model = DiscountEntity::find_by_id(*discount_id)
                    .one(db)
                    .await
                    .map_err(ServiceError::db_error)?
                    .ok_or_else(|| {
                        ServiceError::NotFound(format!("Discount {} not found", discount_id))
                    })?;
                if !model.active {
                    return Err(ServiceError::InvalidState(format!(
                        "Discount {} is no longer active",
                        discount_id
                    )));
                }

                let required = match self.can_apply(&model, actor_role) {
                    ApplyPermission::Allowed => false,
                    ApplyPermission::RequiresApproval => {
                        if approver_id.is_none() {
                            return Err(ServiceError::Unauthorized(format!(
                                "Discount '{}' requires a manager approval",
                                model.name
                            )));
                        }
                        true
                    }
                    ApplyPermission::Denied => {
                        return Err(ServiceError::Forbidden(format!(
                            "Cashiers may not apply discount '{}'",
                            model.name
                        )))
                    }
                };
                (
                    Some(model.id),
                    model.discount_type,
                    model.value,
                    None,
                    required,
                )
            }
            DiscountSpec::Manual {
                discount_type,
                value,
                reason,
            } => {
                if approver_id.is_none() {
                    return Err(ServiceError::Unauthorized(
                        "Manual discounts require an approver".to_string(),
                    ));
                }
                if reason.trim().is_empty() {
                    return Err(ServiceError::ValidationError(
                        "Manual discounts require a reason".to_string(),
                    ));
                }
                validate_discount_value(*discount_type, *value)?;
                (None, *discount_type, *value, Some(reason.clone()), true)
            }
        };

        let discount_amount =
            calculate_discount_amount(discount_type, value, original_amount).min(original_amount);
        let final_amount = original_amount - discount_amount;

        let db = &*self.db_pool;
        let now = Utc::now();
        let transaction_id = transaction_id.to_string();
        let event_transaction_id = transaction_id.clone();

        let model = db
            .transaction::<_, transaction_discount::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let row = transaction_discount::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        transaction_id: Set(transaction_id),
                        discount_id: Set(discount_id),
                        applied_to: Set(applied_to),
                        product_id: Set(product_id),
                        item_index: Set(item_index),
                        discount_type: Set(discount_type),
                        discount_value: Set(value),
                        discount_amount: Set(discount_amount),
                        original_amount: Set(original_amount),
                        final_amount: Set(final_amount),
                        required_approval: Set(required_approval),
                        approved_by: Set(approver_id),
                        applied_by: Set(applied_by),
                        reason: Set(reason),
                        created_at: Set(now),
                    };
                    let model = row.insert(txn).await.map_err(ServiceError::db_error)?;

                    AuditLogService::record(
                        txn,
                        NewAuditEntry {
                            action: AuditAction::DiscountApplied,
                            entity_type: "transaction_discount",
                            entity_id: model.id.to_string(),
                            actor_id: Some(applied_by),
                            old_value: Some(serde_json::json!({"amount": model.original_amount})),
                            new_value: Some(serde_json::json!({"amount": model.final_amount})),
                            amount_impact: Some(-model.discount_amount),
                            details: model.reason.clone(),
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

        DISCOUNTS_APPLIED.inc();
        self.event_sender
            .send(Event::DiscountApplied {
                transaction_id: event_transaction_id,
                discount_id,
                discount_amount,
                applied_by,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(model)
    }

    /// Adds a discount definition to the catalog.
    #[instrument(skip(self, input))]
    pub async fn create_discount(
        &self,
        input: NewDiscount,
        actor_id: Uuid,
        actor_role: StaffRole,
    ) -> Result<discount::Model, ServiceError> {
        if !actor_role.can_manage_pricing() {
            return Err(ServiceError::Forbidden(
                "Role may not manage the discount catalog".to_string(),
            ));
        }
        if input.name.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Discount name is required".to_string(),
            ));
        }
        validate_discount_value(input.discount_type, input.value)?;
        match input.scope {
            DiscountScope::Item if input.product_id.is_none() => {
                return Err(ServiceError::ValidationError(
                    "Item-scoped discounts need a product".to_string(),
                ))
            }
            DiscountScope::Category if input.category.is_none() => {
                return Err(ServiceError::ValidationError(
                    "Category-scoped discounts need a category".to_string(),
                ))
            }
            _ => {}
        }
        if let (Some(from), Some(until)) = (input.valid_from, input.valid_until) {
            if from >= until {
                return Err(ServiceError::ValidationError(
                    "Validity window must start before it ends".to_string(),
                ));
            }
        }

        let db = &*self.db_pool;
        let now = Utc::now();

        let model = db
            .transaction::<_, discount::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let row = discount::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        name: Set(input.name),
                        scope: Set(input.scope),
                        discount_type: Set(input.discount_type),
                        value: Set(input.value),
                        priority: Set(input.priority),
                        cashier_can_apply: Set(input.cashier_can_apply),
                        requires_approval: Set(input.requires_approval),
                        valid_from: Set(input.valid_from),
                        valid_until: Set(input.valid_until),
                        min_purchase_amount: Set(input.min_purchase_amount),
                        product_id: Set(input.product_id),
                        category: Set(input.category),
                        branch_id: Set(input.branch_id),
                        is_period_based: Set(input.is_period_based),
                        days_of_week: Set(input.days_of_week),
                        start_time: Set(input.start_time),
                        end_time: Set(input.end_time),
                        active: Set(true),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    let model = row.insert(txn).await.map_err(ServiceError::db_error)?;

                    AuditLogService::record(
                        txn,
                        NewAuditEntry {
                            action: AuditAction::DiscountCatalogChanged,
                            entity_type: "discount",
                            entity_id: model.id.to_string(),
                            actor_id: Some(actor_id),
                            old_value: None,
                            new_value: serde_json::to_value(&model).ok(),
                            amount_impact: None,
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

        info!(discount_id = %model.id, "Created catalog discount");
        Ok(model)
    }

    /// Deactivates a definition; applied instances are untouched.
    #[instrument(skip(self))]
    pub async fn deactivate_discount(
        &self,
        discount_id: Uuid,
        actor_id: Uuid,
        actor_role: StaffRole,
    ) -> Result<discount::Model, ServiceError> {
        if !actor_role.can_manage_pricing() {
            return Err(ServiceError::Forbidden(
                "Role may not manage the discount catalog".to_string(),
            ));
        }

        let db = &*self.db_pool;
        let model = DiscountEntity::find_by_id(discount_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Discount {} not found", discount_id)))?;

        if !model.active {
            return Err(ServiceError::InvalidState(format!(
                "Discount {} is already inactive",
                discount_id
            )));
        }

        let now = Utc::now();
        db.transaction::<_, discount::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                let mut active: discount::ActiveModel = model.into();
                active.active = Set(false);
                active.updated_at = Set(now);
                let updated = active.update(txn).await.map_err(ServiceError::db_error)?;

                AuditLogService::record(
                    txn,
                    NewAuditEntry {
                        action: AuditAction::DiscountCatalogChanged,
                        entity_type: "discount",
                        entity_id: updated.id.to_string(),
                        actor_id: Some(actor_id),
                        old_value: Some(serde_json::json!({"active": true})),
                        new_value: Some(serde_json::json!({"active": false})),
                        amount_impact: None,
                        details: None,
                    },
                )
                .await?;

                Ok(updated)
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })
    }

    /// Paginated catalog listing.
    #[instrument(skip(self))]
    pub async fn list_discounts(
        &self,
        branch_id: Option<Uuid>,
        include_inactive: bool,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<discount::Model>, u64), ServiceError> {
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
        let mut query = DiscountEntity::find();
        if let Some(branch_id) = branch_id {
            query = query.filter(
                Condition::any()
                    .add(discount::Column::BranchId.is_null())
                    .add(discount::Column::BranchId.eq(branch_id)),
            );
        }
        if !include_inactive {
            query = query.filter(discount::Column::Active.eq(true));
        }
        query = query
            .order_by_asc(discount::Column::Priority)
            .order_by_asc(discount::Column::Id);

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let discounts = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((discounts, total))
    }

    #[instrument(skip(self))]
    pub async fn get_discount(&self, discount_id: Uuid) -> Result<discount::Model, ServiceError> {
        let db = &*self.db_pool;
        DiscountEntity::find_by_id(discount_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Discount {} not found", discount_id)))
    }
}

/// `percentage` → `amount × value/100`; `fixed` → `min(value, amount)`.
/// Never more than the amount being discounted, never negative.
pub fn calculate_discount_amount(
    discount_type: DiscountType,
    value: Decimal,
    amount: Decimal,
) -> Decimal {
    let raw = match discount_type {
        DiscountType::Percentage => (amount * value / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        DiscountType::Fixed => value.min(amount),
    };
    raw.clamp(Decimal::ZERO, amount)
}

fn validate_discount_value(discount_type: DiscountType, value: Decimal) -> Result<(), ServiceError> {
    if value < Decimal::ZERO {
        return Err(ServiceError::ValidationError(
            "Discount value must not be negative".to_string(),
        ));
    }
    if discount_type == DiscountType::Percentage && value > Decimal::ONE_HUNDRED {
        return Err(ServiceError::ValidationError(
            "Percentage discounts cannot exceed 100".to_string(),
        ));
    }
    Ok(())
}

fn window_contains(discount: &discount::Model, now: DateTime<Utc>) -> bool {
    if let Some(from) = discount.valid_from {
        if now < from {
            return false;
        }
    }
    if let Some(until) = discount.valid_until {
        if now > until {
            return false;
        }
    }
    true
}

fn line_applicable(discount: &discount::Model, item: &CartItemInput) -> bool {
    match discount.scope {
        DiscountScope::Item => discount.product_id == Some(item.product_id),
        DiscountScope::Category => match (&discount.category, &item.category) {
            (Some(wanted), Some(actual)) => wanted.eq_ignore_ascii_case(actual),
            _ => false,
        },
        DiscountScope::Bill => false,
    }
}

/// Pure resolution over a catalog snapshot. The catalog is expected sorted by
/// (priority, id) ascending; winners are simply the first qualifying entry,
/// which makes the tie-break stable and documented: lower priority number
/// first, then ascending discount id.
pub fn resolve_from_catalog(
    catalog: &[discount::Model],
    cart_items: &[CartItemInput],
    actor_is_cashier: bool,
    now: DateTime<Utc>,
) -> DiscountResolution {
    let qualifies = |d: &&discount::Model| -> bool {
        d.active
            && window_contains(d, now)
            && d.applies_at(now)
            && (!actor_is_cashier || d.cashier_can_apply)
    };

    let cart_total: Decimal = cart_items.iter().map(|i| i.amount()).sum();

    let mut item_discounts = Vec::new();
    for (index, item) in cart_items.iter().enumerate() {
        let winner = catalog
            .iter()
            .filter(qualifies)
            .filter(|d| line_applicable(d, item))
            .min_by_key(|d| (d.priority, d.id));

        if let Some(d) = winner {
            let amount = calculate_discount_amount(d.discount_type, d.value, item.amount());
            if amount > Decimal::ZERO {
                item_discounts.push(ItemDiscountChoice {
                    item_index: index,
                    discount: AppliedDiscount {
                        discount_id: d.id,
                        name: d.name.clone(),
                        discount_type: d.discount_type,
                        value: d.value,
                        amount,
                    },
                });
            }
        }
    }

    // Bill-level discounts only come into play when no line won anything;
    // stacking the two would compound savings and muddy the audit trail.
    let bill_discount = if item_discounts.is_empty() {
        catalog
            .iter()
            .filter(qualifies)
            .filter(|d| d.scope == DiscountScope::Bill)
            .filter(|d| {
                d.min_purchase_amount
                    .map(|min| cart_total >= min)
                    .unwrap_or(true)
            })
            .min_by_key(|d| (d.priority, d.id))
            .map(|d| AppliedDiscount {
                discount_id: d.id,
                name: d.name.clone(),
                discount_type: d.discount_type,
                value: d.value,
                amount: calculate_discount_amount(d.discount_type, d.value, cart_total),
            })
            .filter(|applied| applied.amount > Decimal::ZERO)
    } else {
        None
    };

    let total_savings: Decimal = item_discounts
        .iter()
        .map(|c| c.discount.amount)
        .chain(bill_discount.iter().map(|b| b.amount))
        .sum();

    DiscountResolution {
        item_discounts,
        bill_discount,
        total_savings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog_discount(
        id_byte: u8,
        scope: DiscountScope,
        discount_type: DiscountType,
        value: Decimal,
        priority: i32,
    ) -> discount::Model {
        discount::Model {
            id: Uuid::from_bytes([id_byte; 16]),
            name: format!("D{}", id_byte),
            scope,
            discount_type,
            value,
            priority,
            cashier_can_apply: true,
            requires_approval: false,
            valid_from: None,
            valid_until: None,
            min_purchase_amount: None,
            product_id: None,
            category: None,
            branch_id: None,
            is_period_based: false,
            days_of_week: None,
            start_time: None,
            end_time: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn item(product: u8, unit_price: Decimal, quantity: Decimal) -> CartItemInput {
        CartItemInput {
            product_id: Uuid::from_bytes([product; 16]),
            category: Some("analgesics".to_string()),
            quantity,
            unit_price,
        }
    }

    #[test]
    fn percentage_and_fixed_amounts() {
        assert_eq!(
            calculate_discount_amount(DiscountType::Percentage, dec!(10), dec!(250)),
            dec!(25)
        );
        assert_eq!(
            calculate_discount_amount(DiscountType::Fixed, dec!(40), dec!(25)),
            dec!(25)
        );
        assert_eq!(
            calculate_discount_amount(DiscountType::Fixed, dec!(40), dec!(100)),
            dec!(40)
        );
    }

    #[test]
    fn item_discount_outranks_bill_discount() {
        let mut item_d = catalog_discount(1, DiscountScope::Item, DiscountType::Percentage, dec!(10), 1);
        item_d.product_id = Some(Uuid::from_bytes([7; 16]));
        let bill_d = catalog_discount(2, DiscountScope::Bill, DiscountType::Percentage, dec!(5), 1);

        let cart = vec![item(7, dec!(100), dec!(1))];
        let resolution = resolve_from_catalog(&[item_d, bill_d], &cart, false, Utc::now());

        assert_eq!(resolution.item_discounts.len(), 1);
        assert_eq!(resolution.item_discounts[0].discount.amount, dec!(10));
        assert!(resolution.bill_discount.is_none());
        assert_eq!(resolution.total_savings, dec!(10));
    }

    #[test]
    fn lowest_priority_number_wins_per_line() {
        let product = Uuid::from_bytes([7; 16]);
        let mut low = catalog_discount(1, DiscountScope::Item, DiscountType::Percentage, dec!(5), 1);
        low.product_id = Some(product);
        let mut high = catalog_discount(2, DiscountScope::Item, DiscountType::Percentage, dec!(50), 2);
        high.product_id = Some(product);

        let cart = vec![item(7, dec!(100), dec!(1))];
        let resolution = resolve_from_catalog(&[high, low], &cart, false, Utc::now());

        assert_eq!(
            resolution.item_discounts[0].discount.discount_id,
            Uuid::from_bytes([1; 16])
        );
        assert_eq!(resolution.item_discounts[0].discount.amount, dec!(5));
    }

    #[test]
    fn equal_priority_breaks_on_discount_id() {
        let product = Uuid::from_bytes([7; 16]);
        let mut a = catalog_discount(9, DiscountScope::Item, DiscountType::Percentage, dec!(5), 1);
        a.product_id = Some(product);
        let mut b = catalog_discount(3, DiscountScope::Item, DiscountType::Percentage, dec!(8), 1);
        b.product_id = Some(product);

        let cart = vec![item(7, dec!(100), dec!(1))];
        let resolution = resolve_from_catalog(&[a, b], &cart, false, Utc::now());

        assert_eq!(
            resolution.item_discounts[0].discount.discount_id,
            Uuid::from_bytes([3; 16])
        );
    }

    #[test]
    fn bill_discount_used_when_no_line_qualifies() {
        let mut bill = catalog_discount(2, DiscountScope::Bill, DiscountType::Fixed, dec!(30), 5);
        bill.min_purchase_amount = Some(dec!(150));

        let cart = vec![item(7, dec!(100), dec!(2))];
        let resolution = resolve_from_catalog(&[bill], &cart, false, Utc::now());

        let applied = resolution.bill_discount.expect("bill discount applies");
        assert_eq!(applied.amount, dec!(30));
        assert!(resolution.item_discounts.is_empty());
    }

    #[test]
    fn bill_minimum_purchase_gate() {
        let mut bill = catalog_discount(2, DiscountScope::Bill, DiscountType::Fixed, dec!(30), 5);
        bill.min_purchase_amount = Some(dec!(500));

        let cart = vec![item(7, dec!(100), dec!(2))];
        let resolution = resolve_from_catalog(&[bill], &cart, false, Utc::now());

        assert!(resolution.bill_discount.is_none());
        assert_eq!(resolution.total_savings, Decimal::ZERO);
    }

    #[test]
    fn cashier_blocked_discounts_are_invisible_to_cashiers() {
        let product = Uuid::from_bytes([7; 16]);
        let mut d = catalog_discount(1, DiscountScope::Item, DiscountType::Percentage, dec!(10), 1);
        d.product_id = Some(product);
        d.cashier_can_apply = false;

        let cart = vec![item(7, dec!(100), dec!(1))];
        let as_cashier = resolve_from_catalog(std::slice::from_ref(&d), &cart, true, Utc::now());
        let as_manager = resolve_from_catalog(std::slice::from_ref(&d), &cart, false, Utc::now());

        assert!(as_cashier.item_discounts.is_empty());
        assert_eq!(as_manager.item_discounts.len(), 1);
    }

    #[test]
    fn expired_window_filters_out() {
        let product = Uuid::from_bytes([7; 16]);
        let mut d = catalog_discount(1, DiscountScope::Item, DiscountType::Percentage, dec!(10), 1);
        d.product_id = Some(product);
        d.valid_until = Some(Utc::now() - chrono::Duration::days(1));

        let cart = vec![item(7, dec!(100), dec!(1))];
        let resolution = resolve_from_catalog(&[d], &cart, false, Utc::now());
        assert!(resolution.item_discounts.is_empty());
    }

    #[test]
    fn category_discount_matches_category_lines() {
        let mut d =
            catalog_discount(1, DiscountScope::Category, DiscountType::Percentage, dec!(20), 1);
        d.category = Some("Analgesics".to_string());

        let cart = vec![item(7, dec!(50), dec!(2))];
        let resolution = resolve_from_catalog(&[d], &cart, false, Utc::now());
        assert_eq!(resolution.item_discounts.len(), 1);
        assert_eq!(resolution.item_discounts[0].discount.amount, dec!(20));
    }
}
