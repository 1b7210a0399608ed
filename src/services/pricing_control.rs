//! Pricing Control & Price Override Workflow
//!
//! Enforces per-product price and discount bounds (branch-specific records
//! shadow global ones) and provides the audited exception path for selling
//! below the configured floor. Override requests expire lazily: a pending
//! request past its deadline is transitioned the first time anyone looks at
//! it; `expire_stale_requests` exists for callers that want a sweep.

use chrono::{Duration, Utc};
use lazy_static::lazy_static;
use prometheus::{register_int_counter, IntCounter};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionError, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::StaffRole;
use crate::entities::audit_log::AuditAction;
use crate::entities::price_override_request::{
    self, Entity as PriceOverrideRequestEntity, OverrideStatus,
};
use crate::entities::pricing_control::{self, Entity as PricingControlEntity};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::audit::{AuditLogService, NewAuditEntry};

lazy_static! {
    static ref OVERRIDE_REQUESTS: IntCounter = register_int_counter!(
        "pos_price_override_requests_total",
        "Total number of price override requests created"
    )
    .expect("metric can be created");
    static ref OVERRIDE_APPROVALS: IntCounter = register_int_counter!(
        "pos_price_override_approvals_total",
        "Total number of price override requests approved"
    )
    .expect("metric can be created");
}

/// Outcome of a price or discount bound check. `requires_approval`
/// distinguishes "escalatable through the override workflow" from a flat
/// rejection.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceValidation {
    pub valid: bool,
    pub requires_approval: bool,
    pub manual_price_allowed: bool,
    pub min_selling_price: Option<Decimal>,
    pub max_selling_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DiscountValidation {
    pub valid: bool,
    pub max_discount_percentage: Option<Decimal>,
    pub max_discount_amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Upsert payload for a pricing control record.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PricingControlInput {
    pub product_id: Uuid,
    pub branch_id: Option<Uuid>,
    pub default_selling_price: Decimal,
    pub min_selling_price: Decimal,
    pub max_selling_price: Option<Decimal>,
    pub max_discount_percentage: Option<Decimal>,
    pub max_discount_amount: Option<Decimal>,
    #[serde(default)]
    pub allow_manual_price: bool,
    #[serde(default = "default_true")]
    pub requires_approval_below_min: bool,
}

fn default_true() -> bool {
    true
}

/// Payload for opening a price override request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OverrideRequestInput {
    pub product_id: Uuid,
    pub batch_id: Option<Uuid>,
    pub original_price: Decimal,
    pub requested_price: Decimal,
    pub quantity: Decimal,
    pub reason: String,
    pub branch_id: Uuid,
    pub requested_by: Uuid,
}

/// Approval response returned by the quick-approve path.
#[derive(Debug, Clone, Serialize)]
pub struct OverrideDecision {
    pub success: bool,
    pub message: String,
    pub request: price_override_request::Model,
}

#[derive(Clone)]
pub struct PricingControlService {
    db_pool: Arc<DatabaseConnection>,
    event_sender: EventSender,
    override_ttl_minutes: i64,
}

impl PricingControlService {
    pub fn new(
        db_pool: Arc<DatabaseConnection>,
        event_sender: EventSender,
        override_ttl_minutes: i64,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            override_ttl_minutes,
        }
    }

    /// The control governing (product, branch): the branch-specific record
    /// when one exists, otherwise the global record, otherwise none.
    #[instrument(skip(self))]
    pub async fn get_control(
        &self,
        product_id: Uuid,
        branch_id: Option<Uuid>,
    ) -> Result<Option<pricing_control::Model>, ServiceError> {
        let db = &*self.db_pool;

        if let Some(branch_id) = branch_id {
            let branch_control = PricingControlEntity::find()
                .filter(pricing_control::Column::ProductId.eq(product_id))
                .filter(pricing_control::Column::BranchId.eq(branch_id))
                .one(db)
                .await
                .map_err(ServiceError::db_error)?;
            if branch_control.is_some() {
                return Ok(branch_control);
            }
        }

        PricingControlEntity::find()
            .filter(pricing_control::Column::ProductId.eq(product_id))
            .filter(pricing_control::Column::BranchId.is_null())
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Checks a proposed selling price against the applicable control.
    /// Absence of any control means valid with no approval needed.
    #[instrument(skip(self))]
    pub async fn validate_price(
        &self,
        product_id: Uuid,
        price: Decimal,
        branch_id: Option<Uuid>,
    ) -> Result<PriceValidation, ServiceError> {
        let control = match self.get_control(product_id, branch_id).await? {
            Some(control) => control,
            None => {
                return Ok(PriceValidation {
                    valid: true,
                    requires_approval: false,
                    manual_price_allowed: true,
                    min_selling_price: None,
                    max_selling_price: None,
                    message: None,
                })
            }
        };

        if price < control.min_selling_price {
            return Ok(PriceValidation {
                valid: false,
                requires_approval: control.requires_approval_below_min,
                manual_price_allowed: control.allow_manual_price,
                min_selling_price: Some(control.min_selling_price),
                max_selling_price: control.max_selling_price,
                message: Some(format!(
                    "Price {} is below the minimum selling price {}",
                    price, control.min_selling_price
                )),
            });
        }

        if let Some(max) = control.max_selling_price {
            if price > max {
                return Ok(PriceValidation {
                    valid: false,
                    requires_approval: false,
                    manual_price_allowed: control.allow_manual_price,
                    min_selling_price: Some(control.min_selling_price),
                    max_selling_price: Some(max),
                    message: Some(format!(
                        "Price {} exceeds the maximum selling price {}",
                        price, max
                    )),
                });
            }
        }

        Ok(PriceValidation {
            valid: true,
            requires_approval: false,
            manual_price_allowed: control.allow_manual_price,
            min_selling_price: Some(control.min_selling_price),
            max_selling_price: control.max_selling_price,
            message: None,
        })
    }

    /// Checks a proposed discount (percentage and/or fixed amount) against
    /// the control's caps. Absence of a control means always valid.
    #[instrument(skip(self))]
    pub async fn validate_discount(
        &self,
        product_id: Uuid,
        discount_percentage: Option<Decimal>,
        discount_amount: Option<Decimal>,
        branch_id: Option<Uuid>,
    ) -> Result<DiscountValidation, ServiceError> {
        let control = match self.get_control(product_id, branch_id).await? {
            Some(control) => control,
            None => {
                return Ok(DiscountValidation {
                    valid: true,
                    max_discount_percentage: None,
                    max_discount_amount: None,
                    message: None,
                })
            }
        };

        if let (Some(pct), Some(max_pct)) = (discount_percentage, control.max_discount_percentage)
        {
            if pct > max_pct {
                return Ok(DiscountValidation {
                    valid: false,
                    max_discount_percentage: Some(max_pct),
                    max_discount_amount: control.max_discount_amount,
                    message: Some(format!(
                        "Discount {}% exceeds the allowed maximum {}%",
                        pct, max_pct
                    )),
                });
            }
        }

        if let (Some(amount), Some(max_amount)) = (discount_amount, control.max_discount_amount) {
            if amount > max_amount {
                return Ok(DiscountValidation {
                    valid: false,
                    max_discount_percentage: control.max_discount_percentage,
                    max_discount_amount: Some(max_amount),
                    message: Some(format!(
                        "Discount amount {} exceeds the allowed maximum {}",
                        amount, max_amount
                    )),
                });
            }
        }

        Ok(DiscountValidation {
            valid: true,
            max_discount_percentage: control.max_discount_percentage,
            max_discount_amount: control.max_discount_amount,
            message: None,
        })
    }

    /// Whether selling at `price` would need a manager approval.
    pub async fn needs_approval(
        &self,
        product_id: Uuid,
        price: Decimal,
        branch_id: Option<Uuid>,
    ) -> Result<bool, ServiceError> {
        let validation = self.validate_price(product_id, price, branch_id).await?;
        Ok(validation.requires_approval)
    }

    /// Upserts the control for (product, branch) and audits the change.
    #[instrument(skip(self))]
    pub async fn set_pricing_control(
        &self,
        input: PricingControlInput,
        actor_id: Uuid,
        actor_role: StaffRole,
    ) -> Result<pricing_control::Model, ServiceError> {
        if !actor_role.can_manage_pricing() {
            return Err(ServiceError::Forbidden(
                "Role may not manage pricing controls".to_string(),
            ));
        }
        if input.min_selling_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Minimum selling price must not be negative".to_string(),
            ));
        }
        if let Some(max) = input.max_selling_price {
            if input.min_selling_price > max {
                return Err(ServiceError::ValidationError(format!(
                    "Minimum selling price {} exceeds maximum {}",
                    input.min_selling_price, max
                )));
            }
        }
        if let Some(pct) = input.max_discount_percentage {
            if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
                return Err(ServiceError::ValidationError(
                    "Maximum discount percentage must be between 0 and 100".to_string(),
                ));
            }
        }

        let db = &*self.db_pool;
        let existing = {
            let mut query = PricingControlEntity::find()
                .filter(pricing_control::Column::ProductId.eq(input.product_id));
            query = match input.branch_id {
                Some(branch_id) => query.filter(pricing_control::Column::BranchId.eq(branch_id)),
                None => query.filter(pricing_control::Column::BranchId.is_null()),
            };
            query.one(db).await.map_err(ServiceError::db_error)?
        };

        let now = Utc::now();
        let old_snapshot = existing
            .as_ref()
            .map(|m| serde_json::to_value(m).unwrap_or_default());
        let product_id = input.product_id;
        let branch_id = input.branch_id;

        let model = db
            .transaction::<_, pricing_control::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let model = match existing {
                        Some(current) => {
                            let mut active: pricing_control::ActiveModel = current.into();
                            active.default_selling_price = Set(input.default_selling_price);
                            active.min_selling_price = Set(input.min_selling_price);
                            active.max_selling_price = Set(input.max_selling_price);
                            active.max_discount_percentage = Set(input.max_discount_percentage);
                            active.max_discount_amount = Set(input.max_discount_amount);
                            active.allow_manual_price = Set(input.allow_manual_price);
                            active.requires_approval_below_min =
                                Set(input.requires_approval_below_min);
                            active.updated_at = Set(now);
                            active.update(txn).await.map_err(ServiceError::db_error)?
                        }
                        None => {
                            let active = pricing_control::ActiveModel {
                                id: Set(Uuid::new_v4()),
                                product_id: Set(input.product_id),
                                branch_id: Set(input.branch_id),
                                default_selling_price: Set(input.default_selling_price),
                                min_selling_price: Set(input.min_selling_price),
                                max_selling_price: Set(input.max_selling_price),
                                max_discount_percentage: Set(input.max_discount_percentage),
                                max_discount_amount: Set(input.max_discount_amount),
                                allow_manual_price: Set(input.allow_manual_price),
                                requires_approval_below_min: Set(input.requires_approval_below_min),
                                created_at: Set(now),
                                updated_at: Set(now),
                            };
                            active.insert(txn).await.map_err(ServiceError::db_error)?
                        }
                    };

                    AuditLogService::record(
                        txn,
                        NewAuditEntry {
                            action: AuditAction::PriceControlChanged,
                            entity_type: "pricing_control",
                            entity_id: model.id.to_string(),
                            actor_id: Some(actor_id),
                            old_value: old_snapshot,
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

        self.event_sender
            .send(Event::PricingControlChanged {
                product_id,
                branch_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(model)
    }

    /// Opens a pending override request, snapshotting the current floor.
    /// This is the only supported path to sell below the configured minimum.
    #[instrument(skip(self))]
    pub async fn create_override_request(
        &self,
        input: OverrideRequestInput,
    ) -> Result<price_override_request::Model, ServiceError> {
        if input.requested_price < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Requested price must not be negative".to_string(),
            ));
        }
        if input.quantity <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Quantity must be positive".to_string(),
            ));
        }
        if input.reason.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "A reason is required for a price override".to_string(),
            ));
        }

        let min_allowed = self
            .get_control(input.product_id, Some(input.branch_id))
            .await?
            .map(|c| c.min_selling_price)
            .unwrap_or(Decimal::ZERO);

        let db = &*self.db_pool;
        let now = Utc::now();
        let expires_at = now + Duration::minutes(self.override_ttl_minutes);
        let product_id = input.product_id;
        let requested_price = input.requested_price;

        let model = db
            .transaction::<_, price_override_request::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let request = price_override_request::ActiveModel {
                        id: Set(Uuid::new_v4()),
                        product_id: Set(input.product_id),
                        batch_id: Set(input.batch_id),
                        original_price: Set(input.original_price),
                        requested_price: Set(input.requested_price),
                        min_allowed_price: Set(min_allowed),
                        quantity: Set(input.quantity),
                        reason: Set(input.reason.clone()),
                        branch_id: Set(input.branch_id),
                        requested_by: Set(input.requested_by),
                        status: Set(OverrideStatus::Pending.as_str().to_string()),
                        expires_at: Set(expires_at),
                        approved_by: Set(None),
                        decided_at: Set(None),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    let model = request.insert(txn).await.map_err(ServiceError::db_error)?;

                    AuditLogService::record(
                        txn,
                        NewAuditEntry {
                            action: AuditAction::ApprovalRequested,
                            entity_type: "price_override_request",
                            entity_id: model.id.to_string(),
                            actor_id: Some(model.requested_by),
                            old_value: None,
                            new_value: Some(serde_json::json!({
                                "original_price": model.original_price,
                                "requested_price": model.requested_price,
                                "min_allowed_price": model.min_allowed_price,
                            })),
                            amount_impact: Some(
                                (model.requested_price - model.original_price) * model.quantity,
                            ),
                            details: Some(model.reason.clone()),
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

        OVERRIDE_REQUESTS.inc();
        self.event_sender
            .send(Event::PriceOverrideRequested {
                request_id: model.id,
                product_id,
                requested_price,
                expires_at,
            })
            .await
            .map_err(ServiceError::EventError)?;

        info!(request_id = %model.id, "Created price override request");
        Ok(model)
    }

    /// Fetches a request, lazily persisting the pending → expired transition
    /// when its deadline has passed.
    #[instrument(skip(self))]
    pub async fn get_override_request(
        &self,
        request_id: Uuid,
    ) -> Result<price_override_request::Model, ServiceError> {
        let db = &*self.db_pool;
        let request = PriceOverrideRequestEntity::find_by_id(request_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Override request {} not found", request_id))
            })?;

        if request.status_enum() == Some(OverrideStatus::Pending)
            && request.is_past_deadline(Utc::now())
        {
            return self.mark_expired(request).await;
        }

        Ok(request)
    }

    async fn mark_expired(
        &self,
        request: price_override_request::Model,
    ) -> Result<price_override_request::Model, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        db.transaction::<_, price_override_request::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                let request_id = request.id;
                let mut active: price_override_request::ActiveModel = request.into();
                active.status = Set(OverrideStatus::Expired.as_str().to_string());
                active.decided_at = Set(Some(now));
                active.updated_at = Set(now);
                let model = active.update(txn).await.map_err(ServiceError::db_error)?;

                AuditLogService::record(
                    txn,
                    NewAuditEntry {
                        action: AuditAction::OverrideExpired,
                        entity_type: "price_override_request",
                        entity_id: request_id.to_string(),
                        actor_id: None,
                        old_value: Some(serde_json::json!({"status": "pending"})),
                        new_value: Some(serde_json::json!({"status": "expired"})),
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
        })
    }

    /// PIN-authenticated fast path for floor managers. The role check happens
    /// here, not only at the API boundary, because trusted internal callers
    /// reach this operation too.
    #[instrument(skip(self))]
    pub async fn quick_approve_with_pin(
        &self,
        request_id: Uuid,
        approver_id: Uuid,
        approver_role: StaffRole,
    ) -> Result<OverrideDecision, ServiceError> {
        if !approver_role.can_quick_approve() {
            return Err(ServiceError::Forbidden(format!(
                "Role {} may not approve price overrides",
                approver_role.as_str()
            )));
        }

        let request = self.get_override_request(request_id).await?;
        match request.status_enum() {
            Some(OverrideStatus::Pending) => {}
            Some(other) => {
                return Err(ServiceError::InvalidState(format!(
                    "Override request {} is already {}",
                    request_id,
                    other.as_str()
                )))
            }
            None => {
                return Err(ServiceError::InvalidState(format!(
                    "Override request {} has an unknown status '{}'",
                    request_id, request.status
                )))
            }
        }

        let model = self
            .decide(request, OverrideStatus::Approved, approver_id)
            .await?;

        OVERRIDE_APPROVALS.inc();
        self.event_sender
            .send(Event::PriceOverrideApproved {
                request_id,
                approved_by: approver_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(OverrideDecision {
            success: true,
            message: format!(
                "Override approved: selling at {} (floor {})",
                model.requested_price, model.min_allowed_price
            ),
            request: model,
        })
    }

    /// Explicit rejection; terminal.
    #[instrument(skip(self))]
    pub async fn reject_override(
        &self,
        request_id: Uuid,
        rejecter_id: Uuid,
        rejecter_role: StaffRole,
    ) -> Result<OverrideDecision, ServiceError> {
        if !rejecter_role.can_quick_approve() {
            return Err(ServiceError::Forbidden(format!(
                "Role {} may not decide price overrides",
                rejecter_role.as_str()
            )));
        }

        let request = self.get_override_request(request_id).await?;
        if request.status_enum() != Some(OverrideStatus::Pending) {
            return Err(ServiceError::InvalidState(format!(
                "Override request {} is already {}",
                request_id, request.status
            )));
        }

        let model = self
            .decide(request, OverrideStatus::Rejected, rejecter_id)
            .await?;

        self.event_sender
            .send(Event::PriceOverrideRejected {
                request_id,
                rejected_by: rejecter_id,
            })
            .await
            .map_err(ServiceError::EventError)?;

        Ok(OverrideDecision {
            success: true,
            message: "Override rejected".to_string(),
            request: model,
        })
    }

    async fn decide(
        &self,
        request: price_override_request::Model,
        status: OverrideStatus,
        decider_id: Uuid,
    ) -> Result<price_override_request::Model, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        db.transaction::<_, price_override_request::Model, ServiceError>(move |txn| {
            Box::pin(async move {
                let request_id = request.id;
                let old_status = request.status.clone();
                let mut active: price_override_request::ActiveModel = request.into();
                active.status = Set(status.as_str().to_string());
                active.approved_by = Set(Some(decider_id));
                active.decided_at = Set(Some(now));
                active.updated_at = Set(now);
                let model = active.update(txn).await.map_err(ServiceError::db_error)?;

                AuditLogService::record(
                    txn,
                    NewAuditEntry {
                        action: match status {
                            OverrideStatus::Approved => AuditAction::OverrideApproved,
                            _ => AuditAction::OverrideRejected,
                        },
                        entity_type: "price_override_request",
                        entity_id: request_id.to_string(),
                        actor_id: Some(decider_id),
                        old_value: Some(serde_json::json!({"status": old_status})),
                        new_value: Some(serde_json::json!({"status": status.as_str()})),
                        amount_impact: Some(
                            (model.requested_price - model.original_price) * model.quantity,
                        ),
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
        })
    }

    /// Bulk-marks pending requests past their deadline as expired. Returns
    /// the number of requests transitioned.
    #[instrument(skip(self))]
    pub async fn expire_stale_requests(&self) -> Result<u64, ServiceError> {
        let db = &*self.db_pool;
        let now = Utc::now();

        let stale = PriceOverrideRequestEntity::find()
            .filter(price_override_request::Column::Status.eq(OverrideStatus::Pending.as_str()))
            .filter(price_override_request::Column::ExpiresAt.lt(now))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut expired = 0u64;
        for request in stale {
            let request_id = request.id;
            match self.mark_expired(request).await {
                Ok(_) => expired += 1,
                Err(e) => {
                    warn!(request_id = %request_id, error = %e, "Failed to expire override request");
                }
            }
        }

        if expired > 0 {
            info!(expired = expired, "Expired stale override requests");
        }
        Ok(expired)
    }

    /// Paginated override request listing, newest first.
    #[instrument(skip(self))]
    pub async fn list_override_requests(
        &self,
        status: Option<OverrideStatus>,
        branch_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<(Vec<price_override_request::Model>, u64), ServiceError> {
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
        let mut query = PriceOverrideRequestEntity::find();
        if let Some(status) = status {
            query = query.filter(price_override_request::Column::Status.eq(status.as_str()));
        }
        if let Some(branch_id) = branch_id {
            query = query.filter(price_override_request::Column::BranchId.eq(branch_id));
        }
        query = query.order_by_desc(price_override_request::Column::CreatedAt);

        let paginator = query.paginate(db, limit);
        let total = paginator.num_items().await.map_err(ServiceError::db_error)?;
        let requests = paginator
            .fetch_page(page - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((requests, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_are_terminal() {
        assert!(!OverrideStatus::Pending.is_terminal());
        assert!(OverrideStatus::Approved.is_terminal());
        assert!(OverrideStatus::Rejected.is_terminal());
        assert!(OverrideStatus::Expired.is_terminal());
    }

    #[test]
    fn status_round_trips() {
        for status in [
            OverrideStatus::Pending,
            OverrideStatus::Approved,
            OverrideStatus::Rejected,
            OverrideStatus::Expired,
        ] {
            assert_eq!(OverrideStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(OverrideStatus::from_str("garbage"), None);
    }
}
