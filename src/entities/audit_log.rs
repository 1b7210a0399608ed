use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Money-affecting actions recorded by the audit sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    #[sea_orm(string_value = "stock_adjustment")]
    StockAdjustment,
    #[sea_orm(string_value = "batch_depleted")]
    BatchDepleted,
    #[sea_orm(string_value = "batch_received")]
    BatchReceived,
    #[sea_orm(string_value = "discount_applied")]
    DiscountApplied,
    #[sea_orm(string_value = "discount_catalog_changed")]
    DiscountCatalogChanged,
    #[sea_orm(string_value = "approval_requested")]
    ApprovalRequested,
    #[sea_orm(string_value = "override_approved")]
    OverrideApproved,
    #[sea_orm(string_value = "override_rejected")]
    OverrideRejected,
    #[sea_orm(string_value = "override_expired")]
    OverrideExpired,
    #[sea_orm(string_value = "price_control_changed")]
    PriceControlChanged,
}

/// Append-only record of a money-affecting action. Write-once: nothing in
/// this crate updates or deletes rows of this table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "audit_log")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: String,
    pub actor_id: Option<Uuid>,
    #[sea_orm(column_type = "JsonBinary")]
    pub old_value: Option<Json>,
    #[sea_orm(column_type = "JsonBinary")]
    pub new_value: Option<Json>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount_impact: Option<rust_decimal::Decimal>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
