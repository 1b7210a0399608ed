use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status for price override requests.
///
/// Transitions only out of `Pending`; the other three states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OverrideStatus {
    Pending,
    Approved,
    Rejected,
    Expired,
}

impl OverrideStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverrideStatus::Pending => "pending",
            OverrideStatus::Approved => "approved",
            OverrideStatus::Rejected => "rejected",
            OverrideStatus::Expired => "expired",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(OverrideStatus::Pending),
            "approved" => Some(OverrideStatus::Approved),
            "rejected" => Some(OverrideStatus::Rejected),
            "expired" => Some(OverrideStatus::Expired),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OverrideStatus::Pending)
    }
}

/// A pending or decided exception to pricing bounds.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "price_override_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub batch_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub original_price: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub requested_price: rust_decimal::Decimal,
    /// Snapshot of the control's floor at request time (0 when no control).
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub min_allowed_price: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub quantity: rust_decimal::Decimal,
    pub reason: String,
    pub branch_id: Uuid,
    pub requested_by: Uuid,
    pub status: String,
    pub expires_at: DateTime<Utc>,
    pub approved_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn status_enum(&self) -> Option<OverrideStatus> {
        OverrideStatus::from_str(&self.status)
    }

    /// A pending request past its deadline is non-actionable even before the
    /// lazy transition has been persisted.
    pub fn is_past_deadline(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}
