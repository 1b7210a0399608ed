use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One received lot of a product at a branch.
///
/// `current_quantity` only ever moves down through conditional decrements in
/// the batch pricing service; depleted or expired batches are deactivated,
/// never deleted, so profit analysis keeps its history.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_batches")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub branch_id: Uuid,
    pub batch_number: String,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub original_quantity: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub current_quantity: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub purchase_price: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub selling_price: rust_decimal::Decimal,
    pub received_date: NaiveDate,
    pub expiry_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the batch has passed its expiry date as of `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date.map(|d| d < today).unwrap_or(false)
    }

    pub fn is_depleted(&self) -> bool {
        self.current_quantity <= rust_decimal::Decimal::ZERO
    }
}
