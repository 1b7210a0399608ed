use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-product price governance. `branch_id = NULL` is the global record; a
/// branch-specific record shadows the global one for the same product.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pricing_controls")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Uuid,
    pub branch_id: Option<Uuid>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub default_selling_price: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub min_selling_price: rust_decimal::Decimal,
    /// Unbounded when unset.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub max_selling_price: Option<rust_decimal::Decimal>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub max_discount_percentage: Option<rust_decimal::Decimal>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub max_discount_amount: Option<rust_decimal::Decimal>,
    pub allow_manual_price: bool,
    pub requires_approval_below_min: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
