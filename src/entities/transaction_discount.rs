use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::discount::DiscountType;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
#[serde(rename_all = "snake_case")]
pub enum AppliedTo {
    #[sea_orm(string_value = "item")]
    Item,
    #[sea_orm(string_value = "bill")]
    Bill,
}

/// An applied discount instance. Financial record: inserted once at time of
/// sale, never mutated or deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_discounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: String,
    /// `NULL` for manual ad-hoc discounts.
    pub discount_id: Option<Uuid>,
    pub applied_to: AppliedTo,
    pub product_id: Option<Uuid>,
    pub item_index: Option<i32>,
    pub discount_type: DiscountType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub discount_value: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub discount_amount: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub original_amount: rust_decimal::Decimal,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub final_amount: rust_decimal::Decimal,
    pub required_approval: bool,
    pub approved_by: Option<Uuid>,
    pub applied_by: Uuid,
    /// Free-text justification, mandatory for manual discounts.
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
