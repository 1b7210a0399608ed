use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a discount definition attaches to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum DiscountScope {
    #[sea_orm(string_value = "item")]
    Item,
    #[sea_orm(string_value = "category")]
    Category,
    #[sea_orm(string_value = "bill")]
    Bill,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    #[sea_orm(string_value = "percentage")]
    Percentage,
    #[sea_orm(string_value = "fixed")]
    Fixed,
}

/// A reusable discount definition. Becomes inapplicable outside its validity
/// window without being deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "discounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub scope: DiscountScope,
    pub discount_type: DiscountType,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub value: rust_decimal::Decimal,
    /// Lower number = higher priority.
    pub priority: i32,
    pub cashier_can_apply: bool,
    pub requires_approval: bool,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub min_purchase_amount: Option<rust_decimal::Decimal>,
    /// Target product for item-scoped discounts.
    pub product_id: Option<Uuid>,
    /// Target category for category-scoped discounts.
    pub category: Option<String>,
    /// `NULL` means every branch.
    pub branch_id: Option<Uuid>,
    /// When set, the day/time columns below gate applicability.
    pub is_period_based: bool,
    /// Comma-separated lowercase weekday abbreviations, e.g. "mon,tue,fri".
    pub days_of_week: Option<String>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Period gate: day-of-week and time-of-day window, both optional.
    /// Non-period discounts always pass.
    pub fn applies_at(&self, at: DateTime<Utc>) -> bool {
        if !self.is_period_based {
            return true;
        }
        if let Some(days) = &self.days_of_week {
            let today = weekday_abbrev(at.weekday());
            if !days.split(',').any(|d| d.trim().eq_ignore_ascii_case(today)) {
                return false;
            }
        }
        let time = at.time();
        if let Some(start) = self.start_time {
            if time < start {
                return false;
            }
        }
        if let Some(end) = self.end_time {
            if time > end {
                return false;
            }
        }
        true
    }
}

fn weekday_abbrev(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "mon",
        Weekday::Tue => "tue",
        Weekday::Wed => "wed",
        Weekday::Thu => "thu",
        Weekday::Fri => "fri",
        Weekday::Sat => "sat",
        Weekday::Sun => "sun",
    }
}
