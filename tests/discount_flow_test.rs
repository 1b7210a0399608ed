mod common;

use medipos_api::auth::StaffRole;
use medipos_api::entities::audit_log::AuditAction;
use medipos_api::entities::discount::{DiscountScope, DiscountType};
use medipos_api::entities::transaction_discount::AppliedTo;
use medipos_api::errors::ServiceError;
use medipos_api::services::audit::AuditLogService;
use medipos_api::services::discounts::{CartItemInput, DiscountSpec, NewDiscount};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn base_discount(name: &str, scope: DiscountScope, value: rust_decimal::Decimal) -> NewDiscount {
    NewDiscount {
        name: name.to_string(),
        scope,
        discount_type: DiscountType::Percentage,
        value,
        priority: 1,
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
    }
}

#[tokio::test]
async fn item_discount_beats_bill_discount_without_stacking() {
    let db = common::setup_db().await;
    let svc = common::discounts(db.clone());
    let admin = Uuid::new_v4();
    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    let mut item_discount = base_discount("Item 10%", DiscountScope::Item, dec!(10));
    item_discount.product_id = Some(product);
    svc.create_discount(item_discount, admin, StaffRole::BranchAdmin)
        .await
        .expect("create item discount");

    let bill_discount = base_discount("Bill 5%", DiscountScope::Bill, dec!(5));
    svc.create_discount(bill_discount, admin, StaffRole::BranchAdmin)
        .await
        .expect("create bill discount");

    let cart = vec![CartItemInput {
        product_id: product,
        category: None,
        quantity: dec!(1),
        unit_price: dec!(100),
    }];

    let resolution = svc
        .resolve_discounts(&cart, branch, false)
        .await
        .expect("resolve");

    assert_eq!(resolution.item_discounts.len(), 1);
    assert_eq!(resolution.item_discounts[0].discount.amount, dec!(10));
    assert!(resolution.bill_discount.is_none());
    assert_eq!(resolution.total_savings, dec!(10));
}

#[tokio::test]
async fn applying_a_catalog_discount_writes_immutable_row_and_audit() {
    let db = common::setup_db().await;
    let svc = common::discounts(db.clone());
    let audit = AuditLogService::new(db.clone());
    let admin = Uuid::new_v4();
    let cashier = Uuid::new_v4();
    let product = Uuid::new_v4();

    let mut catalog = base_discount("Item 10%", DiscountScope::Item, dec!(10));
    catalog.product_id = Some(product);
    let created = svc
        .create_discount(catalog, admin, StaffRole::BranchAdmin)
        .await
        .expect("create discount");

    let applied = svc
        .apply_discount(
            "TXN-1001",
            DiscountSpec::Catalog {
                discount_id: created.id,
            },
            dec!(250),
            AppliedTo::Item,
            Some(product),
            Some(0),
            cashier,
            StaffRole::Cashier,
            None,
        )
        .await
        .expect("apply");

    assert_eq!(applied.discount_amount, dec!(25));
    assert_eq!(applied.final_amount, dec!(225));
    assert_eq!(applied.original_amount, dec!(250));
    assert_eq!(applied.discount_id, Some(created.id));
    assert!(!applied.required_approval);

    let trail = audit
        .list_for_entity("transaction_discount", &applied.id.to_string())
        .await
        .expect("audit trail");
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, AuditAction::DiscountApplied);
    assert_eq!(trail[0].amount_impact, Some(dec!(-25)));
}

#[tokio::test]
async fn manual_discount_requires_approver_and_reason() {
    let db = common::setup_db().await;
    let svc = common::discounts(db.clone());
    let cashier = Uuid::new_v4();
    let manager = Uuid::new_v4();

    let unapproved = svc
        .apply_discount(
            "TXN-1002",
            DiscountSpec::Manual {
                discount_type: DiscountType::Fixed,
                value: dec!(20),
                reason: "damaged packaging".to_string(),
            },
            dec!(100),
            AppliedTo::Bill,
            None,
            None,
            cashier,
            StaffRole::Cashier,
            None,
        )
        .await;
    assert!(matches!(unapproved, Err(ServiceError::Unauthorized(_))));

    let applied = svc
        .apply_discount(
            "TXN-1002",
            DiscountSpec::Manual {
                discount_type: DiscountType::Fixed,
                value: dec!(20),
                reason: "damaged packaging".to_string(),
            },
            dec!(100),
            AppliedTo::Bill,
            None,
            None,
            cashier,
            StaffRole::Cashier,
            Some(manager),
        )
        .await
        .expect("manual apply with approver");

    assert_eq!(applied.discount_id, None);
    assert_eq!(applied.discount_amount, dec!(20));
    assert_eq!(applied.final_amount, dec!(80));
    assert!(applied.required_approval);
    assert_eq!(applied.approved_by, Some(manager));
    assert_eq!(applied.reason.as_deref(), Some("damaged packaging"));
}

#[tokio::test]
async fn fixed_discount_never_exceeds_the_amount() {
    let db = common::setup_db().await;
    let svc = common::discounts(db.clone());
    let manager = Uuid::new_v4();

    let applied = svc
        .apply_discount(
            "TXN-1003",
            DiscountSpec::Manual {
                discount_type: DiscountType::Fixed,
                value: dec!(500),
                reason: "goodwill".to_string(),
            },
            dec!(120),
            AppliedTo::Bill,
            None,
            None,
            manager,
            StaffRole::Manager,
            Some(manager),
        )
        .await
        .expect("apply");

    assert_eq!(applied.discount_amount, dec!(120));
    assert_eq!(applied.final_amount, dec!(0));
}

#[tokio::test]
async fn cashier_blocked_catalog_discount_is_forbidden() {
    let db = common::setup_db().await;
    let svc = common::discounts(db.clone());
    let admin = Uuid::new_v4();
    let cashier = Uuid::new_v4();
    let product = Uuid::new_v4();

    let mut restricted = base_discount("Staff only", DiscountScope::Item, dec!(15));
    restricted.product_id = Some(product);
    restricted.cashier_can_apply = false;
    let created = svc
        .create_discount(restricted, admin, StaffRole::BranchAdmin)
        .await
        .expect("create discount");

    let result = svc
        .apply_discount(
            "TXN-1004",
            DiscountSpec::Catalog {
                discount_id: created.id,
            },
            dec!(100),
            AppliedTo::Item,
            Some(product),
            Some(0),
            cashier,
            StaffRole::Cashier,
            None,
        )
        .await;
    assert!(matches!(result, Err(ServiceError::Forbidden(_))));

    // A manager can apply the same discount directly.
    let applied = svc
        .apply_discount(
            "TXN-1004",
            DiscountSpec::Catalog {
                discount_id: created.id,
            },
            dec!(100),
            AppliedTo::Item,
            Some(product),
            Some(0),
            admin,
            StaffRole::Manager,
            None,
        )
        .await
        .expect("manager applies");
    assert_eq!(applied.discount_amount, dec!(15));
}

#[tokio::test]
async fn cashier_above_ceiling_needs_approval() {
    let db = common::setup_db().await;
    // Harness configures a 10% cashier ceiling.
    let svc = common::discounts(db.clone());
    let admin = Uuid::new_v4();
    let cashier = Uuid::new_v4();
    let manager = Uuid::new_v4();
    let product = Uuid::new_v4();

    let mut deep = base_discount("Deep 25%", DiscountScope::Item, dec!(25));
    deep.product_id = Some(product);
    let created = svc
        .create_discount(deep, admin, StaffRole::BranchAdmin)
        .await
        .expect("create discount");

    let without_approver = svc
        .apply_discount(
            "TXN-1005",
            DiscountSpec::Catalog {
                discount_id: created.id,
            },
            dec!(100),
            AppliedTo::Item,
            Some(product),
            Some(0),
            cashier,
            StaffRole::Cashier,
            None,
        )
        .await;
    assert!(matches!(without_approver, Err(ServiceError::Unauthorized(_))));

    let with_approver = svc
        .apply_discount(
            "TXN-1005",
            DiscountSpec::Catalog {
                discount_id: created.id,
            },
            dec!(100),
            AppliedTo::Item,
            Some(product),
            Some(0),
            cashier,
            StaffRole::Cashier,
            Some(manager),
        )
        .await
        .expect("approved apply");
    assert!(with_approver.required_approval);
    assert_eq!(with_approver.approved_by, Some(manager));
}

#[tokio::test]
async fn deactivated_discount_no_longer_resolves_or_applies() {
    let db = common::setup_db().await;
    let svc = common::discounts(db.clone());
    let admin = Uuid::new_v4();
    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    let mut catalog = base_discount("Retired", DiscountScope::Item, dec!(10));
    catalog.product_id = Some(product);
    let created = svc
        .create_discount(catalog, admin, StaffRole::BranchAdmin)
        .await
        .expect("create discount");

    svc.deactivate_discount(created.id, admin, StaffRole::BranchAdmin)
        .await
        .expect("deactivate");

    let cart = vec![CartItemInput {
        product_id: product,
        category: None,
        quantity: dec!(1),
        unit_price: dec!(100),
    }];
    let resolution = svc
        .resolve_discounts(&cart, branch, false)
        .await
        .expect("resolve");
    assert!(resolution.item_discounts.is_empty());

    let apply = svc
        .apply_discount(
            "TXN-1006",
            DiscountSpec::Catalog {
                discount_id: created.id,
            },
            dec!(100),
            AppliedTo::Item,
            Some(product),
            Some(0),
            admin,
            StaffRole::Manager,
            None,
        )
        .await;
    assert!(matches!(apply, Err(ServiceError::InvalidState(_))));
}
