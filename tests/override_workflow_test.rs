mod common;

use medipos_api::auth::StaffRole;
use medipos_api::entities::price_override_request::OverrideStatus;
use medipos_api::errors::ServiceError;
use medipos_api::services::pricing_control::{OverrideRequestInput, PricingControlInput};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn control_input(product: Uuid, branch: Option<Uuid>) -> PricingControlInput {
    PricingControlInput {
        product_id: product,
        branch_id: branch,
        default_selling_price: dec!(100),
        min_selling_price: dec!(60),
        max_selling_price: Some(dec!(200)),
        max_discount_percentage: Some(dec!(20)),
        max_discount_amount: Some(dec!(50)),
        allow_manual_price: true,
        requires_approval_below_min: true,
    }
}

fn override_input(product: Uuid, branch: Uuid, requester: Uuid) -> OverrideRequestInput {
    OverrideRequestInput {
        product_id: product,
        batch_id: None,
        original_price: dec!(100),
        requested_price: dec!(50),
        quantity: dec!(2),
        reason: "price match against competitor".to_string(),
        branch_id: branch,
        requested_by: requester,
    }
}

#[tokio::test]
async fn below_minimum_price_is_escalatable_not_denied() {
    let db = common::setup_db().await;
    let svc = common::pricing_control(db.clone(), 30);
    let admin = Uuid::new_v4();
    let product = Uuid::new_v4();

    svc.set_pricing_control(control_input(product, None), admin, StaffRole::SuperAdmin)
        .await
        .expect("set control");

    let validation = svc
        .validate_price(product, dec!(50), None)
        .await
        .expect("validate");
    assert!(!validation.valid);
    assert!(validation.requires_approval);
    assert_eq!(validation.min_selling_price, Some(dec!(60)));

    // Inside the band the price is simply valid.
    let in_band = svc
        .validate_price(product, dec!(80), None)
        .await
        .expect("validate");
    assert!(in_band.valid);
    assert!(!in_band.requires_approval);

    // Above the cap is invalid and not escalatable.
    let above = svc
        .validate_price(product, dec!(250), None)
        .await
        .expect("validate");
    assert!(!above.valid);
    assert!(!above.requires_approval);
}

#[tokio::test]
async fn branch_control_shadows_global() {
    let db = common::setup_db().await;
    let svc = common::pricing_control(db.clone(), 30);
    let admin = Uuid::new_v4();
    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    svc.set_pricing_control(control_input(product, None), admin, StaffRole::SuperAdmin)
        .await
        .expect("set global control");

    let mut branch_control = control_input(product, Some(branch));
    branch_control.min_selling_price = dec!(80);
    svc.set_pricing_control(branch_control, admin, StaffRole::BranchAdmin)
        .await
        .expect("set branch control");

    // The branch floor applies at the branch...
    let at_branch = svc
        .validate_price(product, dec!(70), Some(branch))
        .await
        .expect("validate");
    assert!(!at_branch.valid);

    // ...while other branches fall back to the global floor.
    let elsewhere = svc
        .validate_price(product, dec!(70), Some(Uuid::new_v4()))
        .await
        .expect("validate");
    assert!(elsewhere.valid);
}

#[tokio::test]
async fn discount_validation_respects_caps() {
    let db = common::setup_db().await;
    let svc = common::pricing_control(db.clone(), 30);
    let admin = Uuid::new_v4();
    let product = Uuid::new_v4();

    svc.set_pricing_control(control_input(product, None), admin, StaffRole::SuperAdmin)
        .await
        .expect("set control");

    let over_pct = svc
        .validate_discount(product, Some(dec!(25)), None, None)
        .await
        .expect("validate");
    assert!(!over_pct.valid);

    let over_amount = svc
        .validate_discount(product, None, Some(dec!(75)), None)
        .await
        .expect("validate");
    assert!(!over_amount.valid);

    let within = svc
        .validate_discount(product, Some(dec!(15)), Some(dec!(40)), None)
        .await
        .expect("validate");
    assert!(within.valid);

    // No control at all: everything is valid.
    let uncontrolled = svc
        .validate_discount(Uuid::new_v4(), Some(dec!(99)), None, None)
        .await
        .expect("validate");
    assert!(uncontrolled.valid);
}

#[tokio::test]
async fn override_lifecycle_pending_to_approved() {
    let db = common::setup_db().await;
    let svc = common::pricing_control(db.clone(), 30);
    let admin = Uuid::new_v4();
    let cashier = Uuid::new_v4();
    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    svc.set_pricing_control(control_input(product, None), admin, StaffRole::SuperAdmin)
        .await
        .expect("set control");

    let request = svc
        .create_override_request(override_input(product, branch, cashier))
        .await
        .expect("create request");
    assert_eq!(request.status_enum(), Some(OverrideStatus::Pending));
    assert_eq!(request.min_allowed_price, dec!(60));

    // A cashier cannot quick-approve.
    let forbidden = svc
        .quick_approve_with_pin(request.id, cashier, StaffRole::Cashier)
        .await;
    assert!(matches!(forbidden, Err(ServiceError::Forbidden(_))));

    let decision = svc
        .quick_approve_with_pin(request.id, admin, StaffRole::BranchAdmin)
        .await
        .expect("approve");
    assert!(decision.success);
    assert_eq!(
        decision.request.status_enum(),
        Some(OverrideStatus::Approved)
    );
    assert_eq!(decision.request.approved_by, Some(admin));

    // Terminal states accept no further transitions.
    let again = svc
        .quick_approve_with_pin(request.id, admin, StaffRole::BranchAdmin)
        .await;
    assert!(matches!(again, Err(ServiceError::InvalidState(_))));
    let reject_after = svc
        .reject_override(request.id, admin, StaffRole::BranchAdmin)
        .await;
    assert!(matches!(reject_after, Err(ServiceError::InvalidState(_))));
}

#[tokio::test]
async fn override_rejection_is_terminal() {
    let db = common::setup_db().await;
    let svc = common::pricing_control(db.clone(), 30);
    let admin = Uuid::new_v4();
    let cashier = Uuid::new_v4();
    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    let request = svc
        .create_override_request(override_input(product, branch, cashier))
        .await
        .expect("create request");
    // No control configured: the snapshotted floor defaults to zero.
    assert_eq!(request.min_allowed_price, dec!(0));

    let decision = svc
        .reject_override(request.id, admin, StaffRole::SuperAdmin)
        .await
        .expect("reject");
    assert_eq!(
        decision.request.status_enum(),
        Some(OverrideStatus::Rejected)
    );

    let approve_after = svc
        .quick_approve_with_pin(request.id, admin, StaffRole::SuperAdmin)
        .await;
    assert!(matches!(approve_after, Err(ServiceError::InvalidState(_))));
}

#[tokio::test]
async fn overdue_pending_request_expires_lazily() {
    let db = common::setup_db().await;
    // Zero-minute TTL so the request is immediately past its deadline.
    let svc = common::pricing_control(db.clone(), 0);
    let cashier = Uuid::new_v4();
    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    let request = svc
        .create_override_request(override_input(product, branch, cashier))
        .await
        .expect("create request");

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let fetched = svc
        .get_override_request(request.id)
        .await
        .expect("lookup persists lazy expiry");
    assert_eq!(fetched.status_enum(), Some(OverrideStatus::Expired));

    // An expired request is non-actionable.
    let admin = Uuid::new_v4();
    let approve = svc
        .quick_approve_with_pin(request.id, admin, StaffRole::SuperAdmin)
        .await;
    assert!(matches!(approve, Err(ServiceError::InvalidState(_))));
}

#[tokio::test]
async fn stale_sweep_expires_in_bulk() {
    let db = common::setup_db().await;
    let svc = common::pricing_control(db.clone(), 0);
    let cashier = Uuid::new_v4();
    let branch = Uuid::new_v4();

    for _ in 0..3 {
        svc.create_override_request(override_input(Uuid::new_v4(), branch, cashier))
            .await
            .expect("create request");
    }

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let expired = svc.expire_stale_requests().await.expect("sweep");
    assert_eq!(expired, 3);

    let (requests, total) = svc
        .list_override_requests(Some(OverrideStatus::Expired), Some(branch), 1, 10)
        .await
        .expect("list");
    assert_eq!(total, 3);
    assert!(requests
        .iter()
        .all(|r| r.status_enum() == Some(OverrideStatus::Expired)));
}

#[tokio::test]
async fn unknown_request_is_not_found() {
    let db = common::setup_db().await;
    let svc = common::pricing_control(db.clone(), 30);
    let admin = Uuid::new_v4();

    let result = svc
        .quick_approve_with_pin(Uuid::new_v4(), admin, StaffRole::SuperAdmin)
        .await;
    assert!(matches!(result, Err(ServiceError::NotFound(_))));
}
