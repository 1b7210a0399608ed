mod common;

use chrono::NaiveDate;
use medipos_api::entities::audit_log::AuditAction;
use medipos_api::services::audit::AuditLogService;
use medipos_api::services::batch_pricing::{DeductionResult, NewBatch, PricingStrategy};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn new_batch(
    product: Uuid,
    branch: Uuid,
    number: &str,
    qty: rust_decimal::Decimal,
    purchase: rust_decimal::Decimal,
    selling: rust_decimal::Decimal,
    received: NaiveDate,
) -> NewBatch {
    NewBatch {
        product_id: product,
        branch_id: branch,
        batch_number: number.to_string(),
        quantity: qty,
        purchase_price: purchase,
        selling_price: selling,
        received_date: received,
        expiry_date: None,
    }
}

#[tokio::test]
async fn fifo_deduction_spans_batches_and_audits_each_one() {
    let db = common::setup_db().await;
    let svc = common::batch_pricing(db.clone(), PricingStrategy::Fifo);
    let audit = AuditLogService::new(db.clone());

    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    let b1 = svc
        .receive_batch(
            new_batch(product, branch, "B1", dec!(5), dec!(100), dec!(140), date(2024, 1, 1)),
            None,
        )
        .await
        .expect("receive B1");
    let b2 = svc
        .receive_batch(
            new_batch(product, branch, "B2", dec!(10), dec!(110), dec!(150), date(2024, 2, 1)),
            None,
        )
        .await
        .expect("receive B2");

    // Plan first: oldest batch drains before the newer one.
    let plan = svc
        .plan_allocation(product, branch, dec!(8))
        .await
        .expect("plan");
    assert!(plan.is_satisfied());
    assert_eq!(plan.lines.len(), 2);
    assert_eq!(plan.lines[0].batch_id, Some(b1.id));
    assert_eq!(plan.lines[0].quantity, dec!(5));
    assert_eq!(plan.lines[1].batch_id, Some(b2.id));
    assert_eq!(plan.lines[1].quantity, dec!(3));

    // Planning twice against an unchanged ledger yields an identical plan.
    let replanned = svc
        .plan_allocation(product, branch, dec!(8))
        .await
        .expect("replan");
    let ids: Vec<_> = plan.lines.iter().map(|l| l.batch_id).collect();
    let replanned_ids: Vec<_> = replanned.lines.iter().map(|l| l.batch_id).collect();
    assert_eq!(ids, replanned_ids);

    let outcome = svc
        .deduct_stock(product, branch, dec!(8), "SALE-001", None)
        .await
        .expect("deduct");
    let deduction = match outcome {
        DeductionResult::Deducted(d) => d,
        DeductionResult::Shortage(s) => panic!("unexpected shortage: {:?}", s),
    };

    assert_eq!(deduction.total_quantity, dec!(8));
    // 5 × 100 + 3 × 110
    assert_eq!(deduction.total_cost, dec!(830));
    assert_eq!(deduction.deductions.len(), 2);
    assert!(deduction.deductions[0].depleted);
    assert!(!deduction.deductions[1].depleted);

    // Depleted batch is deactivated, not deleted.
    let b1_after = svc.get_batch(b1.id).await.expect("b1 present");
    assert_eq!(b1_after.current_quantity, dec!(0));
    assert!(!b1_after.active);
    let b2_after = svc.get_batch(b2.id).await.expect("b2 present");
    assert_eq!(b2_after.current_quantity, dec!(7));
    assert!(b2_after.active);

    // One audit row per batch touched, with the depleted batch flagged.
    let b1_trail = audit
        .list_for_entity("inventory_batch", &b1.id.to_string())
        .await
        .expect("b1 audit trail");
    assert!(b1_trail
        .iter()
        .any(|e| e.action == AuditAction::BatchDepleted));
    let b2_trail = audit
        .list_for_entity("inventory_batch", &b2.id.to_string())
        .await
        .expect("b2 audit trail");
    assert!(b2_trail
        .iter()
        .any(|e| e.action == AuditAction::StockAdjustment));
}

#[tokio::test]
async fn shortage_aborts_without_mutation() {
    let db = common::setup_db().await;
    let svc = common::batch_pricing(db.clone(), PricingStrategy::Fifo);

    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    svc.receive_batch(
        new_batch(product, branch, "B1", dec!(5), dec!(100), dec!(140), date(2024, 1, 1)),
        None,
    )
    .await
    .expect("receive B1");
    svc.receive_batch(
        new_batch(product, branch, "B2", dec!(10), dec!(110), dec!(150), date(2024, 2, 1)),
        None,
    )
    .await
    .expect("receive B2");

    let outcome = svc
        .deduct_stock(product, branch, dec!(20), "SALE-002", None)
        .await
        .expect("deduct resolves");
    let shortage = match outcome {
        DeductionResult::Shortage(s) => s,
        DeductionResult::Deducted(_) => panic!("deduction should have reported shortage"),
    };

    assert_eq!(shortage.requested_quantity, dec!(20));
    assert_eq!(shortage.available_quantity, dec!(15));
    assert_eq!(shortage.shortfall, dec!(5));
    assert_eq!(shortage.partial_plan.len(), 2);

    // Nothing was deducted.
    let batches = svc
        .get_available_batches(product, branch)
        .await
        .expect("batches");
    let total: rust_decimal::Decimal = batches.iter().map(|b| b.current_quantity).sum();
    assert_eq!(total, dec!(15));
}

#[tokio::test]
async fn weighted_average_blends_cost_and_price() {
    let db = common::setup_db().await;
    let svc = common::batch_pricing(db.clone(), PricingStrategy::WeightedAverage);

    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    svc.receive_batch(
        new_batch(product, branch, "B1", dec!(5), dec!(100), dec!(140), date(2024, 1, 1)),
        None,
    )
    .await
    .expect("receive B1");
    svc.receive_batch(
        new_batch(product, branch, "B2", dec!(10), dec!(110), dec!(150), date(2024, 2, 1)),
        None,
    )
    .await
    .expect("receive B2");

    // (5×100 + 10×110) / 15 = 106.67
    let cost = svc
        .get_weighted_average_cost(product, branch)
        .await
        .expect("cost");
    assert_eq!(cost, dec!(106.67));

    let plan = svc
        .plan_allocation(product, branch, dec!(8))
        .await
        .expect("plan");
    assert_eq!(plan.lines.len(), 1);
    assert!(plan.lines[0].batch_id.is_none());
    assert_eq!(plan.lines[0].purchase_price, dec!(106.67));
}

#[tokio::test]
async fn fifo_selling_price_follows_next_batch() {
    let db = common::setup_db().await;
    let svc = common::batch_pricing(db.clone(), PricingStrategy::Fifo);

    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    // No stock yet: price is zero.
    let empty_price = svc
        .get_selling_price(product, branch)
        .await
        .expect("price");
    assert_eq!(empty_price, dec!(0));

    svc.receive_batch(
        new_batch(product, branch, "B1", dec!(2), dec!(100), dec!(140), date(2024, 1, 1)),
        None,
    )
    .await
    .expect("receive B1");
    svc.receive_batch(
        new_batch(product, branch, "B2", dec!(10), dec!(110), dec!(150), date(2024, 2, 1)),
        None,
    )
    .await
    .expect("receive B2");

    assert_eq!(
        svc.get_selling_price(product, branch).await.expect("price"),
        dec!(140)
    );

    // Drain the oldest batch; the next batch's price takes over.
    let outcome = svc
        .deduct_stock(product, branch, dec!(2), "SALE-003", None)
        .await
        .expect("deduct");
    assert!(matches!(outcome, DeductionResult::Deducted(_)));
    assert_eq!(
        svc.get_selling_price(product, branch).await.expect("price"),
        dec!(150)
    );
}

#[tokio::test]
async fn receive_batch_rejects_bad_input() {
    let db = common::setup_db().await;
    let svc = common::batch_pricing(db.clone(), PricingStrategy::Fifo);

    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    let zero_qty = svc
        .receive_batch(
            new_batch(product, branch, "B1", dec!(0), dec!(100), dec!(140), date(2024, 1, 1)),
            None,
        )
        .await;
    assert!(zero_qty.is_err());

    let mut expired = new_batch(product, branch, "B2", dec!(5), dec!(100), dec!(140), date(2024, 1, 1));
    expired.expiry_date = Some(date(2023, 12, 1));
    assert!(svc.receive_batch(expired, None).await.is_err());
}
