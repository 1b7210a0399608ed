mod common;

use chrono::NaiveDate;
use medipos_api::services::batch_pricing::{DeductionResult, NewBatch, PricingStrategy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

// This test exercises the oversell race on a real multi-connection database.
// SQLite's single-writer model masks the interleaving, so run it against
// Postgres: APP__DATABASE_URL=postgres://... cargo test -- --ignored stock_concurrency
#[tokio::test]
#[ignore]
async fn stock_concurrency_never_oversells() {
    let db = common::setup_db().await;
    let svc = common::batch_pricing(db.clone(), PricingStrategy::Fifo);

    let product = Uuid::new_v4();
    let branch = Uuid::new_v4();

    svc.receive_batch(
        NewBatch {
            product_id: product,
            branch_id: branch,
            batch_number: "B1".to_string(),
            quantity: dec!(10),
            purchase_price: dec!(100),
            selling_price: dec!(140),
            received_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            expiry_date: None,
        },
        None,
    )
    .await
    .expect("seed batch");

    // Two concurrent deductions of 6 against 10 units: at most one can get
    // its full quantity, and stock never goes negative.
    let mut tasks = Vec::new();
    for i in 0..2 {
        let svc = svc.clone();
        tasks.push(tokio::spawn(async move {
            svc.deduct_stock(product, branch, dec!(6), &format!("SALE-C{}", i), None)
                .await
        }));
    }

    let mut deducted_total = Decimal::ZERO;
    let mut full_successes = 0;
    for task in tasks {
        match task.await.expect("join") {
            Ok(DeductionResult::Deducted(d)) => {
                deducted_total += d.total_quantity;
                full_successes += 1;
            }
            Ok(DeductionResult::Shortage(s)) => {
                assert!(s.shortfall >= dec!(2));
            }
            Err(e) => panic!("deduction errored instead of reporting shortage: {}", e),
        }
    }

    assert!(full_successes >= 1, "one deduction must win the race");
    assert!(deducted_total <= dec!(10));

    let batches = svc
        .get_available_batches(product, branch)
        .await
        .expect("batches");
    let remaining: Decimal = batches.iter().map(|b| b.current_quantity).sum();
    assert!(remaining >= Decimal::ZERO);
    assert_eq!(remaining, dec!(10) - deducted_total);
}
