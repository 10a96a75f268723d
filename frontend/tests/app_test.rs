//! Command dispatch against the in-memory backend.

#[path = "../../crates/tea_factory_core/tests/common/mod.rs"]
mod common;

use common::fixtures::{advance, collection, loan, supplier};
use common::memory_store::MemoryStore;
use pretty_assertions::assert_eq;
use tea_dashboard::app::execute;
use tea_dashboard::cli::{Command, Ledger, PaymentCommand};
use tea_dashboard::screens::FinanceTab;
use tea_factory_core::Config;

fn nimal_store() -> MemoryStore {
    MemoryStore::new()
        .with_suppliers(vec![supplier("S1", "Nimal Perera")])
        .with_collections(vec![
            collection("S1", 50.0, 100.0, "2023-04-02T08:00:00"),
            collection("S1", 60.0, 50.0, "2023-04-20T09:30:00"),
        ])
        .with_advances(vec![advance("S1", 2000.0, "Pending")])
        .with_loans(vec![loan("S1", 1000.0, "Active")])
}

fn calculations() -> Command {
    Command::Calculations {
        month: None,
        search: String::new(),
    }
}

fn finances(tab: FinanceTab) -> Command {
    Command::Finances {
        tab,
        search: String::new(),
    }
}

#[tokio::test]
async fn pages_still_render_when_payments_cannot_be_read() {
    let store = nimal_store();
    store.fail_payment_reads(true);
    let config = Config::default();

    let page = execute(&calculations(), false, &config, &store).await.unwrap();
    assert!(page.contains("Supplier S1"));
    assert!(page.contains("April 2023"));
    assert!(page.contains("Rs. 8,000.00"));

    let payments = execute(&finances(FinanceTab::Payments), false, &config, &store)
        .await
        .unwrap();
    assert_eq!(payments, "No payments found.\n");

    let advances = execute(&finances(FinanceTab::Advances), false, &config, &store)
        .await
        .unwrap();
    assert!(advances.contains("Rs. 2,000.00"));
}

#[tokio::test]
async fn reconcile_refuses_to_write_from_partial_ledgers() {
    let store = nimal_store();
    store.fail_payment_reads(true);

    let result = execute(
        &Command::Reconcile { supplier: None },
        false,
        &Config::default(),
        &store,
    )
    .await;
    assert!(result.is_err());
    assert!(store.write_calls().is_empty());
}

#[tokio::test]
async fn reconcile_routes_single_supplier_then_batch() {
    let store = nimal_store();
    let config = Config::default();

    let single = execute(
        &Command::Reconcile {
            supplier: Some("S1".to_string()),
        },
        false,
        &config,
        &store,
    )
    .await
    .unwrap();
    assert_eq!(
        single,
        "S1 created: tea Rs. 8,000.00 - advance Rs. 2,000.00 - loan Rs. 1,000.00 - transport Rs. 100.00 = net Rs. 4,900.00 [Pending]\n"
    );

    let payment_id = store.payments()[0].id;
    let batch = execute(&Command::Reconcile { supplier: None }, false, &config, &store)
        .await
        .unwrap();
    assert_eq!(
        batch,
        format!(
            "S1 updated #{}: tea Rs. 8,000.00 - advance Rs. 2,000.00 - loan Rs. 1,000.00 - transport Rs. 100.00 = net Rs. 4,900.00 [Pending]\ncreated 0, updated 1, failed 0\n",
            payment_id
        )
    );
    assert_eq!(store.payments().len(), 1);

    let unknown = execute(
        &Command::Reconcile {
            supplier: Some("S9".to_string()),
        },
        false,
        &config,
        &store,
    )
    .await;
    assert!(unknown.is_err());
}

#[tokio::test]
async fn payment_show_reports_missing_and_prints_json() {
    let store = nimal_store();
    let config = Config::default();

    let missing = execute(
        &Command::Payment(PaymentCommand::Show { id: "99".to_string() }),
        false,
        &config,
        &store,
    )
    .await
    .unwrap();
    assert_eq!(missing, "Payment #99 not found.\n");

    execute(
        &Command::Reconcile {
            supplier: Some("S1".to_string()),
        },
        false,
        &config,
        &store,
    )
    .await
    .unwrap();
    let id = store.payments()[0].id;
    let json = execute(
        &Command::Payment(PaymentCommand::Show { id: id.to_string() }),
        true,
        &config,
        &store,
    )
    .await
    .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["supplierId"], "S1");
    assert_eq!(value["netAmount"], 4900.0);
    assert_eq!(value["status"], "Pending");
}

#[tokio::test]
async fn status_is_written_as_typed_and_delete_removes_the_record() {
    let store = nimal_store();
    let config = Config::default();
    let advance_id = store.advances()[0].id;

    let out = execute(
        &Command::Status {
            ledger: Ledger::Advance,
            id: advance_id.to_string(),
            status: "Transfered".to_string(),
        },
        false,
        &config,
        &store,
    )
    .await
    .unwrap();
    assert_eq!(out, format!("Advance #{} set to Transfered\n", advance_id));
    assert_eq!(store.advances()[0].status, "Transfered");

    let rejected = execute(
        &Command::Status {
            ledger: Ledger::Loan,
            id: "2".to_string(),
            status: "done".to_string(),
        },
        false,
        &config,
        &store,
    )
    .await;
    assert!(rejected.is_err());

    let out = execute(
        &Command::Delete {
            ledger: Ledger::Loan,
            id: "2".to_string(),
        },
        false,
        &config,
        &store,
    )
    .await
    .unwrap();
    assert_eq!(out, "Loan #2 deleted\n");
    assert_eq!(
        store.write_calls(),
        vec![
            format!("update_status advance {} Transfered", advance_id),
            "delete_record loan 2".to_string(),
        ]
    );
}

#[tokio::test]
async fn calculations_json_carries_the_salary_rows() {
    let store = nimal_store();
    let json = execute(&calculations(), true, &Config::default(), &store)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["month"], serde_json::Value::Null);
    assert_eq!(value["salaries"][0]["supplier_id"], "S1");
    assert_eq!(value["salaries"][0]["gross_amount"], 8000.0);
    assert_eq!(value["salaries"][0]["total_weight"], 150.0);
}
