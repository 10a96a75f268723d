//! Supplier and driver registration, inventory and overview figures.

mod common;

use common::fixtures::{collection, driver, product, supplier};
use common::memory_store::MemoryStore;
use tea_factory_core::models::{NewDriver, NewSupplier};
use tea_factory_core::{registry, DashboardOverview, FinanceStore, Inventory, LedgerSnapshot, RegistryStore};

fn new_supplier(id: &str, email: &str) -> NewSupplier {
    NewSupplier {
        id: id.to_string(),
        full_name: "Ruwan Jayasinghe".to_string(),
        address: "12 Hill Street".to_string(),
        contact_no: "0779876543".to_string(),
        account_number: "99887766".to_string(),
        bank_name: "Sampath".to_string(),
        branch: "Hatton".to_string(),
        email: email.to_string(),
        username: "ruwan".to_string(),
        password: "pa55word".to_string(),
    }
}

#[tokio::test]
async fn supplier_is_added_once() {
    let store = MemoryStore::new().with_suppliers(vec![supplier("S1", "Nimal Perera")]);

    let existing = store.list_suppliers().await.unwrap();
    registry::add_supplier(&store, &new_supplier(" S7 ", "ruwan@tea.lk"), &existing)
        .await
        .unwrap();
    let ids: Vec<String> = store.suppliers().into_iter().map(|s| s.id).collect();
    assert_eq!(ids, vec!["S1", "S7"]);

    let existing = store.list_suppliers().await.unwrap();
    let err = registry::add_supplier(&store, &new_supplier("S7", "other@tea.lk"), &existing)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(store.write_calls(), vec!["create_supplier S7"]);
}

#[tokio::test]
async fn referenced_supplier_cannot_be_deleted() {
    let store = MemoryStore::new()
        .with_suppliers(vec![supplier("S1", "Nimal Perera"), supplier("S2", "Kamala Silva")])
        .with_collections(vec![collection("S1", 50.0, 10.0, "2024-01-01T08:00:00")]);

    let err = registry::delete_supplier(&store, "S1").await.unwrap_err();
    assert!(err.to_string().contains("remove related data first"));

    registry::delete_supplier(&store, "S2").await.unwrap();
    assert_eq!(store.suppliers().len(), 1);
}

#[tokio::test]
async fn driver_routes_stay_unique() {
    let store = MemoryStore::new().with_drivers(vec![driver("D1", "Route A")]);
    let existing = store.list_drivers().await.unwrap();
    let input = NewDriver {
        id: "D2".to_string(),
        full_name: "Sunil Fernando".to_string(),
        contact_number: "0712222222".to_string(),
        email: "sunil@tea.lk".to_string(),
        vehicle_number: "WP-5678".to_string(),
        route: "Route A".to_string(),
        serial_code: "SN-D2".to_string(),
    };
    assert!(registry::add_driver(&store, &input, &existing).await.unwrap_err().is_validation());

    let input = NewDriver { route: "Route B".to_string(), ..input };
    registry::add_driver(&store, &input, &existing).await.unwrap();
    assert_eq!(store.list_drivers().await.unwrap().len(), 2);
}

#[tokio::test]
async fn overview_and_inventory_from_store() {
    let store = MemoryStore::new()
        .with_suppliers(vec![supplier("S1", "Nimal Perera")])
        .with_collections(vec![
            collection("S1", 50.0, 120.5, "2024-01-01T08:00:00"),
            collection("S1", 50.0, 79.5, "2024-01-02T08:00:00"),
        ])
        .with_drivers(vec![driver("D1", "Route A"), driver("D2", "Route B")])
        .with_products(vec![
            product("T1", "BOPF 400g", 650.0, 0.0),
            product("F1", "Urea", 4500.0, 8.0),
            product("F2", "Dolomite", 1200.0, 40.0),
        ]);

    let snapshot = LedgerSnapshot::load(&store).await.unwrap();
    let drivers = store.list_drivers().await.unwrap();
    let products = store.list_products().await.unwrap();

    let overview = DashboardOverview::compute(
        &snapshot.suppliers,
        &drivers,
        &snapshot.collections,
        &products,
        &snapshot.loans,
        &snapshot.advances,
    );
    assert_eq!(overview.suppliers, 1);
    assert_eq!(overview.drivers, 2);
    assert_eq!(overview.total_collected_kg, 200.0);
    assert_eq!(overview.fertilizer_stock_value, 4500.0 * 8.0 + 1200.0 * 40.0);
    assert_eq!(overview.low_stock_products, 2);

    let inventory = Inventory::from_products(&products);
    assert_eq!(inventory.tea_packets.len(), 1);
    assert_eq!(inventory.low_stock_count(), 2);
}
