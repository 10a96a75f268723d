//! Record builders with sensible defaults.

use tea_factory_core::models::{Advance, CollectionEvent, Driver, Loan, Product, Supplier};

pub fn supplier(id: &str, name: &str) -> Supplier {
    Supplier {
        id: id.to_string(),
        full_name: name.to_string(),
        address: "Estate Road".to_string(),
        contact_no: "0771234567".to_string(),
        account_number: format!("ACC-{}", id),
        bank_name: "BOC".to_string(),
        branch: "Nuwara Eliya".to_string(),
        email: format!("{}@tea.lk", id.to_lowercase()),
        username: id.to_lowercase(),
    }
}

pub fn collection(supplier_id: &str, rate: f64, weight: f64, timestamp: &str) -> CollectionEvent {
    CollectionEvent {
        supplier_id: supplier_id.to_string(),
        supplier_name: format!("Supplier {}", supplier_id),
        rate,
        weight,
        timestamp: timestamp.to_string(),
    }
}

pub fn advance(supplier_id: &str, amount: f64, status: &str) -> Advance {
    Advance {
        id: 0,
        supplier_id: supplier_id.to_string(),
        supplier_name: format!("Supplier {}", supplier_id),
        amount,
        date: "2024-01-10".to_string(),
        status: status.to_string(),
        month: Some("2024-01".to_string()),
    }
}

pub fn loan(supplier_id: &str, amount: f64, status: &str) -> Loan {
    Loan {
        id: 0,
        supplier_id: supplier_id.to_string(),
        supplier_name: format!("Supplier {}", supplier_id),
        amount,
        duration_months: 10.0,
        purpose: "Fertilizer".to_string(),
        monthly_amount: amount / 10.0,
        due_date: "2024-12-31".to_string(),
        status: status.to_string(),
    }
}

pub fn driver(id: &str, route: &str) -> Driver {
    Driver {
        id: id.to_string(),
        full_name: format!("Driver {}", id),
        contact_number: "0711111111".to_string(),
        email: format!("{}@tea.lk", id.to_lowercase()),
        vehicle_number: format!("WP-{}", id),
        route: route.to_string(),
        serial_code: format!("SN-{}", id),
        latitude: None,
        longitude: None,
        status: "Idle".to_string(),
        last_updated: None,
    }
}

pub fn product(id: &str, name: &str, rate: f64, stock: f64) -> Product {
    Product {
        id: id.to_string(),
        name: name.to_string(),
        rate_per_bag: rate,
        stock_bags: stock,
    }
}
