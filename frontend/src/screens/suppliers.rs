use serde::Serialize;
use tea_factory_core::models::Supplier;
use tea_factory_core::FinanceStore;

use super::{matches, or_empty};
use crate::format::Table;

#[derive(Debug, Default, Serialize)]
pub struct SuppliersView {
    pub search: String,
    pub suppliers: Vec<Supplier>,
}

impl SuppliersView {
    pub async fn load<S: FinanceStore + ?Sized>(store: &S, search: String) -> Self {
        Self {
            search,
            suppliers: or_empty("suppliers", store.list_suppliers().await),
        }
    }

    /// Search by id, name or email.
    pub fn visible(&self) -> Vec<&Supplier> {
        self.suppliers
            .iter()
            .filter(|s| {
                matches(&s.id, &self.search)
                    || matches(&s.full_name, &self.search)
                    || matches(&s.email, &self.search)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let rows = self.visible();
        if rows.is_empty() {
            return "No suppliers found.\n".to_string();
        }
        let mut table = Table::new(["ID", "Name", "Contact", "Email", "Bank", "Branch", "Account"]);
        for s in rows {
            table.row([
                s.id.clone(),
                s.full_name.clone(),
                s.contact_no.clone(),
                s.email.clone(),
                s.bank_name.clone(),
                s.branch.clone(),
                s.account_number.clone(),
            ]);
        }
        table.render()
    }
}
