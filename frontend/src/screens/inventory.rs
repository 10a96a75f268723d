use serde::Serialize;
use tea_factory_core::inventory::StockLine;
use tea_factory_core::{Inventory, RegistryStore};

use super::or_empty;
use crate::format::{format_money, Table};

#[derive(Debug, Default, Serialize)]
pub struct InventoryView {
    pub search: String,
    pub inventory: Inventory,
}

impl InventoryView {
    pub async fn load<S: RegistryStore + ?Sized>(store: &S, search: String) -> Self {
        let products = or_empty("products", store.list_products().await);
        Self {
            search,
            inventory: Inventory::from_products(&products),
        }
    }

    fn section(&self, title: &str, lines: &[StockLine]) -> String {
        let rows = Inventory::search(lines, &self.search);
        let mut out = format!("{}\n", title);
        if rows.is_empty() {
            out.push_str("No products found.\n");
            return out;
        }
        let mut table = Table::new(["ID", "Name", "Rate/bag", "Bags", "Value", "Status"]);
        for l in rows {
            table.row([
                l.product.id.clone(),
                l.product.name.clone(),
                format_money(l.product.rate_per_bag),
                format!("{}", l.product.stock_bags),
                format_money(l.value),
                l.status.as_str().to_string(),
            ]);
        }
        out.push_str(&table.render());
        out
    }

    pub fn render(&self) -> String {
        let tea = self.inventory.tea_totals();
        let fert = self.inventory.fertilizer_totals();
        format!(
            "Inventory\n\nTea packets   {} bags  {}\nFertilizer    {} bags  {}\nLow stock     {}\n\n{}\n{}",
            tea.quantity,
            format_money(tea.value),
            fert.quantity,
            format_money(fert.value),
            self.inventory.low_stock_count(),
            self.section("Tea packets", &self.inventory.tea_packets),
            self.section("Fertilizers", &self.inventory.fertilizers),
        )
    }
}
