use serde::Serialize;
use tea_factory_core::models::Driver;
use tea_factory_core::RegistryStore;

use super::{matches, or_empty};
use crate::format::Table;

#[derive(Debug, Default, Serialize)]
pub struct DriversView {
    pub search: String,
    pub drivers: Vec<Driver>,
}

impl DriversView {
    pub async fn load<S: RegistryStore + ?Sized>(store: &S, search: String) -> Self {
        Self {
            search,
            drivers: or_empty("drivers", store.list_drivers().await),
        }
    }

    pub fn visible(&self) -> Vec<&Driver> {
        self.drivers
            .iter()
            .filter(|d| {
                matches(&d.id, &self.search)
                    || matches(&d.full_name, &self.search)
                    || matches(&d.route, &self.search)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let rows = self.visible();
        if rows.is_empty() {
            return "No drivers found.\n".to_string();
        }
        let mut table = Table::new(["ID", "Name", "Contact", "Vehicle", "Route", "Serial"]);
        for d in rows {
            table.row([
                d.id.clone(),
                d.full_name.clone(),
                d.contact_number.clone(),
                d.vehicle_number.clone(),
                d.route.clone(),
                d.serial_code.clone(),
            ]);
        }
        table.render()
    }
}
