//! Live tracking page: the driver board, kept current from the location channel.

use tea_factory_core::models::LocationUpdate;
use tea_factory_core::{RegistryStore, TrackingBoard};

use super::or_empty;
use crate::format::Table;

#[derive(Debug, Default)]
pub struct TrackingView {
    pub board: TrackingBoard,
}

impl TrackingView {
    pub async fn load<S: RegistryStore + ?Sized>(store: &S) -> Self {
        let drivers = or_empty("drivers", store.list_drivers().await);
        Self {
            board: TrackingBoard::new(&drivers),
        }
    }

    /// Apply one update; returns the refreshed status line for a known driver.
    pub fn apply(&mut self, update: &LocationUpdate) -> Option<String> {
        if !self.board.apply(update) {
            return None;
        }
        self.board
            .get(&update.driver_id)
            .map(|d| format!("{} {} {} ({})", d.last_update, d.name, d.location, d.status))
    }

    pub fn render(&self) -> String {
        if self.board.drivers().is_empty() {
            return "No drivers found.\n".to_string();
        }
        let mut table = Table::new(["ID", "Name", "Vehicle", "Route", "Status", "Last update", "Location"]);
        for d in self.board.drivers() {
            table.row([
                d.id.clone(),
                d.name.clone(),
                d.vehicle.clone(),
                d.route.clone(),
                d.status.clone(),
                d.last_update.clone(),
                d.location.clone(),
            ]);
        }
        table.render()
    }
}
