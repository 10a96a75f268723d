//! One module per dashboard page. Each page owns its view state and renders to text.

mod calculations;
mod drivers;
mod finances;
mod inventory;
mod overview;
mod suppliers;
mod tracking;

pub use calculations::{render_outcome, render_report, CalculationsView};
pub use drivers::DriversView;
pub use finances::{FinanceTab, FinancesView};
pub use inventory::InventoryView;
pub use overview::OverviewView;
pub use suppliers::SuppliersView;
pub use tracking::TrackingView;

use tea_factory_core::CoreResult;

/// Read failures on a page degrade to an empty list.
pub(crate) fn or_empty<T>(what: &str, result: CoreResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!("loading {} failed: {}", what, e);
        Vec::new()
    })
}

pub(crate) fn matches(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || haystack.to_lowercase().contains(&needle)
}
