//! Inventory read-model and the dashboard overview figures.

use serde::Serialize;

use crate::models::{status_is, Advance, CollectionEvent, Driver, Loan, Product, Supplier};

/// Products under this many bags are flagged on the overview page.
pub const OVERVIEW_LOW_STOCK_BAGS: f64 = 20.0;
/// Fertilizers at or below this many bags are "Low Stock".
pub const FERTILIZER_LOW_STOCK_BAGS: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProductCategory {
    TeaPacket,
    Fertilizer,
}

impl ProductCategory {
    /// Tea packet ids carry a leading `T`.
    pub fn of(product: &Product) -> Self {
        if product.id.trim_start().starts_with('T') {
            ProductCategory::TeaPacket
        } else {
            ProductCategory::Fertilizer
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn of(product: &Product) -> Self {
        match ProductCategory::of(product) {
            ProductCategory::TeaPacket if product.stock_bags > 0.0 => StockStatus::InStock,
            ProductCategory::TeaPacket => StockStatus::OutOfStock,
            ProductCategory::Fertilizer if product.stock_bags > FERTILIZER_LOW_STOCK_BAGS => {
                StockStatus::InStock
            }
            ProductCategory::Fertilizer => StockStatus::LowStock,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "In Stock",
            StockStatus::LowStock => "Low Stock",
            StockStatus::OutOfStock => "Out of Stock",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StockLine {
    pub product: Product,
    pub status: StockStatus,
    pub value: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub quantity: f64,
    pub value: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Inventory {
    pub tea_packets: Vec<StockLine>,
    pub fertilizers: Vec<StockLine>,
}

impl Inventory {
    pub fn from_products(products: &[Product]) -> Self {
        let mut inv = Inventory::default();
        for p in products {
            let line = StockLine {
                product: p.clone(),
                status: StockStatus::of(p),
                value: p.rate_per_bag * p.stock_bags,
            };
            match ProductCategory::of(p) {
                ProductCategory::TeaPacket => inv.tea_packets.push(line),
                ProductCategory::Fertilizer => inv.fertilizers.push(line),
            }
        }
        inv
    }

    pub fn tea_totals(&self) -> CategoryTotals {
        totals(&self.tea_packets)
    }

    pub fn fertilizer_totals(&self) -> CategoryTotals {
        totals(&self.fertilizers)
    }

    /// Fertilizers in Low Stock plus tea packets that are not In Stock.
    pub fn low_stock_count(&self) -> usize {
        self.fertilizers
            .iter()
            .filter(|l| l.status == StockStatus::LowStock)
            .count()
            + self
                .tea_packets
                .iter()
                .filter(|l| l.status != StockStatus::InStock)
                .count()
    }

    pub fn search<'a>(lines: &'a [StockLine], query: &str) -> Vec<&'a StockLine> {
        let needle = query.trim().to_lowercase();
        lines
            .iter()
            .filter(|l| needle.is_empty() || l.product.name.to_lowercase().contains(&needle))
            .collect()
    }
}

fn totals(lines: &[StockLine]) -> CategoryTotals {
    lines.iter().fold(CategoryTotals::default(), |mut t, l| {
        t.quantity += l.product.stock_bags;
        t.value += l.value;
        t
    })
}

/// Headline figures for the landing page.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DashboardOverview {
    pub suppliers: usize,
    pub drivers: usize,
    pub total_collected_kg: f64,
    pub fertilizer_stock_value: f64,
    pub low_stock_products: usize,
    pub pending_loans: usize,
    pub pending_advances: usize,
}

impl DashboardOverview {
    pub fn compute(
        suppliers: &[Supplier],
        drivers: &[Driver],
        collections: &[CollectionEvent],
        products: &[Product],
        loans: &[Loan],
        advances: &[Advance],
    ) -> Self {
        Self {
            suppliers: suppliers.len(),
            drivers: drivers.len(),
            total_collected_kg: collections.iter().map(|c| c.weight).sum(),
            fertilizer_stock_value: products
                .iter()
                .filter(|p| ProductCategory::of(p) == ProductCategory::Fertilizer)
                .map(|p| p.rate_per_bag * p.stock_bags)
                .sum(),
            low_stock_products: products
                .iter()
                .filter(|p| p.stock_bags < OVERVIEW_LOW_STOCK_BAGS)
                .count(),
            pending_loans: loans.iter().filter(|l| status_is(&l.status, "pending")).count(),
            pending_advances: advances.iter().filter(|a| status_is(&a.status, "pending")).count(),
        }
    }
}
