use serde::Serialize;
use tea_factory_core::ledger::FinanceSummary;
use tea_factory_core::{Config, DashboardOverview, FinanceStore, RegistryStore};

use super::or_empty;
use crate::format::{format_money, format_number, format_weight};

#[derive(Debug, Default, Serialize)]
pub struct OverviewView {
    pub overview: DashboardOverview,
    pub finance: FinanceSummary,
}

impl OverviewView {
    pub async fn load<S>(store: &S, config: &Config) -> Self
    where
        S: FinanceStore + RegistryStore,
    {
        let suppliers = or_empty("suppliers", store.list_suppliers().await);
        let drivers = or_empty("drivers", store.list_drivers().await);
        let collections = or_empty("collections", store.list_collections().await);
        let products = or_empty("products", store.list_products().await);
        let advances = or_empty("advances", store.list_advances().await);
        let loans = or_empty("loans", store.list_loans().await);
        let payments = or_empty("payments", store.list_payments().await);

        Self {
            overview: DashboardOverview::compute(
                &suppliers,
                &drivers,
                &collections,
                &products,
                &loans,
                &advances,
            ),
            finance: FinanceSummary::compute(
                &collections,
                &advances,
                &loans,
                &payments,
                config.loan_rule,
            ),
        }
    }

    pub fn render(&self) -> String {
        let o = &self.overview;
        let f = &self.finance;
        let mut out = String::from("Dashboard\n\n");
        out.push_str(&format!("Suppliers            {}\n", format_number(o.suppliers as i64)));
        out.push_str(&format!("Drivers              {}\n", format_number(o.drivers as i64)));
        out.push_str(&format!("Tea collected        {}\n", format_weight(o.total_collected_kg)));
        out.push_str(&format!("Fertilizer stock     {}\n", format_money(o.fertilizer_stock_value)));
        out.push_str(&format!("Low stock products   {}\n", o.low_stock_products));
        out.push_str(&format!("Pending loans        {}\n", o.pending_loans));
        out.push_str(&format!("Pending advances     {}\n", o.pending_advances));
        out.push('\n');
        out.push_str(&format!("Total advances       {}\n", format_money(f.total_advances)));
        out.push_str(&format!("Outstanding loans    {}\n", format_money(f.total_outstanding_loans)));
        out.push_str(&format!("Net payable          {}\n", format_money(f.total_net_payable)));
        out.push_str(&format!("Pending approvals    {}\n", f.pending_approvals));
        out
    }
}
