//! Finances page: summary cards and the advance, loan and payment tabs.

use clap::ValueEnum;
use serde::Serialize;
use tea_factory_core::ledger::{search_advances, search_loans, search_payments, FinanceSummary};
use tea_factory_core::{Config, FinanceStore, LedgerSnapshot};

use crate::format::{format_money, Table};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, ValueEnum)]
pub enum FinanceTab {
    #[default]
    Summary,
    Advances,
    Loans,
    Payments,
}

#[derive(Debug, Default, Serialize)]
pub struct FinancesView {
    pub tab: FinanceTab,
    pub search: String,
    pub summary: FinanceSummary,
    #[serde(skip)]
    pub snapshot: LedgerSnapshot,
}

impl FinancesView {
    pub async fn load<S: FinanceStore + ?Sized>(
        store: &S,
        config: &Config,
        tab: FinanceTab,
        search: String,
    ) -> Self {
        let snapshot = LedgerSnapshot::load_lenient(store).await;
        Self::from_snapshot(snapshot, config, tab, search)
    }

    pub fn from_snapshot(
        snapshot: LedgerSnapshot,
        config: &Config,
        tab: FinanceTab,
        search: String,
    ) -> Self {
        let summary = FinanceSummary::compute(
            &snapshot.collections,
            &snapshot.advances,
            &snapshot.loans,
            &snapshot.payments,
            config.loan_rule,
        );
        Self {
            tab,
            search,
            summary,
            snapshot,
        }
    }

    pub fn render(&self) -> String {
        match self.tab {
            FinanceTab::Summary => self.render_summary(),
            FinanceTab::Advances => self.render_advances(),
            FinanceTab::Loans => self.render_loans(),
            FinanceTab::Payments => self.render_payments(),
        }
    }

    fn render_summary(&self) -> String {
        let s = &self.summary;
        format!(
            "Finances\n\nTotal advances       {}\nOutstanding loans    {}\nNet payable          {}\nPending approvals    {}\n",
            format_money(s.total_advances),
            format_money(s.total_outstanding_loans),
            format_money(s.total_net_payable),
            s.pending_approvals
        )
    }

    fn render_advances(&self) -> String {
        let rows = search_advances(&self.snapshot.advances, &self.search);
        if rows.is_empty() {
            return "No advances found.\n".to_string();
        }
        let mut table = Table::new(["ID", "Supplier", "Name", "Month", "Amount", "Status"]);
        for a in rows {
            table.row([
                a.id.to_string(),
                a.supplier_id.clone(),
                a.supplier_name.clone(),
                a.month.clone().unwrap_or_else(|| a.date.clone()),
                format_money(a.amount),
                a.status.clone(),
            ]);
        }
        table.render()
    }

    fn render_loans(&self) -> String {
        let rows = search_loans(&self.snapshot.loans, &self.search);
        if rows.is_empty() {
            return "No loans found.\n".to_string();
        }
        let mut table = Table::new([
            "ID", "Supplier", "Name", "Amount", "Months", "Monthly", "Due", "Purpose", "Status",
        ]);
        for l in rows {
            table.row([
                l.id.to_string(),
                l.supplier_id.clone(),
                l.supplier_name.clone(),
                format_money(l.amount),
                format!("{}", l.duration_months),
                format_money(l.monthly_amount),
                l.due_date.clone(),
                l.purpose.clone(),
                l.status.clone(),
            ]);
        }
        table.render()
    }

    fn render_payments(&self) -> String {
        let rows = search_payments(&self.snapshot.payments, &self.search);
        if rows.is_empty() {
            return "No payments found.\n".to_string();
        }
        let mut table = Table::new([
            "ID", "Supplier", "Name", "Tea", "Advance", "Loan", "Transport", "Net", "Status",
        ]);
        for p in rows {
            table.row([
                p.id.to_string(),
                p.supplier_id.clone(),
                p.supplier_name.clone(),
                format_money(p.tea_amount),
                format_money(p.advance_amount),
                format_money(p.loan_amount),
                format_money(p.transport_charge),
                format_money(p.net_amount),
                p.status.clone(),
            ]);
        }
        table.render()
    }
}
