//! Salary calculations page: monthly salary rows and payment reconciliation.

use serde::Serialize;
use tea_factory_core::reconcile::{ReconcileAction, ReconcileOutcome};
use tea_factory_core::salary::filter_by_supplier_name;
use tea_factory_core::{
    aggregate_salaries, BatchReport, Config, CoreError, CoreResult, FinanceStore, LedgerSnapshot,
    Reconciler, SalaryTotals, SupplierPeriodSalary,
};

use crate::format::{format_money, format_weight, Table};

#[derive(Debug, Default, Serialize)]
pub struct CalculationsView {
    /// `YYYY-MM` prefix applied to collection timestamps.
    pub month: Option<String>,
    pub search: String,
    pub salaries: Vec<SupplierPeriodSalary>,
    #[serde(skip)]
    pub snapshot: LedgerSnapshot,
}

impl CalculationsView {
    /// Ledgers that fail to load show as empty.
    pub async fn load<S: FinanceStore + ?Sized>(
        store: &S,
        month: Option<String>,
        search: String,
    ) -> Self {
        let snapshot = LedgerSnapshot::load_lenient(store).await;
        Self::from_snapshot(snapshot, month, search)
    }

    /// All five ledgers must load before any payment is written.
    pub async fn load_for_reconcile<S: FinanceStore + ?Sized>(store: &S) -> CoreResult<Self> {
        let snapshot = LedgerSnapshot::load(store).await?;
        Ok(Self::from_snapshot(snapshot, None, String::new()))
    }

    pub fn from_snapshot(snapshot: LedgerSnapshot, month: Option<String>, search: String) -> Self {
        let mut view = Self {
            month,
            search,
            salaries: Vec::new(),
            snapshot,
        };
        view.recompute();
        view
    }

    pub fn recompute(&mut self) {
        self.salaries = aggregate_salaries(&self.snapshot.collections, self.month.as_deref());
    }

    pub fn visible(&self) -> Vec<&SupplierPeriodSalary> {
        filter_by_supplier_name(&self.salaries, &self.search)
    }

    pub fn totals(&self) -> SalaryTotals {
        let rows: Vec<SupplierPeriodSalary> = self.visible().into_iter().cloned().collect();
        SalaryTotals::of(&rows)
    }

    pub async fn reconcile_supplier<S: FinanceStore + ?Sized>(
        &mut self,
        store: &S,
        config: &Config,
        supplier_id: &str,
    ) -> CoreResult<ReconcileOutcome> {
        let supplier = self
            .snapshot
            .supplier(supplier_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(format!("supplier {}", supplier_id)))?;
        Reconciler::new(store, config)
            .reconcile(&mut self.snapshot, &supplier)
            .await
    }

    pub async fn reconcile_all<S: FinanceStore + ?Sized>(
        &mut self,
        store: &S,
        config: &Config,
    ) -> BatchReport {
        Reconciler::new(store, config)
            .reconcile_all(&mut self.snapshot)
            .await
    }

    pub fn render(&self) -> String {
        let title = match &self.month {
            Some(m) => format!("Salary calculations ({})\n\n", m),
            None => "Salary calculations\n\n".to_string(),
        };
        let visible = self.visible();
        if visible.is_empty() {
            return format!("{}No salary data found.\n", title);
        }

        let mut table = Table::new(["Supplier", "Name", "Period", "Weight", "Avg rate", "Gross"]);
        for s in &visible {
            table.row([
                s.supplier_id.clone(),
                s.supplier_name.clone(),
                s.period.clone(),
                format_weight(s.total_weight),
                format!("{:.2}", s.average_rate),
                format_money(s.gross_amount),
            ]);
        }
        let totals = self.totals();
        format!(
            "{}{}\nTotal weight {}   Total gross {}\n",
            title,
            table.render(),
            format_weight(totals.total_weight),
            format_money(totals.gross_amount)
        )
    }
}

pub fn render_outcome(outcome: &ReconcileOutcome) -> String {
    let s = &outcome.settlement;
    let action = match &outcome.action {
        ReconcileAction::Created => "created".to_string(),
        ReconcileAction::Updated { payment_id } => format!("updated #{}", payment_id),
    };
    format!(
        "{} {}: tea {} - advance {} - loan {} - transport {} = net {} [{}]",
        s.supplier_id,
        action,
        format_money(s.tea_amount),
        format_money(s.advance_amount),
        format_money(s.loan_amount),
        format_money(s.transport_charge),
        format_money(s.net_amount),
        outcome.status
    )
}

pub fn render_report(report: &BatchReport) -> String {
    let mut out = String::new();
    for outcome in &report.outcomes {
        out.push_str(&render_outcome(outcome));
        out.push('\n');
    }
    for failure in &report.failures {
        out.push_str(&format!("{} failed: {}\n", failure.supplier_id, failure.error));
    }
    out.push_str(&format!(
        "created {}, updated {}, failed {}\n",
        report.created(),
        report.updated(),
        report.failures.len()
    ));
    if !report.refreshed {
        out.push_str("warning: payment list could not be refreshed\n");
    }
    out
}
