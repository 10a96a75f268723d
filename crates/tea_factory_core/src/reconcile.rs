//! Payment reconciliation: recompute each supplier's net payable from the ledgers and
//! create or update the matching payment record.
//!
//! Writes go out one supplier at a time, in supplier-list order, each awaited before the
//! next. A failed write is logged and recorded; the remaining suppliers are still processed.
//! After a batch the payment list is re-read from the store.

use chrono::Utc;
use serde::Serialize;

use crate::api::FinanceStore;
use crate::config::Config;
use crate::error::CoreResult;
use crate::ids::RecordId;
use crate::ledger::{self, LoanOutstandingRule};
use crate::models::{
    Advance, CollectionEvent, LedgerStatus, Loan, Payment, PaymentInput, Supplier,
};

/// Everything reconciliation reads, fetched in one go.
#[derive(Clone, Debug, Default)]
pub struct LedgerSnapshot {
    pub suppliers: Vec<Supplier>,
    pub collections: Vec<CollectionEvent>,
    pub advances: Vec<Advance>,
    pub loans: Vec<Loan>,
    pub payments: Vec<Payment>,
}

impl LedgerSnapshot {
    /// Fetch all five ledgers. Any failed read fails the load.
    pub async fn load<S: FinanceStore + ?Sized>(store: &S) -> CoreResult<Self> {
        let suppliers = store.list_suppliers().await?;
        let collections = store.list_collections().await?;
        let advances = store.list_advances().await?;
        let loans = store.list_loans().await?;
        let payments = store.list_payments().await?;
        tracing::info!(
            "ledgers loaded: suppliers={} collections={} advances={} loans={} payments={}",
            suppliers.len(),
            collections.len(),
            advances.len(),
            loans.len(),
            payments.len()
        );
        Ok(Self {
            suppliers,
            collections,
            advances,
            loans,
            payments,
        })
    }

    /// Fetch all five ledgers for display. A failed read is logged and that ledger is
    /// left empty; the others still load.
    pub async fn load_lenient<S: FinanceStore + ?Sized>(store: &S) -> Self {
        Self {
            suppliers: or_empty("suppliers", store.list_suppliers().await),
            collections: or_empty("collections", store.list_collections().await),
            advances: or_empty("advances", store.list_advances().await),
            loans: or_empty("loans", store.list_loans().await),
            payments: or_empty("payments", store.list_payments().await),
        }
    }

    /// First payment recorded for the supplier. Extra payments for the same supplier are
    /// ignored (and logged), since the store does not enforce one per supplier.
    pub fn find_payment(&self, supplier_id: &str) -> Option<&Payment> {
        let mut matches = self.payments.iter().filter(|p| p.supplier_id == supplier_id);
        let first = matches.next();
        let extra = matches.count();
        if extra > 0 {
            tracing::warn!(
                "supplier {} has {} duplicate payment records; using the first (id={})",
                supplier_id,
                extra,
                first.map(|p| p.id).unwrap_or_default()
            );
        }
        first
    }

    pub fn supplier(&self, supplier_id: &str) -> Option<&Supplier> {
        self.suppliers.iter().find(|s| s.id == supplier_id)
    }

    /// Re-read payments; on failure the previous list is kept. Returns whether it refreshed.
    pub async fn refresh_payments<S: FinanceStore + ?Sized>(&mut self, store: &S) -> bool {
        match store.list_payments().await {
            Ok(payments) => {
                self.payments = payments;
                true
            }
            Err(e) => {
                tracing::warn!("payment refresh failed, keeping previous list: {}", e);
                false
            }
        }
    }
}

fn or_empty<T>(what: &str, result: CoreResult<Vec<T>>) -> Vec<T> {
    result.unwrap_or_else(|e| {
        tracing::error!("loading {} failed: {}", what, e);
        Vec::new()
    })
}

/// The figures that make up one supplier's payment.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Settlement {
    pub supplier_id: String,
    pub supplier_name: String,
    pub tea_amount: f64,
    pub advance_amount: f64,
    pub loan_amount: f64,
    pub transport_charge: f64,
    pub net_amount: f64,
}

impl Settlement {
    pub fn compute(
        snapshot: &LedgerSnapshot,
        supplier: &Supplier,
        transport_charge: f64,
        rule: LoanOutstandingRule,
    ) -> Self {
        let tea_amount = ledger::gross_tea_amount(&snapshot.collections, &supplier.id);
        let advance_amount = ledger::outstanding_advance(&snapshot.advances, &supplier.id);
        let loan_amount = ledger::outstanding_loan(&snapshot.loans, &supplier.id, rule);
        Self {
            supplier_id: supplier.id.clone(),
            supplier_name: supplier.full_name.clone(),
            tea_amount,
            advance_amount,
            loan_amount,
            transport_charge,
            net_amount: ledger::net_amount(tea_amount, advance_amount, loan_amount, transport_charge),
        }
    }

    pub fn to_input(&self, date: String, status: String) -> PaymentInput {
        PaymentInput {
            supplier_id: self.supplier_id.clone(),
            supplier_name: self.supplier_name.clone(),
            loan_amount: self.loan_amount,
            advance_amount: self.advance_amount,
            tea_amount: self.tea_amount,
            transport_charge: self.transport_charge,
            net_amount: self.net_amount,
            date,
            status,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ReconcileAction {
    Created,
    Updated { payment_id: RecordId },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReconcileOutcome {
    pub settlement: Settlement,
    pub action: ReconcileAction,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReconcileFailure {
    pub supplier_id: String,
    pub error: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub outcomes: Vec<ReconcileOutcome>,
    pub failures: Vec<ReconcileFailure>,
    /// False when the closing payment re-read failed.
    pub refreshed: bool,
}

impl BatchReport {
    pub fn created(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.action == ReconcileAction::Created)
            .count()
    }

    pub fn updated(&self) -> usize {
        self.outcomes.len() - self.created()
    }
}

pub struct Reconciler<'a, S: FinanceStore + ?Sized> {
    store: &'a S,
    transport_charge: f64,
    rule: LoanOutstandingRule,
}

impl<'a, S: FinanceStore + ?Sized> Reconciler<'a, S> {
    pub fn new(store: &'a S, config: &Config) -> Self {
        Self {
            store,
            transport_charge: config.transport_charge,
            rule: config.loan_rule,
        }
    }

    pub fn with_transport_charge(mut self, transport_charge: f64) -> Self {
        self.transport_charge = transport_charge;
        self
    }

    pub fn with_loan_rule(mut self, rule: LoanOutstandingRule) -> Self {
        self.rule = rule;
        self
    }

    pub fn settlement(&self, snapshot: &LedgerSnapshot, supplier: &Supplier) -> Settlement {
        Settlement::compute(snapshot, supplier, self.transport_charge, self.rule)
    }

    /// One create-or-update write for `supplier`, without refreshing the snapshot.
    async fn write_payment(
        &self,
        snapshot: &LedgerSnapshot,
        supplier: &Supplier,
    ) -> CoreResult<ReconcileOutcome> {
        let settlement = self.settlement(snapshot, supplier);
        let date = Utc::now().to_rfc3339();
        match snapshot.find_payment(&supplier.id) {
            Some(existing) => {
                let status = if existing.status.trim().is_empty() {
                    LedgerStatus::Pending.as_str().to_string()
                } else {
                    existing.status.clone()
                };
                let input = settlement.to_input(date, status.clone());
                self.store.update_payment(existing.id, &input).await?;
                tracing::info!(
                    "payment {} updated for supplier {} net={:.2}",
                    existing.id,
                    supplier.id,
                    settlement.net_amount
                );
                Ok(ReconcileOutcome {
                    settlement,
                    action: ReconcileAction::Updated {
                        payment_id: existing.id,
                    },
                    status,
                })
            }
            None => {
                let status = LedgerStatus::Pending.as_str().to_string();
                let input = settlement.to_input(date, status.clone());
                self.store.create_payment(&input).await?;
                tracing::info!(
                    "payment created for supplier {} net={:.2}",
                    supplier.id,
                    settlement.net_amount
                );
                Ok(ReconcileOutcome {
                    settlement,
                    action: ReconcileAction::Created,
                    status,
                })
            }
        }
    }

    /// Reconcile a single supplier, then re-read payments so a repeat run finds the record.
    pub async fn reconcile(
        &self,
        snapshot: &mut LedgerSnapshot,
        supplier: &Supplier,
    ) -> CoreResult<ReconcileOutcome> {
        let outcome = self.write_payment(snapshot, supplier).await?;
        snapshot.refresh_payments(self.store).await;
        Ok(outcome)
    }

    /// Reconcile every supplier in the snapshot, sequentially and independently.
    pub async fn reconcile_all(&self, snapshot: &mut LedgerSnapshot) -> BatchReport {
        let mut report = BatchReport::default();
        tracing::info!(
            "reconcile_all: {} suppliers transport_charge={} loan_rule={}",
            snapshot.suppliers.len(),
            self.transport_charge,
            self.rule.as_str()
        );
        for supplier in &snapshot.suppliers {
            match self.write_payment(snapshot, supplier).await {
                Ok(outcome) => report.outcomes.push(outcome),
                Err(e) => {
                    tracing::error!("reconcile_all: supplier {} failed: {}", supplier.id, e);
                    report.failures.push(ReconcileFailure {
                        supplier_id: supplier.id.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        report.refreshed = snapshot.refresh_payments(self.store).await;
        tracing::info!(
            "reconcile_all: created={} updated={} failed={}",
            report.created(),
            report.updated(),
            report.failures.len()
        );
        report
    }
}
