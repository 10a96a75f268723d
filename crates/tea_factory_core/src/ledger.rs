//! Outstanding balances and summary figures over the advance, loan and payment ledgers.

use std::str::FromStr;

use serde::Serialize;

use crate::models::{status_is, Advance, CollectionEvent, Loan, Payment};

/// Which loan statuses count toward a supplier's outstanding loan balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoanOutstandingRule {
    /// "active", "approved" or "pending", in any case.
    #[default]
    AllowList,
    /// Only "active".
    ActiveOnly,
}

impl LoanOutstandingRule {
    pub fn includes(&self, status: &str) -> bool {
        match self {
            LoanOutstandingRule::AllowList => ["active", "approved", "pending"]
                .iter()
                .any(|s| status_is(status, s)),
            LoanOutstandingRule::ActiveOnly => status_is(status, "active"),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanOutstandingRule::AllowList => "allow-list",
            LoanOutstandingRule::ActiveOnly => "active-only",
        }
    }
}

impl FromStr for LoanOutstandingRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "allow-list" | "allowlist" | "default" => Ok(LoanOutstandingRule::AllowList),
            "active-only" | "active" => Ok(LoanOutstandingRule::ActiveOnly),
            other => Err(format!("Unknown loan outstanding rule: {}", other)),
        }
    }
}

/// Sum of the supplier's advances whose status is anything but "paid".
pub fn outstanding_advance(advances: &[Advance], supplier_id: &str) -> f64 {
    advances
        .iter()
        .filter(|a| a.supplier_id == supplier_id && !status_is(&a.status, "paid"))
        .map(|a| a.amount)
        .sum()
}

/// Sum of the supplier's loans whose status passes `rule`.
pub fn outstanding_loan(loans: &[Loan], supplier_id: &str, rule: LoanOutstandingRule) -> f64 {
    loans
        .iter()
        .filter(|l| l.supplier_id == supplier_id && rule.includes(&l.status))
        .map(|l| l.amount)
        .sum()
}

/// Lifetime rate x weight over every collection of the supplier.
pub fn gross_tea_amount(collections: &[CollectionEvent], supplier_id: &str) -> f64 {
    collections
        .iter()
        .filter(|c| c.supplier_id == supplier_id)
        .map(CollectionEvent::amount)
        .sum()
}

/// Net payable, never negative.
pub fn net_amount(tea: f64, advance: f64, loan: f64, transport_charge: f64) -> f64 {
    (tea - advance - loan - transport_charge).max(0.0)
}

/// Records awaiting a decision across all three ledgers.
pub fn pending_approvals(advances: &[Advance], loans: &[Loan], payments: &[Payment]) -> usize {
    advances.iter().filter(|a| status_is(&a.status, "pending")).count()
        + loans.iter().filter(|l| status_is(&l.status, "pending")).count()
        + payments.iter().filter(|p| status_is(&p.status, "pending")).count()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FinanceSummary {
    pub total_advances: f64,
    pub total_outstanding_loans: f64,
    /// Net payable recomputed from the ledgers for every existing payment.
    pub total_net_payable: f64,
    pub pending_approvals: usize,
}

impl FinanceSummary {
    pub fn compute(
        collections: &[CollectionEvent],
        advances: &[Advance],
        loans: &[Loan],
        payments: &[Payment],
        rule: LoanOutstandingRule,
    ) -> Self {
        let total_net_payable = payments
            .iter()
            .map(|p| {
                net_amount(
                    gross_tea_amount(collections, &p.supplier_id),
                    outstanding_advance(advances, &p.supplier_id),
                    outstanding_loan(loans, &p.supplier_id, rule),
                    p.transport_charge,
                )
            })
            .sum();
        Self {
            total_advances: advances.iter().map(|a| a.amount).sum(),
            total_outstanding_loans: loans
                .iter()
                .filter(|l| rule.includes(&l.status))
                .map(|l| l.amount)
                .sum(),
            total_net_payable,
            pending_approvals: pending_approvals(advances, loans, payments),
        }
    }
}

fn name_matches(name: &str, needle: &str) -> bool {
    needle.is_empty() || name.to_lowercase().contains(needle)
}

pub fn search_advances<'a>(advances: &'a [Advance], query: &str) -> Vec<&'a Advance> {
    let needle = query.trim().to_lowercase();
    advances.iter().filter(|a| name_matches(&a.supplier_name, &needle)).collect()
}

pub fn search_loans<'a>(loans: &'a [Loan], query: &str) -> Vec<&'a Loan> {
    let needle = query.trim().to_lowercase();
    loans.iter().filter(|l| name_matches(&l.supplier_name, &needle)).collect()
}

pub fn search_payments<'a>(payments: &'a [Payment], query: &str) -> Vec<&'a Payment> {
    let needle = query.trim().to_lowercase();
    payments.iter().filter(|p| name_matches(&p.supplier_name, &needle)).collect()
}
