//! Finance ledger operations: validate, write to the store, then re-read the affected ledger.
//! Validation happens before any network call, so a rejected form never reaches the backend.

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::FinanceStore;
use crate::error::{CoreError, CoreResult};
use crate::ids::RecordId;
use crate::ledger;
use crate::models::{AdvanceInput, LedgerKind, LedgerStatus, LoanInput, Payment, PaymentInput};
use crate::reconcile::LedgerSnapshot;

/// `YYYY-MM`.
pub fn validate_month(month: &str) -> CoreResult<String> {
    let month = month.trim();
    if month.is_empty() {
        return Err(CoreError::validation("Please select a month."));
    }
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| CoreError::validation(format!("Month must look like 2024-04, got '{}'", month)))?;
    Ok(month.to_string())
}

fn validate_positive(value: f64, what: &str) -> CoreResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::validation(format!(
            "Please enter a valid {} greater than zero.",
            what
        )));
    }
    Ok(())
}

fn validate_date(date: &str, what: &str) -> CoreResult<String> {
    let date = date.trim();
    if date.is_empty() {
        return Err(CoreError::validation(format!("Please enter a valid {}.", what)));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| CoreError::validation(format!("Please enter a valid {}.", what)))?;
    Ok(date.to_string())
}

fn require_supplier<'a>(snapshot: &'a LedgerSnapshot, supplier_id: &str) -> CoreResult<&'a str> {
    snapshot
        .supplier(supplier_id)
        .map(|s| s.full_name.as_str())
        .ok_or_else(|| CoreError::validation(format!("Unknown supplier: {}", supplier_id)))
}

async fn refresh_ledger<S: FinanceStore + ?Sized>(
    store: &S,
    snapshot: &mut LedgerSnapshot,
    kind: LedgerKind,
) {
    let result = match kind {
        LedgerKind::Advance => store.list_advances().await.map(|v| snapshot.advances = v),
        LedgerKind::Loan => store.list_loans().await.map(|v| snapshot.loans = v),
        LedgerKind::Payment => store.list_payments().await.map(|v| snapshot.payments = v),
    };
    if let Err(e) = result {
        tracing::warn!("refresh of {} ledger failed, keeping previous data: {}", kind, e);
    }
}

/// Create a pending advance for one supplier.
pub async fn create_advance<S: FinanceStore + ?Sized>(
    store: &S,
    snapshot: &mut LedgerSnapshot,
    supplier_id: &str,
    amount: f64,
    month: &str,
) -> CoreResult<()> {
    validate_positive(amount, "advance amount")?;
    let month = validate_month(month)?;
    let name = require_supplier(snapshot, supplier_id)?.to_string();

    let input = AdvanceInput {
        supplier_id: supplier_id.to_string(),
        amount,
        month: month.clone(),
        status: LedgerStatus::Pending.as_str().to_string(),
    };
    store.create_advance(&input).await?;
    tracing::info!("advance of {} created for {} ({}) month {}", amount, name, supplier_id, month);
    refresh_ledger(store, snapshot, LedgerKind::Advance).await;
    Ok(())
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AdvanceBatchReport {
    pub created: usize,
    pub failed: Vec<(String, String)>,
}

/// Create the same advance for every supplier; a failed supplier does not stop the rest.
pub async fn create_advance_for_all<S: FinanceStore + ?Sized>(
    store: &S,
    snapshot: &mut LedgerSnapshot,
    amount: f64,
    month: &str,
) -> CoreResult<AdvanceBatchReport> {
    validate_positive(amount, "advance amount")?;
    let month = validate_month(month)?;

    let mut report = AdvanceBatchReport::default();
    for supplier in &snapshot.suppliers {
        let input = AdvanceInput {
            supplier_id: supplier.id.clone(),
            amount,
            month: month.clone(),
            status: LedgerStatus::Pending.as_str().to_string(),
        };
        match store.create_advance(&input).await {
            Ok(()) => report.created += 1,
            Err(e) => {
                tracing::error!("advance for supplier {} failed: {}", supplier.id, e);
                report.failed.push((supplier.id.clone(), e.to_string()));
            }
        }
    }
    tracing::info!(
        "advances for month {}: created={} failed={}",
        month,
        report.created,
        report.failed.len()
    );
    refresh_ledger(store, snapshot, LedgerKind::Advance).await;
    Ok(report)
}

/// Loan application as entered by the operator.
#[derive(Clone, Debug, PartialEq)]
pub struct LoanForm {
    pub supplier_id: String,
    pub amount: f64,
    pub duration_months: u32,
    pub purpose: String,
    pub monthly_amount: f64,
    pub due_date: String,
    pub status: String,
}

impl LoanForm {
    pub fn validate(&self) -> CoreResult<LoanInput> {
        validate_positive(self.amount, "loan amount")?;
        if self.duration_months == 0 {
            return Err(CoreError::validation(
                "Please enter a valid duration greater than zero.",
            ));
        }
        if self.purpose.trim().is_empty() {
            return Err(CoreError::validation("Please enter the purpose of the loan."));
        }
        validate_positive(self.monthly_amount, "monthly amount")?;
        let due_date = validate_date(&self.due_date, "due date")?;
        let status = if self.status.trim().is_empty() {
            LedgerStatus::Pending.as_str().to_string()
        } else {
            self.status.clone()
        };
        Ok(LoanInput {
            supplier_id: self.supplier_id.clone(),
            amount: self.amount,
            duration_months: self.duration_months,
            purpose: self.purpose.trim().to_string(),
            monthly_amount: self.monthly_amount,
            due_date,
            status,
        })
    }
}

pub async fn create_loan<S: FinanceStore + ?Sized>(
    store: &S,
    snapshot: &mut LedgerSnapshot,
    form: &LoanForm,
) -> CoreResult<()> {
    let input = form.validate()?;
    require_supplier(snapshot, &form.supplier_id)?;
    store.create_loan(&input).await?;
    tracing::info!("loan of {} created for supplier {}", input.amount, input.supplier_id);
    refresh_ledger(store, snapshot, LedgerKind::Loan).await;
    Ok(())
}

/// A payment entered by hand; the net amount is derived, not typed.
#[derive(Clone, Debug, PartialEq)]
pub struct PaymentForm {
    pub supplier_id: String,
    pub loan_amount: f64,
    pub advance_amount: f64,
    pub tea_amount: f64,
    pub transport_charge: f64,
    pub date: String,
    pub status: String,
}

impl PaymentForm {
    pub fn net_amount(&self) -> f64 {
        ledger::net_amount(
            self.tea_amount,
            self.advance_amount,
            self.loan_amount,
            self.transport_charge,
        )
    }

    pub fn validate(&self, supplier_name: &str) -> CoreResult<PaymentInput> {
        let amounts = [
            self.loan_amount,
            self.advance_amount,
            self.tea_amount,
            self.transport_charge,
        ];
        if amounts.iter().any(|a| !a.is_finite() || *a < 0.0) {
            return Err(CoreError::validation("Amounts must be zero or positive."));
        }
        let date = validate_date(&self.date, "payment date")?;
        let status = if self.status.trim().is_empty() {
            LedgerStatus::Pending.as_str().to_string()
        } else {
            self.status.clone()
        };
        Ok(PaymentInput {
            supplier_id: self.supplier_id.clone(),
            supplier_name: supplier_name.to_string(),
            loan_amount: self.loan_amount,
            advance_amount: self.advance_amount,
            tea_amount: self.tea_amount,
            transport_charge: self.transport_charge,
            net_amount: self.net_amount(),
            date,
            status,
        })
    }
}

pub async fn create_payment<S: FinanceStore + ?Sized>(
    store: &S,
    snapshot: &mut LedgerSnapshot,
    form: &PaymentForm,
) -> CoreResult<()> {
    let name = require_supplier(snapshot, &form.supplier_id)?.to_string();
    let input = form.validate(&name)?;
    store.create_payment(&input).await?;
    tracing::info!("payment created for supplier {} net={:.2}", input.supplier_id, input.net_amount);
    refresh_ledger(store, snapshot, LedgerKind::Payment).await;
    Ok(())
}

/// Send `status` verbatim; any value is accepted. The local copy changes only on success.
pub async fn set_status<S: FinanceStore + ?Sized>(
    store: &S,
    snapshot: &mut LedgerSnapshot,
    kind: LedgerKind,
    id: RecordId,
    status: &str,
) -> CoreResult<()> {
    store.update_status(kind, id, status).await?;
    let status = status.to_string();
    match kind {
        LedgerKind::Advance => snapshot
            .advances
            .iter_mut()
            .filter(|a| a.id == id)
            .for_each(|a| a.status = status.clone()),
        LedgerKind::Loan => snapshot
            .loans
            .iter_mut()
            .filter(|l| l.id == id)
            .for_each(|l| l.status = status.clone()),
        LedgerKind::Payment => snapshot
            .payments
            .iter_mut()
            .filter(|p| p.id == id)
            .for_each(|p| p.status = status.clone()),
    }
    tracing::info!("{} {} status set to {}", kind, id, status);
    Ok(())
}

pub async fn delete_record<S: FinanceStore + ?Sized>(
    store: &S,
    snapshot: &mut LedgerSnapshot,
    kind: LedgerKind,
    id: RecordId,
) -> CoreResult<()> {
    store.delete_record(kind, id).await?;
    match kind {
        LedgerKind::Advance => snapshot.advances.retain(|a| a.id != id),
        LedgerKind::Loan => snapshot.loans.retain(|l| l.id != id),
        LedgerKind::Payment => snapshot.payments.retain(|p| p.id != id),
    }
    tracing::info!("{} {} deleted", kind, id);
    Ok(())
}

/// Payment receipt lookup. The store reports a missing payment as `Ok(None)`.
pub async fn get_payment<S: FinanceStore + ?Sized>(
    store: &S,
    id: RecordId,
) -> CoreResult<Option<Payment>> {
    let payment = store.get_payment(id).await?;
    if payment.is_none() {
        tracing::info!("payment {} not found", id);
    }
    Ok(payment)
}
