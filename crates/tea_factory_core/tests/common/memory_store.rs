//! In-memory backend implementing both store traits, with call logging and failure injection.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use tea_factory_core::models::{
    Advance, AdvanceInput, CollectionEvent, Driver, LedgerKind, Loan, LoanInput, NewDriver,
    NewSupplier, Payment, PaymentInput, Product, Supplier,
};
use tea_factory_core::{CoreError, CoreResult, FinanceStore, RecordId, RegistryStore};

#[derive(Default)]
struct State {
    suppliers: Vec<Supplier>,
    collections: Vec<CollectionEvent>,
    advances: Vec<Advance>,
    loans: Vec<Loan>,
    payments: Vec<Payment>,
    drivers: Vec<Driver>,
    products: Vec<Product>,
    next_id: RecordId,
}

impl State {
    fn next_id(&mut self) -> RecordId {
        self.next_id += 1;
        self.next_id
    }

    fn supplier_name(&self, id: &str) -> String {
        self.suppliers
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.full_name.clone())
            .unwrap_or_default()
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    calls: Mutex<Vec<String>>,
    failing_suppliers: Mutex<HashSet<String>>,
    fail_payment_reads: Mutex<bool>,
}

fn not_found(what: &str, id: RecordId) -> CoreError {
    CoreError::Write {
        status: 404,
        message: format!("Failed to update {}: {} not found", what, id),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_suppliers(self, suppliers: Vec<Supplier>) -> Self {
        self.state.lock().unwrap().suppliers = suppliers;
        self
    }

    pub fn with_collections(self, collections: Vec<CollectionEvent>) -> Self {
        self.state.lock().unwrap().collections = collections;
        self
    }

    pub fn with_advances(self, advances: Vec<Advance>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for mut a in advances {
                a.id = state.next_id();
                state.advances.push(a);
            }
        }
        self
    }

    pub fn with_loans(self, loans: Vec<Loan>) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            for mut l in loans {
                l.id = state.next_id();
                state.loans.push(l);
            }
        }
        self
    }

    pub fn with_drivers(self, drivers: Vec<Driver>) -> Self {
        self.state.lock().unwrap().drivers = drivers;
        self
    }

    pub fn with_products(self, products: Vec<Product>) -> Self {
        self.state.lock().unwrap().products = products;
        self
    }

    /// Every write that touches `supplier_id` fails with a 500.
    pub fn fail_writes_for(&self, supplier_id: &str) {
        self.failing_suppliers
            .lock()
            .unwrap()
            .insert(supplier_id.to_string());
    }

    pub fn fail_payment_reads(&self, fail: bool) {
        *self.fail_payment_reads.lock().unwrap() = fail;
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.state.lock().unwrap().payments.clone()
    }

    pub fn advances(&self) -> Vec<Advance> {
        self.state.lock().unwrap().advances.clone()
    }

    pub fn suppliers(&self) -> Vec<Supplier> {
        self.state.lock().unwrap().suppliers.clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that are not list/get reads.
    pub fn write_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("list_") && !c.starts_with("get_"))
            .collect()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }

    fn check_supplier(&self, supplier_id: &str, what: &str) -> CoreResult<()> {
        if self.failing_suppliers.lock().unwrap().contains(supplier_id) {
            return Err(CoreError::Write {
                status: 500,
                message: format!("Failed to {}: injected failure for {}", what, supplier_id),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FinanceStore for MemoryStore {
    async fn list_suppliers(&self) -> CoreResult<Vec<Supplier>> {
        self.record("list_suppliers");
        Ok(self.state.lock().unwrap().suppliers.clone())
    }

    async fn list_collections(&self) -> CoreResult<Vec<CollectionEvent>> {
        self.record("list_collections");
        Ok(self.state.lock().unwrap().collections.clone())
    }

    async fn list_advances(&self) -> CoreResult<Vec<Advance>> {
        self.record("list_advances");
        Ok(self.state.lock().unwrap().advances.clone())
    }

    async fn list_loans(&self) -> CoreResult<Vec<Loan>> {
        self.record("list_loans");
        Ok(self.state.lock().unwrap().loans.clone())
    }

    async fn list_payments(&self) -> CoreResult<Vec<Payment>> {
        self.record("list_payments");
        if *self.fail_payment_reads.lock().unwrap() {
            return Err(CoreError::fetch("payments", "500 Internal Server Error"));
        }
        Ok(self.state.lock().unwrap().payments.clone())
    }

    async fn get_payment(&self, id: RecordId) -> CoreResult<Option<Payment>> {
        self.record(format!("get_payment {}", id));
        Ok(self
            .state
            .lock()
            .unwrap()
            .payments
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn create_advance(&self, input: &AdvanceInput) -> CoreResult<()> {
        self.record(format!("create_advance {}", input.supplier_id));
        self.check_supplier(&input.supplier_id, "create advance")?;
        let mut state = self.state.lock().unwrap();
        let advance = Advance {
            id: state.next_id(),
            supplier_id: input.supplier_id.clone(),
            supplier_name: state.supplier_name(&input.supplier_id),
            amount: input.amount,
            date: format!("{}-01", input.month),
            status: input.status.clone(),
            month: Some(input.month.clone()),
        };
        state.advances.push(advance);
        Ok(())
    }

    async fn create_loan(&self, input: &LoanInput) -> CoreResult<()> {
        self.record(format!("create_loan {}", input.supplier_id));
        self.check_supplier(&input.supplier_id, "create loan")?;
        let mut state = self.state.lock().unwrap();
        let loan = Loan {
            id: state.next_id(),
            supplier_id: input.supplier_id.clone(),
            supplier_name: state.supplier_name(&input.supplier_id),
            amount: input.amount,
            duration_months: input.duration_months as f64,
            purpose: input.purpose.clone(),
            monthly_amount: input.monthly_amount,
            due_date: input.due_date.clone(),
            status: input.status.clone(),
        };
        state.loans.push(loan);
        Ok(())
    }

    async fn create_payment(&self, input: &PaymentInput) -> CoreResult<()> {
        self.record(format!("create_payment {}", input.supplier_id));
        self.check_supplier(&input.supplier_id, "create payment")?;
        let mut state = self.state.lock().unwrap();
        let payment = Payment {
            id: state.next_id(),
            supplier_id: input.supplier_id.clone(),
            supplier_name: input.supplier_name.clone(),
            loan_amount: input.loan_amount,
            advance_amount: input.advance_amount,
            tea_amount: input.tea_amount,
            transport_charge: input.transport_charge,
            net_amount: input.net_amount,
            date: input.date.clone(),
            status: input.status.clone(),
        };
        state.payments.push(payment);
        Ok(())
    }

    async fn update_payment(&self, id: RecordId, input: &PaymentInput) -> CoreResult<()> {
        self.record(format!("update_payment {} {}", id, input.supplier_id));
        self.check_supplier(&input.supplier_id, "update payment")?;
        let mut state = self.state.lock().unwrap();
        let payment = state
            .payments
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| not_found("payment", id))?;
        payment.supplier_id = input.supplier_id.clone();
        payment.supplier_name = input.supplier_name.clone();
        payment.loan_amount = input.loan_amount;
        payment.advance_amount = input.advance_amount;
        payment.tea_amount = input.tea_amount;
        payment.transport_charge = input.transport_charge;
        payment.net_amount = input.net_amount;
        payment.date = input.date.clone();
        payment.status = input.status.clone();
        Ok(())
    }

    async fn update_status(&self, kind: LedgerKind, id: RecordId, status: &str) -> CoreResult<()> {
        self.record(format!("update_status {} {} {}", kind, id, status));
        let mut state = self.state.lock().unwrap();
        let slot = match kind {
            LedgerKind::Advance => state.advances.iter_mut().find(|a| a.id == id).map(|a| &mut a.status),
            LedgerKind::Loan => state.loans.iter_mut().find(|l| l.id == id).map(|l| &mut l.status),
            LedgerKind::Payment => state.payments.iter_mut().find(|p| p.id == id).map(|p| &mut p.status),
        };
        match slot {
            Some(s) => {
                *s = status.to_string();
                Ok(())
            }
            None => Err(not_found(kind.as_str(), id)),
        }
    }

    async fn delete_record(&self, kind: LedgerKind, id: RecordId) -> CoreResult<()> {
        self.record(format!("delete_record {} {}", kind, id));
        let mut state = self.state.lock().unwrap();
        let before = match kind {
            LedgerKind::Advance => state.advances.len(),
            LedgerKind::Loan => state.loans.len(),
            LedgerKind::Payment => state.payments.len(),
        };
        let after = match kind {
            LedgerKind::Advance => {
                state.advances.retain(|a| a.id != id);
                state.advances.len()
            }
            LedgerKind::Loan => {
                state.loans.retain(|l| l.id != id);
                state.loans.len()
            }
            LedgerKind::Payment => {
                state.payments.retain(|p| p.id != id);
                state.payments.len()
            }
        };
        if before == after {
            return Err(not_found(kind.as_str(), id));
        }
        Ok(())
    }
}

#[async_trait]
impl RegistryStore for MemoryStore {
    async fn list_drivers(&self) -> CoreResult<Vec<Driver>> {
        self.record("list_drivers");
        Ok(self.state.lock().unwrap().drivers.clone())
    }

    async fn list_products(&self) -> CoreResult<Vec<Product>> {
        self.record("list_products");
        Ok(self.state.lock().unwrap().products.clone())
    }

    async fn create_supplier(&self, input: &NewSupplier) -> CoreResult<()> {
        self.record(format!("create_supplier {}", input.id));
        self.check_supplier(&input.id, "add supplier")?;
        self.state.lock().unwrap().suppliers.push(Supplier {
            id: input.id.clone(),
            full_name: input.full_name.clone(),
            address: input.address.clone(),
            contact_no: input.contact_no.clone(),
            account_number: input.account_number.clone(),
            bank_name: input.bank_name.clone(),
            branch: input.branch.clone(),
            email: input.email.clone(),
            username: input.username.clone(),
        });
        Ok(())
    }

    async fn delete_supplier(&self, id: &str) -> CoreResult<()> {
        self.record(format!("delete_supplier {}", id));
        let mut state = self.state.lock().unwrap();
        let referenced = state.collections.iter().any(|c| c.supplier_id == id)
            || state.advances.iter().any(|a| a.supplier_id == id)
            || state.loans.iter().any(|l| l.supplier_id == id)
            || state.payments.iter().any(|p| p.supplier_id == id);
        if referenced {
            return Err(CoreError::Write {
                status: 500,
                message: "Failed to delete supplier: The DELETE statement conflicted with the REFERENCE constraint \"FK_Collection_Supplier\"".to_string(),
            });
        }
        let before = state.suppliers.len();
        state.suppliers.retain(|s| s.id != id);
        if state.suppliers.len() == before {
            return Err(CoreError::Write {
                status: 404,
                message: format!("Failed to delete supplier: {} not found", id),
            });
        }
        Ok(())
    }

    async fn create_driver(&self, input: &NewDriver) -> CoreResult<()> {
        self.record(format!("create_driver {}", input.id));
        self.state.lock().unwrap().drivers.push(Driver {
            id: input.id.clone(),
            full_name: input.full_name.clone(),
            contact_number: input.contact_number.clone(),
            email: input.email.clone(),
            vehicle_number: input.vehicle_number.clone(),
            route: input.route.clone(),
            serial_code: input.serial_code.clone(),
            latitude: None,
            longitude: None,
            status: "Idle".to_string(),
            last_updated: None,
        });
        Ok(())
    }
}
