//! Core of the tea-factory back office: wire models, collection aggregation,
//! payment reconciliation, ledger and registry operations, inventory figures
//! and the live driver feed.
//!
//! All state lives in the remote backend. Callers load a [`LedgerSnapshot`],
//! derive figures with the pure functions here, and push writes through a
//! [`FinanceStore`] / [`RegistryStore`].

pub mod api;
pub mod config;
pub mod error;
pub mod finance;
pub mod ids;
pub mod inventory;
pub mod ledger;
pub mod models;
pub mod realtime;
pub mod reconcile;
pub mod registry;
pub mod salary;
mod wire;

pub use api::{FinanceStore, HttpBackend, RegistryStore};
pub use config::Config;
pub use error::{CoreError, CoreResult};
pub use ids::RecordId;
pub use inventory::{DashboardOverview, Inventory, StockStatus};
pub use ledger::{FinanceSummary, LoanOutstandingRule};
pub use realtime::{Subscription, TrackingBoard};
pub use reconcile::{BatchReport, LedgerSnapshot, Reconciler, Settlement};
pub use salary::{aggregate_salaries, SalaryTotals, SupplierPeriodSalary};
