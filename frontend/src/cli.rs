//! Command-line surface: one subcommand per page or action.

use clap::{Args, Parser, Subcommand, ValueEnum};
use tea_factory_core::models::{AdvanceStatus, LedgerKind, LedgerStatus, NewDriver, NewSupplier};
use tea_factory_core::{Config, LoanOutstandingRule};

use crate::screens::FinanceTab;

#[derive(Parser, Debug)]
#[command(name = "tea-dashboard", version, about = "Tea factory back office")]
pub struct Cli {
    /// Backend base URL (overrides TEA_API_BASE_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Fixed transport deduction per payment (overrides TEA_TRANSPORT_CHARGE)
    #[arg(long, global = true)]
    pub transport_charge: Option<f64>,

    /// Which loan statuses count as outstanding
    #[arg(long, global = true, value_enum)]
    pub loan_rule: Option<LoanRule>,

    /// Print page state as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Command-line flags win over the environment.
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_url {
            config.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(charge) = self.transport_charge {
            config.transport_charge = charge;
        }
        if let Some(rule) = self.loan_rule {
            config.loan_rule = rule.into();
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LoanRule {
    AllowList,
    ActiveOnly,
}

impl From<LoanRule> for LoanOutstandingRule {
    fn from(rule: LoanRule) -> Self {
        match rule {
            LoanRule::AllowList => LoanOutstandingRule::AllowList,
            LoanRule::ActiveOnly => LoanOutstandingRule::ActiveOnly,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Ledger {
    Advance,
    Loan,
    Payment,
}

impl From<Ledger> for LedgerKind {
    fn from(l: Ledger) -> Self {
        match l {
            Ledger::Advance => LedgerKind::Advance,
            Ledger::Loan => LedgerKind::Loan,
            Ledger::Payment => LedgerKind::Payment,
        }
    }
}

/// Checks the status against the ledger's allowed values and returns it exactly as typed.
pub fn check_status(ledger: Ledger, status: &str) -> anyhow::Result<&str> {
    let known = match ledger {
        Ledger::Advance => AdvanceStatus::from_str(status).is_some(),
        Ledger::Loan | Ledger::Payment => LedgerStatus::from_str(status).is_some(),
    };
    if known {
        return Ok(status);
    }
    let allowed: Vec<&str> = match ledger {
        Ledger::Advance => AdvanceStatus::ALL.iter().map(|s| s.as_str()).collect(),
        Ledger::Loan | Ledger::Payment => LedgerStatus::ALL.iter().map(|s| s.as_str()).collect(),
    };
    Err(anyhow::anyhow!(
        "unknown {:?} status '{}' (expected {})",
        ledger,
        status,
        allowed.join(", ")
    ))
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Headline figures
    Overview,
    /// Monthly salary rows per supplier
    Calculations {
        /// Only collections whose timestamp starts with this, e.g. 2024-04
        #[arg(long)]
        month: Option<String>,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Recompute and upsert payment records
    Reconcile {
        /// Single supplier; every supplier when omitted
        #[arg(long)]
        supplier: Option<String>,
    },
    /// Finance summary and ledgers
    Finances {
        #[arg(value_enum, default_value_t = FinanceTab::Summary)]
        tab: FinanceTab,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Record an advance for one supplier or all of them
    Advance(AdvanceArgs),
    /// Record a loan
    Loan(LoanArgs),
    /// Record or look up a payment
    #[command(subcommand)]
    Payment(PaymentCommand),
    /// Change a ledger record's status
    Status {
        #[arg(value_enum)]
        ledger: Ledger,
        id: String,
        status: String,
    },
    /// Delete a ledger record
    Delete {
        #[arg(value_enum)]
        ledger: Ledger,
        id: String,
    },
    /// Tea packet and fertilizer stock
    Inventory {
        #[arg(long, default_value = "")]
        search: String,
    },
    #[command(subcommand)]
    Suppliers(SupplierCommand),
    #[command(subcommand)]
    Drivers(DriverCommand),
    /// Follow live driver locations
    Track {
        /// Stop after this many updates
        #[arg(long)]
        limit: Option<usize>,
    },
}

#[derive(Args, Debug)]
pub struct AdvanceArgs {
    /// Supplier register id
    #[arg(long, required_unless_present = "all", conflicts_with = "all")]
    pub supplier: Option<String>,
    /// Same advance for every supplier
    #[arg(long)]
    pub all: bool,
    #[arg(long)]
    pub amount: f64,
    /// YYYY-MM
    #[arg(long)]
    pub month: String,
}

#[derive(Args, Debug)]
pub struct LoanArgs {
    #[arg(long)]
    pub supplier: String,
    #[arg(long)]
    pub amount: f64,
    #[arg(long)]
    pub months: u32,
    #[arg(long)]
    pub purpose: String,
    /// Defaults to amount / months
    #[arg(long)]
    pub monthly: Option<f64>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub due: String,
}

#[derive(Subcommand, Debug)]
pub enum PaymentCommand {
    Create {
        #[arg(long)]
        supplier: String,
        #[arg(long)]
        tea: f64,
        #[arg(long, default_value_t = 0.0)]
        advance: f64,
        #[arg(long, default_value_t = 0.0)]
        loan: f64,
        /// Defaults to the configured transport charge
        #[arg(long)]
        transport: Option<f64>,
        /// YYYY-MM-DD, today when omitted
        #[arg(long)]
        date: Option<String>,
    },
    Show {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SupplierCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Add(SupplierArgs),
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
pub struct SupplierArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub contact: String,
    #[arg(long)]
    pub account: String,
    #[arg(long)]
    pub bank: String,
    #[arg(long)]
    pub branch: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub username: String,
    #[arg(long)]
    pub password: String,
}

impl From<&SupplierArgs> for NewSupplier {
    fn from(a: &SupplierArgs) -> Self {
        NewSupplier {
            id: a.id.clone(),
            full_name: a.name.clone(),
            address: a.address.clone(),
            contact_no: a.contact.clone(),
            account_number: a.account.clone(),
            bank_name: a.bank.clone(),
            branch: a.branch.clone(),
            email: a.email.clone(),
            username: a.username.clone(),
            password: a.password.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum DriverCommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Add(DriverArgs),
}

#[derive(Args, Debug)]
pub struct DriverArgs {
    #[arg(long)]
    pub id: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub contact: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub vehicle: String,
    #[arg(long)]
    pub route: String,
    #[arg(long)]
    pub serial: String,
}

impl From<&DriverArgs> for NewDriver {
    fn from(a: &DriverArgs) -> Self {
        NewDriver {
            id: a.id.clone(),
            full_name: a.name.clone(),
            contact_number: a.contact.clone(),
            email: a.email.clone(),
            vehicle_number: a.vehicle.clone(),
            route: a.route.clone(),
            serial_code: a.serial.clone(),
        }
    }
}
