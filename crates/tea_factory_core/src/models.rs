//! Data models for suppliers, drivers, collections, ledgers and products.
//! Wire format is camelCase JSON; the backend's legacy column names are accepted as aliases.

use serde::{Deserialize, Serialize};

use crate::ids::RecordId;
use crate::wire;

/// Statuses an operator can pick for an advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdvanceStatus {
    Pending,
    Transferred,
}

impl AdvanceStatus {
    pub const ALL: [AdvanceStatus; 2] = [AdvanceStatus::Pending, AdvanceStatus::Transferred];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdvanceStatus::Pending => "Pending",
            AdvanceStatus::Transferred => "Transferred",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(AdvanceStatus::Pending),
            // older records carry the misspelling
            "transferred" | "transfered" => Some(AdvanceStatus::Transferred),
            _ => None,
        }
    }
}

impl std::fmt::Display for AdvanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Statuses an operator can pick for a loan or payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedgerStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl LedgerStatus {
    pub const ALL: [LedgerStatus; 4] = [
        LedgerStatus::Pending,
        LedgerStatus::Approved,
        LedgerStatus::Rejected,
        LedgerStatus::Paid,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerStatus::Pending => "Pending",
            LedgerStatus::Approved => "Approved",
            LedgerStatus::Rejected => "Rejected",
            LedgerStatus::Paid => "Paid",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(LedgerStatus::Pending),
            "approved" => Some(LedgerStatus::Approved),
            "rejected" => Some(LedgerStatus::Rejected),
            "paid" => Some(LedgerStatus::Paid),
            _ => None,
        }
    }
}

impl std::fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Case-insensitive status comparison; statuses stay free-form strings on the wire.
pub fn status_is(status: &str, expected: &str) -> bool {
    status.trim().eq_ignore_ascii_case(expected)
}

/// Which ledger a record id belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LedgerKind {
    Advance,
    Loan,
    Payment,
}

impl LedgerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerKind::Advance => "advance",
            LedgerKind::Loan => "loan",
            LedgerKind::Payment => "payment",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "advance" | "advances" => Some(LedgerKind::Advance),
            "loan" | "loans" => Some(LedgerKind::Loan),
            "payment" | "payments" => Some(LedgerKind::Payment),
            _ => None,
        }
    }
}

impl std::fmt::Display for LedgerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One weighing-station record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEvent {
    #[serde(alias = "S_RegisterID", deserialize_with = "wire::string_or_empty")]
    pub supplier_id: String,
    #[serde(default, alias = "S_FullName", deserialize_with = "wire::string_or_empty")]
    pub supplier_name: String,
    #[serde(default, alias = "Current_Rate", deserialize_with = "wire::number_or_zero")]
    pub rate: f64,
    #[serde(default, alias = "TotalWeight", deserialize_with = "wire::number_or_zero")]
    pub weight: f64,
    #[serde(default, alias = "DateTime", deserialize_with = "wire::string_or_empty")]
    pub timestamp: String,
}

impl CollectionEvent {
    pub fn amount(&self) -> f64 {
        self.rate * self.weight
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advance {
    #[serde(alias = "AdvanceID", deserialize_with = "wire::record_id")]
    pub id: RecordId,
    #[serde(alias = "S_RegisterID", deserialize_with = "wire::string_or_empty")]
    pub supplier_id: String,
    #[serde(default, alias = "S_FullName", deserialize_with = "wire::string_or_empty")]
    pub supplier_name: String,
    #[serde(default, alias = "Advance_Amount", deserialize_with = "wire::number_or_zero")]
    pub amount: f64,
    #[serde(default, alias = "Date", deserialize_with = "wire::string_or_empty")]
    pub date: String,
    #[serde(default, alias = "Status", deserialize_with = "wire::string_or_empty")]
    pub status: String,
    #[serde(default, alias = "Month", skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(alias = "LoanID", deserialize_with = "wire::record_id")]
    pub id: RecordId,
    #[serde(alias = "S_RegisterID", deserialize_with = "wire::string_or_empty")]
    pub supplier_id: String,
    #[serde(default, alias = "S_FullName", deserialize_with = "wire::string_or_empty")]
    pub supplier_name: String,
    #[serde(default, alias = "Loan_Amount", deserialize_with = "wire::number_or_zero")]
    pub amount: f64,
    #[serde(default, alias = "Duration", deserialize_with = "wire::number_or_zero")]
    pub duration_months: f64,
    #[serde(default, alias = "PurposeOfLoan", deserialize_with = "wire::string_or_empty")]
    pub purpose: String,
    #[serde(default, alias = "Monthly_Amount", deserialize_with = "wire::number_or_zero")]
    pub monthly_amount: f64,
    #[serde(default, alias = "Due_Date", deserialize_with = "wire::string_or_empty")]
    pub due_date: String,
    #[serde(default, alias = "Status", deserialize_with = "wire::string_or_empty")]
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(alias = "PaymentsID", deserialize_with = "wire::record_id")]
    pub id: RecordId,
    #[serde(alias = "S_RegisterID", deserialize_with = "wire::string_or_empty")]
    pub supplier_id: String,
    #[serde(default, alias = "S_FullName", deserialize_with = "wire::string_or_empty")]
    pub supplier_name: String,
    #[serde(default, alias = "Supplier_Loan_Amount", deserialize_with = "wire::number_or_zero")]
    pub loan_amount: f64,
    #[serde(default, alias = "Supplier_Advance_Amount", deserialize_with = "wire::number_or_zero")]
    pub advance_amount: f64,
    #[serde(
        default,
        alias = "TeaPackets_Fertilizers_Amount",
        deserialize_with = "wire::number_or_zero"
    )]
    pub tea_amount: f64,
    #[serde(default, alias = "Transport_Charge", deserialize_with = "wire::number_or_zero")]
    pub transport_charge: f64,
    #[serde(default, alias = "Final_Total_Salary", deserialize_with = "wire::number_or_zero")]
    pub net_amount: f64,
    #[serde(default, alias = "Date", deserialize_with = "wire::string_or_empty")]
    pub date: String,
    #[serde(default, alias = "Status", deserialize_with = "wire::string_or_empty")]
    pub status: String,
}

/// Body for creating an advance.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceInput {
    pub supplier_id: String,
    pub amount: f64,
    pub month: String,
    pub status: String,
}

/// Body for creating a loan.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    pub supplier_id: String,
    pub amount: f64,
    pub duration_months: u32,
    pub purpose: String,
    pub monthly_amount: f64,
    pub due_date: String,
    pub status: String,
}

/// Body for creating or updating a payment (a payment without its id).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub supplier_id: String,
    pub supplier_name: String,
    pub loan_amount: f64,
    pub advance_amount: f64,
    pub tea_amount: f64,
    pub transport_charge: f64,
    pub net_amount: f64,
    pub date: String,
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    #[serde(alias = "S_RegisterID", deserialize_with = "wire::string_or_empty")]
    pub id: String,
    #[serde(default, alias = "S_FullName", deserialize_with = "wire::string_or_empty")]
    pub full_name: String,
    #[serde(default, alias = "S_Address", deserialize_with = "wire::string_or_empty")]
    pub address: String,
    #[serde(default, alias = "S_ContactNo", deserialize_with = "wire::string_or_empty")]
    pub contact_no: String,
    #[serde(default, alias = "AccountNumber", deserialize_with = "wire::string_or_empty")]
    pub account_number: String,
    #[serde(default, alias = "BankName", deserialize_with = "wire::string_or_empty")]
    pub bank_name: String,
    #[serde(default, alias = "Branch", deserialize_with = "wire::string_or_empty")]
    pub branch: String,
    #[serde(default, alias = "Email", deserialize_with = "wire::string_or_empty")]
    pub email: String,
    #[serde(default, alias = "Username", deserialize_with = "wire::string_or_empty")]
    pub username: String,
}

/// Supplier registration form; the password only travels on create.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplier {
    pub id: String,
    pub full_name: String,
    pub address: String,
    pub contact_no: String,
    pub account_number: String,
    pub bank_name: String,
    pub branch: String,
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    #[serde(alias = "D_RegisterID", deserialize_with = "wire::string_or_empty")]
    pub id: String,
    #[serde(default, alias = "D_FullName", deserialize_with = "wire::string_or_empty")]
    pub full_name: String,
    #[serde(default, alias = "D_ContactNumber", deserialize_with = "wire::string_or_empty")]
    pub contact_number: String,
    #[serde(default, alias = "Email", deserialize_with = "wire::string_or_empty")]
    pub email: String,
    #[serde(default, alias = "VehicalNumber", deserialize_with = "wire::string_or_empty")]
    pub vehicle_number: String,
    #[serde(default, alias = "Route", deserialize_with = "wire::string_or_empty")]
    pub route: String,
    #[serde(default, alias = "Serial_Code", deserialize_with = "wire::string_or_empty")]
    pub serial_code: String,
    #[serde(default, alias = "Latitude", deserialize_with = "wire::number_opt")]
    pub latitude: Option<f64>,
    #[serde(default, alias = "Longitude", deserialize_with = "wire::number_opt")]
    pub longitude: Option<f64>,
    #[serde(default, alias = "Status", deserialize_with = "wire::string_or_empty")]
    pub status: String,
    #[serde(default, alias = "LastUpdated")]
    pub last_updated: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDriver {
    pub id: String,
    pub full_name: String,
    pub contact_number: String,
    pub email: String,
    pub vehicle_number: String,
    pub route: String,
    pub serial_code: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "ProductID", deserialize_with = "wire::string_or_empty")]
    pub id: String,
    #[serde(default, alias = "ProductName", deserialize_with = "wire::string_or_empty")]
    pub name: String,
    #[serde(default, alias = "Rate_per_Bag", deserialize_with = "wire::number_or_zero")]
    pub rate_per_bag: f64,
    #[serde(default, alias = "Stock_bag", deserialize_with = "wire::number_or_zero")]
    pub stock_bags: f64,
}

/// GPS ping published on the drivers channel.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    #[serde(deserialize_with = "wire::string_or_empty")]
    pub driver_id: String,
    pub latitude: f64,
    pub longitude: f64,
}
