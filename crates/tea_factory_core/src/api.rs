//! Store traits and the HTTP client for the factory backend.
use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::ids::RecordId;
use crate::models::{
    Advance, AdvanceInput, CollectionEvent, Driver, LedgerKind, Loan, LoanInput, NewDriver,
    NewSupplier, Payment, PaymentInput, Product, StatusUpdate, Supplier,
};

/// Ledger reads and writes used by reconciliation and the finance screens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FinanceStore: Send + Sync {
    async fn list_suppliers(&self) -> CoreResult<Vec<Supplier>>;
    async fn list_collections(&self) -> CoreResult<Vec<CollectionEvent>>;
    async fn list_advances(&self) -> CoreResult<Vec<Advance>>;
    async fn list_loans(&self) -> CoreResult<Vec<Loan>>;
    async fn list_payments(&self) -> CoreResult<Vec<Payment>>;
    /// `Ok(None)` when the backend has no such payment.
    async fn get_payment(&self, id: RecordId) -> CoreResult<Option<Payment>>;
    async fn create_advance(&self, input: &AdvanceInput) -> CoreResult<()>;
    async fn create_loan(&self, input: &LoanInput) -> CoreResult<()>;
    async fn create_payment(&self, input: &PaymentInput) -> CoreResult<()>;
    async fn update_payment(&self, id: RecordId, input: &PaymentInput) -> CoreResult<()>;
    async fn update_status(&self, kind: LedgerKind, id: RecordId, status: &str) -> CoreResult<()>;
    async fn delete_record(&self, kind: LedgerKind, id: RecordId) -> CoreResult<()>;
}

/// Driver registry, supplier writes and the product catalogue.
/// Supplier listing lives on [`FinanceStore`] since reconciliation iterates it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistryStore: Send + Sync {
    async fn list_drivers(&self) -> CoreResult<Vec<Driver>>;
    async fn list_products(&self) -> CoreResult<Vec<Product>>;
    async fn create_supplier(&self, input: &NewSupplier) -> CoreResult<()>;
    async fn delete_supplier(&self, id: &str) -> CoreResult<()>;
    async fn create_driver(&self, input: &NewDriver) -> CoreResult<()>;
}

fn ledger_path(kind: LedgerKind) -> &'static str {
    match kind {
        LedgerKind::Advance => "/api/supplierAdvance",
        LedgerKind::Loan => "/api/supplierLoan",
        LedgerKind::Payment => "/api/supplierPayment",
    }
}

/// Pull a human-readable message out of an error response body.
/// JSON bodies with `message` or `error` win; otherwise the trimmed text, then the status.
pub fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for field in ["message", "error"] {
            if let Some(msg) = json.get(field).and_then(|v| v.as_str()) {
                if !msg.trim().is_empty() {
                    return msg.trim().to_string();
                }
            }
        }
    }
    let text = body.trim();
    if text.is_empty() {
        status.to_string()
    } else {
        text.to_string()
    }
}

#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> CoreResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(|e| CoreError::Config(format!("HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, what: &str) -> CoreResult<T> {
        let url = self.url(path);
        tracing::debug!("GET {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::fetch(what, e))?;
        let status = resp.status();
        let text = resp.text().await.map_err(|e| CoreError::fetch(what, e))?;
        if !status.is_success() {
            return Err(CoreError::fetch(what, format!("{} - {}", status, error_message(status, &text))));
        }
        serde_json::from_str(&text).map_err(|e| CoreError::Decode(format!("{}: {}", what, e)))
    }

    async fn write(&self, request: RequestBuilder, what: &str) -> CoreResult<()> {
        let resp = request.send().await.map_err(|e| CoreError::Write {
            status: 0,
            message: format!("Failed to {}: {}", what, e),
        })?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let text = resp.text().await.unwrap_or_default();
        Err(CoreError::Write {
            status: status.as_u16(),
            message: format!("Failed to {}: {}", what, error_message(status, &text)),
        })
    }

    /// Exchange a socket id for a private-channel signature at the backend's auth endpoint.
    pub async fn authorize_channel(
        &self,
        auth_url: &str,
        socket_id: &str,
        channel: &str,
    ) -> CoreResult<String> {
        let resp = self
            .client
            .post(auth_url)
            .form(&[("socket_id", socket_id), ("channel_name", channel)])
            .send()
            .await
            .map_err(|e| CoreError::Channel(format!("channel auth: {}", e)))?;
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| CoreError::Channel(format!("channel auth: {}", e)))?;
        if !status.is_success() {
            return Err(CoreError::Channel(format!(
                "channel auth rejected: {}",
                error_message(status, &text)
            )));
        }
        let json: serde_json::Value = serde_json::from_str(&text)?;
        json.get("auth")
            .and_then(|v| v.as_str())
            .map(String::from)
            .ok_or_else(|| CoreError::Channel("No auth in channel auth response".to_string()))
    }
}

#[async_trait]
impl FinanceStore for HttpBackend {
    async fn list_suppliers(&self) -> CoreResult<Vec<Supplier>> {
        self.get_json("/api/supplier/all", "suppliers").await
    }

    async fn list_collections(&self) -> CoreResult<Vec<CollectionEvent>> {
        self.get_json("/api/supplierCollection/all", "collections").await
    }

    async fn list_advances(&self) -> CoreResult<Vec<Advance>> {
        self.get_json("/api/supplierAdvance/all", "advances").await
    }

    async fn list_loans(&self) -> CoreResult<Vec<Loan>> {
        self.get_json("/api/supplierLoan/all", "loans").await
    }

    async fn list_payments(&self) -> CoreResult<Vec<Payment>> {
        self.get_json("/api/supplierPayment/all", "payments").await
    }

    async fn get_payment(&self, id: RecordId) -> CoreResult<Option<Payment>> {
        let url = self.url(&format!("/api/supplierPayment/{}", id));
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::fetch("payment", e))?;
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let text = resp.text().await.map_err(|e| CoreError::fetch("payment", e))?;
        if !status.is_success() {
            return Err(CoreError::fetch("payment", format!("{} - {}", status, error_message(status, &text))));
        }
        // Some deployments answer 200 with an empty body or `null` for a missing id.
        if text.trim().is_empty() || text.trim() == "null" {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }

    async fn create_advance(&self, input: &AdvanceInput) -> CoreResult<()> {
        let req = self.client.post(self.url("/api/supplierAdvance/create")).json(input);
        self.write(req, "create advance").await
    }

    async fn create_loan(&self, input: &LoanInput) -> CoreResult<()> {
        let req = self.client.post(self.url("/api/supplierLoan/create")).json(input);
        self.write(req, "create loan").await
    }

    async fn create_payment(&self, input: &PaymentInput) -> CoreResult<()> {
        let req = self.client.post(self.url("/api/supplierPayment/create")).json(input);
        self.write(req, "create payment").await
    }

    async fn update_payment(&self, id: RecordId, input: &PaymentInput) -> CoreResult<()> {
        let req = self
            .client
            .put(self.url(&format!("/api/supplierPayment/update/{}", id)))
            .json(input);
        self.write(req, "update payment").await
    }

    async fn update_status(&self, kind: LedgerKind, id: RecordId, status: &str) -> CoreResult<()> {
        let body = StatusUpdate {
            status: status.to_string(),
        };
        let req = self
            .client
            .put(self.url(&format!("{}/updateStatus/{}", ledger_path(kind), id)))
            .json(&body);
        self.write(req, &format!("update {} status", kind)).await
    }

    async fn delete_record(&self, kind: LedgerKind, id: RecordId) -> CoreResult<()> {
        let req = self
            .client
            .delete(self.url(&format!("{}/delete/{}", ledger_path(kind), id)));
        self.write(req, &format!("delete {}", kind)).await
    }
}

#[async_trait]
impl RegistryStore for HttpBackend {
    async fn list_drivers(&self) -> CoreResult<Vec<Driver>> {
        self.get_json("/api/driver/AllDrivers", "drivers").await
    }

    async fn list_products(&self) -> CoreResult<Vec<Product>> {
        self.get_json("/api/product/all", "products").await
    }

    async fn create_supplier(&self, input: &NewSupplier) -> CoreResult<()> {
        let req = self.client.post(self.url("/api/supplier/create")).json(input);
        self.write(req, "add supplier").await
    }

    async fn delete_supplier(&self, id: &str) -> CoreResult<()> {
        let req = self
            .client
            .delete(self.url(&format!("/api/supplier/delete/{}", urlencoding::encode(id))));
        self.write(req, "delete supplier").await
    }

    async fn create_driver(&self, input: &NewDriver) -> CoreResult<()> {
        let req = self.client.post(self.url("/api/driver/create")).json(input);
        self.write(req, "add driver").await
    }
}
