use std::env;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};
use crate::ledger::LoanOutstandingRule;

pub const DEFAULT_TRANSPORT_CHARGE: f64 = 100.0;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub http_timeout: Duration,
    pub transport_charge: f64,
    pub loan_rule: LoanOutstandingRule,
    pub pusher_key: String,
    pub pusher_cluster: String,
    pub pusher_auth_path: String,
    pub driver_channel: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            http_timeout: Duration::from_secs(30),
            transport_charge: DEFAULT_TRANSPORT_CHARGE,
            loan_rule: LoanOutstandingRule::default(),
            pusher_key: String::new(),
            pusher_cluster: "ap2".to_string(),
            pusher_auth_path: "/pusher/auth".to_string(),
            driver_channel: "private-drivers".to_string(),
        }
    }
}

impl Config {
    /// Reads `TEA_*` variables; unset ones keep their defaults.
    pub fn from_env() -> CoreResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> CoreResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let http_timeout = match lookup("TEA_HTTP_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.trim().parse().map_err(|_| {
                CoreError::Config(format!("TEA_HTTP_TIMEOUT_SECS is not a number: {}", v))
            })?),
            None => defaults.http_timeout,
        };

        let transport_charge = match lookup("TEA_TRANSPORT_CHARGE") {
            Some(v) => {
                let charge: f64 = v.trim().parse().map_err(|_| {
                    CoreError::Config(format!("TEA_TRANSPORT_CHARGE is not a number: {}", v))
                })?;
                if !charge.is_finite() || charge < 0.0 {
                    return Err(CoreError::Config(
                        "TEA_TRANSPORT_CHARGE must be zero or positive".to_string(),
                    ));
                }
                charge
            }
            None => defaults.transport_charge,
        };

        let loan_rule = match lookup("TEA_LOAN_OUTSTANDING_RULE") {
            Some(v) => v.parse::<LoanOutstandingRule>().map_err(CoreError::Config)?,
            None => defaults.loan_rule,
        };

        Ok(Self {
            api_base_url: lookup("TEA_API_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            http_timeout,
            transport_charge,
            loan_rule,
            pusher_key: lookup("TEA_PUSHER_KEY").unwrap_or(defaults.pusher_key),
            pusher_cluster: lookup("TEA_PUSHER_CLUSTER").unwrap_or(defaults.pusher_cluster),
            pusher_auth_path: lookup("TEA_PUSHER_AUTH_PATH").unwrap_or(defaults.pusher_auth_path),
            driver_channel: lookup("TEA_DRIVER_CHANNEL").unwrap_or(defaults.driver_channel),
        })
    }

    pub fn pusher_auth_url(&self) -> String {
        format!("{}{}", self.api_base_url, self.pusher_auth_path)
    }
}
