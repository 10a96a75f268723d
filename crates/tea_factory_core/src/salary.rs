//! Group collection events into per-supplier, per-month salary rows.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::CollectionEvent;

/// Label used when an event's timestamp cannot be read.
pub const UNKNOWN_PERIOD: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PeriodKey {
    pub supplier_id: String,
    /// "Month Year", e.g. "April 2023".
    pub period: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SupplierPeriodSalary {
    pub supplier_id: String,
    pub supplier_name: String,
    pub period: String,
    pub total_weight: f64,
    pub gross_amount: f64,
    pub average_rate: f64,
}

impl SupplierPeriodSalary {
    pub fn key(&self) -> PeriodKey {
        PeriodKey {
            supplier_id: self.supplier_id.clone(),
            period: self.period.clone(),
        }
    }

    fn add(&mut self, event: &CollectionEvent) {
        self.total_weight += event.weight;
        self.gross_amount += event.amount();
        self.average_rate = if self.total_weight == 0.0 {
            0.0
        } else {
            self.gross_amount / self.total_weight
        };
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SalaryTotals {
    pub rows: usize,
    pub total_weight: f64,
    pub gross_amount: f64,
}

impl SalaryTotals {
    pub fn of(salaries: &[SupplierPeriodSalary]) -> Self {
        salaries.iter().fold(Self::default(), |mut acc, s| {
            acc.rows += 1;
            acc.total_weight += s.total_weight;
            acc.gross_amount += s.gross_amount;
            acc
        })
    }
}

/// Parse the timestamp formats the weighing stations send. The local wall-clock date is kept.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// "Month Year" label for a raw timestamp, or [`UNKNOWN_PERIOD`].
pub fn period_label(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%B %Y").to_string(),
        None => UNKNOWN_PERIOD.to_string(),
    }
}

pub fn period_key(event: &CollectionEvent) -> PeriodKey {
    PeriodKey {
        supplier_id: event.supplier_id.clone(),
        period: period_label(&event.timestamp),
    }
}

/// Aggregate collections into salary rows, optionally restricted to timestamps starting with
/// `period_filter` (e.g. "2023-04"). Rows come out in first-seen key order.
pub fn aggregate_salaries(
    events: &[CollectionEvent],
    period_filter: Option<&str>,
) -> Vec<SupplierPeriodSalary> {
    let filter = period_filter.map(str::trim).filter(|f| !f.is_empty());

    let mut index: HashMap<PeriodKey, usize> = HashMap::new();
    let mut rows: Vec<SupplierPeriodSalary> = Vec::new();

    for event in events {
        if let Some(prefix) = filter {
            if !event.timestamp.trim_start().starts_with(prefix) {
                continue;
            }
        }
        let key = period_key(event);
        if key.period == UNKNOWN_PERIOD {
            tracing::warn!(
                "collection for supplier {} has unreadable timestamp {:?}",
                event.supplier_id,
                event.timestamp
            );
        }
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            rows.push(SupplierPeriodSalary {
                supplier_id: key.supplier_id.clone(),
                supplier_name: event.supplier_name.clone(),
                period: key.period.clone(),
                total_weight: 0.0,
                gross_amount: 0.0,
                average_rate: 0.0,
            });
            rows.len() - 1
        });
        let row = &mut rows[slot];
        if !event.supplier_name.is_empty() {
            row.supplier_name = event.supplier_name.clone();
        }
        row.add(event);
    }

    rows
}

/// Case-insensitive substring search on supplier name; an empty query keeps every row.
pub fn filter_by_supplier_name<'a>(
    salaries: &'a [SupplierPeriodSalary],
    query: &str,
) -> Vec<&'a SupplierPeriodSalary> {
    let needle = query.trim().to_lowercase();
    salaries
        .iter()
        .filter(|s| needle.is_empty() || s.supplier_name.to_lowercase().contains(&needle))
        .collect()
}
