//! Fee collection settings.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a late fee is computed once the grace period has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LateFeePolicy {
    None,
    FixedAmount,
    Percentage,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeeSettings {
    /// ISO 4217 currency code used on invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Day of month fees fall due.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1, max = 31))]
    pub due_day: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grace_period_days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_fee_policy: Option<LateFeePolicy>,

    /// Amount or percentage, depending on `late_fee_policy`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 0.0))]
    pub late_fee_value: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_partial_payments: Option<bool>,

    /// Prefix for generated receipt numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_prefix: Option<String>,
}

#[cfg(test)]
#[path = "fees_tests.rs"]
mod tests;
