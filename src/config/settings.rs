//! Group policy settings loading from config.toml
//!
//! The group's financial policy (registration fee, loan terms, overdue
//! penalty, member status thresholds) is configurable rather than hard-coded.
//! Every field has a coded default matching the group's constitution, so a
//! missing or partial config.toml is not an error.

use crate::entities::loan::LoanKind;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Interest rate and term pair for one loan product.
#[derive(Debug, Clone, Copy)]
pub struct LoanPolicy {
    /// Interest rate in percent over the full term
    pub rate_percent: f64,
    /// Term in months
    pub term_months: u32,
}

/// Full group policy, typically loaded from `config.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Display name of the group
    pub group_name: String,
    /// Fixed fee charged (and recorded as a transaction) at registration
    pub registration_fee: f64,
    /// Standard petty cash contribution per meeting
    pub petty_cash_amount: f64,
    /// Interest rates in percent, per loan product
    pub loan_interest_rates: LoanInterestRates,
    /// Terms in months, per loan product
    pub loan_terms: LoanTerms,
    /// Additional interest rate in percent charged per overdue month
    pub overdue_interest_rate: f64,
    /// Overdue months beyond which no further penalty accrues
    pub max_overdue_months: u32,
    /// Elapsed-time thresholds for the member lifecycle
    pub member_status_thresholds: StatusThresholds,
}

/// Interest rates in percent for the three loan products.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LoanInterestRates {
    /// Short term loan rate
    pub short_term: f64,
    /// Bridge loan rate
    pub bridge: f64,
    /// Long term loan rate
    pub long_term: f64,
}

/// Terms in months for the three loan products.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LoanTerms {
    /// Short term loan months
    pub short_term: u32,
    /// Bridge loan months
    pub bridge: u32,
    /// Long term loan months
    pub long_term: u32,
}

/// Months without payment before a member becomes dormant or inactive.
/// Months are counted as fixed 30-day blocks, not calendar months.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    /// Months of silence before a member is dormant
    pub dormant_months: i64,
    /// Months of silence before a member is inactive
    pub inactive_months: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            group_name: "IKMOV-SHG".to_string(),
            registration_fee: 1000.0,
            petty_cash_amount: 50.0,
            loan_interest_rates: LoanInterestRates::default(),
            loan_terms: LoanTerms::default(),
            overdue_interest_rate: 10.0,
            max_overdue_months: 4,
            member_status_thresholds: StatusThresholds::default(),
        }
    }
}

impl Default for LoanInterestRates {
    fn default() -> Self {
        Self {
            short_term: 10.0,
            bridge: 8.0,
            long_term: 10.0,
        }
    }
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            short_term: 1,
            bridge: 4,
            long_term: 3,
        }
    }
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            dormant_months: 3,
            inactive_months: 6,
        }
    }
}

impl Settings {
    /// The rate/term pair for a loan product.
    #[must_use]
    pub fn loan_policy(&self, kind: LoanKind) -> LoanPolicy {
        match kind {
            LoanKind::ShortTerm => LoanPolicy {
                rate_percent: self.loan_interest_rates.short_term,
                term_months: self.loan_terms.short_term,
            },
            LoanKind::Bridge => LoanPolicy {
                rate_percent: self.loan_interest_rates.bridge,
                term_months: self.loan_terms.bridge,
            },
            LoanKind::LongTerm => LoanPolicy {
                rate_percent: self.loan_interest_rates.long_term,
                term_months: self.loan_terms.long_term,
            },
        }
    }

    /// Loads settings from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
            message: format!("Failed to read settings file: {e}"),
        })?;

        toml::from_str(&contents).map_err(|e| Error::Config {
            message: format!("Failed to parse settings file: {e}"),
        })
    }

    /// Loads settings from the given path, falling back to defaults when the
    /// file does not exist. A malformed file is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
