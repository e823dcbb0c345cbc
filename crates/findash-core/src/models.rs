//! Core data models for the dashboard

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::time::Month;

/// Named amounts making up a total (e.g. asset or expense categories)
pub type Breakdown = BTreeMap<String, f64>;

/// Operational KPIs reported for a month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    /// Share of applications approved, in percent
    #[serde(default)]
    pub approval_rate: Option<f64>,
    /// Share of approved loans disbursed, in percent
    #[serde(default)]
    pub disbursement_rate: Option<f64>,
    /// Days from application to disbursement
    #[serde(default)]
    pub time_cycle: Option<f64>,
    /// Lifetime value over customer acquisition cost
    #[serde(default)]
    pub ltv_cac: Option<f64>,
    /// Non-performing loans, in percent of the portfolio
    #[serde(default)]
    pub npls: Option<f64>,
}

/// One month of financial figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// Month key (`YYYY-MM`)
    pub month: Month,

    // Balance sheet totals
    pub assets: f64,
    pub liabilities: f64,
    pub equity: f64,

    // Loan portfolio
    #[serde(default)]
    pub own_portfolio: f64,
    #[serde(default)]
    pub third_party_portfolio: f64,
    #[serde(default)]
    pub short_term_portfolio: f64,
    #[serde(default)]
    pub long_term_portfolio: f64,

    // Profit and loss
    #[serde(default)]
    pub income: f64,
    #[serde(default)]
    pub costs: f64,
    #[serde(default)]
    pub expenses: f64,
    /// Profit of this month alone
    #[serde(default)]
    pub period_profit: f64,
    /// Year-to-date profit
    #[serde(default)]
    pub accumulated_profit: f64,

    // Equity inputs, used when no explicit equity breakdown is given
    #[serde(default)]
    pub capital: f64,
    /// Retained earnings of previous years
    #[serde(default)]
    pub prior_earnings: f64,
    /// Named adjustments and provisions, summed into one equity entry
    #[serde(default)]
    pub provisions: Breakdown,

    // Breakdowns
    #[serde(default)]
    pub asset_breakdown: Breakdown,
    #[serde(default)]
    pub liability_breakdown: Breakdown,
    #[serde(default)]
    pub equity_breakdown: Option<Breakdown>,
    #[serde(default)]
    pub income_breakdown: Breakdown,
    #[serde(default)]
    pub expense_breakdown: Breakdown,

    #[serde(default)]
    pub kpis: Kpis,
}

impl MonthlyRecord {
    /// Empty record for a month, mostly useful to build fixtures
    pub fn empty(month: Month) -> Self {
        Self {
            month,
            assets: 0.0,
            liabilities: 0.0,
            equity: 0.0,
            own_portfolio: 0.0,
            third_party_portfolio: 0.0,
            short_term_portfolio: 0.0,
            long_term_portfolio: 0.0,
            income: 0.0,
            costs: 0.0,
            expenses: 0.0,
            period_profit: 0.0,
            accumulated_profit: 0.0,
            capital: 0.0,
            prior_earnings: 0.0,
            provisions: Breakdown::new(),
            asset_breakdown: Breakdown::new(),
            liability_breakdown: Breakdown::new(),
            equity_breakdown: None,
            income_breakdown: Breakdown::new(),
            expense_breakdown: Breakdown::new(),
            kpis: Kpis::default(),
        }
    }

    /// Sum of all provisions
    pub fn total_provisions(&self) -> f64 {
        self.provisions.values().sum()
    }

    /// Total portfolio under management
    pub fn total_portfolio(&self) -> f64 {
        self.own_portfolio + self.third_party_portfolio
    }
}

/// One slice or bar of a chart.
///
/// `value` drives the geometry and is never negative; `display_value`
/// is what labels print and keeps the original sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDatum {
    pub name: String,
    pub value: f64,
    pub display_value: f64,
}

impl ChartDatum {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            display_value: value,
        }
    }

    /// Signed amount drawn at its magnitude
    pub fn signed(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            value: amount.abs(),
            display_value: amount,
        }
    }

    /// Whether this is the stand-in entry for an empty chart
    pub fn is_placeholder(&self) -> bool {
        self.name == NO_DATA
    }
}

/// Name of the stand-in slice shown when a chart has nothing to draw
pub const NO_DATA: &str = "No data";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserialize_with_defaults() {
        let json = r#"{"month": "2025-01", "assets": 100, "liabilities": 40, "equity": 60}"#;
        let record: MonthlyRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.month.key(), "2025-01");
        assert_eq!(record.assets, 100.0);
        assert!(record.equity_breakdown.is_none());
        assert!(record.income_breakdown.is_empty());
        assert_eq!(record.kpis, Kpis::default());
    }

    #[test]
    fn test_record_rejects_bad_month() {
        let json = r#"{"month": "January", "assets": 1, "liabilities": 1, "equity": 0}"#;
        assert!(serde_json::from_str::<MonthlyRecord>(json).is_err());
    }

    #[test]
    fn test_record_helpers() {
        let mut record = MonthlyRecord::empty(Month::new(2025, 1).unwrap());
        record.provisions.insert("A".to_string(), -100.0);
        record.provisions.insert("B".to_string(), -50.0);
        record.own_portfolio = 300.0;
        record.third_party_portfolio = 200.0;
        assert_eq!(record.total_provisions(), -150.0);
        assert_eq!(record.total_portfolio(), 500.0);
    }

    #[test]
    fn test_chart_datum_signed() {
        let datum = ChartDatum::signed("Provisions", -8300.0);
        assert_eq!(datum.value, 8300.0);
        assert_eq!(datum.display_value, -8300.0);
        assert!(!datum.is_placeholder());
    }
}
