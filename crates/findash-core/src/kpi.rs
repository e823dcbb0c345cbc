//! KPI cards for the latest month of a range

use serde::{Deserialize, Serialize};

use crate::models::MonthlyRecord;

const NOT_AVAILABLE: &str = "N/A";

/// One headline figure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiCard {
    pub key: String,
    pub title: String,
    pub value: String,
}

impl KpiCard {
    fn new(key: &str, title: &str, value: String) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            value,
        }
    }
}

/// Present and non-zero
fn truthy(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0 && !v.is_nan())
}

fn with_suffix(value: Option<f64>, suffix: &str) -> String {
    match truthy(value) {
        Some(v) => format!("{}{}", v, suffix),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Build the five KPI cards.
///
/// Rates and the cycle time print `N/A` when missing or zero; LTV/CAC
/// prints `N/A` only when missing.
pub fn kpi_cards(record: Option<&MonthlyRecord>) -> Vec<KpiCard> {
    let kpis = record.map(|r| r.kpis.clone()).unwrap_or_default();

    vec![
        KpiCard::new("approval_rate", "Approval Rate", with_suffix(kpis.approval_rate, "%")),
        KpiCard::new("disbursement_rate", "Disbursement Rate", with_suffix(kpis.disbursement_rate, "%")),
        KpiCard::new("time_cycle", "Total Cycle", with_suffix(kpis.time_cycle, " days")),
        KpiCard::new(
            "ltv_cac",
            "LTV / CAC",
            kpis.ltv_cac.map(|v| v.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        KpiCard::new("npls", "NPLs", with_suffix(kpis.npls, "%")),
    ]
}
