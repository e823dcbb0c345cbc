//! Report structures: pie compositions, period totals and time series

use serde::{Deserialize, Serialize};

use crate::models::{Breakdown, ChartDatum, MonthlyRecord, NO_DATA};
use crate::types::CompositionKind;

pub const OWN_PORTFOLIO: &str = "Own Portfolio";
pub const THIRD_PARTY_PORTFOLIO: &str = "Third Party Portfolio";

/// Last record of a filtered slice
pub fn latest(records: &[MonthlyRecord]) -> Option<&MonthlyRecord> {
    records.last()
}

/// Breakdown entries with a positive amount, in map order
pub fn positive_entries(breakdown: &Breakdown) -> Vec<ChartDatum> {
    breakdown
        .iter()
        .filter(|(_, value)| **value > 0.0)
        .map(|(name, value)| ChartDatum::new(name.clone(), *value))
        .collect()
}

/// Per-key sum of a breakdown over several months
pub fn accumulate<F>(records: &[MonthlyRecord], selector: F) -> Breakdown
where
    F: Fn(&MonthlyRecord) -> &Breakdown,
{
    let mut totals = Breakdown::new();
    for record in records {
        for (name, value) in selector(record) {
            *totals.entry(name.clone()).or_insert(0.0) += *value;
        }
    }
    totals
}

/// Replace an empty series with a single placeholder slice
pub fn safe_data(data: &[ChartDatum]) -> Vec<ChartDatum> {
    if data.is_empty() {
        vec![ChartDatum::new(NO_DATA, 1.0)]
    } else {
        data.to_vec()
    }
}

/// Stable sort by value, largest first
pub fn sorted_desc(data: &[ChartDatum]) -> Vec<ChartDatum> {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));
    sorted
}

/// Equity components of a month.
///
/// Uses the explicit breakdown when present, otherwise derives
/// capital, period earnings, accumulated earnings and provisions.
/// Zero entries are dropped; negative entries are drawn at their magnitude.
pub fn equity_entries(record: &MonthlyRecord) -> Vec<ChartDatum> {
    let raw: Vec<(String, f64)> = match &record.equity_breakdown {
        Some(breakdown) => breakdown.iter().map(|(k, v)| (k.clone(), *v)).collect(),
        None => vec![
            ("Capital".to_string(), record.capital),
            ("Period Earnings".to_string(), record.accumulated_profit),
            ("Accumulated Earnings".to_string(), record.prior_earnings),
            ("Provisions".to_string(), record.total_provisions()),
        ],
    };

    raw.into_iter()
        .filter(|(_, value)| *value != 0.0)
        .map(|(name, value)| ChartDatum::signed(name, value))
        .collect()
}

/// All pie compositions for a filtered range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Compositions {
    pub balance: Vec<ChartDatum>,
    pub assets: Vec<ChartDatum>,
    pub liabilities: Vec<ChartDatum>,
    pub equity: Vec<ChartDatum>,
    pub portfolio: Vec<ChartDatum>,
    pub own_portfolio: Vec<ChartDatum>,
    pub income: Vec<ChartDatum>,
    pub expenses: Vec<ChartDatum>,
}

impl Compositions {
    /// Build every composition from the records of a range.
    ///
    /// Balance-sheet style charts use the latest month; income and
    /// expenses accumulate over every month of the range. Negative
    /// totals are drawn at their magnitude.
    pub fn build(records: &[MonthlyRecord]) -> Self {
        let Some(last) = latest(records) else {
            return Self::default();
        };

        Self {
            balance: vec![
                ChartDatum::signed("Assets", last.assets),
                ChartDatum::signed("Liabilities", last.liabilities),
                ChartDatum::signed("Equity", last.equity),
            ],
            assets: positive_entries(&last.asset_breakdown),
            liabilities: positive_entries(&last.liability_breakdown),
            equity: equity_entries(last),
            portfolio: vec![
                ChartDatum::signed(OWN_PORTFOLIO, last.own_portfolio),
                ChartDatum::signed(THIRD_PARTY_PORTFOLIO, last.third_party_portfolio),
            ],
            own_portfolio: vec![
                ChartDatum::signed("Short Term", last.short_term_portfolio),
                ChartDatum::signed("Long Term", last.long_term_portfolio),
            ],
            income: positive_entries(&accumulate(records, |r| &r.income_breakdown)),
            expenses: positive_entries(&accumulate(records, |r| &r.expense_breakdown)),
        }
    }

    pub fn get(&self, kind: CompositionKind) -> &[ChartDatum] {
        match kind {
            CompositionKind::Balance => &self.balance,
            CompositionKind::Assets => &self.assets,
            CompositionKind::Liabilities => &self.liabilities,
            CompositionKind::Equity => &self.equity,
            CompositionKind::Portfolio => &self.portfolio,
            CompositionKind::OwnPortfolio => &self.own_portfolio,
            CompositionKind::Income => &self.income,
            CompositionKind::Expenses => &self.expenses,
        }
    }
}

/// Profit and loss totals over a range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub income: f64,
    pub costs: f64,
    pub expenses: f64,
    pub period_profit: f64,
}

pub fn period_totals(records: &[MonthlyRecord]) -> PeriodTotals {
    records.iter().fold(PeriodTotals::default(), |mut acc, r| {
        acc.income += r.income;
        acc.costs += r.costs;
        acc.expenses += r.expenses;
        acc.period_profit += r.period_profit;
        acc
    })
}

/// Range summary for the JSON API and the analysis prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub start: String,
    pub end: String,
    pub month_count: usize,
    pub totals: PeriodTotals,
    pub latest_month: Option<String>,
    pub assets: Option<f64>,
    pub liabilities: Option<f64>,
    pub equity: Option<f64>,
    pub accumulated_profit: Option<f64>,
}

impl PeriodSummary {
    pub fn build(range: &crate::time::MonthRange, records: &[MonthlyRecord]) -> Self {
        let last = latest(records);
        Self {
            start: range.start.key(),
            end: range.end.key(),
            month_count: records.len(),
            totals: period_totals(records),
            latest_month: last.map(|r| r.month.key()),
            assets: last.map(|r| r.assets),
            liabilities: last.map(|r| r.liabilities),
            equity: last.map(|r| r.equity),
            accumulated_profit: last.map(|r| r.accumulated_profit),
        }
    }
}

/// One named line / bar / area series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub key: String,
    pub name: String,
    pub values: Vec<f64>,
}

impl Series {
    fn from_records<F>(key: &str, name: &str, records: &[MonthlyRecord], value: F) -> Self
    where
        F: Fn(&MonthlyRecord) -> f64,
    {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            values: records.iter().map(value).collect(),
        }
    }
}

/// Category axis plus the series drawn against it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSet {
    /// Month labels, one per record
    pub categories: Vec<String>,
    pub series: Vec<Series>,
}

impl SeriesSet {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    fn new(records: &[MonthlyRecord], series: Vec<Series>) -> Self {
        Self {
            categories: records.iter().map(|r| r.month.label()).collect(),
            series,
        }
    }
}

/// Performance (P&L) lines
pub fn performance_series(records: &[MonthlyRecord]) -> SeriesSet {
    SeriesSet::new(
        records,
        vec![
            Series::from_records("income", "Income", records, |r| r.income),
            Series::from_records("costs", "Costs", records, |r| r.costs),
            Series::from_records("expenses", "Expenses", records, |r| r.expenses),
            Series::from_records("period_profit", "Profit", records, |r| r.period_profit),
            Series::from_records("accumulated_profit", "Accumulated Profit", records, |r| {
                r.accumulated_profit
            }),
        ],
    )
}

/// Monthly income against costs plus expenses
pub fn income_vs_expenses_series(records: &[MonthlyRecord]) -> SeriesSet {
    SeriesSet::new(
        records,
        vec![
            Series::from_records("income", "Income", records, |r| r.income),
            Series::from_records("outflows", "Costs + Expenses", records, |r| r.costs + r.expenses),
        ],
    )
}

/// Balance sheet totals over time
pub fn balance_trend_series(records: &[MonthlyRecord]) -> SeriesSet {
    SeriesSet::new(
        records,
        vec![
            Series::from_records("assets", "Assets", records, |r| r.assets),
            Series::from_records("liabilities", "Liabilities", records, |r| r.liabilities),
            Series::from_records("equity", "Equity", records, |r| r.equity),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Month, MonthRange};

    fn record(month: u32) -> MonthlyRecord {
        let mut r = MonthlyRecord::empty(Month::new(2025, month).unwrap());
        r.assets = 1000.0 * month as f64;
        r.liabilities = 400.0 * month as f64;
        r.equity = 600.0 * month as f64;
        r.own_portfolio = 300.0;
        r.third_party_portfolio = 100.0;
        r.short_term_portfolio = 200.0;
        r.long_term_portfolio = 100.0;
        r.income = 100.0;
        r.costs = 20.0;
        r.expenses = 30.0;
        r.period_profit = 50.0;
        r.accumulated_profit = 50.0 * month as f64;
        r.income_breakdown.insert("Interest".to_string(), 80.0);
        r.income_breakdown.insert("Fees".to_string(), 20.0);
        r.expense_breakdown.insert("Payroll".to_string(), 30.0);
        r.asset_breakdown.insert("Cash".to_string(), 700.0);
        r.asset_breakdown.insert("Loans".to_string(), 300.0);
        r.asset_breakdown.insert("Written off".to_string(), 0.0);
        r
    }

    #[test]
    fn test_accumulate_sums_per_key() {
        let mut a = record(1);
        let mut b = record(2);
        a.income_breakdown.insert("Other".to_string(), 5.0);
        b.income_breakdown.insert("Late fees".to_string(), 7.5);

        let totals = accumulate(&[a, b], |r| &r.income_breakdown);
        assert_eq!(totals["Interest"], 160.0);
        assert_eq!(totals["Fees"], 40.0);
        assert_eq!(totals["Other"], 5.0);
        assert_eq!(totals["Late fees"], 7.5);
        assert_eq!(totals.len(), 4);
    }

    #[test]
    fn test_accumulate_empty() {
        let totals = accumulate(&[], |r| &r.income_breakdown);
        assert!(totals.is_empty());
    }

    #[test]
    fn test_positive_entries_drop_zero_and_negative() {
        let mut breakdown = Breakdown::new();
        breakdown.insert("A".to_string(), 10.0);
        breakdown.insert("B".to_string(), 0.0);
        breakdown.insert("C".to_string(), -3.0);
        let entries = positive_entries(&breakdown);
        assert_eq!(entries, vec![ChartDatum::new("A", 10.0)]);
    }

    #[test]
    fn test_safe_data_placeholder() {
        let data = safe_data(&[]);
        assert_eq!(data.len(), 1);
        assert!(data[0].is_placeholder());
        assert_eq!(data[0].value, 1.0);

        let real = vec![ChartDatum::new("A", 5.0)];
        assert_eq!(safe_data(&real), real);
    }

    #[test]
    fn test_sorted_desc_is_stable() {
        let data = vec![
            ChartDatum::new("small", 1.0),
            ChartDatum::new("tie-a", 5.0),
            ChartDatum::new("big", 9.0),
            ChartDatum::new("tie-b", 5.0),
        ];
        let names: Vec<_> = sorted_desc(&data).into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["big", "tie-a", "tie-b", "small"]);
    }

    #[test]
    fn test_equity_fallback() {
        let mut r = record(1);
        r.capital = 250_000.0;
        r.accumulated_profit = 12_000.0;
        r.prior_earnings = 0.0;
        r.provisions.insert("Adjustment".to_string(), -4_000.0);
        r.provisions.insert("Withholding".to_string(), -1_500.0);

        let entries = equity_entries(&r);
        let names: Vec<_> = entries.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Capital", "Period Earnings", "Provisions"]);

        let provisions = &entries[2];
        assert_eq!(provisions.value, 5_500.0);
        assert_eq!(provisions.display_value, -5_500.0);
    }

    #[test]
    fn test_equity_explicit_breakdown_wins() {
        let mut r = record(1);
        r.capital = 999.0;
        let mut breakdown = Breakdown::new();
        breakdown.insert("Capital".to_string(), 100.0);
        breakdown.insert("Losses".to_string(), -20.0);
        breakdown.insert("Zero".to_string(), 0.0);
        r.equity_breakdown = Some(breakdown);

        let entries = equity_entries(&r);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ChartDatum::new("Capital", 100.0));
        assert_eq!(entries[1], ChartDatum::signed("Losses", -20.0));
    }

    #[test]
    fn test_compositions_use_latest_month_and_accumulate_flows() {
        let records = vec![record(1), record(2), record(3)];
        let c = Compositions::build(&records);

        assert_eq!(c.balance[0], ChartDatum::new("Assets", 3000.0));
        assert_eq!(c.balance[1], ChartDatum::new("Liabilities", 1200.0));
        assert_eq!(c.balance[2], ChartDatum::new("Equity", 1800.0));
        assert_eq!(c.assets.len(), 2);
        assert_eq!(c.portfolio[0].name, OWN_PORTFOLIO);
        assert_eq!(c.own_portfolio[1], ChartDatum::new("Long Term", 100.0));

        let interest = c.income.iter().find(|d| d.name == "Interest").unwrap();
        assert_eq!(interest.value, 240.0);
        assert_eq!(c.expenses, vec![ChartDatum::new("Payroll", 90.0)]);
        assert_eq!(c.get(CompositionKind::Expenses), c.expenses.as_slice());
    }

    #[test]
    fn test_compositions_negative_totals_keep_sign_in_display() {
        let mut r = record(1);
        r.assets = 100.0;
        r.liabilities = 150.0;
        r.equity = -50.0;
        r.third_party_portfolio = -100.0;
        let c = Compositions::build(&[r]);

        for kind in CompositionKind::ALL {
            assert!(c.get(kind).iter().all(|d| d.value >= 0.0), "negative value in {kind:?}");
        }
        assert_eq!(c.balance[2].value, 50.0);
        assert_eq!(c.balance[2].display_value, -50.0);
        assert_eq!(c.portfolio[1], ChartDatum::signed(THIRD_PARTY_PORTFOLIO, -100.0));
    }

    #[test]
    fn test_compositions_empty_range() {
        let c = Compositions::build(&[]);
        for kind in CompositionKind::ALL {
            assert!(c.get(kind).is_empty());
        }
    }

    #[test]
    fn test_period_totals_and_summary() {
        let records = vec![record(1), record(2)];
        let totals = period_totals(&records);
        assert_eq!(totals.income, 200.0);
        assert_eq!(totals.costs, 40.0);
        assert_eq!(totals.expenses, 60.0);
        assert_eq!(totals.period_profit, 100.0);

        let range = MonthRange::parse("2025-01", "2025-02").unwrap();
        let summary = PeriodSummary::build(&range, &records);
        assert_eq!(summary.month_count, 2);
        assert_eq!(summary.latest_month.as_deref(), Some("2025-02"));
        assert_eq!(summary.assets, Some(2000.0));
        assert_eq!(summary.accumulated_profit, Some(100.0));
    }

    #[test]
    fn test_series_sets() {
        let records = vec![record(1), record(2)];
        let perf = performance_series(&records);
        assert_eq!(perf.categories, vec!["Jan 2025", "Feb 2025"]);
        assert_eq!(perf.series.len(), 5);
        assert_eq!(perf.series[4].values, vec![50.0, 100.0]);

        let bars = income_vs_expenses_series(&records);
        assert_eq!(bars.series[1].values, vec![50.0, 50.0]);

        let trend = balance_trend_series(&records);
        assert_eq!(trend.series[0].values, vec![1000.0, 2000.0]);
        assert!(balance_trend_series(&[]).is_empty());
    }
}
