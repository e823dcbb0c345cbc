//! Core dataset processing and dashboard logic

pub mod analysis;
pub mod chart;
pub mod dataset;
pub mod error;
pub mod kpi;
pub mod models;
pub mod reports;
pub mod source;
pub mod time;
pub mod types;

pub use analysis::{analysis_prompt, parse_sections, AnalysisSection};
pub use dataset::{Dashboard, Dataset};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails};
pub use kpi::{kpi_cards, KpiCard};
pub use models::{Breakdown, ChartDatum, Kpis, MonthlyRecord, NO_DATA};
pub use reports::{
    accumulate, latest, period_totals, safe_data, sorted_desc, Compositions, PeriodSummary,
    PeriodTotals, Series, SeriesSet, OWN_PORTFOLIO, THIRD_PARTY_PORTFOLIO,
};
pub use source::{JsonFileSource, RecordSource, SampleSource, SourceRef};
pub use time::{Month, MonthRange};
pub use types::{CompositionKind, PortfolioView};
