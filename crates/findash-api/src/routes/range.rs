//! Month range control
//!
//! Every dashboard route takes optional `start` / `end` query parameters
//! (`YYYY-MM`); missing values fall back to the first and last month.

use findash_core::{CoreResult, Dataset, Month, MonthRange};
use findash_utils::escape_html;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl RangeQuery {
    pub fn resolve(&self, dataset: &Dataset) -> CoreResult<MonthRange> {
        dataset.resolve_range(self.start.as_deref(), self.end.as_deref())
    }
}

/// `start=..&end=..` for links that keep the current range
pub fn range_query_string(range: &MonthRange) -> String {
    format!("start={}&end={}", range.start.key(), range.end.key())
}

fn month_select(name: &str, label: &str, months: &[Month], selected: &Month) -> String {
    let options: Vec<String> = months
        .iter()
        .map(|m| {
            format!(
                "<option value='{}' {}>{}</option>",
                m.key(),
                if m == selected { "selected" } else { "" },
                escape_html(&m.label())
            )
        })
        .collect();

    format!(
        r#"<label class='flex items-center gap-2 text-sm text-gray-600'>{}
            <select name='{}' class='border rounded-lg px-3 py-1.5 bg-white text-gray-900'>{}</select>
        </label>"#,
        label,
        name,
        options.join("")
    )
}

/// Start / end selects; any change reloads the dashboard content
pub fn range_selector(months: &[Month], range: &MonthRange) -> String {
    format!(
        r##"<form id='range-form' class='flex flex-wrap items-center gap-4'
            hx-get='/dashboard/content' hx-trigger='change' hx-target='#dashboard-content' hx-swap='innerHTML'
            hx-indicator='#range-indicator'>
            {}
            {}
            <span id='range-indicator' class='htmx-indicator text-sm text-gray-400'>Loading...</span>
        </form>"##,
        month_select("start", "From", months, &range.start),
        month_select("end", "To", months, &range.end)
    )
}
