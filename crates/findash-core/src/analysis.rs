//! Analysis prompt construction and parsing of the generated text

use serde::{Deserialize, Serialize};

use findash_utils::format_currency;

use crate::kpi::kpi_cards;
use crate::models::MonthlyRecord;
use crate::reports::{latest, period_totals};
use crate::time::MonthRange;

const SECTION_MARKER: &str = "### ";

/// Build the plain-text prompt sent to the text-generation service
pub fn analysis_prompt(range: &MonthRange, records: &[MonthlyRecord]) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are a financial analyst reviewing a lending company's monthly reports.\n");
    prompt.push_str(&format!("Period: {} ({} months)\n\n", range.description(), records.len()));

    match latest(records) {
        Some(last) => {
            prompt.push_str(&format!("Balance sheet at {}:\n", last.month.label()));
            prompt.push_str(&format!("- Assets: {}\n", format_currency(last.assets)));
            prompt.push_str(&format!("- Liabilities: {}\n", format_currency(last.liabilities)));
            prompt.push_str(&format!("- Equity: {}\n", format_currency(last.equity)));
            prompt.push_str(&format!("- Own portfolio: {}\n", format_currency(last.own_portfolio)));
            prompt.push_str(&format!(
                "- Third party portfolio: {}\n",
                format_currency(last.third_party_portfolio)
            ));
            prompt.push_str(&format!(
                "- Total portfolio: {}\n\n",
                format_currency(last.total_portfolio())
            ));
        }
        None => prompt.push_str("No monthly records fall inside this period.\n\n"),
    }

    let totals = period_totals(records);
    prompt.push_str("Profit and loss over the period:\n");
    prompt.push_str(&format!("- Income: {}\n", format_currency(totals.income)));
    prompt.push_str(&format!("- Costs: {}\n", format_currency(totals.costs)));
    prompt.push_str(&format!("- Expenses: {}\n", format_currency(totals.expenses)));
    prompt.push_str(&format!("- Profit: {}\n\n", format_currency(totals.period_profit)));

    prompt.push_str("Monthly profit:\n");
    for record in records {
        prompt.push_str(&format!(
            "- {}: income {}, profit {}\n",
            record.month.label(),
            format_currency(record.income),
            format_currency(record.period_profit)
        ));
    }
    prompt.push('\n');

    prompt.push_str("Latest KPIs:\n");
    for card in kpi_cards(latest(records)) {
        prompt.push_str(&format!("- {}: {}\n", card.title, card.value));
    }

    prompt.push_str(
        "\nWrite a short analysis in markdown. Start every section with a '### ' heading: \
         Summary, Profitability, Balance Sheet, Risks, Recommendations.\n",
    );
    prompt
}

/// Heading plus body of one analysis section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSection {
    pub title: String,
    pub body: String,
}

/// Split generated text on `### ` markers.
///
/// The first line of a chunk is its heading and the rest its body;
/// blank chunks are skipped.
pub fn parse_sections(text: &str) -> Vec<AnalysisSection> {
    text.split(SECTION_MARKER)
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| {
            let (title, body) = chunk.split_once('\n').unwrap_or((chunk, ""));
            AnalysisSection {
                title: title.trim().to_string(),
                body: body.trim_end().to_string(),
            }
        })
        .collect()
}
