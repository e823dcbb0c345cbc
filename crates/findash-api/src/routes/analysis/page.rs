//! Analysis panel rendering - HTMX partial

use super::api::generate_analysis;
use crate::routes::range::RangeQuery;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::Html;
use findash_core::AnalysisSection;
use findash_utils::escape_html;

fn render_sections(title: &str, sections: &[AnalysisSection], raw: &str) -> String {
    let body: String = sections
        .iter()
        .map(|section| {
            format!(
                "<div class='mb-4'><h3 class='font-bold text-lg text-blue-700'>{}</h3><div class='text-gray-700 whitespace-pre-wrap'>{}</div></div>",
                escape_html(&section.title),
                escape_html(&section.body)
            )
        })
        .collect();

    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6'>
            <div class='flex items-center justify-between mb-4'>
                <h2 class='text-xl font-bold'>{}</h2>
                <button class='px-3 py-1.5 text-sm bg-blue-700 hover:bg-blue-800 text-white rounded-lg'
                    onclick="navigator.clipboard.writeText(document.getElementById('analysis-raw').value)">Copy</button>
            </div>
            <div class='max-h-[70vh] overflow-y-auto'>{}</div>
            <textarea id='analysis-raw' class='hidden'>{}</textarea>
        </div>"#,
        escape_html(title),
        body,
        escape_html(raw)
    )
}

/// HTMX: generate and render the analysis; failures render inline
pub async fn htmx_analysis(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Html<String> {
    match generate_analysis(&state, &query).await {
        Ok(analysis) => Html(render_sections(
            &format!("Analysis: {}", analysis.range.description()),
            &analysis.sections,
            &analysis.text,
        )),
        Err(e) => {
            log::warn!("Analysis failed: {}", e);
            Html(format!(
                "<div class='bg-red-50 border border-red-200 text-red-700 rounded-lg p-4'>{}</div>",
                escape_html(&e.to_string())
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{post, sample_state};
    use axum::http::StatusCode;

    #[test]
    fn test_render_sections_escapes() {
        let sections = vec![AnalysisSection {
            title: "Summary".to_string(),
            body: "Profit <up>".to_string(),
        }];
        let html = render_sections("Analysis: Jan 2025", &sections, "### Summary\nProfit <up>");
        assert!(html.contains("<h3 class='font-bold text-lg text-blue-700'>Summary</h3>"));
        assert!(html.contains("Profit &lt;up&gt;"));
        assert!(html.contains("analysis-raw"));
    }

    #[tokio::test]
    async fn test_htmx_analysis_error_is_inline() {
        let (status, body) = post(sample_state().await, "/dashboard/analysis").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("AI analysis is disabled"));
    }
}
