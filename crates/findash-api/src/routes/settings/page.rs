//! Settings page rendering - Full page endpoints

use crate::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Html;
use findash_utils::escape_html;

fn field(label: &str, value: &str) -> String {
    format!(
        "<div><p class='text-sm text-gray-500'>{}</p><p class='font-medium'>{}</p></div>",
        label,
        escape_html(value)
    )
}

fn section(title: &str, fields: &[String]) -> String {
    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6 mb-6'>
            <h3 class='text-lg font-semibold mb-4'>{}</h3>
            <div class='grid grid-cols-2 gap-4'>{}</div>
        </div>"#,
        title,
        fields.join("")
    )
}

fn on_off(flag: bool) -> &'static str {
    if flag { "Enabled" } else { "Disabled" }
}

pub async fn page_settings(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let config = &state.config;
    let dashboard = state.dashboard.read().await;

    let loaded_at = dashboard
        .loaded_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "Not loaded".to_string());

    let palettes: Vec<String> = config
        .charts
        .palettes
        .named()
        .iter()
        .map(|(name, colors)| {
            let swatches: String = colors
                .iter()
                .map(|c| format!("<span class='inline-block w-4 h-4 rounded-sm' style='background:{}'></span>", escape_html(c)))
                .collect();
            format!(
                "<div><p class='text-sm text-gray-500'>{}</p><div class='flex gap-1 mt-1'>{}</div></div>",
                name, swatches
            )
        })
        .collect();

    let inner_content = format!(
        "<div class='mb-6'><h2 class='text-2xl font-bold'>Settings</h2></div>{}{}{}{}{}",
        section("Server", &[
            field("Host", &config.server.host),
            field("Port", &config.server.port.to_string()),
        ]),
        section("Data", &[
            field("Source", &dashboard.source_description()),
            field("Loaded at", &loaded_at),
            field("Months", &dashboard.dataset().map(|d| d.len()).unwrap_or(0).to_string()),
            field("Reload", on_off(config.data.allow_reload)),
        ]),
        section("Currency", &[
            field("Symbol", &config.currency.symbol),
            field("Position", &config.currency.symbol_position.to_string()),
            field("Decimal places", &config.currency.decimal_places.to_string()),
            field("Example", &state.currency.format(1_234_567.891)),
        ]),
        section("Charts", &[
            field("Label threshold", &format!("{}%", config.charts.label_threshold_percent)),
            field("Legends", on_off(config.charts.show_legend)),
        ]),
        section("Analysis", &[
            field("Status", on_off(config.ai.enabled)),
            field("Model", &config.ai.model),
            field("API key variable", &config.ai.api_key_env),
            field("Timeout", &format!("{}s", config.ai.timeout_secs)),
        ]),
    );

    let palettes_section = format!(
        "<div class='bg-white rounded-xl shadow-sm p-6'><h3 class='text-lg font-semibold mb-4'>Palettes</h3><div class='grid grid-cols-2 md:grid-cols-4 gap-4'>{}</div></div>",
        palettes.join("")
    );

    Html(crate::page_response(
        &headers,
        "Settings",
        "/settings",
        &format!("{}{}", inner_content, palettes_section),
    ))
}
