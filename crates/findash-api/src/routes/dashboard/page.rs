//! Dashboard page rendering - full page and HTMX partials

use crate::charts::{cartesian_chart, CartesianKind, LabelStyle, PieChart, SliceLink};
use crate::error::{ApiError, ApiResult};
use crate::routes::range::{range_query_string, range_selector, RangeQuery};
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use findash_config::Config;
use findash_core::reports::{balance_trend_series, income_vs_expenses_series, performance_series};
use findash_core::{
    kpi_cards, latest, sorted_desc, ChartDatum, CompositionKind, Compositions, Dataset, MonthRange,
    PortfolioView, OWN_PORTFOLIO,
};
use findash_utils::{escape_html, CurrencyFormat};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub portfolio: Option<String>,
}

impl DashboardQuery {
    fn range_query(&self) -> RangeQuery {
        RangeQuery { start: self.start.clone(), end: self.end.clone() }
    }

    fn portfolio_view(&self) -> ApiResult<PortfolioView> {
        parse_view(self.portfolio.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortfolioQuery {
    pub start: Option<String>,
    pub end: Option<String>,
    pub view: Option<String>,
}

fn parse_view(value: Option<&str>) -> ApiResult<PortfolioView> {
    value
        .unwrap_or_default()
        .parse::<PortfolioView>()
        .map_err(|message| ApiError::BadRequest { message })
}

/// Everything a render pass needs besides the data
struct RenderContext<'a> {
    config: &'a Config,
    currency: &'a CurrencyFormat,
}

impl<'a> RenderContext<'a> {
    fn new(state: &'a AppState) -> Self {
        Self { config: &state.config, currency: &state.currency }
    }

    fn palette(&self, kind: CompositionKind) -> &'a [String] {
        let palettes = &self.config.charts.palettes;
        match kind {
            CompositionKind::Balance => &palettes.main,
            CompositionKind::Assets => &palettes.assets,
            CompositionKind::Liabilities => &palettes.liabilities,
            CompositionKind::Equity => &palettes.equity,
            CompositionKind::Portfolio => &palettes.portfolio,
            CompositionKind::OwnPortfolio => &palettes.own_portfolio,
            CompositionKind::Income => &palettes.income,
            CompositionKind::Expenses => &palettes.expenses,
        }
    }

    fn pie(&self, kind: CompositionKind, data: &[ChartDatum], style: LabelStyle) -> PieChart<'a> {
        PieChart::new(data, self.palette(kind), self.currency, style)
            .threshold(self.config.charts.label_threshold_percent)
    }

    /// Pie plus legend
    fn drilldown(&self, chart: &PieChart<'_>) -> String {
        if self.config.charts.show_legend {
            format!("{}{}", chart.render(), chart.legend())
        } else {
            chart.render()
        }
    }
}

fn card(title: &str, body: &str) -> String {
    format!(
        r#"<div class='bg-white rounded-xl shadow-sm p-6'>
            <h3 class='text-lg font-semibold mb-4'>{}</h3>
            {}
        </div>"#,
        escape_html(title),
        body
    )
}

fn error_card(message: &str) -> String {
    format!(
        "<div class='bg-red-50 border border-red-200 text-red-700 rounded-lg p-4'>{}</div>",
        escape_html(message)
    )
}

/// HTMX only swaps 2xx responses, so failures come back as a 200 error card
fn html_or_error(result: ApiResult<String>) -> Html<String> {
    match result {
        Ok(html) => Html(html),
        Err(e) => {
            log::warn!("Dashboard render failed ({}): {}", e.status(), e);
            Html(error_card(&e.to_string()))
        }
    }
}

/// Portfolio card in either view; clicking Own Portfolio drills down
fn render_portfolio_card(
    ctx: &RenderContext<'_>,
    compositions: &Compositions,
    range: &MonthRange,
    month_label: &str,
    view: PortfolioView,
) -> String {
    let query = range_query_string(range);

    let body = match view {
        PortfolioView::Main => {
            let data = sorted_desc(compositions.get(CompositionKind::Portfolio));
            let chart = ctx
                .pie(CompositionKind::Portfolio, &data, LabelStyle::Drilldown)
                .link(SliceLink {
                    slice: OWN_PORTFOLIO.to_string(),
                    url: format!("/dashboard/portfolio?view={}&{}", view.after_click(OWN_PORTFOLIO), query),
                    target: "#portfolio-card".to_string(),
                });
            card(
                &format!("{} ({})", CompositionKind::Portfolio.title(), month_label),
                &format!(
                    "{}<p class='mt-2 text-xs text-gray-400'>Click Own Portfolio for details</p>",
                    ctx.drilldown(&chart)
                ),
            )
        }
        PortfolioView::Own => {
            let data = sorted_desc(compositions.get(CompositionKind::OwnPortfolio));
            let chart = ctx.pie(CompositionKind::OwnPortfolio, &data, LabelStyle::Drilldown);
            card(
                &format!("{} ({})", CompositionKind::OwnPortfolio.title(), month_label),
                &format!(
                    r##"<button class='text-sm text-blue-700 hover:underline mb-2'
                        hx-get='/dashboard/portfolio?view={}&{}' hx-target='#portfolio-card' hx-swap='outerHTML'>&larr; Back to total portfolio</button>{}"##,
                    view.back(),
                    query,
                    ctx.drilldown(&chart)
                ),
            )
        }
    };

    format!("<div id='portfolio-card'>{}</div>", body)
}

fn render_kpis(records: &[findash_core::MonthlyRecord]) -> String {
    let cards: Vec<String> = kpi_cards(latest(records))
        .into_iter()
        .map(|kpi| {
            format!(
                "<div class='bg-white rounded-xl shadow-sm p-4' data-kpi='{}'><p class='text-sm text-gray-500'>{}</p><p class='text-2xl font-bold text-gray-900'>{}</p></div>",
                kpi.key,
                escape_html(&kpi.title),
                escape_html(&kpi.value)
            )
        })
        .collect();
    format!(
        "<div class='grid grid-cols-2 md:grid-cols-3 lg:grid-cols-5 gap-4 mb-6'>{}</div>",
        cards.join("")
    )
}

fn render_analysis_trigger(ctx: &RenderContext<'_>, range: &MonthRange) -> String {
    if !ctx.config.ai.enabled {
        return String::new();
    }
    format!(
        r##"<div class='mb-6'>
            <button class='px-4 py-2 bg-blue-700 hover:bg-blue-800 text-white rounded-lg'
                hx-post='/dashboard/analysis?{}' hx-target='#analysis-panel' hx-indicator='#analysis-indicator'>Analyze this period</button>
            <span id='analysis-indicator' class='htmx-indicator ml-2 text-sm text-gray-400'>Generating analysis...</span>
            <div id='analysis-panel' class='mt-4'></div>
        </div>"##,
        range_query_string(range)
    )
}

/// All chart sections of a range
fn render_content(
    ctx: &RenderContext<'_>,
    dataset: &Dataset,
    range: &MonthRange,
    view: PortfolioView,
) -> ApiResult<String> {
    let records = dataset.filter(range)?;
    let compositions = Compositions::build(records);
    let month_label = latest(records)
        .map(|r| r.month.label())
        .unwrap_or_else(|| "no data".to_string());
    let titled = |kind: CompositionKind| format!("{} ({})", kind.title(), month_label);

    let balance = ctx.pie(
        CompositionKind::Balance,
        compositions.get(CompositionKind::Balance),
        LabelStyle::Main,
    );
    let drilldown = |kind: CompositionKind| {
        let data = sorted_desc(compositions.get(kind));
        card(&titled(kind), &ctx.drilldown(&ctx.pie(kind, &data, LabelStyle::Drilldown)))
    };
    let flow = |kind: CompositionKind| {
        let data = sorted_desc(compositions.get(kind));
        card(
            &format!("{} ({})", kind.title(), range.description()),
            &ctx.drilldown(&ctx.pie(kind, &data, LabelStyle::Drilldown)),
        )
    };

    let mut html = String::new();
    html.push_str(&format!(
        "<p class='text-sm text-gray-500 mb-4'>Showing {} ({} months)</p>",
        escape_html(&range.description()),
        records.len()
    ));
    html.push_str(&render_analysis_trigger(ctx, range));
    html.push_str(&render_kpis(records));

    html.push_str("<div class='grid grid-cols-1 xl:grid-cols-2 gap-6 mb-6'>");
    html.push_str(&card(&titled(CompositionKind::Balance), &balance.render()));
    html.push_str(&drilldown(CompositionKind::Assets));
    html.push_str(&render_portfolio_card(ctx, &compositions, range, &month_label, view));
    html.push_str(&drilldown(CompositionKind::Liabilities));
    html.push_str(&drilldown(CompositionKind::Equity));
    html.push_str("</div>");

    html.push_str("<div class='grid grid-cols-1 gap-6 mb-6'>");
    html.push_str(&card(
        "Performance (P&L)",
        &cartesian_chart(&performance_series(records), CartesianKind::Line, ctx.currency),
    ));
    html.push_str(&card(
        "Income vs Expenses",
        &cartesian_chart(&income_vs_expenses_series(records), CartesianKind::Bar, ctx.currency),
    ));
    html.push_str(&card(
        "Balance Sheet Trend",
        &cartesian_chart(&balance_trend_series(records), CartesianKind::Area, ctx.currency),
    ));
    html.push_str("</div>");

    html.push_str("<div class='grid grid-cols-1 xl:grid-cols-2 gap-6'>");
    html.push_str(&flow(CompositionKind::Income));
    html.push_str(&flow(CompositionKind::Expenses));
    html.push_str("</div>");

    Ok(html)
}

/// Full dashboard page
pub async fn page_dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let dashboard = state.dashboard.read().await;
    let ctx = RenderContext::new(&state);

    let result = (|| -> ApiResult<String> {
        let dataset = dashboard.dataset()?;
        let range = query.range_query().resolve(dataset)?;
        let content = render_content(&ctx, dataset, &range, query.portfolio_view()?)?;
        Ok(format!(
            r#"<div class='flex flex-wrap items-center justify-between gap-4 mb-6'>
                <h2 class='text-2xl font-bold'>Financial Dashboard</h2>
                {}
            </div>
            <div id='dashboard-content'>{}</div>"#,
            range_selector(&dataset.months(), &range),
            content
        ))
    })();

    let inner = result.unwrap_or_else(|e| {
        log::warn!("Dashboard page failed: {}", e);
        error_card(&e.to_string())
    });
    Html(crate::page_response(&headers, "Dashboard", "/dashboard", &inner))
}

/// HTMX: chart sections for the selected range
pub async fn htmx_dashboard_content(
    State(state): State<AppState>,
    Query(query): Query<DashboardQuery>,
) -> Html<String> {
    let dashboard = state.dashboard.read().await;
    let ctx = RenderContext::new(&state);

    html_or_error((|| -> ApiResult<String> {
        let dataset = dashboard.dataset()?;
        let range = query.range_query().resolve(dataset)?;
        render_content(&ctx, dataset, &range, query.portfolio_view()?)
    })())
}

/// HTMX: portfolio card, `view=own` for the own-portfolio drill-down
pub async fn htmx_portfolio(
    State(state): State<AppState>,
    Query(query): Query<PortfolioQuery>,
) -> Html<String> {
    let dashboard = state.dashboard.read().await;
    let ctx = RenderContext::new(&state);

    html_or_error((|| -> ApiResult<String> {
        let dataset = dashboard.dataset()?;
        let range_query = RangeQuery { start: query.start.clone(), end: query.end.clone() };
        let range = range_query.resolve(dataset)?;
        let view = parse_view(query.view.as_deref())?;
        let records = dataset.filter(&range)?;
        let month_label = latest(records)
            .map(|r| r.month.label())
            .unwrap_or_else(|| "no data".to_string());
        Ok(render_portfolio_card(&ctx, &Compositions::build(records), &range, &month_label, view))
    })())
}
