//! Dashboard data endpoints - JSON API

use crate::error::ApiResult;
use crate::routes::range::RangeQuery;
use crate::AppState;
use axum::extract::{Query, State};
use axum::Json;
use findash_core::{
    kpi_cards, latest, Compositions, KpiCard, MonthRange, MonthlyRecord, PeriodSummary,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct MonthEntry {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct CompositionsResponse {
    pub range: MonthRange,
    pub latest_month: Option<String>,
    pub compositions: Compositions,
}

/// Available months, oldest first
pub async fn api_months(State(state): State<AppState>) -> ApiResult<Json<Vec<MonthEntry>>> {
    let dashboard = state.dashboard.read().await;
    let months = dashboard
        .dataset()?
        .months()
        .into_iter()
        .map(|m| MonthEntry { key: m.key(), label: m.label() })
        .collect();
    Ok(Json(months))
}

/// Records of the selected range
pub async fn api_records(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<MonthlyRecord>>> {
    let dashboard = state.dashboard.read().await;
    let dataset = dashboard.dataset()?;
    let range = query.resolve(dataset)?;
    Ok(Json(dataset.filter(&range)?.to_vec()))
}

pub async fn api_compositions(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<CompositionsResponse>> {
    let dashboard = state.dashboard.read().await;
    let dataset = dashboard.dataset()?;
    let range = query.resolve(dataset)?;
    let records = dataset.filter(&range)?;

    Ok(Json(CompositionsResponse {
        range,
        latest_month: latest(records).map(|r| r.month.key()),
        compositions: Compositions::build(records),
    }))
}

pub async fn api_kpis(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Vec<KpiCard>>> {
    let dashboard = state.dashboard.read().await;
    let dataset = dashboard.dataset()?;
    let range = query.resolve(dataset)?;
    Ok(Json(kpi_cards(latest(dataset.filter(&range)?))))
}

pub async fn api_summary(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<PeriodSummary>> {
    let dashboard = state.dashboard.read().await;
    let dataset = dashboard.dataset()?;
    let range = query.resolve(dataset)?;
    Ok(Json(PeriodSummary::build(&range, dataset.filter(&range)?)))
}
