//! Dashboard analytics handlers
//!
//! Every request resolves its window against the current time, so named
//! periods always end today.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::{get, MethodRouter},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppError, AppState};
use tally_core::analytics::dashboard::TOP_SERVICES_LIMIT;
use tally_core::analytics::{
    Bucket, Dashboard, DashboardKpis, ForecastReport, GroupCount, GrowthInsight, Period,
    ServiceBreakdown, Summary, TimeWindow,
};
use tally_core::models::EventSource;

/// Query parameters shared by the windowed analytics endpoints
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsQuery {
    /// week, month (default), year or custom
    pub period: Option<String>,
    /// Custom start date (YYYY-MM-DD)
    pub start: Option<String>,
    /// Custom end date (YYYY-MM-DD)
    pub end: Option<String>,
    /// Return only the total instead of the bucketed series
    pub summary: Option<bool>,
}

impl AnalyticsQuery {
    fn window(&self, dashboard: &Dashboard<'_>) -> Result<TimeWindow, AppError> {
        let period = match self.period.as_deref().map(str::trim) {
            None | Some("") => Period::default(),
            Some(p) => p.parse()?,
        };
        Ok(dashboard.window(period, self.start.as_deref(), self.end.as_deref())?)
    }
}

/// Trend body: the full series, or just its total with `summary=true`
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum TrendResponse {
    Series(Vec<Bucket>),
    Summary(Summary),
}

/// Completed services: top names and the trend over the window
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesResponse {
    pub top_services: Vec<GroupCount>,
    pub trend: Vec<Bucket>,
}

/// GET /api/analytics/kpis - Headline dashboard numbers
pub async fn get_kpis(State(state): State<Arc<AppState>>) -> Result<Json<DashboardKpis>, AppError> {
    let kpis = Dashboard::current(&state.db).kpis()?;
    Ok(Json(kpis))
}

/// GET /api/analytics/{inquiries,feedbacks} - Bucketed counts or total
async fn source_trend(
    state: Arc<AppState>,
    params: AnalyticsQuery,
    source: EventSource,
) -> Result<Json<TrendResponse>, AppError> {
    let dashboard = Dashboard::current(&state.db);
    let window = params.window(&dashboard)?;

    if params.summary.unwrap_or(false) {
        let summary = dashboard.total(source, &window)?;
        return Ok(Json(TrendResponse::Summary(summary)));
    }

    let series = dashboard.trend(source, &window)?;
    Ok(Json(TrendResponse::Series(series.buckets)))
}

/// GET /api/analytics/{source}/forecast - Next-period forecast
async fn source_forecast(
    state: Arc<AppState>,
    params: AnalyticsQuery,
    source: EventSource,
) -> Result<Json<ForecastReport>, AppError> {
    let dashboard = Dashboard::current(&state.db);
    let window = params.window(&dashboard)?;
    let report = dashboard.forecast(source, &window)?;

    debug!(source = %source, growth = %report.growth_rate, "Forecast served");
    Ok(Json(report))
}

/// GET /api/analytics/{source}/insight - Forecast with growth band
async fn source_insight(
    state: Arc<AppState>,
    params: AnalyticsQuery,
    source: EventSource,
) -> Result<Json<GrowthInsight>, AppError> {
    let dashboard = Dashboard::current(&state.db);
    let window = params.window(&dashboard)?;
    Ok(Json(dashboard.growth_insight(source, &window)?))
}

pub fn trend_route(source: EventSource) -> MethodRouter<Arc<AppState>> {
    get(
        move |State(state): State<Arc<AppState>>, Query(params): Query<AnalyticsQuery>| {
            source_trend(state, params, source)
        },
    )
}

pub fn forecast_route(source: EventSource) -> MethodRouter<Arc<AppState>> {
    get(
        move |State(state): State<Arc<AppState>>, Query(params): Query<AnalyticsQuery>| {
            source_forecast(state, params, source)
        },
    )
}

pub fn insight_route(source: EventSource) -> MethodRouter<Arc<AppState>> {
    get(
        move |State(state): State<Arc<AppState>>, Query(params): Query<AnalyticsQuery>| {
            source_insight(state, params, source)
        },
    )
}

/// GET /api/analytics/services - Top completed services and their trend
pub async fn get_services(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<ServicesResponse>, AppError> {
    let dashboard = Dashboard::current(&state.db);
    let window = params.window(&dashboard)?;

    let top_services = dashboard.top_services(Some(&window), TOP_SERVICES_LIMIT)?;
    let trend = dashboard.trend(EventSource::Services, &window)?;

    Ok(Json(ServicesResponse {
        top_services,
        trend: trend.buckets,
    }))
}

/// GET /api/analytics/services/trend - All-time monthly completed services
pub async fn get_services_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Bucket>>, AppError> {
    let history = Dashboard::current(&state.db).service_history()?;
    Ok(Json(history.map(|series| series.buckets).unwrap_or_default()))
}

/// GET /api/analytics/services/top - All-time category breakdown with insight
pub async fn get_service_breakdown(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ServiceBreakdown>, AppError> {
    let breakdown = Dashboard::current(&state.db).service_breakdown(None)?;
    Ok(Json(breakdown))
}
