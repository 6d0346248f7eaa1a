// src/handlers/dashboard.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    models::sales::DateRange,
    services::dashboard_service::LONG_TAIL_THRESHOLD_PCT,
};

// ---
// Validação do intervalo: as duas datas ou nenhuma, e início <= fim
// ---
fn check_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<Option<DateRange>, ValidationError> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) if start <= end => Ok(Some(DateRange::new(start, end))),
        (Some(_), Some(_)) => {
            let mut err = ValidationError::new("InvalidRange");
            err.message = Some("A data de início deve ser anterior ou igual à data final.".into());
            Err(err)
        }
        _ => {
            let mut err = ValidationError::new("IncompleteRange");
            err.message = Some("Informe 'start' e 'end' juntos.".into());
            Err(err)
        }
    }
}

fn validate_range_query(query: &RangeQuery) -> Result<(), ValidationError> {
    check_range(query.start, query.end).map(|_| ())
}

fn validate_distribution_query(query: &DistributionQuery) -> Result<(), ValidationError> {
    check_range(query.start, query.end).map(|_| ())
}

// ---
// Query: ?start=YYYY-MM-DD&end=YYYY-MM-DD (opcional)
// ---
#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_range_query"))]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl RangeQuery {
    pub fn validated_range(&self) -> Result<Option<DateRange>, AppError> {
        self.validate()?;
        Ok(self.start.zip(self.end).map(|(start, end)| DateRange::new(start, end)))
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_distribution_query"))]
pub struct DistributionQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,

    // Percentual mínimo para uma fatia não ir para "Outros"
    #[validate(range(min = 0.0, max = 100.0, message = "O limite deve estar entre 0 e 100."))]
    pub threshold: Option<f64>,
}

// GET /api/dashboard/bounds
pub async fn get_date_bounds(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let bounds = app_state.dashboard_service.date_bounds();
    Ok((StatusCode::OK, Json(bounds)))
}

// GET /api/dashboard/products
pub async fn list_products(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let names = app_state.dashboard_service.product_names();
    Ok((StatusCode::OK, Json(names)))
}

// GET /api/dashboard/summary
pub async fn get_summary(
    State(app_state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.validated_range()?;
    let summary = app_state.dashboard_service.summary(range);
    Ok((StatusCode::OK, Json(summary)))
}

// GET /api/dashboard/daily-revenue
pub async fn get_daily_revenue(
    State(app_state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.validated_range()?;
    let daily = app_state.dashboard_service.daily_revenue(range);
    Ok((StatusCode::OK, Json(daily)))
}

// GET /api/dashboard/daily-chart
pub async fn get_daily_chart(
    State(app_state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.validated_range()?;
    let chart = app_state.forecast_service.daily_chart(range);
    Ok((StatusCode::OK, Json(chart)))
}

// GET /api/dashboard/best-day
pub async fn get_best_day(
    State(app_state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.validated_range()?;
    let best = app_state.dashboard_service.best_day(range);
    Ok((StatusCode::OK, Json(best)))
}

// GET /api/dashboard/worst-day
pub async fn get_worst_day(
    State(app_state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.validated_range()?;
    let worst = app_state.dashboard_service.worst_day(range);
    Ok((StatusCode::OK, Json(worst)))
}

// GET /api/dashboard/weight-ranking
pub async fn get_weight_ranking(
    State(app_state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.validated_range()?;
    let ranking = app_state.dashboard_service.product_weight_ranking(range)?;
    Ok((StatusCode::OK, Json(ranking)))
}

// GET /api/dashboard/distribution
pub async fn get_distribution(
    State(app_state): State<AppState>,
    Query(query): Query<DistributionQuery>,
) -> Result<impl IntoResponse, AppError> {
    query.validate()?;
    let range = query.start.zip(query.end).map(|(start, end)| DateRange::new(start, end));

    let threshold = match query.threshold {
        Some(value) => Decimal::from_f64(value)
            .ok_or_else(|| AppError::InvalidQuery(format!("Limite inválido: {value}")))?,
        None => Decimal::from(LONG_TAIL_THRESHOLD_PCT),
    };

    let slices = app_state.dashboard_service.distribution(range, threshold)?;
    Ok((StatusCode::OK, Json(slices)))
}

// GET /api/dashboard/weekday-breakdown
pub async fn get_weekday_breakdown(
    State(app_state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.validated_range()?;
    let breakdown = app_state.dashboard_service.weekday_breakdown(range);
    Ok((StatusCode::OK, Json(breakdown)))
}

// GET /api/dashboard/products/{name}/peak-day
pub async fn get_product_peak_day(
    State(app_state): State<AppState>,
    Path(product_name): Path<String>,
    Query(query): Query<RangeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let range = query.validated_range()?;
    let peak = app_state
        .dashboard_service
        .peak_day_for_product(&product_name, range);
    Ok((StatusCode::OK, Json(peak)))
}
