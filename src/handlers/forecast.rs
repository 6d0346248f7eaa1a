// src/handlers/forecast.rs

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::{
    common::error::AppError,
    config::AppState,
    handlers::dashboard::RangeQuery,
    services::forecast_service::parse_horizons,
};

#[derive(Debug, Default, Deserialize)]
pub struct HorizonQuery {
    // Ex.: "14,30". Sem o parâmetro, usa os horizontes da configuração.
    pub horizons: Option<String>,
}

// GET /api/forecast?horizons=14,30[&start=...&end=...]
// O intervalo (opcional) recorta o histórico usado no ajuste da reta.
pub async fn get_forecast(
    State(app_state): State<AppState>,
    Query(range_query): Query<RangeQuery>,
    Query(horizon_query): Query<HorizonQuery>,
) -> Result<impl IntoResponse, AppError> {
    let window = range_query.validated_range()?;
    let horizons = match horizon_query.horizons.as_deref() {
        Some(raw) => parse_horizons(raw)?,
        None => app_state.default_horizons.clone(),
    };

    let forecast = app_state
        .forecast_service
        .forecast_revenue(window, &horizons)?;

    Ok((StatusCode::OK, Json(forecast)))
}
