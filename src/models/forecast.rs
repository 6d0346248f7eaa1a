// src/models/forecast.rs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

// Reta ajustada: valor previsto = slope * dias_desde_origin + intercept
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearTrend {
    pub origin: NaiveDate,
    pub last_offset: i64,
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    pub fn predict(&self, offset: i64) -> f64 {
        self.slope * offset as f64 + self.intercept
    }
}

// Previsão de faturamento acumulado (horizonte em dias -> total previsto)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub trend: LinearTrend,
    pub trend_pct: Option<f64>,
    pub cumulative: BTreeMap<u32, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovingAveragePoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

// Dados do gráfico "Evolução Diária"
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyChart {
    pub daily: Vec<crate::models::dashboard::DailyRevenue>,
    /// None quando há menos de duas datas (não há reta)
    pub trend_line: Option<Vec<TrendPoint>>,
    pub trend_pct: Option<f64>,
    pub moving_average_window: usize,
    pub moving_average: Vec<MovingAveragePoint>,
}
