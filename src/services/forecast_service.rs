// src/services/forecast_service.rs

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{
    common::{error::AppError, stats},
    models::{
        dashboard::DailyRevenue,
        forecast::{DailyChart, Forecast, LinearTrend, MovingAveragePoint, TrendPoint},
        sales::DateRange,
    },
    services::dashboard_service::DashboardService,
};

/// Horizontes padrão da previsão (dias)
pub const DEFAULT_HORIZONS: [u32; 2] = [14, 30];
pub const MAX_HORIZON_DAYS: u32 = 365;
pub const MOVING_AVERAGE_WINDOW: usize = 7;

#[derive(Clone)]
pub struct ForecastService {
    dashboard: DashboardService,
}

impl ForecastService {
    pub fn new(dashboard: DashboardService) -> Self {
        Self { dashboard }
    }

    /// Previsão de faturamento acumulado. Por padrão usa todo o histórico;
    /// `window` restringe a série usada no ajuste da reta.
    pub fn forecast_revenue(
        &self,
        window: Option<DateRange>,
        horizons: &[u32],
    ) -> Result<Forecast, AppError> {
        let history = self.dashboard.daily_revenue(window);
        let result = forecast(&history, horizons)?;

        for (horizon, total) in &result.cumulative {
            tracing::info!("🔮 Previsão para os próximos {} dias: {:.2}", horizon, total);
        }
        Ok(result)
    }

    /// Série diária + reta de tendência + média móvel (gráfico "Evolução Diária").
    pub fn daily_chart(&self, range: Option<DateRange>) -> DailyChart {
        let daily = self.dashboard.daily_revenue(range);

        let (trend_line, trend_pct) = match fit_trend(&daily) {
            Ok(trend) => (Some(trend_line(&daily, &trend)), trend_percentage(&daily, &trend)),
            Err(e) => {
                tracing::debug!("Sem linha de tendência: {}", e);
                (None, None)
            }
        };

        DailyChart {
            moving_average: moving_average(&daily, MOVING_AVERAGE_WINDOW),
            moving_average_window: MOVING_AVERAGE_WINDOW,
            daily,
            trend_line,
            trend_pct,
        }
    }
}

// Decimal -> f64 não falha para os valores que o Decimal representa
fn as_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

fn sorted_by_date(history: &[DailyRevenue]) -> Vec<&DailyRevenue> {
    let mut sorted: Vec<&DailyRevenue> = history.iter().collect();
    sorted.sort_by_key(|entry| entry.date);
    sorted
}

/// Ajusta a reta de mínimos quadrados sobre (dias desde a primeira data, faturamento).
pub fn fit_trend(history: &[DailyRevenue]) -> Result<LinearTrend, AppError> {
    let sorted = sorted_by_date(history);
    let (Some(first), Some(last)) = (sorted.first(), sorted.last()) else {
        return Err(AppError::InsufficientData(
            "histórico vazio; são necessárias pelo menos 2 datas".into(),
        ));
    };
    let origin = first.date;

    let points: Vec<(f64, f64)> = sorted
        .iter()
        .map(|entry| ((entry.date - origin).num_days() as f64, as_f64(entry.total_value)))
        .collect();

    let (slope, intercept) = stats::fit_line(&points).ok_or_else(|| {
        AppError::InsufficientData("são necessárias pelo menos 2 datas distintas".into())
    })?;

    Ok(LinearTrend {
        origin,
        last_offset: (last.date - origin).num_days(),
        slope,
        intercept,
    })
}

/// Variação total no período, em % do faturamento da primeira data.
/// None quando a primeira data faturou zero.
pub fn trend_percentage(history: &[DailyRevenue], trend: &LinearTrend) -> Option<f64> {
    let first_value = sorted_by_date(history).first().map(|entry| as_f64(entry.total_value))?;
    if first_value == 0.0 {
        return None;
    }
    Some(trend.slope * trend.last_offset as f64 / first_value * 100.0)
}

/// Valor da reta em cada data do histórico
pub fn trend_line(history: &[DailyRevenue], trend: &LinearTrend) -> Vec<TrendPoint> {
    sorted_by_date(history)
        .into_iter()
        .map(|entry| TrendPoint {
            date: entry.date,
            value: trend.predict((entry.date - trend.origin).num_days()),
        })
        .collect()
}

/// Faturamento acumulado previsto para cada horizonte.
///
/// A mesma reta serve a todos os horizontes; cada um soma do zero as
/// previsões diárias dos `H` dias seguintes à última data do histórico.
pub fn forecast(history: &[DailyRevenue], horizons: &[u32]) -> Result<Forecast, AppError> {
    let trend = fit_trend(history)?;

    let cumulative: BTreeMap<u32, f64> = horizons
        .iter()
        .map(|&horizon| {
            let total = (1..=i64::from(horizon))
                .map(|day| trend.predict(trend.last_offset + day))
                .sum::<f64>();
            (horizon, total)
        })
        .collect();

    Ok(Forecast {
        trend_pct: trend_percentage(history, &trend),
        trend,
        cumulative,
    })
}

/// Média móvel simples; as datas são as finais de cada janela.
pub fn moving_average(history: &[DailyRevenue], window: usize) -> Vec<MovingAveragePoint> {
    let sorted = sorted_by_date(history);
    let values: Vec<Decimal> = sorted.iter().map(|entry| entry.total_value).collect();

    stats::moving_average(&values, window)
        .into_iter()
        .zip(sorted.iter().skip(window.saturating_sub(1)))
        .map(|(value, entry)| MovingAveragePoint { date: entry.date, value })
        .collect()
}

/// Lê a lista de horizontes no formato "14,30".
pub fn parse_horizons(raw: &str) -> Result<Vec<u32>, AppError> {
    let horizons = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .ok()
                .filter(|days| (1..=MAX_HORIZON_DAYS).contains(days))
                .ok_or_else(|| {
                    AppError::InvalidQuery(format!(
                        "Horizonte inválido: '{part}' (use de 1 a {MAX_HORIZON_DAYS} dias)"
                    ))
                })
        })
        .collect::<Result<Vec<u32>, AppError>>()?;

    if horizons.is_empty() {
        return Err(AppError::InvalidQuery("Informe ao menos um horizonte de previsão".into()));
    }
    Ok(horizons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::NaiveDate;

    use crate::db::fixtures::{date, dec, sample_snapshot};

    fn history(points: &[(u32, &str)]) -> Vec<DailyRevenue> {
        points
            .iter()
            .map(|&(day, value)| DailyRevenue { date: date(day), total_value: dec(value) })
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_forecast_perfect_linear_trend() {
        let history = history(&[(1, "100"), (2, "110"), (3, "120")]);
        let result = forecast(&history, &[2]).unwrap();
        assert!(approx(result.trend.slope, 10.0));
        // dias 4 e 5: 130 + 140
        assert!(approx(result.cumulative[&2], 270.0));
    }

    #[test]
    fn test_each_horizon_restarts_from_zero() {
        let history = history(&[(1, "100"), (2, "110"), (3, "120")]);
        let result = forecast(&history, &[14, 30, 0]).unwrap();
        // soma de 120 + 10k para k = 1..H
        assert!(approx(result.cumulative[&14], 14.0 * 120.0 + 10.0 * 105.0));
        assert!(approx(result.cumulative[&30], 30.0 * 120.0 + 10.0 * 465.0));
        assert!(approx(result.cumulative[&0], 0.0));
    }

    #[test]
    fn test_forecast_is_idempotent() {
        let history = history(&[(1, "35.5"), (2, "80"), (4, "12.25"), (9, "61")]);
        let first = forecast(&history, &DEFAULT_HORIZONS).unwrap();
        let second = forecast(&history, &DEFAULT_HORIZONS).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_forecast_uses_calendar_day_offsets() {
        // dia 2 ausente: (0, 10) e (2, 30) -> inclinação 10/dia
        let history = history(&[(1, "10"), (3, "30")]);
        let result = forecast(&history, &[1]).unwrap();
        assert_eq!(result.trend.last_offset, 2);
        assert!(approx(result.cumulative[&1], 40.0));
    }

    #[test]
    fn test_forecast_accepts_unsorted_history() {
        let sorted = history(&[(1, "100"), (2, "110"), (3, "120")]);
        let mut shuffled = sorted.clone();
        shuffled.reverse();
        assert_eq!(forecast(&sorted, &[5]).unwrap(), forecast(&shuffled, &[5]).unwrap());
    }

    #[test]
    fn test_forecast_needs_two_distinct_dates() {
        assert!(matches!(forecast(&[], &[14]), Err(AppError::InsufficientData(_))));

        let single = history(&[(5, "100")]);
        assert!(matches!(forecast(&single, &[14]), Err(AppError::InsufficientData(_))));

        let same_day = history(&[(5, "100"), (5, "50")]);
        assert!(matches!(fit_trend(&same_day), Err(AppError::InsufficientData(_))));
    }

    #[test]
    fn test_trend_percentage() {
        let history = history(&[(1, "100"), (2, "110"), (3, "120")]);
        let trend = fit_trend(&history).unwrap();
        // 10 * 2 / 100 * 100
        assert!(approx(trend_percentage(&history, &trend).unwrap(), 20.0));
    }

    #[test]
    fn test_trend_percentage_with_zero_first_value() {
        let history = history(&[(1, "0"), (2, "10")]);
        let trend = fit_trend(&history).unwrap();
        assert_eq!(trend_percentage(&history, &trend), None);
        assert_eq!(forecast(&history, &[1]).unwrap().trend_pct, None);
    }

    #[test]
    fn test_trend_line_follows_fit() {
        let history = history(&[(1, "100"), (2, "110"), (3, "120")]);
        let trend = fit_trend(&history).unwrap();
        let line = trend_line(&history, &trend);
        let values: Vec<f64> = line.iter().map(|p| p.value).collect();
        assert!(values.iter().zip([100.0, 110.0, 120.0]).all(|(a, b)| approx(*a, b)));
    }

    #[test]
    fn test_moving_average_dates_are_trailing() {
        let history = history(&[
            (1, "1"), (2, "2"), (3, "3"), (4, "4"), (5, "5"),
            (6, "6"), (7, "7"), (8, "8"), (9, "9"),
        ]);
        let averages = moving_average(&history, MOVING_AVERAGE_WINDOW);
        assert_eq!(
            averages,
            vec![
                MovingAveragePoint { date: date(7), value: dec("4") },
                MovingAveragePoint { date: date(8), value: dec("5") },
                MovingAveragePoint { date: date(9), value: dec("6") },
            ]
        );
    }

    #[test]
    fn test_moving_average_short_series_is_empty() {
        let history = history(&[(1, "1"), (2, "2")]);
        assert!(moving_average(&history, MOVING_AVERAGE_WINDOW).is_empty());
        assert!(moving_average(&[], MOVING_AVERAGE_WINDOW).is_empty());
    }

    fn service() -> ForecastService {
        ForecastService::new(DashboardService::new(Arc::new(sample_snapshot())))
    }

    #[test]
    fn test_service_forecast_uses_full_history_by_default() {
        let svc = service();
        let full = svc.forecast_revenue(None, &DEFAULT_HORIZONS).unwrap();
        assert_eq!(full.trend.origin, date(1));
        assert_eq!(full.trend.last_offset, 6);
        assert_eq!(full.cumulative.keys().copied().collect::<Vec<_>>(), vec![14, 30]);

        let window = Some(DateRange::new(date(2), date(7)));
        let windowed = svc.forecast_revenue(window, &DEFAULT_HORIZONS).unwrap();
        assert_eq!(windowed.trend.origin, date(2));
        assert_ne!(full.cumulative, windowed.cumulative);
    }

    #[test]
    fn test_service_forecast_insufficient_window() {
        let window = Some(DateRange::new(date(3), date(4)));
        assert!(matches!(
            service().forecast_revenue(window, &[14]),
            Err(AppError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_daily_chart() {
        let chart = service().daily_chart(None);
        assert_eq!(chart.daily.len(), 5);
        assert_eq!(chart.trend_line.as_ref().map(Vec::len), Some(5));
        assert!(chart.trend_pct.is_some());
        // 5 datas < janela de 7
        assert!(chart.moving_average.is_empty());
        assert_eq!(chart.moving_average_window, 7);
    }

    #[test]
    fn test_daily_chart_single_day_has_no_trend() {
        let single = Some(DateRange::new(date(3), date(3)));
        let chart = service().daily_chart(single);
        assert_eq!(chart.daily.len(), 1);
        assert!(chart.trend_line.is_none());
        assert!(chart.trend_pct.is_none());
        assert_eq!(chart.daily[0].date, NaiveDate::from_ymd_opt(2024, 1, 3).unwrap());
    }

    #[test]
    fn test_parse_horizons() {
        assert_eq!(parse_horizons("14,30").unwrap(), vec![14, 30]);
        assert_eq!(parse_horizons(" 7 , 365 ,").unwrap(), vec![7, 365]);
        assert!(matches!(parse_horizons(""), Err(AppError::InvalidQuery(_))));
        assert!(matches!(parse_horizons("0"), Err(AppError::InvalidQuery(_))));
        assert!(matches!(parse_horizons("366"), Err(AppError::InvalidQuery(_))));
        assert!(matches!(parse_horizons("14,abc"), Err(AppError::InvalidQuery(_))));
    }
}
