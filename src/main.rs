//src/main.rs

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod handlers;
mod models;
mod services;

use crate::config::{AppState, Settings};

fn router(app_state: AppState) -> Router {
    let dashboard_routes = Router::new()
        .route("/bounds", get(handlers::dashboard::get_date_bounds))
        .route("/products", get(handlers::dashboard::list_products))
        .route("/products/{name}/peak-day", get(handlers::dashboard::get_product_peak_day))
        .route("/summary", get(handlers::dashboard::get_summary))
        .route("/daily-revenue", get(handlers::dashboard::get_daily_revenue))
        .route("/daily-chart", get(handlers::dashboard::get_daily_chart))
        .route("/best-day", get(handlers::dashboard::get_best_day))
        .route("/worst-day", get(handlers::dashboard::get_worst_day))
        .route("/weight-ranking", get(handlers::dashboard::get_weight_ranking))
        .route("/distribution", get(handlers::dashboard::get_distribution))
        .route("/weekday-breakdown", get(handlers::dashboard::get_weekday_breakdown));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/forecast", get(handlers::forecast::get_forecast))
        .nest("/api/dashboard", dashboard_routes)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Inicializa o logger (RUST_LOG, padrão "info")
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração ou a carga das planilhas falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let app_state = AppState::new(&settings).await?;

    let app = router(app_state);

    // Inicia o servidor
    let listener = TcpListener::bind(&settings.bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::fixtures::sample_snapshot;
    use crate::services::forecast_service::DEFAULT_HORIZONS;

    #[test]
    fn test_router_registers_all_routes() {
        // Sintaxe de rota inválida faz o axum entrar em pânico ao montar o router
        let state = AppState::from_snapshot(sample_snapshot(), DEFAULT_HORIZONS.to_vec());
        let _app = router(state);
    }
}
