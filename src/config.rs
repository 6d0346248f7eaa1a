// src/config.rs

use std::{env, sync::Arc};

use anyhow::Context;

use crate::{
    db::{load_snapshot, SalesSnapshot},
    services::{
        forecast_service::{parse_horizons, DEFAULT_HORIZONS},
        DashboardService, ForecastService,
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

// Configuração lida do ambiente (.env)
#[derive(Debug, Clone)]
pub struct Settings {
    pub products_source: String,
    pub sales_source: String,
    pub bind_addr: String,
    pub forecast_horizons: Vec<u32>,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let products_source = env::var("PRODUCTS_SOURCE").context("PRODUCTS_SOURCE deve ser definida")?;
        let sales_source = env::var("SALES_SOURCE").context("SALES_SOURCE deve ser definida")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let forecast_horizons = match env::var("FORECAST_HORIZONS") {
            Ok(raw) => parse_horizons(&raw).context("FORECAST_HORIZONS inválida")?,
            Err(_) => DEFAULT_HORIZONS.to_vec(),
        };

        Ok(Self {
            products_source,
            sales_source,
            bind_addr,
            forecast_horizons,
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub forecast_service: ForecastService,
    pub default_horizons: Vec<u32>,
}

impl AppState {
    // Carrega as planilhas uma única vez; a partir daqui tudo é somente leitura
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let snapshot = load_snapshot(&settings.products_source, &settings.sales_source)
            .await
            .context("Falha ao carregar as planilhas de produtos e vendas")?;

        Ok(Self::from_snapshot(snapshot, settings.forecast_horizons.clone()))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_snapshot(snapshot: SalesSnapshot, default_horizons: Vec<u32>) -> Self {
        let snapshot = Arc::new(snapshot);
        let dashboard_service = DashboardService::new(snapshot);
        let forecast_service = ForecastService::new(dashboard_service.clone());

        Self {
            dashboard_service,
            forecast_service,
            default_horizons,
        }
    }
}
