pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod forecast_service;
pub use forecast_service::ForecastService;
