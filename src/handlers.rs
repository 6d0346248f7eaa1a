pub mod dashboard;
pub mod forecast;
