//! Core library for the `nextweather` dashboard.
//!
//! This crate defines:
//! - Forecast aggregation: 3-hourly samples to per-day summaries
//! - The OpenWeatherMap data source behind the `WeatherProvider` trait
//! - Shared domain models (units, locations, current conditions, reports)
//! - Configuration & credentials handling
//!
//! It is used by `nextweather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod model;
pub mod provider;

pub use config::Config;
pub use error::WeatherError;
pub use forecast::{DaySummary, ForecastSample, ForecastSampleSet, MAX_FORECAST_DAYS, aggregate};
pub use model::{
    ConditionGroup, CurrentConditions, LocationQuery, Units, WeatherReport, icon_url,
};
pub use provider::{
    WeatherProvider, fetch_report, openweather::OpenWeatherProvider, provider_from_config,
};
