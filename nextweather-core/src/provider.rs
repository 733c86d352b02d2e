use crate::{
    Config, LocationQuery, Units,
    error::WeatherError,
    forecast::{ForecastSampleSet, aggregate},
    model::{CurrentConditions, WeatherReport},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Source of current conditions and 3-hourly forecast samples.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(
        &self,
        query: &LocationQuery,
        units: Units,
    ) -> Result<CurrentConditions, WeatherError>;

    async fn forecast(
        &self,
        query: &LocationQuery,
        units: Units,
    ) -> Result<ForecastSampleSet, WeatherError>;
}

/// Construct the OpenWeatherMap provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeatherMap API key configured.\n\
                 Hint: run `nextweather configure` and enter your API key."
        )
    })?;

    Ok(Box::new(OpenWeatherProvider::new(api_key.to_owned())))
}

/// Fetch current conditions, then the forecast for the same place, and
/// aggregate the forecast into day summaries.
///
/// The forecast is requested by the city id the current-conditions lookup
/// resolved to, so both halves describe the same place. A failed forecast is
/// logged and leaves `days` empty; only a failed current-conditions lookup is
/// an error.
pub async fn fetch_report(
    provider: &dyn WeatherProvider,
    query: &LocationQuery,
    units: Units,
) -> Result<WeatherReport, WeatherError> {
    let current = provider.current(query, units).await?;

    let forecast_query = current
        .city_id
        .map(LocationQuery::CityId)
        .unwrap_or_else(|| query.clone());

    let days = match provider.forecast(&forecast_query, units).await {
        Ok(set) => aggregate(&set),
        Err(err) => {
            tracing::warn!(error = %err, location = %forecast_query, "forecast fetch failed");
            Vec::new()
        }
    };

    Ok(WeatherReport { units, current, days })
}
