use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::{
    error::WeatherError,
    forecast::{ForecastSample, ForecastSampleSet},
    model::{CurrentConditions, LocationQuery, Units},
};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host, e.g. a mock server.
    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            api_key,
            base_url,
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &LocationQuery,
        units: Units,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/data/2.5/{endpoint}", self.base_url);

        let mut params = query.query_params();
        params.push(("appid", self.api_key.clone()));
        params.push(("units", units.as_str().to_string()));

        tracing::debug!(%url, location = %query, %units, "requesting OpenWeatherMap");

        let res = self.http.get(&url).query(&params).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(error_for_status(status, &body, query));
        }

        let value: Value = serde_json::from_str(&body)?;

        // The API sometimes reports a miss in the body of a 200 response.
        if is_not_found_code(&value) {
            return Err(WeatherError::LocationNotFound(query.to_string()));
        }

        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    humidity: u8,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    id: u64,
    #[serde(default)]
    name: String,
    dt: i64,
    #[serde(default)]
    timezone: i32,
    sys: Option<OwSys>,
    main: OwCurrentMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

/// Forecast fields are optional on the wire so that a gap is reported as
/// invalid data for that entry instead of a generic decode failure.
#[derive(Debug, Default, Deserialize)]
struct OwForecastMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastWeather {
    icon: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    #[serde(default)]
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwForecastWeather>,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: Option<OwCity>,
    #[serde(default)]
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwErrorBody {
    message: Option<String>,
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let offset = utc_offset(parsed.timezone)?;

        let observation_time = DateTime::from_timestamp(parsed.dt, 0).unwrap_or_else(Utc::now);

        let (condition, description, icon) = parsed
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description, w.icon))
            .unwrap_or_else(|| ("Unknown".to_string(), "Unknown".to_string(), String::new()));

        let location_name = match parsed.sys.and_then(|s| s.country).filter(|c| !c.is_empty()) {
            Some(country) => format!("{}, {}", parsed.name, country),
            None => parsed.name,
        };

        Ok(CurrentConditions {
            city_id: Some(parsed.id).filter(|id| *id != 0),
            location_name,
            temperature: parsed.main.temp,
            condition,
            description,
            icon,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            pressure_hpa: parsed.main.pressure,
            utc_offset: offset,
            observation_time,
        })
    }
}

impl TryFrom<OwForecastResponse> for ForecastSampleSet {
    type Error = WeatherError;

    fn try_from(parsed: OwForecastResponse) -> Result<Self, Self::Error> {
        let offset = utc_offset(parsed.city.map_or(0, |c| c.timezone))?;

        let samples = parsed
            .list
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.into_sample(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ForecastSampleSet::new(offset, samples))
    }
}

impl OwForecastEntry {
    fn into_sample(self, index: usize) -> Result<ForecastSample, WeatherError> {
        let timestamp_utc = DateTime::from_timestamp(self.dt, 0).ok_or_else(|| {
            WeatherError::InvalidData(format!(
                "forecast entry {index} has an out-of-range timestamp {}",
                self.dt
            ))
        })?;

        let temperature = self.main.temp.filter(|t| t.is_finite()).ok_or_else(|| {
            WeatherError::InvalidData(format!(
                "forecast entry {index} (dt={}) has no temperature",
                self.dt
            ))
        })?;

        let weather = self.weather.into_iter().next().ok_or_else(|| {
            WeatherError::InvalidData(format!(
                "forecast entry {index} (dt={}) has no weather condition",
                self.dt
            ))
        })?;

        let non_empty = |field: Option<String>| field.filter(|v| !v.trim().is_empty());
        let (Some(condition_code), Some(condition_description)) =
            (non_empty(weather.icon), non_empty(weather.description))
        else {
            return Err(WeatherError::InvalidData(format!(
                "forecast entry {index} (dt={}) has no condition icon/description",
                self.dt
            )));
        };

        Ok(ForecastSample {
            timestamp_utc,
            temperature,
            condition_code,
            condition_description,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(
        &self,
        query: &LocationQuery,
        units: Units,
    ) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", query, units).await?;
        CurrentConditions::try_from(parsed)
    }

    async fn forecast(
        &self,
        query: &LocationQuery,
        units: Units,
    ) -> Result<ForecastSampleSet, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", query, units).await?;
        let set = ForecastSampleSet::try_from(parsed)?;

        tracing::debug!(samples = set.samples.len(), location = %query, "forecast received");
        Ok(set)
    }
}

fn utc_offset(seconds: i32) -> Result<FixedOffset, WeatherError> {
    FixedOffset::east_opt(seconds)
        .ok_or_else(|| WeatherError::InvalidData(format!("UTC offset {seconds}s is out of range")))
}

fn is_not_found_code(value: &Value) -> bool {
    match value.get("cod") {
        Some(Value::String(code)) => code == "404",
        Some(Value::Number(code)) => code.as_u64() == Some(404),
        _ => false,
    }
}

fn error_for_status(status: StatusCode, body: &str, query: &LocationQuery) -> WeatherError {
    match status {
        StatusCode::UNAUTHORIZED => WeatherError::InvalidApiKey,
        StatusCode::NOT_FOUND => WeatherError::LocationNotFound(query.to_string()),
        _ => {
            let message = serde_json::from_str::<OwErrorBody>(body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| truncate_body(body));

            WeatherError::Api { status: status.as_u16(), message }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
