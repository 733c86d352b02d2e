/// Errors reported by the weather data source.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Invalid API key - check your OpenWeatherMap key.")]
    InvalidApiKey,

    #[error("Location not found: {0}. Try another name.")]
    LocationNotFound(String),

    #[error("OpenWeatherMap request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to parse OpenWeatherMap response: {0}")]
    Parse(String),

    /// The response decoded, but a value the forecast depends on is missing
    /// or out of range.
    #[error("Invalid weather data: {0}")]
    InvalidData(String),
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
