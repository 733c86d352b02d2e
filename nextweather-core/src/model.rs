use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::forecast::DaySummary;

/// Measurement system requested from the data source. Temperatures and wind
/// speeds come back already converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial]
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "m/s",
            Units::Imperial => "mph",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown units '{value}'. Supported units: metric, imperial."
            )),
        }
    }
}

/// How a location is identified to the data source.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
    CityId(u64),
}

impl LocationQuery {
    /// Query-string pairs selecting this location.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        match self {
            LocationQuery::City(name) => vec![("q", name.clone())],
            LocationQuery::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            LocationQuery::CityId(id) => vec![("id", id.to_string())],
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationQuery::City(name) => f.write_str(name),
            LocationQuery::Coordinates { lat, lon } => write!(f, "{lat}, {lon}"),
            LocationQuery::CityId(id) => write!(f, "city #{id}"),
        }
    }
}

/// Coarse weather category used to theme the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionGroup {
    Clear,
    Clouds,
    Rain,
    Thunder,
    Snow,
    Mist,
}

impl ConditionGroup {
    /// Classify an OpenWeatherMap condition name (`Clear`, `Drizzle`, ...).
    /// Anything unrecognised (haze, smoke, dust, ...) counts as mist.
    pub fn from_main(main: &str) -> Self {
        let main = main.to_lowercase();
        if main.contains("clear") {
            Self::Clear
        } else if main.contains("cloud") {
            Self::Clouds
        } else if main.contains("rain") || main.contains("drizzle") {
            Self::Rain
        } else if main.contains("thunder") {
            Self::Thunder
        } else if main.contains("snow") {
            Self::Snow
        } else {
            Self::Mist
        }
    }

    /// Classify an icon key (`01d`, `10n`, ...) by its numeric prefix.
    pub fn from_icon_code(code: &str) -> Self {
        match code.get(..2) {
            Some("01") => Self::Clear,
            Some("02" | "03" | "04") => Self::Clouds,
            Some("09" | "10") => Self::Rain,
            Some("11") => Self::Thunder,
            Some("13") => Self::Snow,
            _ => Self::Mist,
        }
    }
}

/// URL of the OpenWeatherMap icon image for `code` at `scale` (2 or 4).
pub fn icon_url(code: &str, scale: u8) -> String {
    format!("https://openweathermap.org/img/wn/{code}@{scale}x.png")
}

/// Current conditions at a location.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Used to request the matching forecast. Absent for some coordinate lookups.
    pub city_id: Option<u64>,
    pub location_name: String,
    pub temperature: f64,
    /// Condition name, e.g. `Rain`.
    pub condition: String,
    pub description: String,
    /// Icon key, empty when the source reported no condition.
    pub icon: String,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub pressure_hpa: f64,
    pub utc_offset: FixedOffset,
    pub observation_time: DateTime<Utc>,
}

impl CurrentConditions {
    pub fn group(&self) -> ConditionGroup {
        ConditionGroup::from_main(&self.condition)
    }

    /// `instant` expressed in the location's local time.
    pub fn local_time(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.utc_offset)
    }
}

/// Everything needed to render one dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub units: Units,
    pub current: CurrentConditions,
    pub days: Vec<DaySummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn units_as_str_roundtrip() {
        for units in Units::all() {
            let parsed = Units::try_from(units.as_str()).expect("roundtrip should succeed");
            assert_eq!(*units, parsed);
        }
        assert_eq!(Units::try_from(" Imperial ").unwrap(), Units::Imperial);
    }

    #[test]
    fn unknown_units_error() {
        let err = Units::try_from("kelvin").unwrap_err();
        assert!(err.to_string().contains("Unknown units"));
    }

    #[test]
    fn unit_suffixes() {
        assert_eq!(Units::Metric.temperature_suffix(), "°C");
        assert_eq!(Units::Imperial.temperature_suffix(), "°F");
        assert_eq!(Units::Metric.wind_suffix(), "m/s");
        assert_eq!(Units::Imperial.wind_suffix(), "mph");
    }

    #[test]
    fn location_query_params() {
        assert_eq!(
            LocationQuery::City("Paris".into()).query_params(),
            vec![("q", "Paris".to_string())]
        );
        assert_eq!(
            LocationQuery::Coordinates { lat: 40.7, lon: -74.0 }.query_params(),
            vec![("lat", "40.7".to_string()), ("lon", "-74".to_string())]
        );
        assert_eq!(
            LocationQuery::CityId(5128581).query_params(),
            vec![("id", "5128581".to_string())]
        );
    }

    #[test]
    fn condition_groups() {
        assert_eq!(ConditionGroup::from_main("Clear"), ConditionGroup::Clear);
        assert_eq!(ConditionGroup::from_main("Clouds"), ConditionGroup::Clouds);
        assert_eq!(ConditionGroup::from_main("Rain"), ConditionGroup::Rain);
        assert_eq!(ConditionGroup::from_main("Drizzle"), ConditionGroup::Rain);
        assert_eq!(ConditionGroup::from_main("Thunderstorm"), ConditionGroup::Thunder);
        assert_eq!(ConditionGroup::from_main("Snow"), ConditionGroup::Snow);
        assert_eq!(ConditionGroup::from_main("Haze"), ConditionGroup::Mist);
        assert_eq!(ConditionGroup::from_main(""), ConditionGroup::Mist);
    }

    #[test]
    fn condition_groups_from_icon_codes() {
        assert_eq!(ConditionGroup::from_icon_code("01n"), ConditionGroup::Clear);
        assert_eq!(ConditionGroup::from_icon_code("03d"), ConditionGroup::Clouds);
        assert_eq!(ConditionGroup::from_icon_code("09d"), ConditionGroup::Rain);
        assert_eq!(ConditionGroup::from_icon_code("10n"), ConditionGroup::Rain);
        assert_eq!(ConditionGroup::from_icon_code("11d"), ConditionGroup::Thunder);
        assert_eq!(ConditionGroup::from_icon_code("13d"), ConditionGroup::Snow);
        assert_eq!(ConditionGroup::from_icon_code("50d"), ConditionGroup::Mist);
        assert_eq!(ConditionGroup::from_icon_code(""), ConditionGroup::Mist);
    }

    #[test]
    fn icon_url_format() {
        assert_eq!(icon_url("10d", 2), "https://openweathermap.org/img/wn/10d@2x.png");
    }

    #[test]
    fn local_time_applies_location_offset() {
        let current = CurrentConditions {
            city_id: Some(1),
            location_name: "Somewhere, XX".into(),
            temperature: 20.0,
            condition: "Clear".into(),
            description: "clear sky".into(),
            icon: "01d".into(),
            humidity_pct: 50,
            wind_speed: 1.0,
            pressure_hpa: 1013.0,
            utc_offset: FixedOffset::west_opt(18000).unwrap(),
            observation_time: Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap(),
        };

        let local = current.local_time(current.observation_time);
        assert_eq!(local.format("%H:%M").to_string(), "07:00");
        assert_eq!(current.group(), ConditionGroup::Clear);
    }
}
