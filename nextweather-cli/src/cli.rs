use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use nextweather_core::{Config, LocationQuery, Units, fetch_report, provider_from_config};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nextweather", version, about = "Current weather and 5-day forecast")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, measurement system and default city.
    Configure,

    /// Show current conditions and the forecast.
    Show {
        /// City name; defaults to the configured city.
        #[arg(conflicts_with_all = ["lat", "lon"])]
        city: Option<String>,

        /// Latitude, used together with --lon.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude, used together with --lat.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// "metric" or "imperial"; defaults to the configured units.
        #[arg(long)]
        units: Option<String>,
    },

    /// Print the location of the config file.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show { city, lat, lon, units } => {
                let cfg = Config::load()?;
                let units = match units {
                    Some(u) => Units::try_from(u.as_str())?,
                    None => cfg.units,
                };
                let query = resolve_query(city, lat, lon, &cfg)?;
                let provider = provider_from_config(&cfg)?;
                tracing::debug!(location = %query, %units, "showing weather");

                let report = fetch_report(provider.as_ref(), &query, units)
                    .await
                    .with_context(|| format!("Failed to fetch weather for {query}"))?;

                print!("{}", render::render_report(&report, Utc::now()));
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
            }
        }

        Ok(())
    }
}

/// Pick the location to query: explicit coordinates, then a typed city, then
/// the configured default.
fn resolve_query(
    city: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    cfg: &Config,
) -> anyhow::Result<LocationQuery> {
    if let (Some(lat), Some(lon)) = (lat, lon) {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            bail!("Coordinates out of range: lat {lat}, lon {lon}.");
        }
        return Ok(LocationQuery::Coordinates { lat, lon });
    }

    match city {
        Some(city) => {
            let city = city.trim();
            if city.is_empty() {
                bail!("Please type a city name.");
            }
            Ok(LocationQuery::City(city.to_string()))
        }
        None => Ok(LocationQuery::City(cfg.default_city().to_string())),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let help = if cfg.is_configured() {
        "Leave empty to keep the current key."
    } else {
        "Get one at https://home.openweathermap.org/api_keys"
    };
    let api_key = Password::new("OpenWeatherMap API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message(help)
        .prompt()?;
    if !api_key.trim().is_empty() {
        cfg.set_api_key(api_key);
    }
    if !cfg.is_configured() {
        bail!("An API key is required.");
    }

    let all = Units::all().to_vec();
    let cursor = all.iter().position(|u| *u == cfg.units).unwrap_or(0);
    cfg.units = Select::new("Measurement system:", all).with_starting_cursor(cursor).prompt()?;

    let city = Text::new("Default city:").with_default(cfg.default_city()).prompt()?;
    cfg.default_city = Some(city.trim().to_string()).filter(|c| !c.is_empty());

    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}
