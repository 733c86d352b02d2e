//! Plain-text rendering of a [`WeatherReport`].

use chrono::{DateTime, Utc};
use nextweather_core::{
    ConditionGroup, CurrentConditions, DaySummary, Units, WeatherReport, icon_url,
};

/// `Fri, 16 Oct 13:05`
const LOCAL_TIME_FORMAT: &str = "%a, %-d %b %H:%M";

/// Shown when the source returned no place name.
const UNKNOWN_LOCATION: &str = "(unknown)";

/// Round half up, the way the browser dashboard rounds temperatures.
fn round_display(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub fn format_temp(temp: f64, units: Units) -> String {
    format!("{}{}", round_display(temp), units.temperature_suffix())
}

fn glyph(group: ConditionGroup) -> &'static str {
    match group {
        ConditionGroup::Clear => "☀",
        ConditionGroup::Clouds => "☁",
        ConditionGroup::Rain => "🌧",
        ConditionGroup::Thunder => "🌩",
        ConditionGroup::Snow => "🌨",
        ConditionGroup::Mist => "🌫",
    }
}

pub fn render_current(current: &CurrentConditions, units: Units, now: DateTime<Utc>) -> String {
    let name = if current.location_name.is_empty() {
        UNKNOWN_LOCATION
    } else {
        current.location_name.as_str()
    };

    let mut out = format!("{}  {}\n", glyph(current.group()), name);
    out.push_str(&format!("   {}\n", current.local_time(now).format(LOCAL_TIME_FORMAT)));
    out.push_str(&format!(
        "   {}  {}\n",
        format_temp(current.temperature, units),
        current.description
    ));
    out.push_str(&format!(
        "   Humidity {}%  ·  Wind {} {}  ·  Pressure {} hPa\n",
        current.humidity_pct,
        current.wind_speed,
        units.wind_suffix(),
        current.pressure_hpa,
    ));
    if !current.icon.is_empty() {
        out.push_str(&format!("   Icon {}\n", icon_url(&current.icon, 4)));
    }

    out
}

/// One line per day: label, `max / min`, description.
pub fn render_forecast(days: &[DaySummary]) -> String {
    if days.is_empty() {
        return "Forecast unavailable.\n".to_string();
    }

    let mut out = format!("{}-day forecast\n", days.len());
    for day in days {
        let temps = format!(
            "{} / {}",
            round_display(day.max_temperature),
            round_display(day.min_temperature)
        );
        out.push_str(&format!(
            "  {} {:<12} {:>9}   {}\n",
            glyph(ConditionGroup::from_icon_code(&day.condition_code)),
            day.day_label,
            temps,
            day.condition_description,
        ));
    }

    out
}

pub fn render_report(report: &WeatherReport, now: DateTime<Utc>) -> String {
    format!(
        "{}\n{}",
        render_current(&report.current, report.units, now),
        render_forecast(&report.days)
    )
}
