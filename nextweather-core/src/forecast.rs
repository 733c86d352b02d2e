//! Grouping of 3-hourly forecast samples into per-day summaries.
//!
//! The forecast endpoint returns a flat list of 3-hour slots covering up to
//! five days. [`aggregate`] partitions that list by the location's local
//! calendar day and reduces each day to a [`DaySummary`] (min/max temperature
//! plus the condition of the day's middle slot).

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Distinct local days looked at before summaries are emitted. The first one
/// is often a partial "today".
const DAY_KEY_WINDOW: usize = 6;

/// Upper bound on the number of summaries returned by [`aggregate`].
pub const MAX_FORECAST_DAYS: usize = 5;

/// `Fri, 16 Oct`
const DAY_LABEL_FORMAT: &str = "%a, %-d %b";

/// One 3-hour forecast slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp_utc: DateTime<Utc>,
    /// Unit follows the measurement system the data was requested in.
    pub temperature: f64,
    /// Icon key, e.g. `10d`.
    pub condition_code: String,
    pub condition_description: String,
}

/// Forecast samples for a single location.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSampleSet {
    pub utc_offset: FixedOffset,
    pub samples: Vec<ForecastSample>,
}

impl ForecastSampleSet {
    pub fn new(utc_offset: FixedOffset, samples: Vec<ForecastSample>) -> Self {
        Self { utc_offset, samples }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Wall-clock time of `sample` at the forecast location.
    pub fn local_time(&self, sample: &ForecastSample) -> DateTime<FixedOffset> {
        sample.timestamp_utc.with_timezone(&self.utc_offset)
    }

    /// Calendar day `sample` falls on at the forecast location.
    pub fn day_key(&self, sample: &ForecastSample) -> NaiveDate {
        self.local_time(sample).date_naive()
    }
}

/// Summary of one local calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub day_label: String,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub condition_code: String,
    pub condition_description: String,
}

/// Reduce a sample set to at most [`MAX_FORECAST_DAYS`] day summaries.
///
/// Days are emitted in the order their first sample appears in the input.
/// For chronological input (what the forecast endpoint delivers) that is
/// ascending date order; for shuffled input the grouping is still exact but
/// the output follows first appearance rather than the calendar.
pub fn aggregate(set: &ForecastSampleSet) -> Vec<DaySummary> {
    let days = group_by_local_day(set);

    let summaries: Vec<DaySummary> = days
        .iter()
        .take(DAY_KEY_WINDOW)
        .filter_map(|(date, samples)| summarize_day(set, *date, samples))
        .take(MAX_FORECAST_DAYS)
        .collect();

    tracing::debug!(
        samples = set.samples.len(),
        days = days.len(),
        summaries = summaries.len(),
        "aggregated forecast"
    );

    summaries
}

/// Insertion-ordered partition of the samples by local day. Every group holds
/// at least one sample.
fn group_by_local_day(set: &ForecastSampleSet) -> Vec<(NaiveDate, Vec<&ForecastSample>)> {
    let mut days: Vec<(NaiveDate, Vec<&ForecastSample>)> = Vec::new();

    for sample in &set.samples {
        let key = set.day_key(sample);
        match days.iter_mut().find(|(date, _)| *date == key) {
            Some((_, group)) => group.push(sample),
            None => days.push((key, vec![sample])),
        }
    }

    days
}

fn summarize_day(
    set: &ForecastSampleSet,
    date: NaiveDate,
    samples: &[&ForecastSample],
) -> Option<DaySummary> {
    // Middle slot stands in for midday without comparing wall-clock hours.
    let representative = samples.get(samples.len() / 2)?;

    let (min_temperature, max_temperature) = samples.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), s| (lo.min(s.temperature), hi.max(s.temperature)),
    );

    Some(DaySummary {
        date,
        day_label: set.local_time(representative).format(DAY_LABEL_FORMAT).to_string(),
        min_temperature,
        max_temperature,
        condition_code: representative.condition_code.clone(),
        condition_description: representative.condition_description.clone(),
    })
}
