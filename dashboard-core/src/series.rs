//! Chart-ready projections of a snapshot's forecast days.
//!
//! Everything here is a pure function of `&[ForecastDay]`; nothing is cached
//! between snapshots.

use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::{collections::BTreeMap, fmt, str::FromStr};

use crate::{
    condition::{Condition, classify},
    model::{ForecastDay, WeatherSnapshot},
};

/// Per-day values plotted by the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub date_label: String,
    pub max_temp: f64,
    pub min_temp: f64,
    pub avg_temp: i64,
    pub wind_speed: f64,
    pub condition: Condition,
    pub is_today: bool,
}

/// One point per forecast day, in order, plus the condition histogram.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedSeries {
    pub points: Vec<SeriesPoint>,
    pub histogram: BTreeMap<Condition, usize>,
}

/// Values for the "Weather Averages" card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub avg_temp_c: i64,
    pub avg_wind_kmh: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Temperature,
    Wind,
    Conditions,
    Overview,
}

impl ChartKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartKind::Temperature => "temperature",
            ChartKind::Wind => "wind",
            ChartKind::Conditions => "conditions",
            ChartKind::Overview => "overview",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::Temperature => "Temperature Trend",
            ChartKind::Wind => "Wind Speed",
            ChartKind::Conditions => "Weather Conditions",
            ChartKind::Overview => "Weather Overview",
        }
    }

    pub const fn all() -> &'static [ChartKind] {
        &[ChartKind::Temperature, ChartKind::Wind, ChartKind::Conditions, ChartKind::Overview]
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "temperature" | "trend" => Ok(ChartKind::Temperature),
            "wind" => Ok(ChartKind::Wind),
            "conditions" | "distribution" => Ok(ChartKind::Conditions),
            "overview" => Ok(ChartKind::Overview),
            _ => Err(format!(
                "Unknown chart '{value}'. Supported charts: temperature, wind, conditions, overview."
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperaturePoint {
    pub date_label: String,
    pub max_temp: f64,
    pub min_temp: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindPoint {
    pub date_label: String,
    pub wind_speed: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionShare {
    pub condition: Condition,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewPoint {
    pub date_label: String,
    pub avg_temp: i64,
    pub wind_speed: f64,
}

/// Data behind a single chart kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ChartProjection {
    Temperature(Vec<TemperaturePoint>),
    Wind(Vec<WindPoint>),
    Conditions(Vec<ConditionShare>),
    Overview(Vec<OverviewPoint>),
}

impl ChartProjection {
    pub fn kind(&self) -> ChartKind {
        match self {
            ChartProjection::Temperature(_) => ChartKind::Temperature,
            ChartProjection::Wind(_) => ChartKind::Wind,
            ChartProjection::Conditions(_) => ChartKind::Conditions,
            ChartProjection::Overview(_) => ChartKind::Overview,
        }
    }
}

/// `round((max + min) / 2)`, halves rounded away from zero.
pub fn avg_temp(day: &ForecastDay) -> i64 {
    ((day.max_temp_c + day.min_temp_c) / 2.0).round() as i64
}

/// Short label used on chart axes, e.g. "Jan 15".
pub fn chart_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Label used in the day list, relative to `today`.
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if date == today - Duration::days(1) {
        "Yesterday".to_string()
    } else {
        date.format("%a, %b %-d").to_string()
    }
}

impl DerivedSeries {
    pub fn from_days(days: &[ForecastDay]) -> Self {
        let last = days.len().checked_sub(1);

        let points: Vec<SeriesPoint> = days
            .iter()
            .enumerate()
            .map(|(index, day)| SeriesPoint {
                date: day.date,
                date_label: chart_label(day.date),
                max_temp: day.max_temp_c,
                min_temp: day.min_temp_c,
                avg_temp: avg_temp(day),
                wind_speed: day.max_wind_speed_kmh,
                condition: classify(day.weather_code),
                is_today: Some(index) == last,
            })
            .collect();

        let mut histogram = BTreeMap::new();
        for point in &points {
            *histogram.entry(point.condition).or_insert(0) += 1;
        }

        Self { points, histogram }
    }

    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        Self::from_days(&snapshot.forecast_days)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn chart(&self, kind: ChartKind) -> ChartProjection {
        match kind {
            ChartKind::Temperature => ChartProjection::Temperature(
                self.points
                    .iter()
                    .map(|p| TemperaturePoint {
                        date_label: p.date_label.clone(),
                        max_temp: p.max_temp,
                        min_temp: p.min_temp,
                    })
                    .collect(),
            ),
            ChartKind::Wind => ChartProjection::Wind(
                self.points
                    .iter()
                    .map(|p| WindPoint { date_label: p.date_label.clone(), wind_speed: p.wind_speed })
                    .collect(),
            ),
            ChartKind::Conditions => ChartProjection::Conditions(
                self.histogram
                    .iter()
                    .map(|(&condition, &count)| ConditionShare { condition, count })
                    .collect(),
            ),
            ChartKind::Overview => ChartProjection::Overview(
                self.points
                    .iter()
                    .map(|p| OverviewPoint {
                        date_label: p.date_label.clone(),
                        avg_temp: p.avg_temp,
                        wind_speed: p.wind_speed,
                    })
                    .collect(),
            ),
        }
    }
}

impl Summary {
    /// Averages over all days; both are 0 for an empty list.
    pub fn from_days(days: &[ForecastDay]) -> Self {
        if days.is_empty() {
            return Self::default();
        }

        let n = days.len() as f64;
        let temp_sum: f64 = days.iter().map(|d| (d.max_temp_c + d.min_temp_c) / 2.0).sum();
        let wind_sum: f64 = days.iter().map(|d| d.max_wind_speed_kmh).sum();

        Self {
            avg_temp_c: (temp_sum / n).round() as i64,
            avg_wind_kmh: (wind_sum / n).round() as i64,
        }
    }
}
