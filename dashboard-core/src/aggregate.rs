//! Turns a raw weather payload into a snapshot plus its derived series.

use chrono::NaiveDate;

use crate::{
    error::DashboardError,
    model::{ForecastDay, ForecastDayRaw, WeatherPayload, WeatherSnapshot},
    series::{DerivedSeries, Summary},
};

/// Output of [`aggregate`].
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub snapshot: WeatherSnapshot,
    pub series: DerivedSeries,
    pub summary: Summary,
}

/// Validate `payload` and derive everything the dashboard displays from it.
pub fn aggregate(payload: &WeatherPayload) -> Result<Aggregate, DashboardError> {
    build_snapshot(payload).map(Aggregate::from_snapshot)
}

impl Aggregate {
    pub fn from_snapshot(snapshot: WeatherSnapshot) -> Self {
        let series = DerivedSeries::from_snapshot(&snapshot);
        let summary = Summary::from_days(&snapshot.forecast_days);
        Self { snapshot, series, summary }
    }
}

/// Build the snapshot alone. Past days come first, then the daily forecast;
/// overlapping dates are kept as-is.
pub fn build_snapshot(payload: &WeatherPayload) -> Result<WeatherSnapshot, DashboardError> {
    let city = payload.city.as_deref().ok_or_else(|| DashboardError::missing("city"))?;
    let latitude = payload.latitude.ok_or_else(|| DashboardError::missing("latitude"))?;
    let longitude = payload.longitude.ok_or_else(|| DashboardError::missing("longitude"))?;

    let current = payload
        .current_weather
        .as_ref()
        .ok_or_else(|| DashboardError::missing("current_weather"))?;

    let temperature_c = current
        .temperature_c
        .ok_or_else(|| DashboardError::missing("current_weather.temperature_c"))?;
    let wind_speed_kmh = current
        .windspeed_kmh
        .ok_or_else(|| DashboardError::missing("current_weather.windspeed_kmh"))?;
    let humidity = current
        .humidity_percent
        .ok_or_else(|| DashboardError::missing("current_weather.humidity_percent"))?;
    let condition = current
        .condition
        .clone()
        .ok_or_else(|| DashboardError::missing("current_weather.condition"))?;

    let past = payload.past_weather.as_deref().ok_or_else(|| DashboardError::missing("past_weather"))?;
    let daily =
        payload.daily_weather.as_deref().ok_or_else(|| DashboardError::missing("daily_weather"))?;

    let mut forecast_days = Vec::with_capacity(past.len() + daily.len());
    for (i, raw) in past.iter().enumerate() {
        forecast_days.push(parse_day(raw, "past_weather", i)?);
    }
    for (i, raw) in daily.iter().enumerate() {
        forecast_days.push(parse_day(raw, "daily_weather", i)?);
    }

    Ok(WeatherSnapshot {
        city_label: city.to_string(),
        temperature_c: temperature_c.round() as i64,
        condition,
        wind_speed_kmh: wind_speed_kmh.round() as i64,
        humidity_percent: humidity.round().clamp(0.0, 100.0) as u8,
        activity_suggestion: current.activity_suggestion.clone().unwrap_or_default(),
        latitude,
        longitude,
        forecast_days,
    })
}

fn parse_day(raw: &ForecastDayRaw, list: &str, index: usize) -> Result<ForecastDay, DashboardError> {
    let field = |name: &str| DashboardError::missing(&format!("{list}[{index}].{name}"));

    let date_str = raw.date.as_deref().ok_or_else(|| field("date"))?;
    let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
        DashboardError::DataShape(format!("{list}[{index}].date '{date_str}' is not a date: {e}"))
    })?;

    Ok(ForecastDay {
        date,
        max_temp_c: raw.max_temp_c.ok_or_else(|| field("max_temp_c"))?,
        min_temp_c: raw.min_temp_c.ok_or_else(|| field("min_temp_c"))?,
        max_wind_speed_kmh: raw.max_windspeed_kmh.ok_or_else(|| field("max_windspeed_kmh"))?,
        weather_code: raw.weathercode.ok_or_else(|| field("weathercode"))?,
    })
}
