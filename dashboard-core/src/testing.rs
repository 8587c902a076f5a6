use async_trait::async_trait;
use chrono::{Duration as Days, NaiveDate};
use parking_lot::Mutex;
use std::{collections::HashMap, time::Duration};

use crate::{
    DashboardError, WeatherBackend,
    model::{CurrentWeatherRaw, ForecastDayRaw, Suggestion, WeatherPayload},
};

/// Payload for `city` whose days start on 2024-01-15. The first day goes into
/// `past_weather`, the rest into `daily_weather`.
pub(crate) fn payload(city: &str, days: &[(f64, f64, f64, i64)]) -> WeatherPayload {
    let start = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
    let mut raw: Vec<ForecastDayRaw> = days
        .iter()
        .enumerate()
        .map(|(i, &(max, min, wind, code))| ForecastDayRaw {
            date: Some((start + Days::days(i as i64)).to_string()),
            max_temp_c: Some(max),
            min_temp_c: Some(min),
            max_windspeed_kmh: Some(wind),
            weathercode: Some(code),
        })
        .collect();
    let daily = raw.split_off(raw.len().min(1));

    WeatherPayload {
        city: Some(city.to_string()),
        latitude: Some(52.52),
        longitude: Some(13.41),
        current_weather: Some(CurrentWeatherRaw {
            temperature_c: Some(5.5),
            condition: Some("Clouds".into()),
            windspeed_kmh: Some(12.0),
            humidity_percent: Some(75.0),
            activity_suggestion: Some("Take a walk.".into()),
        }),
        past_weather: Some(raw),
        daily_weather: Some(daily),
    }
}

/// In-memory backend with canned answers and optional per-city latency.
#[derive(Debug, Default)]
pub(crate) struct StubBackend {
    weather: HashMap<String, (Duration, Result<WeatherPayload, DashboardError>)>,
    suggestions: HashMap<String, Vec<Suggestion>>,
    weather_calls: Mutex<Vec<String>>,
}

impl StubBackend {
    pub(crate) fn with_weather(
        mut self,
        city: &str,
        delay_ms: u64,
        result: Result<WeatherPayload, DashboardError>,
    ) -> Self {
        self.weather.insert(city.to_string(), (Duration::from_millis(delay_ms), result));
        self
    }

    pub(crate) fn with_suggestions(mut self, query: &str, list: Vec<Suggestion>) -> Self {
        self.suggestions.insert(query.to_string(), list);
        self
    }

    pub(crate) fn weather_calls(&self) -> Vec<String> {
        self.weather_calls.lock().clone()
    }
}

#[async_trait]
impl WeatherBackend for StubBackend {
    async fn weather(&self, city: &str) -> Result<WeatherPayload, DashboardError> {
        self.weather_calls.lock().push(city.to_string());

        match self.weather.get(city) {
            Some((delay, result)) => {
                tokio::time::sleep(*delay).await;
                result.clone()
            }
            None => Err(DashboardError::NotFound(None)),
        }
    }

    async fn suggestions(&self, query: &str) -> Result<Vec<Suggestion>, DashboardError> {
        Ok(self.suggestions.get(query).cloned().unwrap_or_default())
    }
}
