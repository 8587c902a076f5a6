use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Body of a successful `GET /weather?city=` response.
///
/// Every field is optional on the wire so that the aggregator, not serde,
/// decides which omissions are fatal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherPayload {
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub current_weather: Option<CurrentWeatherRaw>,
    pub past_weather: Option<Vec<ForecastDayRaw>>,
    pub daily_weather: Option<Vec<ForecastDayRaw>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrentWeatherRaw {
    pub temperature_c: Option<f64>,
    pub condition: Option<String>,
    pub windspeed_kmh: Option<f64>,
    pub humidity_percent: Option<f64>,
    pub activity_suggestion: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastDayRaw {
    pub date: Option<String>,
    pub max_temp_c: Option<f64>,
    pub min_temp_c: Option<f64>,
    pub max_windspeed_kmh: Option<f64>,
    pub weathercode: Option<i64>,
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// Body of a `GET /suggestions?q=` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct SuggestionsBody {
    #[serde(default)]
    pub suggestions: Option<Vec<Suggestion>>,
}

/// One calendar day of forecast or history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub max_wind_speed_kmh: f64,
    pub weather_code: i64,
}

/// Everything one successful lookup produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub city_label: String,
    pub temperature_c: i64,
    pub condition: String,
    pub wind_speed_kmh: i64,
    pub humidity_percent: u8,
    pub activity_suggestion: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Past days followed by present/future days; the last entry is today.
    pub forecast_days: Vec<ForecastDay>,
}

impl WeatherSnapshot {
    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast_days.last()
    }
}

/// Autocomplete candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub name: String,
    #[serde(default)]
    pub display: String,
    #[serde(default, rename = "admin1", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl Suggestion {
    pub fn new(name: impl Into<String>, display: impl Into<String>) -> Self {
        Self { name: name.into(), display: display.into(), region: None, country: None }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// Join label segments with ", ", skipping blank ones.
pub fn compose_label<'a, I>(segments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    segments
        .into_iter()
        .flat_map(|segment| segment.split(','))
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
