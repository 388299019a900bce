//! Weather data types: upstream wire formats and aggregated summaries.

use serde::{Deserialize, Serialize};

/// One aggregated calendar day of forecast data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    /// Calendar date (YYYY-MM-DD)
    pub date: String,
    /// Minimum temperature (°C)
    pub temp_min_c: f64,
    /// Maximum temperature (°C)
    pub temp_max_c: f64,
    /// Mean precipitation probability, 0-1 fraction rounded to 2 decimals
    pub precip_prob: f64,
    /// Most frequent condition description among the day's samples
    pub description: String,
}

/// Multi-day forecast summary for one destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// Resolved city name
    pub city: String,
    /// Country code, when the upstream reports one
    pub country: Option<String>,
    /// Aggregated days, ordered by date ascending
    pub days: Vec<DailyForecast>,
}

// ---------------------------------------------------------------------------
// Upstream wire types (OpenWeatherMap)
// ---------------------------------------------------------------------------

/// One geocoding result from `/geo/1.0/direct`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GeoItem {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Response from `/data/2.5/forecast`.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    pub list: Vec<ForecastItem>,
    pub city: ForecastCity,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastCity {
    pub name: String,
    #[serde(default)]
    pub country: Option<String>,
}

/// One 3-hour forecast sample.
#[derive(Debug, Deserialize)]
pub(crate) struct ForecastItem {
    /// Sample timestamp, "YYYY-MM-DD HH:MM:SS"
    pub dt_txt: String,
    pub main: MainReading,
    pub weather: Vec<ConditionReading>,
    /// Precipitation probability, 0-1 fraction
    #[serde(default)]
    pub pop: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MainReading {
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConditionReading {
    pub description: String,
}
