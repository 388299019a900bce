//! OpenWeatherMap client: geocoding, 5-day forecast, daily aggregation.
//!
//! The upstream forecast arrives as 3-hour samples; [`WeatherService::fetch`]
//! groups them per calendar day into min/max temperature, mean precipitation
//! probability, and the most frequent condition description.

pub mod types;

use crate::config::WeatherConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

pub use types::{DailyForecast, WeatherSummary};

use types::{ForecastItem, ForecastResponse, GeoItem};

/// Default timeout for weather API requests
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client for the OpenWeatherMap geocoding and forecast endpoints.
pub struct WeatherService {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl WeatherService {
    /// Create a new service from weather configuration.
    pub fn new(config: WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(WeatherService {
            client,
            api_key: config.api_key,
            base_url: config.base_url,
        })
    }

    /// Fetch and aggregate the multi-day forecast for a city.
    ///
    /// Fails with [`Error::ToolFailure`] when the city cannot be resolved;
    /// transport errors surface as [`Error::Http`]. Both are recovered at
    /// the tool boundary, not by the orchestrator.
    pub async fn fetch(&self, city: &str) -> Result<WeatherSummary> {
        let geo = self.geocode(city).await?;

        debug!(
            "Resolved {} to {} (lat={}, lon={})",
            city, geo.name, geo.lat, geo.lon
        );

        let url = format!("{}/data/2.5/forecast", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("lat", geo.lat.to_string()),
                ("lon", geo.lon.to_string()),
                ("appid", self.api_key.expose_secret().to_string()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::ToolFailure(format!(
                "Forecast lookup failed with status {}",
                status
            )));
        }

        let forecast: ForecastResponse = response.json().await?;

        Ok(WeatherSummary {
            city: forecast.city.name,
            country: forecast.city.country,
            days: summarize(forecast.list),
        })
    }

    /// Resolve a place name to coordinates.
    async fn geocode(&self, city: &str) -> Result<GeoItem> {
        let url = format!("{}/geo/1.0/direct", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("limit", "1"),
                ("appid", self.api_key.expose_secret()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::ToolFailure(format!(
                "Geocoding failed with status {}",
                status
            )));
        }

        let items: Vec<GeoItem> = response.json().await?;
        items
            .into_iter()
            .next()
            .ok_or_else(|| Error::ToolFailure(format!("City not found: {}", city)))
    }
}

/// Group 3-hour samples into per-day aggregates, ordered by date ascending.
fn summarize(items: Vec<ForecastItem>) -> Vec<DailyForecast> {
    let mut by_date: HashMap<String, Vec<ForecastItem>> = HashMap::new();
    for item in items {
        let date = item.dt_txt.chars().take(10).collect::<String>();
        by_date.entry(date).or_default().push(item);
    }

    let mut days: Vec<DailyForecast> = by_date
        .into_iter()
        .map(|(date, samples)| {
            let temp_min_c = samples
                .iter()
                .map(|s| s.main.temp_min)
                .fold(f64::INFINITY, f64::min);
            let temp_max_c = samples
                .iter()
                .map(|s| s.main.temp_max)
                .fold(f64::NEG_INFINITY, f64::max);
            let mean_pop =
                samples.iter().map(|s| s.pop).sum::<f64>() / samples.len() as f64;

            let mut counts: HashMap<&str, usize> = HashMap::new();
            for sample in &samples {
                for condition in &sample.weather {
                    *counts.entry(condition.description.as_str()).or_default() += 1;
                }
            }
            let description = counts
                .into_iter()
                .max_by_key(|(_, n)| *n)
                .map(|(desc, _)| desc.to_string())
                .unwrap_or_else(|| "n/a".to_string());

            DailyForecast {
                date,
                temp_min_c,
                temp_max_c,
                precip_prob: (mean_pop * 100.0).round() / 100.0,
                description,
            }
        })
        .collect();

    days.sort_by(|a, b| a.date.cmp(&b.date));
    days
}

#[cfg(test)]
mod tests {
    use super::types::*;
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample(dt_txt: &str, temp_min: f64, temp_max: f64, pop: f64, desc: &str) -> ForecastItem {
        ForecastItem {
            dt_txt: dt_txt.to_string(),
            main: MainReading { temp_min, temp_max },
            weather: vec![ConditionReading {
                description: desc.to_string(),
            }],
            pop,
        }
    }

    fn test_service(base_url: String) -> WeatherService {
        WeatherService::new(WeatherConfig {
            api_key: SecretString::from("test-key"),
            base_url,
        })
        .unwrap()
    }

    #[test]
    fn aggregates_one_entry_per_day() {
        let days = summarize(vec![
            sample("2026-09-01 09:00:00", 14.0, 18.0, 0.1, "clear sky"),
            sample("2026-09-01 12:00:00", 16.0, 22.0, 0.3, "clear sky"),
            sample("2026-09-01 15:00:00", 15.0, 21.0, 0.2, "few clouds"),
            sample("2026-09-02 09:00:00", 12.0, 17.0, 0.8, "light rain"),
        ]);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2026-09-01");
        assert_eq!(days[0].temp_min_c, 14.0);
        assert_eq!(days[0].temp_max_c, 22.0);
        assert_eq!(days[0].precip_prob, 0.2);
        assert_eq!(days[0].description, "clear sky");
        assert_eq!(days[1].date, "2026-09-02");
        assert_eq!(days[1].precip_prob, 0.8);
    }

    #[test]
    fn mean_pop_rounds_to_two_decimals() {
        let days = summarize(vec![
            sample("2026-09-01 09:00:00", 10.0, 20.0, 0.1, "mist"),
            sample("2026-09-01 12:00:00", 10.0, 20.0, 0.2, "mist"),
            sample("2026-09-01 15:00:00", 10.0, 20.0, 0.2, "mist"),
        ]);

        // mean is 0.1666..., rounded to 0.17
        assert_eq!(days[0].precip_prob, 0.17);
    }

    #[test]
    fn day_without_conditions_gets_ascii_placeholder() {
        let mut entry = sample("2026-09-01 09:00:00", 10.0, 20.0, 0.0, "unused");
        entry.weather.clear();

        let days = summarize(vec![entry]);
        assert_eq!(days[0].description, "n/a");
    }

    #[test]
    fn days_are_sorted_ascending() {
        let days = summarize(vec![
            sample("2026-09-03 09:00:00", 1.0, 2.0, 0.0, "snow"),
            sample("2026-09-01 09:00:00", 1.0, 2.0, 0.0, "snow"),
            sample("2026-09-02 09:00:00", 1.0, 2.0, 0.0, "snow"),
        ]);

        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2026-09-01", "2026-09-02", "2026-09-03"]);
    }

    #[tokio::test]
    async fn fetch_resolves_and_aggregates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .and(query_param("q", "Lisbon"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "Lisbon", "country": "PT", "lat": 38.7, "lon": -9.1}
            ])))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "city": {"name": "Lisbon", "country": "PT"},
                "list": [
                    {
                        "dt_txt": "2026-09-01 09:00:00",
                        "main": {"temp_min": 17.0, "temp_max": 24.0},
                        "weather": [{"description": "clear sky"}],
                        "pop": 0.05
                    },
                    {
                        "dt_txt": "2026-09-01 12:00:00",
                        "main": {"temp_min": 19.0, "temp_max": 27.0},
                        "weather": [{"description": "clear sky"}],
                        "pop": 0.15
                    }
                ]
            })))
            .mount(&server)
            .await;

        let summary = test_service(server.uri()).fetch("Lisbon").await.unwrap();

        assert_eq!(summary.city, "Lisbon");
        assert_eq!(summary.country.as_deref(), Some("PT"));
        assert_eq!(summary.days.len(), 1);
        assert_eq!(summary.days[0].temp_min_c, 17.0);
        assert_eq!(summary.days[0].temp_max_c, 27.0);
        assert_eq!(summary.days[0].precip_prob, 0.1);
    }

    #[tokio::test]
    async fn unknown_city_is_tool_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geo/1.0/direct"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let err = test_service(server.uri()).fetch("Atlantis").await.unwrap_err();
        assert!(matches!(err, Error::ToolFailure(_)));
        assert!(err.to_string().contains("City not found: Atlantis"));
    }
}
