//! Weather lookup tool.

use crate::error::Result;
use crate::tools::{Tool, ToolResult};
use crate::weather::{WeatherService, WeatherSummary};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write as _;
use tracing::debug;

/// Tool name as declared to the model.
pub const FETCH_WEATHER_TOOL: &str = "fetch_weather";

/// Arguments for the weather tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeatherArgs {
    city: String,
    start_iso: String,
    end_iso: String,
}

/// Tool that fetches a multi-day forecast digest for packing decisions.
pub struct WeatherTool {
    service: WeatherService,
}

impl WeatherTool {
    pub fn new(service: WeatherService) -> Self {
        WeatherTool { service }
    }
}

/// Render a summary as the compact, model-friendly digest: one header line
/// then one line per day.
pub fn render_digest(summary: &WeatherSummary) -> String {
    let mut digest = format!(
        "City: {} {}\nDaily:",
        summary.city,
        summary.country.as_deref().unwrap_or("")
    );
    for day in &summary.days {
        let _ = write!(
            digest,
            "\n- {}: min {}°C, max {}°C, rainProb {}, {}",
            day.date, day.temp_min_c, day.temp_max_c, day.precip_prob, day.description
        );
    }
    digest
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        FETCH_WEATHER_TOOL
    }

    fn description(&self) -> &str {
        "Get a concise multi-day weather summary for packing decisions"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "city": {
                    "type": "string",
                    "description": "Destination city name"
                },
                "startIso": {
                    "type": "string",
                    "description": "Start date (YYYY-MM-DD)"
                },
                "endIso": {
                    "type": "string",
                    "description": "End date (YYYY-MM-DD)"
                }
            },
            "required": ["city", "startIso", "endIso"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let args: WeatherArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => {
                return Ok(ToolResult::failure(format!(
                    "Invalid fetch_weather arguments: {}",
                    e
                )))
            }
        };

        debug!(
            "Weather requested for {} ({}..{})",
            args.city, args.start_iso, args.end_iso
        );

        match self.service.fetch(&args.city).await {
            Ok(summary) => Ok(ToolResult::success(render_digest(&summary))),
            Err(e) => Ok(ToolResult::failure(e.to_string())),
        }
    }
}
