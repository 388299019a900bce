//! Trip context tool and trip categories.

use crate::error::Result;
use crate::tools::{Tool, ToolResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Trip category used to tailor the packing list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    Business,
    Beach,
    #[default]
    City,
    Hiking,
    Ski,
    Family,
    Romantic,
}

impl TripType {
    /// Parse leniently: unknown categories fall back to `City`.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "business" => TripType::Business,
            "beach" => TripType::Beach,
            "city" => TripType::City,
            "hiking" => TripType::Hiking,
            "ski" => TripType::Ski,
            "family" => TripType::Family,
            "romantic" => TripType::Romantic,
            _ => TripType::City,
        }
    }
}

impl std::fmt::Display for TripType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TripType::Business => "business",
            TripType::Beach => "beach",
            TripType::City => "city",
            TripType::Hiking => "hiking",
            TripType::Ski => "ski",
            TripType::Family => "family",
            TripType::Romantic => "romantic",
        };
        write!(f, "{}", s)
    }
}

/// Arguments for the trip context tool.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TripContextArgs {
    trip_type: String,
    days: i64,
}

/// Tool that hands the model the trip category and length.
pub struct TripContextTool;

/// Tool name as declared to the model.
pub const TRIP_CONTEXT_TOOL: &str = "trip_context";

#[async_trait]
impl Tool for TripContextTool {
    fn name(&self) -> &str {
        TRIP_CONTEXT_TOOL
    }

    fn description(&self) -> &str {
        "Provide the trip type and length so the model tailors the packing list"
    }

    fn parameters_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "tripType": {
                    "type": "string",
                    "description": "Trip category (business, beach, city, hiking, ski, family, romantic)"
                },
                "days": {
                    "type": "integer",
                    "description": "Trip length in days"
                }
            },
            "required": ["tripType", "days"]
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolResult> {
        let args: TripContextArgs = match serde_json::from_value(args) {
            Ok(a) => a,
            Err(e) => {
                return Ok(ToolResult::failure(format!(
                    "Invalid trip_context arguments: {}",
                    e
                )))
            }
        };

        Ok(ToolResult::success(format!(
            "Trip type: {}; Trip length (days): {}",
            args.trip_type, args.days
        )))
    }
}
