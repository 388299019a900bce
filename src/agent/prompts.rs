//! Prompt construction for the packing assistant.

use crate::tools::trip::TripType;
use chrono::NaiveDate;

/// System guidance for the model: call both tools exactly once, then emit
/// only the final JSON object.
pub const PACKING_SYSTEM_PROMPT: &str = r#"You are Valise, a travel packing assistant.

Rules:
- You must call BOTH tools exactly once:
  1) fetch_weather(city, startIso, endIso)
  2) trip_context(tripType, days)
- After both results, output ONLY the final JSON object with keys:
{
  "mustHave": [], "clothing": [], "footwear": [], "accessories": [],
  "toiletries": [], "gadgets": [], "documents": [], "optional": [],
  "tips": [], "weather": ""
}

Important:
- The "weather" field must contain the compact forecast string exactly as returned by fetch_weather (City + Daily lines).
- Do NOT write extra commentary or summaries outside JSON."#;

/// Build the initial user message that seeds a run.
///
/// Embeds the trip parameters plus explicit tool-call hints so the model
/// knows what to fetch and with which arguments.
pub fn initial_request(
    city: &str,
    start: NaiveDate,
    end: NaiveDate,
    trip_type: TripType,
    days: i64,
) -> String {
    format!(
        "Create a packing list for my trip.\n\
         City=\"{city}\"\n\
         Dates={start}..{end}\n\
         TripType={trip_type}\n\
         \n\
         If you need weather or trip length, call tools:\n\
         - fetch_weather(city=\"{city}\", startIso=\"{start}\", endIso=\"{end}\")\n\
         - trip_context(tripType=\"{trip_type}\", days={days})"
    )
}

/// Inclusive day count of a trip, e.g. Monday through Wednesday is 3 days.
pub fn trip_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn day_count_is_inclusive() {
        assert_eq!(trip_days(date("2026-09-01"), date("2026-09-01")), 1);
        assert_eq!(trip_days(date("2026-09-01"), date("2026-09-03")), 3);
    }

    #[test]
    fn initial_request_embeds_tool_hints() {
        let msg = initial_request(
            "Lisbon",
            date("2026-09-01"),
            date("2026-09-03"),
            TripType::Beach,
            3,
        );
        assert!(msg.contains("City=\"Lisbon\""));
        assert!(msg.contains("Dates=2026-09-01..2026-09-03"));
        assert!(msg.contains("fetch_weather(city=\"Lisbon\", startIso=\"2026-09-01\", endIso=\"2026-09-03\")"));
        assert!(msg.contains("trip_context(tripType=\"beach\", days=3)"));
    }
}
