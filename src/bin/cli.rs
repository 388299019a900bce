//! Valise CLI
//!
//! Collects the trip parameters from the operator, runs one orchestration
//! pass, and prints the packing list JSON to stdout.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use std::sync::Arc;
use tracing::info;
use valise::agent::{prompts, OllamaClient, Orchestrator, OrchestratorConfig};
use valise::config::Config;
use valise::tools::{ToolRegistry, TripContextTool, TripType, WeatherTool};
use valise::weather::WeatherService;
use valise::{Error, Result, VERSION};

/// Exit status when a required credential is missing
const EXIT_MISSING_CREDENTIAL: i32 = 2;

#[derive(Parser)]
#[command(
    name = "valise",
    author = "Valise Contributors",
    version = VERSION,
    about = "Valise - LLM travel packing assistant",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a packing list for a trip (default)
    Plan {
        /// Destination city
        #[arg(long)]
        city: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Trip category: business, beach, city, hiking, ski, family, romantic
        #[arg(long)]
        trip_type: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("valise=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env().and_then(|c| {
        c.validate()?;
        Ok(c)
    }) {
        Ok(config) => config,
        Err(Error::Config(msg)) => {
            eprintln!("{} {}", style("Configuration error:").red().bold(), msg);
            eprintln!("Set OPENWEATHER_API_KEY in the environment or a .env file.");
            std::process::exit(EXIT_MISSING_CREDENTIAL);
        }
        Err(e) => return Err(e),
    };

    match cli.command {
        Some(Commands::Plan {
            city,
            start,
            end,
            trip_type,
        }) => plan(config, city, start, end, trip_type).await,
        None => plan(config, None, None, None, None).await,
    }
}

async fn plan(
    config: Config,
    city: Option<String>,
    start: Option<String>,
    end: Option<String>,
    trip_type: Option<String>,
) -> Result<()> {
    println!("{}", style("== Valise Travel Packing Assistant ==").bold());

    let theme = ColorfulTheme::default();

    let city = match city {
        Some(c) => c,
        None => Input::with_theme(&theme)
            .with_prompt("City (e.g., Lisbon)")
            .interact_text()
            .map_err(|e| Error::InvalidInput(e.to_string()))?,
    };
    let city = city.trim().to_string();

    let start = read_date(&theme, "Start date (YYYY-MM-DD)", start)?;
    let end = read_date(&theme, "End date   (YYYY-MM-DD)", end)?;
    if end < start {
        return Err(Error::InvalidInput(format!(
            "End date {} is before start date {}",
            end, start
        )));
    }

    let trip_type = match trip_type {
        Some(t) => t,
        None => Input::with_theme(&theme)
            .with_prompt("Trip type [business|beach|city|hiking|ski|family|romantic]")
            .default("city".to_string())
            .interact_text()
            .map_err(|e| Error::InvalidInput(e.to_string()))?,
    };
    let trip_type = TripType::parse_lenient(&trip_type);

    let days = prompts::trip_days(start, end);
    info!(
        "Planning {} trip to {} ({} days)",
        trip_type, city, days
    );

    // Wire up the run: weather service behind its tool, both tools in the
    // registry, the Ollama client behind the model boundary.
    let weather_service = WeatherService::new(config.weather)?;
    let mut registry = ToolRegistry::new();
    registry.register(WeatherTool::new(weather_service));
    registry.register(TripContextTool);

    let model = Arc::new(OllamaClient::new(config.model)?);
    let orchestrator = Orchestrator::new(
        model,
        Arc::new(registry),
        OrchestratorConfig::packing(config.agent.max_reasks),
    );

    let seed = prompts::initial_request(&city, start, end, trip_type, days);
    let report = orchestrator.run(seed).await?;

    println!("\n--- PACKING LIST (JSON) ---");
    println!("{}", report.answer);

    Ok(())
}

fn read_date(theme: &ColorfulTheme, prompt: &str, preset: Option<String>) -> Result<NaiveDate> {
    let raw = match preset {
        Some(v) => v,
        None => Input::with_theme(theme)
            .with_prompt(prompt)
            .validate_with(|input: &String| {
                NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
                    .map(|_| ())
                    .map_err(|_| "expected YYYY-MM-DD")
            })
            .interact_text()
            .map_err(|e| Error::InvalidInput(e.to_string()))?,
    };

    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| Error::InvalidInput(format!("Invalid date '{}': {}", raw.trim(), e)))
}
