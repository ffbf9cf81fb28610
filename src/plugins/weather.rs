//! Current-weather lookup with a short history of recent queries.
//!
//! One HTTP GET per lookup with a fixed timeout and no retry. Only successful
//! lookups are written to the history.

use crate::core::config::WeatherConfig;
use crate::core::error;
use crate::core::output::{format_number, title_case};
use crate::core::store::Store;
use crate::core::validate;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// History file keys match the labels shown to the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherReport {
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Temperature (°C)")]
    pub temperature_c: f64,
    #[serde(rename = "Humidity (%)")]
    pub humidity_pct: u32,
    #[serde(rename = "Sky")]
    pub sky: String,
}

#[derive(Parser, Debug)]
#[clap(name = "weather", about = "Look up the current weather for a city.")]
pub struct WeatherCli {
    #[clap(subcommand)]
    pub command: WeatherCommand,
}

#[derive(Subcommand, Debug)]
pub enum WeatherCommand {
    /// Fetch current conditions for a city.
    Lookup { city: String },
    /// Show the most recent successful lookups.
    History,
}

fn malformed(what: &str) -> error::DeskError {
    error::DeskError::MalformedResponse(format!("missing {}", what))
}

/// Extract a report from the service's JSON payload.
pub fn parse_report(body: &Value) -> Result<WeatherReport, error::DeskError> {
    let city = body["name"].as_str().ok_or_else(|| malformed("name"))?;
    let temperature_c = body["main"]["temp"]
        .as_f64()
        .ok_or_else(|| malformed("main.temp"))?;
    let humidity = &body["main"]["humidity"];
    let humidity_pct = humidity
        .as_u64()
        .or_else(|| humidity.as_f64().filter(|h| *h >= 0.0).map(|h| h.round() as u64))
        .and_then(|h| u32::try_from(h).ok())
        .ok_or_else(|| malformed("main.humidity"))?;
    let description = body["weather"][0]["description"]
        .as_str()
        .ok_or_else(|| malformed("weather[0].description"))?;

    Ok(WeatherReport {
        city: city.to_string(),
        temperature_c,
        humidity_pct,
        sky: title_case(description),
    })
}

pub fn fetch_weather(config: &WeatherConfig, city: &str) -> Result<WeatherReport, error::DeskError> {
    let city = validate::require_non_empty("city", city)?;
    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| {
            error::DeskError::ConfigError(
                "weather API key not configured (set weather.api_key or POCKETDESK_WEATHER_API_KEY)"
                    .to_string(),
            )
        })?;

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| error::DeskError::ServiceUnavailable(e.to_string()))?;

    log::debug!("GET {} q={}", config.api_url, city);
    let response = client
        .get(&config.api_url)
        .query(&[("q", city.as_str()), ("appid", api_key), ("units", "metric")])
        .send()
        .map_err(|e| {
            if e.is_timeout() {
                error::DeskError::ServiceUnavailable(format!(
                    "request timed out after {}s",
                    config.timeout_secs
                ))
            } else {
                error::DeskError::ServiceUnavailable(e.to_string())
            }
        })?;

    let status = response.status();
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(error::DeskError::CityNotFound(city));
    }
    if !status.is_success() {
        return Err(error::DeskError::HttpStatus(status.as_u16()));
    }

    let body: Value = response
        .json()
        .map_err(|e| error::DeskError::MalformedResponse(e.to_string()))?;
    parse_report(&body)
}

/// Put `report` at the front of the history, keeping at most `limit` entries.
pub fn record_lookup(
    store: &Store,
    report: &WeatherReport,
    limit: usize,
) -> Result<Vec<WeatherReport>, error::DeskError> {
    let history_store = store.weather_history();
    let mut history = history_store.load()?;
    history.insert(0, report.clone());
    history.truncate(limit.max(1));
    history_store.save(&history)?;
    Ok(history)
}

pub fn load_history(store: &Store) -> Result<Vec<WeatherReport>, error::DeskError> {
    store.weather_history().load()
}

pub fn run_weather_cli(
    store: &Store,
    config: &WeatherConfig,
    cli: WeatherCli,
) -> Result<(), error::DeskError> {
    match cli.command {
        WeatherCommand::Lookup { city } => {
            let report = fetch_weather(config, &city)?;
            println!("Weather Report:");
            println!("City: {}", report.city);
            println!("Temperature (°C): {}", format_number(report.temperature_c));
            println!("Humidity (%): {}", report.humidity_pct);
            println!("Sky: {}", report.sky);
            record_lookup(store, &report, config.history_limit)?;
        }
        WeatherCommand::History => {
            let history = load_history(store)?;
            if history.is_empty() {
                println!("No history yet.");
            } else {
                println!("Last {} Queries:", history.len());
                for entry in history {
                    println!(
                        "{} - {}°C, {}",
                        entry.city,
                        format_number(entry.temperature_c),
                        entry.sky
                    );
                }
            }
        }
    }
    Ok(())
}

pub fn schema() -> serde_json::Value {
    serde_json::json!({
        "name": "weather",
        "version": "0.1.0",
        "description": "Weather lookup with recent history",
        "commands": [
            { "name": "lookup", "parameters": ["city"] },
            { "name": "history" }
        ],
        "storage": ["weather_history.json"]
    })
}
