//! Sensorlog CLI
//!
//! Command-line client for the Sensorlog API:
//! - Record readings
//! - List a device's readings
//! - Query max / median / mean / quartiles
//! - Print the per-device summary

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sensorlog")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Record and query sensor readings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:5000", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

/// Filter options shared by the read commands
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    /// Sensor type (temperature, humidity)
    #[arg(short = 't', long = "type")]
    pub sensor_type: Option<String>,
    /// Inclusive start (epoch seconds)
    #[arg(long)]
    pub start: Option<i64>,
    /// Inclusive end (epoch seconds)
    #[arg(long)]
    pub end: Option<i64>,
}

impl FilterArgs {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(t) = &self.sensor_type {
            params.push(("type", t.clone()));
        }
        if let Some(start) = self.start {
            params.push(("start", start.to_string()));
        }
        if let Some(end) = self.end {
            params.push(("end", end.to_string()));
        }
        params
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record a reading
    Record {
        /// Device UUID
        device: String,
        /// Sensor type (temperature, humidity)
        sensor_type: String,
        /// Value (0-100)
        value: i64,
        /// Epoch seconds (default: now)
        #[arg(long)]
        time: Option<i64>,
    },

    /// List a device's readings
    List {
        device: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Maximum reading value
    Max {
        device: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Median reading value
    Median {
        device: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Mean reading value
    Mean {
        device: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// First and third quartile
    Quartiles {
        device: String,
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Per-device summary across all devices
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = format!("{}/api/v1", cli.api_url.trim_end_matches('/'));

    match cli.command {
        Commands::Record {
            device,
            sensor_type,
            value,
            time,
        } => {
            let body = serde_json::json!({
                "type": sensor_type,
                "value": value,
                "date_created": time.unwrap_or_else(|| Utc::now().timestamp()),
            });

            let response = client
                .post(format!("{}/devices/{}/readings", api, device))
                .json(&body)
                .send()
                .await
                .with_context(|| format!("Cannot connect to Sensorlog API at {}", cli.api_url))?;

            let reading = expect_json(response).await?;
            println!(
                "Recorded {} {} = {} at {}",
                device,
                reading["type"].as_str().unwrap_or("-"),
                reading["value"],
                format_timestamp(reading["date_created"].as_i64().unwrap_or(0))
            );
        }

        Commands::List { device, filter } => {
            let data = get(&client, &format!("{}/devices/{}/readings", api, device), &filter).await?;
            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&data)?),
                _ => print_readings(&data),
            }
        }

        Commands::Max { device, filter } => {
            print_stat(&client, &api, &device, "max", &filter, &cli.format).await?
        }
        Commands::Median { device, filter } => {
            print_stat(&client, &api, &device, "median", &filter, &cli.format).await?
        }
        Commands::Mean { device, filter } => {
            print_stat(&client, &api, &device, "mean", &filter, &cli.format).await?
        }

        Commands::Quartiles { device, filter } => {
            let url = format!("{}/devices/{}/readings/quartiles", api, device);
            let data = get(&client, &url, &filter).await?;
            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&data)?),
                _ => println!(
                    "Q1: {}\nQ3: {}",
                    data["quartile_1"], data["quartile_3"]
                ),
            }
        }

        Commands::Summary { filter } => {
            let data = get(&client, &format!("{}/devices/summary", api), &filter).await?;
            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&data)?),
                _ => print_summary(&data),
            }
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.api_url.trim_end_matches('/')))
                .send()
                .await
                .with_context(|| format!("Cannot connect to Sensorlog API at {}", cli.api_url))?;
            let health = expect_json(response).await?;

            println!("Sensorlog v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));
            if let Some(readings) = health["readings"].as_u64() {
                println!("Readings: {}", readings);
            }
            if let Some(uptime) = health["uptime_seconds"].as_u64() {
                println!("Uptime: {}", format_duration(uptime));
            }
        }

        Commands::Config { output } => {
            let config = sensorlog::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

async fn get(
    client: &reqwest::Client,
    url: &str,
    filter: &FilterArgs,
) -> Result<serde_json::Value> {
    let response = client
        .get(url)
        .query(&filter.query())
        .send()
        .await
        .with_context(|| format!("Cannot connect to {}", url))?;
    expect_json(response).await
}

async fn expect_json(response: reqwest::Response) -> Result<serde_json::Value> {
    let status = response.status();
    let data: serde_json::Value = response.json().await.unwrap_or_default();

    if !status.is_success() {
        let message = data["error"]["message"].as_str().unwrap_or("unknown error");
        bail!("Request failed ({}): {}", status, message);
    }
    Ok(data)
}

async fn print_stat(
    client: &reqwest::Client,
    api: &str,
    device: &str,
    stat: &str,
    filter: &FilterArgs,
    format: &str,
) -> Result<()> {
    let url = format!("{}/devices/{}/readings/{}", api, device, stat);
    let data = get(client, &url, filter).await?;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&data)?),
        _ => println!("{}: {}", stat, data["value"]),
    }
    Ok(())
}

fn print_readings(data: &serde_json::Value) {
    let rows = match data.as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            println!("No readings");
            return;
        }
    };

    println!("{:<22} {:<12} {:>5}", "Date", "Type", "Value");
    println!("{}", "-".repeat(41));
    for row in rows {
        println!(
            "{:<22} {:<12} {:>5}",
            format_timestamp(row["date_created"].as_i64().unwrap_or(0)),
            row["type"].as_str().unwrap_or("-"),
            row["value"]
        );
    }
}

fn print_summary(data: &serde_json::Value) {
    let rows = match data.as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            println!("No readings");
            return;
        }
    };

    println!(
        "{:<24} {:>6} {:>6} {:>8} {:>8} {:>8} {:>8}",
        "Device", "Count", "Max", "Median", "Mean", "Q1", "Q3"
    );
    println!("{}", "-".repeat(74));
    for row in rows {
        let f = |key: &str| {
            row[key]
                .as_f64()
                .map(|v| format!("{:.2}", v))
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "{:<24} {:>6} {:>6} {:>8} {:>8} {:>8} {:>8}",
            row["device_uuid"].as_str().unwrap_or("-"),
            row["number_of_readings"],
            row["max_reading_value"],
            f("median_reading_value"),
            f("mean_reading_value"),
            f("quartile_1_value"),
            f("quartile_3_value"),
        );
    }
}

fn format_timestamp(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
