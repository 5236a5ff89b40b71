//! Cube Gateway CLI
//!
//! Command-line interface for a running gateway:
//! - Discover cubes and sample values
//! - Run queries
//! - Check status
//! - Generate a config file

use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cube-gateway-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Query a Cube semantic layer through the gateway")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Gateway URL
    #[arg(long, default_value = "http://localhost:3333", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show cubes, measures, dimensions and sample values
    Meta,

    /// Run a query
    Query {
        /// Measures to select (comma-separated or multiple args)
        #[arg(required = true)]
        measures: Vec<String>,
        /// Dimensions to group by
        #[arg(short, long)]
        dimensions: Vec<String>,
        /// Time dimension to filter on (requires --from and --to)
        #[arg(short, long)]
        time_dimension: Option<String>,
        /// Start of the date range (e.g., 2024-01-01)
        #[arg(long)]
        from: Option<String>,
        /// End of the date range (e.g., 2024-01-31)
        #[arg(long)]
        to: Option<String>,
        /// Maximum number of rows
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// List available tools
    Tools,

    /// Show gateway status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let json_output = cli.format.eq_ignore_ascii_case("json");

    match cli.command {
        Commands::Meta => {
            let response = client
                .post(format!("{}/api/v1/tools/get_cube_meta", cli.api_url))
                .send()
                .await?;
            let body: Value = response.json().await?;

            if let Some(error) = body.get("error").and_then(|e| e.as_str()) {
                eprintln!("Discovery failed: {}", error);
                std::process::exit(1);
            }

            if json_output {
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                print_meta(&body);
            }
        }

        Commands::Query {
            measures,
            dimensions,
            time_dimension,
            from,
            to,
            limit,
        } => {
            let measures = split_list(&measures);
            let dimensions = split_list(&dimensions);

            let date_range = match (from, to) {
                (Some(from), Some(to)) => Some(vec![from, to]),
                (None, None) => None,
                _ => {
                    eprintln!("--from and --to must be given together");
                    std::process::exit(1);
                }
            };

            let body = serde_json::json!({
                "measures": measures,
                "dimensions": dimensions,
                "time_dimension": time_dimension,
                "date_range": date_range,
                "limit": limit,
            });

            let response = client
                .post(format!("{}/api/v1/tools/run_cube_query", cli.api_url))
                .json(&body)
                .send()
                .await?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Query failed ({}): {}", status, text);
                std::process::exit(1);
            }

            let rows: Value = response.json().await?;
            if json_output {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_rows(&rows);
            }
        }

        Commands::Tools => {
            let response = client
                .get(format!("{}/api/v1/tools", cli.api_url))
                .send()
                .await?;
            let body: Value = response.json().await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                for tool in body["tools"].as_array().into_iter().flatten() {
                    println!("{}", tool["name"].as_str().unwrap_or("?"));
                    println!("  {}", tool["description"].as_str().unwrap_or(""));
                    for param in tool["parameters"].as_array().into_iter().flatten() {
                        let required = if param["required"].as_bool().unwrap_or(false) {
                            " (required)"
                        } else {
                            ""
                        };
                        println!(
                            "  --{} <{}>{}  {}",
                            param["name"].as_str().unwrap_or("?"),
                            param["type"].as_str().unwrap_or("?"),
                            required,
                            param["description"].as_str().unwrap_or("")
                        );
                    }
                }
            }
        }

        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await?;
            let body: Value = response.json().await?;

            if json_output {
                println!("{}", serde_json::to_string_pretty(&body)?);
            } else {
                println!("Status:  {}", body["status"].as_str().unwrap_or("unknown"));
                println!("Cube:    {}", body["backend"].as_str().unwrap_or("unknown"));
                println!("Version: {}", body["version"].as_str().unwrap_or("unknown"));
                println!(
                    "Uptime:  {}",
                    format_duration(body["uptime_seconds"].as_u64().unwrap_or(0))
                );
            }
        }

        Commands::Config { output } => {
            let content = cube_gateway::config::generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

/// Flatten comma-separated arguments
fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn format_duration(seconds: u64) -> String {
    let days = seconds / 86400;
    let hours = (seconds % 86400) / 3600;
    let minutes = (seconds % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m {}s", minutes, seconds % 60)
    }
}

fn print_meta(body: &Value) {
    for cube in body["cubes"].as_array().into_iter().flatten() {
        println!(
            "{}  {}",
            cube["name"].as_str().unwrap_or("?"),
            cube["title"].as_str().unwrap_or("")
        );

        println!("  measures:");
        for measure in cube["measures"].as_array().into_iter().flatten() {
            println!(
                "    {:<40} {}",
                measure["name"].as_str().unwrap_or("?"),
                measure["type"].as_str().unwrap_or("")
            );
        }

        println!("  dimensions:");
        for dim in cube["dimensions"].as_array().into_iter().flatten() {
            let samples: Vec<String> = dim["sample_values"]
                .as_array()
                .into_iter()
                .flatten()
                .map(cell)
                .collect();
            let samples = if samples.is_empty() {
                String::new()
            } else {
                format!("  e.g. {}", samples.join(", "))
            };
            println!(
                "    {:<40} {:<8}{}",
                dim["name"].as_str().unwrap_or("?"),
                dim["type"].as_str().unwrap_or(""),
                samples
            );
        }
        println!();
    }
}

fn print_rows(rows: &Value) {
    let rows = match rows.as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            println!("No rows returned.");
            return;
        }
    };

    let columns: Vec<String> = rows[0]
        .as_object()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default();

    let widths: Vec<usize> = columns
        .iter()
        .map(|col| {
            rows.iter()
                .map(|row| cell(&row[col]).len())
                .chain(std::iter::once(col.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(col, w)| format!("{:<w$}", col, w = w))
        .collect();
    println!("{}", header.join("  "));
    println!("{}", "-".repeat(header.join("  ").len()));

    for row in rows {
        let line: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(col, w)| format!("{:<w$}", cell(&row[col]), w = w))
            .collect();
        println!("{}", line.join("  "));
    }

    println!("\n{} rows", rows.len());
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
