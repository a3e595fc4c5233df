//! hb: command-line host for the handball match engine
//!
//! Reads JSON match requests or fixture lists, runs `hb_core`, prints JSON.
//! Logging goes to stderr and follows `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use hb_core::{EngineConfig, Fixture};
use serde_json::json;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hb")]
#[command(about = "Simulate handball matches", version, long_about = None)]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one match request
    Simulate {
        /// Request JSON file, `-` for stdin
        #[arg(long, default_value = "-")]
        request: PathBuf,
    },

    /// Run a list of fixtures in parallel
    Fixtures {
        /// JSON array of fixtures
        #[arg(long)]
        r#in: PathBuf,

        /// YAML engine config (defaults apply when omitted)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print an engine config preset as YAML
    Config {
        #[arg(long, value_enum, default_value = "realistic")]
        preset: Preset,

        /// Half length for the `quick` preset (s)
        #[arg(long, default_value = "300")]
        half: f32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Realistic,
    Arcade,
    Quick,
}

fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn emit(value: &serde_json::Value, pretty: bool) -> Result<()> {
    let text = if pretty { serde_json::to_string_pretty(value)? } else { serde_json::to_string(value)? };
    println!("{text}");
    Ok(())
}

fn run_fixtures(input: &str, config: &EngineConfig) -> Result<serde_json::Value> {
    let fixtures: Vec<Fixture> = serde_json::from_str(input).context("parsing fixtures")?;
    let results = hb_core::simulate_fixtures(&fixtures, config);
    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        tracing::warn!(failed, total = results.len(), "some fixtures could not be simulated");
    }
    let items = results
        .into_iter()
        .map(|r| match r {
            Ok(result) => json!({ "ok": result }),
            Err(e) => json!({ "error": e.to_string() }),
        })
        .collect();
    Ok(serde_json::Value::Array(items))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Simulate { request } => {
            let input = read_input(&request)?;
            let response = hb_core::simulate_match_json(&input).context("simulating match")?;
            let value: serde_json::Value = serde_json::from_str(&response)?;
            emit(&value, cli.pretty)?;
        }

        Commands::Fixtures { r#in, config } => {
            let config = match config {
                Some(path) => EngineConfig::from_yaml_file(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => EngineConfig::default(),
            };
            let input = read_input(&r#in)?;
            emit(&run_fixtures(&input, &config)?, cli.pretty)?;
        }

        Commands::Config { preset, half } => {
            let config = match preset {
                Preset::Realistic => EngineConfig::realistic(),
                Preset::Arcade => EngineConfig::arcade(),
                Preset::Quick => EngineConfig::quick(half),
            };
            config.validate()?;
            print!("{}", config.to_yaml_string()?);
        }
    }

    Ok(())
}
