//! PlantPulse CLI - Main entry point

mod demo;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pulse_foundation::{PulseSettings, ResponseCache};
use pulse_orchestrator::Orchestrator;
use pulse_tool::ToolRegistry;

/// PlantPulse - plant-floor query core
#[derive(Parser, Debug)]
#[command(name = "pulse")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to a JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered tools
    Tools,

    /// Invoke a tool against the demo plant
    Invoke {
        /// Tool name, e.g. asset_lookup
        tool: String,

        /// Tool parameters as a JSON object
        #[arg(short, long, default_value = "{}")]
        params: String,

        /// Caller identity (part of the cache key)
        #[arg(long, default_value = "cli")]
        caller: String,

        /// Bypass the cache and repopulate it
        #[arg(long)]
        force_refresh: bool,
    },

    /// Run a scripted sequence showing cache behavior
    Demo,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.debug);

    let settings = match &args.config {
        Some(path) => PulseSettings::load_from(path).context("loading settings")?,
        None => PulseSettings::default(),
    };
    let orchestrator = build_orchestrator(settings)?;

    match args.command {
        Command::Tools => {
            for def in orchestrator.registry().list() {
                println!("{:<20} tier={:<7} {}", def.name, def.cache_tier.to_string(), def.description);
            }
        }
        Command::Invoke {
            tool,
            params,
            caller,
            force_refresh,
        } => {
            let params: serde_json::Value =
                serde_json::from_str(&params).context("parsing --params as JSON")?;
            let result = orchestrator.invoke(&tool, params, &caller, force_refresh).await;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Demo => run_demo(&orchestrator).await?,
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn build_orchestrator(settings: PulseSettings) -> anyhow::Result<Orchestrator> {
    let registry = ToolRegistry::with_builtins().context("registering builtin tools")?;
    let cache = Arc::new(ResponseCache::new(&settings.cache));
    let data = Arc::new(demo::demo_source());
    Ok(Orchestrator::new(registry, cache, data, settings))
}

/// Two identical lookups (miss then hit), a forced refresh, an unknown
/// tool, then the cache statistics.
async fn run_demo(orchestrator: &Orchestrator) -> anyhow::Result<()> {
    let params = serde_json::json!({"name": "grinder 5"});

    let first = orchestrator.invoke("asset_lookup", params.clone(), "demo", false).await;
    println!("first call:  from_cache={} - {}", first.from_cache, first.message);

    let second = orchestrator.invoke("asset_lookup", params.clone(), "demo", false).await;
    println!("second call: from_cache={} - {}", second.from_cache, second.message);

    let forced = orchestrator.invoke("asset_lookup", params, "demo", true).await;
    println!("forced call: from_cache={} - {}", forced.from_cache, forced.message);

    let unknown = orchestrator.invoke("oee_report", serde_json::json!({}), "demo", false).await;
    println!("unknown:     {}", unknown.message);

    println!("{}", serde_json::to_string_pretty(&orchestrator.stats())?);
    Ok(())
}
