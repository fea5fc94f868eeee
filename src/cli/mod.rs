//! CLI command handling

use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::parsers::{InputFormat, SourceRegistry};
use crate::services::report::{self, MAX_PRECISION};
use crate::services::OrderAggregator;
use crate::types::Order;

/// Environment variable holding a tracing filter directive
pub const LOG_ENV: &str = "ORDERSTATS_LOG";

/// Descriptive statistics over e-commerce order exports
#[derive(Parser)]
#[command(name = "orderstats")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the seven summary metrics
    Stats(InputArgs),

    /// Show per-order totals
    Orders(InputArgs),
}

#[derive(Args, Debug, PartialEq)]
struct InputArgs {
    /// Order export file (.csv rows or .json orders)
    path: PathBuf,

    /// Input format (default: from file extension)
    #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
    format: InputFormat,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Decimals for monetary values in text output
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=MAX_PRECISION as i64))]
    precision: u8,
}

impl Cli {
    /// Install the stderr log subscriber
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_level(self.verbose)));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }

    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Stats(args) => run_stats(&args),
            Commands::Orders(args) => run_orders(&args),
        }
    }
}

fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Load validated orders for the given input arguments
fn load_orders(path: &Path, format: InputFormat) -> anyhow::Result<Vec<Order>> {
    let registry = SourceRegistry::new();
    let orders = registry.load(path, format)?;
    info!("Read {} orders from {}", orders.len(), path.display());
    Ok(orders)
}

/// Output the summary metrics
fn run_stats(args: &InputArgs) -> anyhow::Result<()> {
    let orders = load_orders(&args.path, args.format)?;
    let metrics = OrderAggregator::aggregate(&orders);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&metrics)?);
    } else {
        print!("{}", report::render_metrics(&metrics, args.precision as usize));
    }
    Ok(())
}

/// Output per-order totals
fn run_orders(args: &InputArgs) -> anyhow::Result<()> {
    let orders = load_orders(&args.path, args.format)?;
    let totals = OrderAggregator::per_order(&orders);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&totals)?);
    } else {
        print!("{}", report::render_order_totals(&totals, args.precision as usize));
    }
    Ok(())
}
