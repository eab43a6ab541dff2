//! Expression Generator Binary
//!
//! Run with: `expr-gen [OPTIONS]`
//!
//! Prints a random arithmetic expression on the first line and its value as
//! an exact hexadecimal float on the second.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ifjgen::{expr, Config};

#[derive(Parser)]
#[command(name = "expr-gen")]
#[command(about = "Generate a random arithmetic expression and its exact value")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Random seed for reproducibility
    #[arg(long, env = "IFJGEN_SEED")]
    seed: Option<u64>,

    /// Length at which remaining non-terminals are forced to literals
    #[arg(long)]
    max_length: Option<usize>,

    /// Configuration file path (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    if let Some(Commands::Config) = cli.command {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let seed = cli.seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    info!(seed, "generating expression");
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let sample = expr::generate(&mut rng, &config.expr).context("Failed to generate expression")?;
    debug!(
        length = sample.text.len(),
        substitutions = sample.stats.substitutions,
        forced = sample.stats.forced,
        rejected = sample.rejected,
        "expression ready"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    sample.write_to(&mut out).context("Failed to write expression")?;
    out.flush().context("Failed to flush stdout")?;

    Ok(())
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::load(config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path.display()))?
    } else {
        Config::default()
    };

    // Override with CLI options
    if let Some(max_length) = cli.max_length {
        config.expr.max_length = max_length;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
