//! Symbol-Table Stress Generator Binary
//!
//! Run with: `symtab-stress [OPTIONS] > stress.tl`

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ifjgen::{stress, Config};

#[derive(Parser)]
#[command(name = "symtab-stress")]
#[command(about = "Generate a large source file that loads the compiler's symbol table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Random seed for reproducibility
    #[arg(long, env = "IFJGEN_SEED")]
    seed: Option<u64>,

    /// Number of declared functions
    #[arg(long)]
    functions: Option<usize>,

    /// Number of definition-only stub functions
    #[arg(long)]
    stubs: Option<usize>,

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
    info!(seed, "generating stress source");
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    stress::generate(&mut rng, &config.stress, &mut out).context("Failed to write stress source")?;
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
    if let Some(functions) = cli.functions {
        config.stress.functions = functions;
    }
    if let Some(stubs) = cli.stubs {
        config.stress.stubs = stubs;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}
