use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use project_pairing::{
    load_preferences, parse_preferences, render, render_unpaired, to_json, Optimizer,
    PairingConfig, PreferenceMap,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "project-pairing")]
#[command(version)]
#[command(about = "Pair teams onto the project structures they prefer")]
#[command(
    long_about = "Reads one team per line: a team name followed by the structures it prefers.\n\nRuns many randomized greedy pairing trials and prints the assignment that covers the most teams, then the most structures."
)]
struct Cli {
    /// Preference file, or `-` for stdin
    #[arg(default_value = "projecttopics.txt")]
    input: PathBuf,

    /// Number of randomized trials (overrides --config)
    #[arg(short, long)]
    trials: Option<usize>,

    /// Seed for reproducible runs (overrides --config)
    #[arg(short, long)]
    seed: Option<u64>,

    /// JSON config file with `trials` and `seed`
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Also list teams left without a partner
    #[arg(long)]
    show_unpaired: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the report
    let filter = if cli.verbose {
        EnvFilter::new("project_pairing=debug,info")
    } else {
        EnvFilter::new("project_pairing=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let config = resolve_config(&cli)?;
    let preferences = read_input(&cli.input)?;

    let report = Optimizer::new(config).optimize(&preferences);
    let unpaired = report.best.unpaired_teams(&preferences);

    match cli.format {
        OutputFormat::Text => {
            print!("{}", render(&report.best));
            if cli.show_unpaired {
                print!("{}", render_unpaired(&unpaired));
            }
        }
        OutputFormat::Json => {
            let unpaired = cli.show_unpaired.then_some(unpaired.as_slice());
            let json = to_json(&report, unpaired).context("Failed to serialize report")?;
            println!("{json}");
        }
    }

    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<PairingConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            PairingConfig::from_json(&text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => PairingConfig::default(),
    };

    if let Some(trials) = cli.trials {
        config.trials = trials;
    }
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    Ok(config)
}

fn read_input(input: &Path) -> Result<PreferenceMap> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read preferences from stdin")?;
        Ok(parse_preferences(&text))
    } else {
        Ok(load_preferences(input)?)
    }
}
