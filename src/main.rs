use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use collatz_delay::{
    Convention, DelaySearcher, ResidueExceptionTable, SearchConfig, SearchReport, Strategy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "collatz-delay",
    about = "Construct small integers that take a chosen number of Collatz steps to reach 1"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// How odd steps are counted.
    #[arg(long, value_enum, default_value_t = ConventionArg::Accelerated, global = true)]
    convention: ConventionArg,

    /// Skip the forward re-check of the result.
    #[arg(long, global = true)]
    no_verify: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Single-path greedy construction (fast, least compact).
    Greedy {
        /// Number of steps the result must take to reach 1.
        #[arg(long)]
        delay: usize,
        /// Residue exception table.
        #[arg(long, value_enum, default_value_t = TableArg::Mod729)]
        table: TableArg,
        /// Custom table modulus (a power of 3), replacing --table.
        #[arg(long, requires = "residues", conflicts_with = "table")]
        modulus: Option<u32>,
        /// Residues vetoed by the custom table, comma separated.
        #[arg(long, value_delimiter = ',', requires = "modulus")]
        residues: Vec<u32>,
    },
    /// Lookahead beam search over a window of 2^N candidates.
    Beam {
        /// Number of steps the result must take to reach 1.
        #[arg(long)]
        delay: usize,
        /// Lookahead depth N (requires N + 4 < delay).
        #[arg(long, short = 'n', default_value_t = 17)]
        lookahead: u32,
    },
    /// Capped-pool search keeping the smallest candidates.
    Pool {
        /// Number of steps the result must take to reach 1.
        #[arg(long)]
        delay: usize,
        /// Maximum candidates carried between steps.
        #[arg(long, default_value_t = 1_000_000)]
        paths: usize,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ConventionArg {
    /// Odd n → (3n+1)/2 is one step.
    Accelerated,
    /// Odd n → 3n+1 is one step.
    Standard,
}

impl From<ConventionArg> for Convention {
    fn from(arg: ConventionArg) -> Self {
        match arg {
            ConventionArg::Accelerated => Convention::Accelerated,
            ConventionArg::Standard => Convention::Standard,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TableArg {
    /// Never veto DECREASE.
    #[value(name = "none")]
    Empty,
    #[value(name = "27")]
    Mod27,
    #[value(name = "81")]
    Mod81,
    #[value(name = "243")]
    Mod243,
    #[value(name = "729")]
    Mod729,
}

impl From<TableArg> for ResidueExceptionTable {
    fn from(arg: TableArg) -> Self {
        match arg {
            TableArg::Empty => ResidueExceptionTable::empty(),
            TableArg::Mod27 => ResidueExceptionTable::mod_27(),
            TableArg::Mod81 => ResidueExceptionTable::mod_81(),
            TableArg::Mod243 => ResidueExceptionTable::mod_243(),
            TableArg::Mod729 => ResidueExceptionTable::mod_729(),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match cli.command {
        Commands::Greedy {
            delay,
            modulus: Some(modulus),
            residues,
            ..
        } => SearchConfig::greedy_with_residues(delay, modulus, residues)
            .context("invalid --residues table")?,
        Commands::Greedy { delay, table, .. } => SearchConfig {
            strategy: Strategy::Greedy {
                table: table.into(),
            },
            ..SearchConfig::greedy(delay)
        },
        Commands::Beam { delay, lookahead } => SearchConfig::beam(delay, lookahead),
        Commands::Pool { delay, paths } => SearchConfig::pool(delay, paths),
    }
    .with_convention(cli.convention.into());
    config.verify = !cli.no_verify;

    let report = DelaySearcher::new(config.clone())
        .run()
        .with_context(|| {
            format!(
                "{} search failed for delay {}",
                config.strategy.name(),
                config.delay
            )
        })?;

    print_report(&report);
    Ok(())
}

fn print_report(report: &SearchReport) {
    println!("{}", report.construction.value());
    println!("ups = {}", report.ups());
    println!("downs = {}", report.downs());
    if let Some(stats) = &report.stats {
        println!(
            "window = {}\tpeak_bits = {}\tfewest_live = {}\telapsed = {:.3}s",
            stats.width,
            stats.peak_bits,
            stats.fewest_live,
            report.elapsed.as_secs_f64()
        );
    }
}
