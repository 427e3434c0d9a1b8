//! Command line front end: seed inventories and plan truck loads.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use u_fleetpack::ga::{OverduePolicy, SearchConfig, SearchRunner};
use u_fleetpack::io::{generate_catalog, load_catalog, save_catalog, LoadPlan};
use u_fleetpack::model::Fleet;

#[derive(Parser)]
#[command(name = "fleetpack")]
#[command(about = "Plans which packages go on which truck today", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Writes a synthetic inventory CSV.
    Seed(SeedArgs),
    /// Searches for the most profitable load plan.
    Solve(SolveArgs),
}

#[derive(Args)]
struct SeedArgs {
    /// Number of packages to generate.
    #[arg(long, default_value_t = 100)]
    count: u64,

    /// Target CSV file, overwritten if present.
    #[arg(long, default_value = "lagerstatus.csv")]
    output: PathBuf,

    /// Random seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OverdueArg {
    /// Penalize only overdue packages that are loaded.
    Assigned,
    /// Penalize every overdue package.
    All,
}

impl From<OverdueArg> for OverduePolicy {
    fn from(arg: OverdueArg) -> Self {
        match arg {
            OverdueArg::Assigned => OverduePolicy::AssignedOnly,
            OverdueArg::All => OverduePolicy::AllOverdue,
        }
    }
}

#[derive(Args)]
struct SolveArgs {
    /// Inventory CSV (package_id, weight, profit, deadline_offset).
    #[arg(long, default_value = "lagerstatus.csv")]
    input: PathBuf,

    /// Number of trucks.
    #[arg(long, default_value_t = 10)]
    carriers: usize,

    /// Capacity of each truck.
    #[arg(long, default_value_t = 800.0)]
    capacity: f64,

    /// Genomes per generation.
    #[arg(long, default_value_t = 100)]
    population: usize,

    /// Stagnant generations before stopping.
    #[arg(long, default_value_t = 1000)]
    repetition_limit: usize,

    /// Minimum growth per stagnant generation.
    #[arg(long, default_value_t = 0.01)]
    minimum_growth: f64,

    /// Time budget in minutes.
    #[arg(long, default_value_t = 60)]
    max_minutes: u64,

    /// Random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Which overdue packages pay the lateness penalty.
    #[arg(long, value_enum, default_value_t = OverdueArg::Assigned)]
    overdue_policy: OverdueArg,

    /// Directory for delivery manifests.
    #[arg(long, default_value = "deliveries")]
    output_dir: PathBuf,

    /// Score genomes on all cores.
    #[arg(long)]
    parallel: bool,

    /// Suppress progress reports.
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match Cli::parse().command {
        Commands::Seed(args) => seed(args),
        Commands::Solve(args) => solve(args),
    }
}

fn seed(args: SeedArgs) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(args.seed.unwrap_or_else(rand::random));
    let catalog = generate_catalog(args.count, &mut rng)?;
    save_catalog(&args.output, &catalog)
        .with_context(|| format!("writing {}", args.output.display()))?;
    println!("{} packages written to {}", catalog.len(), args.output.display());
    Ok(())
}

fn solve(args: SolveArgs) -> Result<()> {
    if args.max_minutes == 0 {
        bail!("--max-minutes must be at least 1");
    }

    let catalog = load_catalog(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let fleet = Fleet::uniform(args.carriers, args.capacity)?;

    let mut config = SearchConfig::default()
        .with_population_size(args.population)
        .with_repetition_limit(args.repetition_limit)
        .with_minimum_growth(args.minimum_growth)
        .with_max_time(Duration::from_secs(args.max_minutes * 60))
        .with_overdue_policy(args.overdue_policy.into())
        .with_parallel(args.parallel)
        .with_verbose(!args.quiet);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let result = SearchRunner::run(&catalog, &fleet, &config)?;
    println!(
        "Final result: Generation: {}, Best Score: {} ({})",
        result.generations, result.best_score, result.stop_reason
    );
    if !result.best_score.is_usable() {
        bail!("no usable load plan found");
    }

    let plan = LoadPlan::new(&catalog, &fleet, &result.best);
    plan.write_manifests(&args.output_dir)
        .with_context(|| format!("writing manifests to {}", args.output_dir.display()))?;
    println!("{}", plan);
    Ok(())
}
