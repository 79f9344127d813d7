// Dynasty roster tool entry point.
//
// Subcommands:
// - analyze: value and classify a roster, write the annotated roster,
//   recruiting plan and scheme-fit summary
// - next-roster: roll an analysed roster into next season with the
//   recruiting class
//
// Logs go to <out-dir>/roster_processing.log, not the terminal.

mod discover;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, warn};

use dynasty_core::analysis::{self, RecruitingPlanRow, RosterAnalysis, SchemeFitSummary};
use dynasty_core::config::{self, DynastyConfig};
use dynasty_core::roster::io;
use dynasty_core::season;

const OUTPUT_FOLDER: &str = "cfb_dynasty_data";
const LOG_FILE: &str = "roster_processing.log";
const PLAYER_VALUES_FILE: &str = "player_values.csv";
const RECRUITING_PLAN_FILE: &str = "recruiting_plan.csv";
const SCHEME_FIT_FILE: &str = "scheme_fit.csv";
const NEW_ROSTER_FILE: &str = "New_Roster.csv";

#[derive(Parser)]
#[command(name = "dynasty")]
#[command(about = "College football dynasty roster valuation and recruiting planner")]
#[command(version)]
struct Cli {
    /// Configuration file (default: config/dynasty.toml, created on first run)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Value every player, classify retention status and grade each position
    Analyze {
        /// Roster CSV; discovered in the data directory when omitted
        roster: Option<PathBuf>,

        /// Where to look for roster files (default: Downloads)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Where to write reports (default: <data-dir>/cfb_dynasty_data)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Also print the recruiting plan and scheme-fit summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build next season's roster from the current roster and recruiting class
    NextRoster {
        /// School the recruits must be committed to
        #[arg(long)]
        school: String,

        /// Roster CSV; discovered in the data directory when omitted
        roster: Option<PathBuf>,

        /// Recruiting CSV; discovered in the data directory when omitted
        recruits: Option<PathBuf>,

        #[arg(long)]
        data_dir: Option<PathBuf>,

        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

/// JSON view of one analysed roster.
#[derive(Serialize)]
struct JsonReport<'a> {
    roster: String,
    recruiting_plan: &'a [RecruitingPlanRow],
    scheme_fit: &'a [SchemeFitSummary],
    graduation_impact: Vec<analysis::GraduationImpact>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            roster,
            data_dir,
            out_dir,
            json,
        } => {
            let (data_dir, out_dir) = resolve_dirs(data_dir, out_dir)?;
            init_tracing(&out_dir)?;
            info!("Roster analysis started");
            let config = load_config(cli.config.as_deref())?;

            let rosters = match roster {
                Some(path) => vec![path],
                None => discover::find_files(&data_dir, discover::ROSTER_PATTERN)?,
            };
            if rosters.is_empty() {
                error!("No roster CSV files found in {}", data_dir.display());
                bail!("no roster CSV files found in {}", data_dir.display());
            }

            run_batch(&rosters, |path| {
                analyze_file(path, &config, &out_dir, json).map(|_| ())
            })
        }
        Commands::NextRoster {
            school,
            roster,
            recruits,
            data_dir,
            out_dir,
        } => {
            let (data_dir, out_dir) = resolve_dirs(data_dir, out_dir)?;
            init_tracing(&out_dir)?;
            info!("Roster generation started for {}", school);
            let config = load_config(cli.config.as_deref())?;

            let rosters = match roster {
                Some(path) => vec![path],
                None => discover::find_files(&data_dir, discover::ROSTER_PATTERN)?,
            };
            if rosters.is_empty() {
                error!("No roster CSV files found in {}", data_dir.display());
                bail!("no roster CSV files found in {}", data_dir.display());
            }

            let recruits_path = match recruits {
                Some(path) => path,
                None => discover::find_files(&data_dir, discover::RECRUITING_PATTERN)?
                    .into_iter()
                    .next()
                    .with_context(|| {
                        format!("no recruiting CSV files found in {}", data_dir.display())
                    })?,
            };
            let recruits = io::load_recruits(&recruits_path)
                .with_context(|| format!("failed to load {}", recruits_path.display()))?;
            info!(
                "Loaded {} recruits from {}",
                recruits.players.len(),
                recruits_path.display()
            );

            run_batch(&rosters, |path| {
                let analysis = analyze_file(path, &config, &out_dir, false)?;
                let next = season::next_season(&analysis, &recruits.players, &school)
                    .with_context(|| format!("failed to roll over {}", path.display()))?;

                let out_path = out_dir.join(NEW_ROSTER_FILE);
                io::write_next_roster(create(&out_path)?, &next)
                    .with_context(|| format!("failed to write {}", out_path.display()))?;
                info!("New roster ({} players) saved to {}", next.len(), out_path.display());
                println!("{} -> {}", path.display(), out_path.display());
                Ok(())
            })
        }
    }
}

/// Run `process` over every file, logging and counting failures instead of
/// stopping. Fails only when nothing succeeded.
fn run_batch<F>(files: &[PathBuf], mut process: F) -> anyhow::Result<()>
where
    F: FnMut(&Path) -> anyhow::Result<()>,
{
    let mut processed = 0usize;
    let mut errors = 0usize;

    for path in files {
        info!("Processing {}", path.display());
        match process(path) {
            Ok(()) => processed += 1,
            Err(e) => {
                errors += 1;
                error!("Error processing {}: {:#}", path.display(), e);
                eprintln!("error: {}: {:#}", path.display(), e);
            }
        }
    }

    info!(
        "Processing complete: {} files processed successfully, {} errors",
        processed, errors
    );
    if processed == 0 {
        bail!("all {} input files failed", errors);
    }
    Ok(())
}

/// Analyse one roster file and write its three reports into `out_dir`.
fn analyze_file(
    path: &Path,
    config: &DynastyConfig,
    out_dir: &Path,
    json: bool,
) -> anyhow::Result<RosterAnalysis> {
    let table = io::load_roster(path).with_context(|| format!("failed to load {}", path.display()))?;
    let headers = table.headers;
    let result = analysis::analyze_roster(table.players, config);

    let values_path = out_dir.join(PLAYER_VALUES_FILE);
    io::write_annotated_roster(create(&values_path)?, &headers, &result.players)
        .with_context(|| format!("failed to write {}", values_path.display()))?;

    let plan_path = out_dir.join(RECRUITING_PLAN_FILE);
    io::write_rows(create(&plan_path)?, &result.recruiting_plan)
        .with_context(|| format!("failed to write {}", plan_path.display()))?;

    let fit_path = out_dir.join(SCHEME_FIT_FILE);
    io::write_rows(create(&fit_path)?, &result.scheme_fit)
        .with_context(|| format!("failed to write {}", fit_path.display()))?;

    for row in analysis::graduation_impact(&result) {
        info!(
            "Graduating at {}: {} (avg value {:.2})",
            row.position, row.count, row.avg_value
        );
    }
    for p in analysis::position_change_candidates(&result) {
        warn!(
            "Weak scheme fit: {} ({}, weight {:.2})",
            p.player,
            p.player.archetype,
            p.scheme_fit.unwrap_or_default()
        );
    }

    info!("Reports for {} written to {}", path.display(), out_dir.display());
    println!("{} -> {}", path.display(), out_dir.display());

    if json {
        let report = JsonReport {
            roster: path.display().to_string(),
            recruiting_plan: &result.recruiting_plan,
            scheme_fit: &result.scheme_fit,
            graduation_impact: analysis::graduation_impact(&result),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(result)
}

fn create(path: &Path) -> anyhow::Result<File> {
    File::create(path).with_context(|| format!("failed to create {}", path.display()))
}

fn resolve_dirs(
    data_dir: Option<PathBuf>,
    out_dir: Option<PathBuf>,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    let data_dir = match data_dir {
        Some(dir) => dir,
        None => discover::default_data_dir()?,
    };
    let out_dir = out_dir.unwrap_or_else(|| data_dir.join(OUTPUT_FOLDER));
    Ok((data_dir, out_dir))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DynastyConfig> {
    let config = match path {
        Some(path) => config::load_config_file(path),
        None => config::load_config(),
    }
    .context("failed to load configuration")?;
    info!(
        "Config loaded: {} positions, redshirt discount {}",
        config.positions.len(),
        config.valuation.redshirt_discount
    );
    Ok(config)
}

/// Initialize tracing to log to a file in the output directory.
fn init_tracing(log_dir: &Path) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create {}", log_dir.display()))?;

    let log_file = File::create(log_dir.join(LOG_FILE))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dynasty=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
