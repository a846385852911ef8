// Tournament standings CLI.
//
// Flow for every subcommand:
// 1. Initialize tracing (stderr, so stdout stays clean for CSV/JSON)
// 2. Install the default tournament.toml if none exists, then load config
// 3. Load the snapshot JSON
// 4. Compute and print the requested report

mod report;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use diamond_core::bracket;
use diamond_core::config::{self, TournamentConfig};
use diamond_core::snapshot::TournamentSnapshot;
use diamond_core::standings::Standing;

#[derive(Parser)]
#[command(name = "diamond")]
#[command(about = "Standings, tiebreaks and leader boards for a round-robin softball tournament", long_about = None)]
struct Cli {
    /// Directory holding tournament.toml
    #[arg(long, global = true, default_value = "config")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the preliminary-round standings
    Standings {
        /// Tournament snapshot JSON (teams + games)
        snapshot: PathBuf,

        #[arg(long, value_enum, default_value_t = StandingsFormat::Table)]
        format: StandingsFormat,
    },

    /// Print the batting and pitching leader boards
    Leaders {
        /// Tournament snapshot JSON (teams + games)
        snapshot: PathBuf,

        #[arg(long, value_enum, default_value_t = LeadersFormat::Table)]
        format: LeadersFormat,

        /// Entries per board (overrides leaderboard.limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the championship pairing and, once played, the champion
    Final {
        /// Tournament snapshot JSON (teams + games)
        snapshot: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StandingsFormat {
    Table,
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LeadersFormat {
    Table,
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    let config = load_config(&cli.config)?;
    info!(
        "Config loaded: {}, {} innings, {} games per team",
        config.name, config.regulation_innings, config.games_per_team
    );

    match cli.command {
        Commands::Standings { snapshot, format } => {
            let snapshot = load_snapshot(&snapshot)?;
            let table = standings_or_exit(&snapshot);
            print_standings(&config, &snapshot, &table, format)?;
        }

        Commands::Leaders {
            snapshot,
            format,
            limit,
        } => {
            let snapshot = load_snapshot(&snapshot)?;
            let config = with_limit(config, limit).context("invalid --limit")?;
            let board = snapshot.leaders(&config);
            match format {
                LeadersFormat::Table => {
                    let mut out = String::new();
                    report::write_leaders_table(&mut out, &config.name, &timestamp(), &board)?;
                    print!("{out}");
                }
                LeadersFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&board)?);
                }
            }
        }

        Commands::Final { snapshot } => {
            let mut snapshot = load_snapshot(&snapshot)?;
            let table = standings_or_exit(&snapshot);
            let matchup = bracket::championship_matchup(&table, config.games_per_team);

            let mut champion = None;
            if let Some(game) = snapshot.championship_game_mut() {
                if let Some(matchup) = matchup {
                    bracket::seed_championship(game, matchup);
                }
                champion = match bracket::champion(game) {
                    Ok(champion) => champion,
                    Err(e) => {
                        eprintln!("{e}");
                        std::process::exit(1);
                    }
                };
            }

            let mut out = String::new();
            report::write_final_summary(
                &mut out,
                &snapshot.teams,
                matchup,
                snapshot.championship_game(),
                champion,
            )?;
            print!("{out}");
        }
    }

    Ok(())
}

/// Initialize tracing to stderr. `RUST_LOG` overrides the default filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("diamond_core=info,diamond=info,warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

fn load_config(config_dir: &Path) -> anyhow::Result<TournamentConfig> {
    let base_dir = config_dir.parent().unwrap_or_else(|| Path::new("."));
    if config_dir.file_name().is_some_and(|name| name == "config") {
        if let Some(path) = config::ensure_config_file(base_dir).context("failed to install default config")? {
            info!("Installed default config at {}", path.display());
        }
    }
    config::load_or_default(config_dir).context("failed to load configuration")
}

/// Apply a `--limit` override and re-validate.
fn with_limit(
    mut config: TournamentConfig,
    limit: Option<usize>,
) -> Result<TournamentConfig, config::ConfigError> {
    if let Some(limit) = limit {
        config.leaderboard.limit = limit;
        config::validate(&config)?;
    }
    Ok(config)
}

fn load_snapshot(path: &Path) -> anyhow::Result<TournamentSnapshot> {
    let snapshot = TournamentSnapshot::load(path)
        .with_context(|| format!("failed to load snapshot {}", path.display()))?;
    info!(
        "Snapshot loaded: {} teams, {} games",
        snapshot.teams.len(),
        snapshot.games.len()
    );
    Ok(snapshot)
}

/// Standings, or the corrective message and a non-zero exit when a tied
/// game blocks them.
fn standings_or_exit(snapshot: &TournamentSnapshot) -> Vec<Standing> {
    match snapshot.standings() {
        Ok(table) => table,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn print_standings(
    config: &TournamentConfig,
    snapshot: &TournamentSnapshot,
    table: &[Standing],
    format: StandingsFormat,
) -> anyhow::Result<()> {
    match format {
        StandingsFormat::Table => {
            let mut out = String::new();
            report::write_standings_table(&mut out, &config.name, &timestamp(), &snapshot.teams, table)?;
            print!("{out}");
        }
        StandingsFormat::Csv => {
            report::write_standings_csv(io::stdout().lock(), &snapshot.teams, table)
                .context("failed to write CSV")?;
        }
        StandingsFormat::Json => {
            println!("{}", serde_json::to_string_pretty(table)?);
        }
    }
    Ok(())
}

fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M").to_string()
}
