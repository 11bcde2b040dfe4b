use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{LogFormat, Settings};
use core_types::Outcome;
use engine::{SessionEngine, SessionHandle};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use store::{JsonFileRepository, SessionRepository};

mod display;
mod interactive;

/// The main entry point for the crashlog application.
#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Record crash game multipliers and inspect their statistics.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of ./crashlog.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session file to use instead of the configured one.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Console log format.
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Record the multiplier of one round (e.g. "2.35" or "2.35x").
    Add(AddArgs),
    /// Show the summary cards, prediction, risk and recent points.
    Dashboard(DashboardArgs),
    /// Show the full statistical analysis report.
    Stats,
    /// Show the next-round prediction.
    Predict,
    /// List the most recently recorded rounds.
    Recent(RecentArgs),
    /// Show the cumulative profit after each round.
    Profit,
    /// Chart the most recent crash points against their round numbers.
    History(HistoryArgs),
    /// Show the distribution of recorded multipliers.
    Distribution(DistributionArgs),
    /// Write the session document to its configured file again.
    Save,
    /// Write the session document to another file.
    Export(ExportArgs),
    /// Delete every recorded round and reset the profit.
    Clear(ClearArgs),
    /// Interactive session with a periodically refreshed dashboard.
    Watch,
}

#[derive(Parser, Debug)]
struct AddArgs {
    /// The crash multiplier. Must be a number greater than zero.
    #[arg(allow_hyphen_values = true)]
    value: String,
}

#[derive(Parser, Debug)]
struct DashboardArgs {
    /// Print the snapshot as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct RecentArgs {
    /// How many rounds to list. Defaults to the configured recent window.
    #[arg(short = 'n', long)]
    count: Option<usize>,
}

#[derive(Parser, Debug)]
struct HistoryArgs {
    /// How many rounds to chart.
    #[arg(short = 'n', long, default_value_t = display::HISTORY_WINDOW)]
    count: usize,
}

#[derive(Parser, Debug)]
struct DistributionArgs {
    /// Number of histogram bins. Defaults to the configured value.
    #[arg(long)]
    bins: Option<usize>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Destination file.
    path: PathBuf,
}

#[derive(Parser, Debug)]
struct ClearArgs {
    /// Do not ask for confirmation.
    #[arg(long, short = 'y')]
    yes: bool,
}

// ==============================================================================
// Application Wiring
// ==============================================================================

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut settings =
        configuration::load_config(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(data) = cli.data {
        settings.storage.data_file = data;
    }
    if let Some(format) = cli.log_format {
        settings.logging.format = format;
    }

    // Keep the guard alive for the whole run so file logs are flushed.
    let _log_guard = configuration::init_tracing(&settings.logging)?;

    let repository: Arc<dyn SessionRepository> =
        Arc::new(JsonFileRepository::new(&settings.storage.data_file));
    let (handle, engine_task) = SessionEngine::from_settings(&settings, repository)
        .context("invalid analysis or risk settings")?
        .spawn();

    let result = dispatch(cli.command, &settings, &handle).await;

    // Dropping the last handle lets the engine task finish.
    drop(handle);
    if let Err(e) = engine_task.await {
        tracing::error!(error = %e, "session engine task failed");
    }

    result
}

async fn dispatch(
    command: Commands,
    settings: &Settings,
    handle: &SessionHandle,
) -> anyhow::Result<()> {
    match command {
        Commands::Add(args) => handle_add(args, handle).await,
        Commands::Dashboard(args) => {
            let snapshot = handle.snapshot().await?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            } else {
                display::print_dashboard(&snapshot, settings.analysis.min_prediction_points);
            }
            Ok(())
        }
        Commands::Stats => {
            let snapshot = handle.snapshot().await?;
            display::print_statistics(&snapshot.report, settings.analysis.min_prediction_points);
            Ok(())
        }
        Commands::Predict => {
            let snapshot = handle.snapshot().await?;
            display::print_prediction(&snapshot, settings.analysis.min_prediction_points);
            Ok(())
        }
        Commands::Recent(args) => {
            let state = handle.state().await?;
            let count = args.count.unwrap_or(settings.analysis.recent_window);
            let points = analytics::recent_points(&state.history, count, settings.wagering.stake);
            display::print_recent(&points);
            Ok(())
        }
        Commands::Profit => {
            let state = handle.state().await?;
            display::show_profit(&state, settings.wagering.stake);
            Ok(())
        }
        Commands::History(args) => {
            let state = handle.state().await?;
            display::show_history(&state, args.count);
            Ok(())
        }
        Commands::Distribution(args) => {
            let state = handle.state().await?;
            let bins = args.bins.unwrap_or(settings.analysis.histogram_bins);
            display::show_distribution(&state, bins)?;
            Ok(())
        }
        Commands::Save => {
            handle.save().await.context("failed to save data")?;
            println!("Data saved to {}", settings.storage.data_file.display());
            Ok(())
        }
        Commands::Export(args) => {
            let state = handle.state().await?;
            JsonFileRepository::export(&state, &args.path)
                .with_context(|| format!("failed to export to {}", args.path.display()))?;
            println!("Exported {} points to {}", state.len(), args.path.display());
            Ok(())
        }
        Commands::Clear(args) => {
            if !args.yes && !interactive::confirm("Clear all data?").await? {
                println!("Nothing was cleared.");
                return Ok(());
            }
            let cleared = handle.clear().await?;
            cleared.persisted.context("history cleared in memory but could not be saved")?;
            println!("All data cleared ({} points removed)", cleared.removed);
            Ok(())
        }
        Commands::Watch => interactive::run_session(settings, handle.clone()).await,
    }
}

/// Handles validation and recording of a single entered multiplier.
async fn handle_add(args: AddArgs, handle: &SessionHandle) -> anyhow::Result<()> {
    let outcome: Outcome = args.value.parse()?;

    let recorded = handle.record(outcome).await?;
    display::print_recorded(&recorded);
    recorded
        .persisted
        .context("the point was recorded but the session file could not be saved")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_add_with_negative_value() {
        let cli = Cli::try_parse_from(["crashlog", "add", "-3"]).unwrap();
        match cli.command {
            Commands::Add(args) => assert_eq!(args.value, "-3"),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "crashlog",
            "recent",
            "-n",
            "4",
            "--data",
            "other.json",
            "--log-format",
            "pretty",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("other.json")));
        assert_eq!(cli.log_format, Some(LogFormat::Pretty));
        assert!(matches!(cli.command, Commands::Recent(RecentArgs { count: Some(4) })));
    }

    #[test]
    fn test_cli_history_defaults_to_fifty_rounds() {
        let cli = Cli::try_parse_from(["crashlog", "history"]).unwrap();
        assert!(matches!(cli.command, Commands::History(HistoryArgs { count: 50 })));

        let cli = Cli::try_parse_from(["crashlog", "history", "-n", "5"]).unwrap();
        assert!(matches!(cli.command, Commands::History(HistoryArgs { count: 5 })));
        assert!(matches!(
            Cli::try_parse_from(["crashlog", "save"]).unwrap().command,
            Commands::Save
        ));
    }

    #[test]
    fn test_cli_requires_a_command() {
        assert!(Cli::try_parse_from(["crashlog"]).is_err());
    }
}
