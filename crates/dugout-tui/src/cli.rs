// Command-line interface: argument types and dispatch to the app layer.

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use dugout_app::backfill::{run_backfill, BackfillRange};
use dugout_app::backtest::{run_backtest, BacktestOptions};
use dugout_app::dataset::{data_dir, load_dataset_through, output_dir, weight_store};
use dugout_app::recommend::run_recommendations;
use dugout_app::refresh::{refresh, RefreshOptions};
use dugout_app::report::load_latest_report;
use dugout_app::schedule_helper::{cron_line, roster_games, suggested_run_time};
use dugout_app::waiver::run_waiver_scan;
use dugout_core::config::Config;
use dugout_core::data::roster::load_latest_roster;
use tracing::info;

use crate::print;

#[derive(Debug, Parser)]
#[command(name = "dugout", version, about = "Fantasy baseball sit/start decisions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download schedule, players, game logs, weather and fantasy rosters.
    Refresh(RefreshArgs),
    /// Replay history under the current weights, optionally tuning them.
    Backtest(BacktestArgs),
    /// Write per-date factor analysis files for a historical range.
    Backfill(BackfillArgs),
    /// Score the fantasy roster for a date.
    Recommend {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the roster's games and a cron line to run recommendations.
    Schedule {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "dugout recommend")]
        command: String,
    },
    /// Score unrostered hitters playing on a date.
    Waiver {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 50)]
        batch_size: usize,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Inspect or reset factor weights.
    Weights {
        #[command(subcommand)]
        action: WeightsCommand,
    },
    /// Browse the latest recommendations.
    Report {
        /// Print tables instead of opening the viewer.
        #[arg(long)]
        plain: bool,
    },
}

#[derive(Debug, Args, Default)]
pub struct RefreshArgs {
    #[arg(long)]
    pub schedule: bool,
    #[arg(long)]
    pub players: bool,
    #[arg(long)]
    pub gamelogs: bool,
    #[arg(long)]
    pub weather: bool,
    #[arg(long)]
    pub roster: bool,
    /// Game logs for every MLB hitter, not only rostered ones.
    #[arg(long)]
    pub all_players: bool,
    #[arg(long)]
    pub season: Option<i32>,
}

#[derive(Debug, Args, Default)]
pub struct BacktestArgs {
    #[arg(long)]
    pub player: Option<String>,
    #[arg(long)]
    pub optimize: bool,
    #[arg(long)]
    pub save: bool,
    #[arg(long)]
    pub global: bool,
}

#[derive(Debug, Args, Default)]
pub struct BackfillArgs {
    #[arg(long)]
    pub start: Option<NaiveDate>,
    #[arg(long)]
    pub end: Option<NaiveDate>,
    #[arg(long)]
    pub year: Option<i32>,
    /// `YYYY-MM`
    #[arg(long)]
    pub month: Option<String>,
    #[arg(long)]
    pub date: Option<NaiveDate>,
    #[arg(long)]
    pub force_restart: bool,
}

#[derive(Debug, Subcommand)]
pub enum WeightsCommand {
    /// Weights for a player (their override or the global set).
    Show {
        #[arg(long)]
        player: Option<String>,
    },
    /// Players with saved overrides.
    List,
    /// Remove a player's override.
    Reset {
        #[arg(long)]
        player: String,
    },
}

impl Command {
    /// The report viewer owns the terminal.
    pub fn is_interactive(&self) -> bool {
        matches!(self, Command::Report { plain: false })
    }
}

impl From<RefreshArgs> for RefreshOptions {
    fn from(a: RefreshArgs) -> Self {
        RefreshOptions {
            schedule: a.schedule,
            players: a.players,
            gamelogs: a.gamelogs,
            weather: a.weather,
            roster: a.roster,
            all_players: a.all_players,
            season: a.season,
        }
    }
}

impl From<BacktestArgs> for BacktestOptions {
    fn from(a: BacktestArgs) -> Self {
        BacktestOptions {
            player: a.player,
            optimize: a.optimize,
            save: a.save,
            global: a.global,
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn run(command: Command, config: &Config) -> Result<()> {
    let now = Local::now().naive_local();
    match command {
        Command::Refresh(args) => {
            let summary = refresh(config, &args.into(), now).await?;
            println!("{}", print::render(&print::refresh_table(&summary)));
        }
        Command::Backtest(args) => {
            let options: BacktestOptions = args.into();
            let report = run_backtest(config, &options)?;
            println!("{}", print::render(&print::backtest_table(&report)));
            for p in &report.players {
                if let Some(o) = &p.optimized {
                    println!("{} optimized weights:", p.player_name);
                    println!("{}", print::render(&print::weights_table(&o.weights)));
                }
            }
            if let Some(o) = &report.global {
                println!("global optimized weights:");
                println!("{}", print::render(&print::weights_table(&o.weights)));
            }
            if report.saved {
                println!("weights saved");
            }
        }
        Command::Backfill(args) => {
            let range = BackfillRange::from_args(
                args.start,
                args.end,
                args.year,
                args.month.as_deref(),
                args.date,
            )?;
            let summary = run_backfill(config, range, args.force_restart)?;
            println!("{}", print::render(&print::backfill_table(&summary)));
            if !summary.failed.is_empty() {
                let dates: Vec<String> = summary.failed.iter().map(|d| d.to_string()).collect();
                println!("failed dates: {}", dates.join(", "));
            }
        }
        Command::Recommend { date } => {
            let date = date.unwrap_or_else(today);
            let (path, rows) = run_recommendations(config, date, now)?;
            println!("{}", print::render(&print::recommendations_table(&rows)));
            println!("written to {}", path.display());
        }
        Command::Schedule { date, command } => schedule(config, date.unwrap_or_else(today), &command)?,
        Command::Waiver {
            date,
            batch_size,
            limit,
        } => {
            let date = date.unwrap_or_else(today);
            let (path, rows) = run_waiver_scan(config, date, batch_size, limit, now)?;
            println!("{}", print::render(&print::recommendations_table(&rows)));
            println!("full scan written to {}", path.display());
        }
        Command::Weights { action } => weights(config, action)?,
        Command::Report { plain } => {
            let report = load_latest_report(&output_dir(config), &config.recommend)?;
            if plain {
                println!("{}", report.path.display());
                println!("{}", print::render(&print::report_summary_table(&report)));
                println!("Top starts:");
                let top: Vec<_> = report.top_starts(10).into_iter().cloned().collect();
                println!("{}", print::render(&print::recommendations_table(&top)));
                println!("Bottom sits:");
                let bottom: Vec<_> = report.bottom_sits(10).into_iter().cloned().collect();
                println!("{}", print::render(&print::recommendations_table(&bottom)));
            } else {
                crate::tui::run(report).await?;
            }
        }
    }
    Ok(())
}

fn schedule(config: &Config, date: NaiveDate, command: &str) -> Result<()> {
    let (_, roster) = load_latest_roster(&data_dir(config))?;
    let data = load_dataset_through(config, date)?;
    let games = roster_games(&data, &roster, date);
    if games.is_empty() {
        println!("no roster games on {date}");
        return Ok(());
    }
    println!("{}", print::render(&print::schedule_table(&games)));
    match suggested_run_time(&games, config.recommend.lead_minutes) {
        Some(at) => {
            let local = at.with_timezone(&Local).naive_local();
            info!("suggested run at {local}");
            println!("run at {}:", local.format("%Y-%m-%d %H:%M"));
            println!("{}", cron_line(local, command));
        }
        None => println!("no start times known for {date}"),
    }
    Ok(())
}

fn weights(config: &Config, action: WeightsCommand) -> Result<()> {
    let mut store = weight_store(config);
    match action {
        WeightsCommand::Show { player } => {
            let (weights, source) = match &player {
                Some(name) => store.weights_for(name),
                None => (*store.global(), dugout_core::weights::WeightSource::Global),
            };
            let who = player.as_deref().unwrap_or("all players");
            println!("{who} ({} weights)", source.label());
            println!("{}", print::render(&print::weights_table(&weights)));
        }
        WeightsCommand::List => {
            let players = store.players();
            if players.is_empty() {
                println!("no player overrides");
            }
            for name in players {
                println!("{name}");
            }
        }
        WeightsCommand::Reset { player } => {
            if !store.reset_player(&player) {
                bail!("{player} has no saved weights");
            }
            let path = Path::new(&config.weights.player_path);
            store
                .save_players(path)
                .with_context(|| format!("failed to save {}", path.display()))?;
            println!("{player} now uses the global weights");
        }
    }
    Ok(())
}
