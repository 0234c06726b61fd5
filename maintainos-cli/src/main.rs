mod commands;
mod context;
mod render;

use std::env;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use maintainos_core::date_range::parse_date;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::context::{Context, FilterArgs};

#[derive(Parser)]
#[command(name = "maintainos")]
#[command(about = "Browse maintainOS work orders on a calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Work order export to read (defaults to items_path from the config file)
    #[arg(long, global = true)]
    items: Option<PathBuf>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(flatten)]
    filters: FilterArgs,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid
    Month {
        /// Month to show (YYYY-MM, defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },
    /// Show the week containing a date
    Week {
        /// Any day in the week (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Show every work order on one day
    Day {
        /// YYYY-MM-DD
        date: String,
    },
    /// List occurrences day by day
    Agenda {
        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, defaults to a week after --from)
        #[arg(long)]
        to: Option<String>,
    },
    /// Open one occurrence of a work order
    Open {
        /// Work order id
        id: String,

        /// Occurrence date (YYYY-MM-DD)
        #[arg(long)]
        on: String,
    },
    /// Report work orders whose recurrence rule can't be read
    Check,
    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Update configuration values
    Set {
        /// Work order export path
        #[arg(long)]
        items_path: Option<PathBuf>,

        /// First day of the week: monday or sunday
        #[arg(long)]
        week_start: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Commands::Config { action } = cli.command {
        return match action {
            ConfigAction::Path => commands::config::path(),
            ConfigAction::Show => commands::config::show(),
            ConfigAction::Set {
                items_path,
                week_start,
            } => commands::config::set(items_path, week_start.as_deref()),
        };
    }

    let ctx = Context::load(cli.items, cli.today.as_deref(), &cli.filters)?;

    match cli.command {
        Commands::Month { month } => commands::month::run(&ctx, month.as_deref()),
        Commands::Week { date } => commands::week::run(&ctx, date.as_deref()),
        Commands::Day { date } => commands::day::run(&ctx, parse_date(&date)?),
        Commands::Agenda { from, to } => commands::agenda::run(&ctx, from.as_deref(), to.as_deref()),
        Commands::Open { id, on } => commands::open::run(&ctx, &id, parse_date(&on)?),
        Commands::Check => commands::check::run(&ctx),
        Commands::Config { .. } => Ok(()),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("MAINTAINOS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "maintainos=debug,maintainos_core=debug,warn"
        } else {
            "warn"
        })
    });

    let format = env::var("MAINTAINOS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
        }
    }
}
