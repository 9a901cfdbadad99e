//! `charge-scheduler` CLI: create availability events and query charging slots.
//!
//! ## Usage
//!
//! ```sh
//! # Station is available every Friday from 12:00 to 15:30
//! charge-scheduler create Available 2020-02-21T12:00:00Z 15:30 --weekly
//!
//! # ...except this one Friday afternoon
//! charge-scheduler create Occupied 2020-02-28T13:00:00Z 14:00
//!
//! # 30 minute slots for the next ten days
//! charge-scheduler agenda 2020-02-21T00:00:00Z 240h --charge-duration 30m
//!
//! # Registered events within a range, and a single lookup
//! charge-scheduler list 2020-02-01T00:00:00Z 2020-03-01T00:00:00Z
//! charge-scheduler get periodic 1
//! ```
//!
//! Events are kept in a JSON file (`--db-path`, or `CHARGE_SCHEDULER_DB`).

mod duration;
mod store;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use charge_engine::{Color, EndTime, EventId, Scheduler};

use crate::duration::parse_duration;
use crate::store::JsonFileStore;

#[derive(Parser)]
#[command(
    name = "charge-scheduler",
    version,
    about = "Charging station schedule: availability events and bookable slots"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the JSON event database
    #[arg(
        long,
        global = true,
        env = "CHARGE_SCHEDULER_DB",
        default_value = "./charge-scheduler.json"
    )]
    db_path: PathBuf,

    /// Log filter (e.g. "debug", "charge_engine=trace"); RUST_LOG takes precedence
    #[arg(long, global = true, env = "CHARGE_SCHEDULER_LOG", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a schedule event (single or weekly) of the given type
    Create {
        /// Schedule type: Available or Occupied
        #[arg(value_parser = parse_color)]
        color: Color,
        /// Event start (RFC 3339)
        #[arg(value_parser = parse_timestamp)]
        start: DateTime<FixedOffset>,
        /// Event end time on the start's day (HH:MM)
        #[arg(value_parser = parse_end_time)]
        end: NaiveTime,
        /// Repeat every week from the start
        #[arg(long)]
        weekly: bool,
    },
    /// Available charging slots per day for a period
    Agenda {
        /// Period start (RFC 3339)
        #[arg(value_parser = parse_timestamp)]
        start: DateTime<FixedOffset>,
        /// Period length (e.g. 240h, 72h, 1h30m)
        #[arg(value_parser = parse_duration)]
        period: Duration,
        /// Desired charging duration
        #[arg(long, default_value = "30m", value_parser = parse_duration)]
        charge_duration: Duration,
    },
    /// Print single events starting within a range, then all weekly events
    List {
        /// Range start (RFC 3339)
        #[arg(value_parser = parse_timestamp)]
        start: DateTime<FixedOffset>,
        /// Range end (RFC 3339)
        #[arg(value_parser = parse_timestamp)]
        end: DateTime<FixedOffset>,
    },
    /// Print one event by kind and id
    Get {
        kind: EventKind,
        id: EventId,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum EventKind {
    Single,
    Periodic,
}

impl EventKind {
    fn as_str(self) -> &'static str {
        match self {
            EventKind::Single => "single",
            EventKind::Periodic => "periodic",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let store = JsonFileStore::open(&cli.db_path)
        .with_context(|| format!("Failed to open database: {}", cli.db_path.display()))?;
    let mut scheduler = Scheduler::new(store);

    match cli.command {
        Commands::Create {
            color,
            start,
            end,
            weekly,
        } => {
            let end = EndTime::from(end);
            let (kind, id) = if weekly {
                let id = scheduler
                    .add_periodic_event(color, start, end)
                    .context("Failed to create periodic event")?;
                (EventKind::Periodic, id)
            } else {
                let id = scheduler
                    .add_single_event(color, start, end)
                    .context("Failed to create single event")?;
                (EventKind::Single, id)
            };
            println!("Created {} event {}", kind.as_str(), id);
        }
        Commands::Agenda {
            start,
            period,
            charge_duration,
        } => {
            let agenda = scheduler
                .get_available_agenda(start, period, charge_duration)
                .context("Failed to build agenda")?;
            for day in &agenda {
                print!("{day}");
            }
        }
        Commands::List { start, end } => {
            let (single, periodic) = scheduler
                .get_events(start, end)
                .context("Failed to list events")?;
            for event in &single {
                print!("{event}");
            }
            for event in &periodic {
                print!("{event}");
            }
        }
        Commands::Get { kind, id } => {
            let rendered = match kind {
                EventKind::Single => scheduler
                    .get_single_event(id)
                    .context("Failed to read event")?
                    .map(|e| e.to_string()),
                EventKind::Periodic => scheduler
                    .get_periodic_event(id)
                    .context("Failed to read event")?
                    .map(|e| e.to_string()),
            };
            match rendered {
                Some(text) => print!("{text}"),
                None => anyhow::bail!("Event not found: {} {}", kind.as_str(), id),
            }
        }
    }

    Ok(())
}

/// Human-readable logs on stderr so stdout stays clean for command output.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn parse_color(s: &str) -> Result<Color, String> {
    s.parse::<Color>().map_err(|e| e.to_string())
}

fn parse_timestamp(s: &str) -> Result<DateTime<FixedOffset>, String> {
    DateTime::parse_from_rfc3339(s).map_err(|e| format!("expected an RFC 3339 timestamp: {e}"))
}

fn parse_end_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM: {e}"))
}
