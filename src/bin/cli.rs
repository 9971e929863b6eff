use anyhow::{Context, Result, anyhow, bail};
use calibration_tracker::{
    CalibrationAlerts, CalibrationCheck, CalibrationClassifier, CalibrationFilter,
    CalibrationStatus, LoggingSink, MonthResolution, NotificationStats, TrackerConfig,
    load_equipment_from_json, load_users_from_json, logging, save_report_to_json,
};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Calibration due-date checker for the equipment inventory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify a single calibration field
    Classify {
        /// Raw calibration due-date text, e.g. "05/2025 - repaired"
        raw: String,
        #[command(flatten)]
        clock: Clock,
        /// Due-soon window in days
        #[arg(long, default_value_t = calibration_tracker::DEFAULT_DUE_SOON_DAYS)]
        due_soon_days: i64,
        /// Day used for month-only dates: first or last
        #[arg(long, default_value = "last")]
        month_resolution: String,
    },
    /// Bucket all equipment by calibration status
    Report {
        #[command(flatten)]
        input: Input,
        /// Write the report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Filter equipment by status and/or due-date range
    Filter {
        #[command(flatten)]
        input: Input,
        #[arg(long)]
        status: Option<String>,
        /// Inclusive lower bound, YYYY-MM-DD
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Inclusive upper bound, YYYY-MM-DD
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// List calibrations due inside the calendar window
    Upcoming {
        #[command(flatten)]
        input: Input,
        /// Overrides calendar_window_days from the config
        #[arg(long)]
        window: Option<i64>,
        /// Emit calendar events instead of the plain list
        #[arg(long, conflicts_with = "ics")]
        events: bool,
        /// Emit an iCalendar feed instead of JSON
        #[arg(long)]
        ics: bool,
    },
    /// Dry-run the notification check and print per-user alerts
    Notify {
        #[command(flatten)]
        input: Input,
        #[arg(long, env = "CALIBRATION_USERS")]
        users: PathBuf,
    },
}

#[derive(Args, Debug)]
struct Clock {
    /// Reference instant: YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS (default: now)
    #[arg(long)]
    now: Option<String>,
}

impl Clock {
    fn resolve(&self) -> Result<NaiveDateTime> {
        match self.now.as_deref() {
            None => Ok(Local::now().naive_local()),
            Some(text) => parse_now(text),
        }
    }
}

#[derive(Args, Debug)]
struct Input {
    /// Equipment JSON file (array of records)
    #[arg(long, env = "CALIBRATION_EQUIPMENT")]
    equipment: PathBuf,
    /// Tracker config JSON; defaults apply when omitted
    #[arg(long, env = "CALIBRATION_CONFIG")]
    config: Option<PathBuf>,
    #[command(flatten)]
    clock: Clock,
}

impl Input {
    fn config(&self) -> Result<TrackerConfig> {
        match &self.config {
            Some(path) => TrackerConfig::load_from_json(path)
                .with_context(|| format!("loading config {}", path.display())),
            None => Ok(TrackerConfig::default()),
        }
    }

    fn equipment(&self) -> Result<Vec<calibration_tracker::EquipmentRecord>> {
        load_equipment_from_json(&self.equipment)
            .with_context(|| format!("loading equipment {}", self.equipment.display()))
    }
}

/// Everything `notify` prints, as one JSON document.
#[derive(Serialize)]
struct NotifyOutput {
    plan: BTreeMap<String, CalibrationAlerts>,
    stats: NotificationStats,
}

fn parse_now(text: &str) -> Result<NaiveDateTime> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(datetime);
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .with_context(|| format!("invalid --now value '{text}'"))?;
    Ok(date.and_time(NaiveTime::MIN))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Classify {
            raw,
            clock,
            due_soon_days,
            month_resolution,
        } => {
            if due_soon_days < 0 {
                bail!("--due-soon-days must be non-negative (got {due_soon_days})");
            }
            let policy = MonthResolution::from_str(&month_resolution)
                .ok_or_else(|| anyhow!("invalid --month-resolution '{month_resolution}'"))?;
            let classifier = CalibrationClassifier::new(due_soon_days).with_month_resolution(policy);
            print_json(&classifier.classify(Some(&raw), clock.resolve()?))
        }
        Command::Report { input, output } => {
            let config = input.config()?;
            let records = input.equipment()?;
            let report = config.batch().report(&records, input.clock.resolve()?);
            match output {
                Some(path) => {
                    save_report_to_json(&report, &path)
                        .with_context(|| format!("writing report {}", path.display()))?;
                    println!("Report written to {}", path.display());
                    Ok(())
                }
                None => print_json(&report),
            }
        }
        Command::Filter {
            input,
            status,
            start,
            end,
        } => {
            let config = input.config()?;
            let records = input.equipment()?;
            let status = status
                .map(|name| {
                    CalibrationStatus::from_str(&name)
                        .ok_or(calibration_tracker::CalibrationError::InvalidStatus(name))
                })
                .transpose()?;
            let filter = CalibrationFilter {
                start_date: start,
                end_date: end,
                status,
            };
            filter.validate()?;
            print_json(&config.batch().filter(&records, &filter, input.clock.resolve()?))
        }
        Command::Upcoming {
            input,
            window,
            events,
            ics,
        } => {
            let mut config = input.config()?;
            if let Some(window) = window {
                config.calendar_window_days = window;
                config.validate()?;
            }
            let records = input.equipment()?;
            let calendar = config.calendar();
            let now = input.clock.resolve()?;
            let upcoming = calendar.upcoming(&records, now);
            if ics {
                print!("{}", calendar.to_ical(&upcoming, now));
                Ok(())
            } else if events {
                print_json(&calendar.events(&upcoming))
            } else {
                print_json(&upcoming)
            }
        }
        Command::Notify { input, users } => {
            let config = input.config()?;
            let records = input.equipment()?;
            let users = load_users_from_json(&users)
                .with_context(|| format!("loading users {}", users.display()))?;
            let now = input.clock.resolve()?;
            let check = CalibrationCheck::new(&config);
            let plan = check.prepare_by_user(&records, &users, now);
            let stats = check.send(&mut LoggingSink, &records, &users, now);
            print_json(&NotifyOutput { plan, stats })
        }
    }
}

fn main() {
    logging::init();
    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
