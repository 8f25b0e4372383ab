//! chatlens - statistics for exported group chats
//!
//! Reads a JSON chat export and prints who talks, when, how long the chat
//! goes quiet, how people react and who replies to whom.

mod render;

use anyhow::{Context, Result};
use chatlens_core::analytics::{create_default_engine, MessageFilter, ReportContext, WeekdayMode};
use chatlens_core::config::MAX_PERIOD_DAYS;
use chatlens_core::{ingest, Config, Error};
use chrono::NaiveDate;
use clap::Parser;
use render::Overview;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chatlens")]
#[command(about = "Statistics for exported group chats")]
#[command(version)]
struct Args {
    /// Chat export (JSON)
    file: PathBuf,

    /// First day to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    from: Option<NaiveDate>,

    /// Last day to include (YYYY-MM-DD)
    #[arg(long, value_parser = parse_day)]
    to: Option<NaiveDate>,

    /// Only include these participants (repeatable)
    #[arg(long = "user", value_name = "NAME")]
    users: Vec<String>,

    /// Run only these reports, in this order (repeatable)
    #[arg(long = "report", value_name = "NAME")]
    reports: Vec<String>,

    /// Length of an activity period in days
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_PERIOD_DAYS as i64))]
    period_days: Option<u32>,

    /// Hour at which the day starts for the hourly report
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
    origin_hour: Option<u32>,

    /// Minimum silence to report, in hours
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    silence_hours: Option<u32>,

    /// Bucket the weekly report by real weekday instead of day of month
    #[arg(long)]
    weekday: bool,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/chatlens/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn parse_day(s: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("invalid date {:?}, expected YYYY-MM-DD", s))
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(format) = args.export.as_deref() {
        if format != "md" && format != "json" {
            anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", format);
        }
    }

    // Load configuration and logging
    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    let _log_guard = match chatlens_core::logging::init(&config.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            None
        }
    };

    let engine = {
        let mut engine = create_default_engine();
        engine.set_disabled(config.analysis.disabled_reports.iter().cloned());
        engine
    };
    let known = engine.report_names();
    if let Some(unknown) = args.reports.iter().find(|r| !known.contains(&r.as_str())) {
        anyhow::bail!(
            "Unknown report: {}. Available: {}",
            unknown,
            known.join(", ")
        );
    }

    // Load the export
    let parsed = match ingest::load_chat(&args.file) {
        Ok(parsed) => parsed,
        Err(e) if e.is_no_data() => {
            tracing::info!(error = %e, "Nothing to analyse");
            println!("No messages found");
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to read {}", args.file.display()))
        }
    };
    for warning in &parsed.warnings {
        eprintln!("warning: {}", warning);
    }

    // Filter
    let mut filter = MessageFilter {
        start: args.from,
        end: args.to,
        participants: None,
    };
    if !args.users.is_empty() {
        filter = filter.with_participants(args.users.iter().cloned());
    }
    let normalized = ingest::normalize_chat(&parsed.chat);
    let messages = filter.apply(&normalized).map_err(|e| match e {
        Error::InvalidRange { start, end } => {
            anyhow::anyhow!("--from {} is after --to {}", start, end)
        }
        other => anyhow::Error::new(other),
    })?;

    let Some((start, end)) = filter.resolved_range(&messages) else {
        println!("No messages found");
        return Ok(());
    };

    // Build the report context: config first, then command-line overrides
    let mut ctx = ReportContext::from_config(&config.analysis);
    ctx.start = Some(start);
    ctx.end = Some(end);
    ctx.participants = filter.participants.clone();
    if let Some(days) = args.period_days {
        ctx.period_days = days;
    }
    if let Some(hour) = args.origin_hour {
        ctx.origin_hour = hour;
    }
    if let Some(hours) = args.silence_hours {
        ctx.silence_threshold_secs = i64::from(hours) * 3600;
    }
    if args.weekday {
        ctx.weekday_mode = WeekdayMode::Weekday;
    }

    let runs = if args.reports.is_empty() {
        engine.run_all(&messages, &ctx)
    } else {
        engine.run_selected(&args.reports, &messages, &ctx)
    };

    let overview = Overview {
        chat: parsed.chat.display_name().to_string(),
        start: Some(start),
        end: Some(end),
        messages: messages.len(),
        skipped: parsed.skipped(),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match args.export.as_deref() {
        Some("json") => render::print_json(&mut out, &overview, &runs)?,
        Some("md") => render::print_markdown(&mut out, &overview, &runs)?,
        _ => render::print_terminal(&mut out, &overview, &runs)?,
    }

    Ok(())
}
