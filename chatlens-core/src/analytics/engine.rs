//! Report framework
//!
//! Every statistic is exposed as a named report sharing one entry point,
//! [`ChatReport::run`]. The engine runs the enabled reports over the same
//! filtered messages and records the outcome of each one, so a failing
//! report never prevents the others from rendering.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        REPORT ENGINE                         │
//! │                                                              │
//! │  ┌────────────┐  ┌────────────┐  ┌────────────┐              │
//! │  │ messages   │  │ hourly     │  │ silence    │  ...         │
//! │  └─────┬──────┘  └─────┬──────┘  └─────┬──────┘              │
//! │        │               │               │                     │
//! │        ▼               ▼               ▼                     │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │              ReportEngine.run_all()                    │  │
//! │  │  - Skips disabled reports                              │  │
//! │  │  - Calls report.run() on the filtered messages         │  │
//! │  │  - Records a ReportRun per report (status, timing)     │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use chatlens_core::analytics::{create_default_engine, ReportContext};
//!
//! let engine = create_default_engine();
//! let runs = engine.run_all(&messages, &ReportContext::default());
//!
//! for run in runs {
//!     println!("{}: {:?}", run.name, run.status);
//! }
//! ```

use super::cyclic::{HourlyActivity, WeekdayMode, WeeklyActivity, DEFAULT_ORIGIN_HOUR};
use super::gaps::{
    Gap, PauseDistribution, DEFAULT_MIN_DISPLAY_PERCENT, DEFAULT_SILENCE_THRESHOLD_SECS,
};
use super::period::{PeriodBucket, DEFAULT_PERIOD_DAYS};
use super::reactions::ReactionTally;
use super::replies::{DisplayScale, ReplyGraph};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::ingest::NormalizedMessage;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

// ============================================
// Context and outputs
// ============================================

/// Options shared by all reports in one run.
#[derive(Debug, Clone)]
pub struct ReportContext {
    /// First day of the analysed range (defaults to the earliest message)
    pub start: Option<NaiveDate>,
    /// Last day of the analysed range (defaults to the latest message)
    pub end: Option<NaiveDate>,
    /// Window length for the activity report
    pub period_days: u32,
    /// Hour at which the activity day starts
    pub origin_hour: u32,
    /// Weekly bucketing rule
    pub weekday_mode: WeekdayMode,
    /// Minimum chat-wide silence to report, in seconds
    pub silence_threshold_secs: i64,
    /// Pause shares below this percentage display as zero
    pub min_display_percent: f64,
    /// Participants for the reply graph (`None` = everyone present)
    pub participants: Option<BTreeSet<String>>,
    /// Edge width range for the reply graph
    pub edge_scale: DisplayScale,
}

impl Default for ReportContext {
    fn default() -> Self {
        Self {
            start: None,
            end: None,
            period_days: DEFAULT_PERIOD_DAYS,
            origin_hour: DEFAULT_ORIGIN_HOUR,
            weekday_mode: WeekdayMode::default(),
            silence_threshold_secs: DEFAULT_SILENCE_THRESHOLD_SECS,
            min_display_percent: DEFAULT_MIN_DISPLAY_PERCENT,
            participants: None,
            edge_scale: DisplayScale::default(),
        }
    }
}

impl ReportContext {
    /// Build a context from configured analysis defaults.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            period_days: config.period_days,
            origin_hour: config.origin_hour,
            weekday_mode: config.weekday_mode,
            silence_threshold_secs: i64::from(config.silence_threshold_hours) * 3600,
            min_display_percent: config.min_display_percent,
            edge_scale: DisplayScale {
                min: config.edge_width_min,
                max: config.edge_width_max,
                ..DisplayScale::default()
            },
            ..Self::default()
        }
    }
}

/// Output of a single report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Report {
    /// Messages per sender
    Messages(BTreeMap<String, u64>),
    /// Message and word counts per period
    Activity(Vec<PeriodBucket>),
    /// Messages per shifted hour
    Hourly(HourlyActivity),
    /// Messages per weekly bucket
    Weekly(WeeklyActivity),
    /// Chat-wide silences, longest first
    Silence(SilenceSummary),
    /// Per-sender pause distribution
    Pauses(PauseDistribution),
    /// Reaction tallies
    Reactions(ReactionTally),
    /// Reply graph with display widths
    Replies(ReplySummary),
}

/// Silence periods together with the threshold that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SilenceSummary {
    pub threshold_secs: i64,
    pub gaps: Vec<Gap>,
}

/// Reply graph together with rescaled edge widths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplySummary {
    pub graph: ReplyGraph,
    pub widths: Vec<f64>,
}

// ============================================
// Run results
// ============================================

/// Outcome of one report run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRun {
    /// Name of the report that was run
    pub name: String,
    /// Whether the run succeeded
    pub status: ReportRunStatus,
    /// How long the report took (milliseconds)
    pub duration_ms: i64,
    /// Number of messages handed to the report
    pub input_message_count: usize,
    /// Report output on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Report>,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status of a report run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportRunStatus {
    /// Report completed
    Success,
    /// Report returned an error
    Error,
}

impl ReportRunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportRunStatus::Success => "success",
            ReportRunStatus::Error => "error",
        }
    }
}

// ============================================
// Report trait
// ============================================

/// Trait that every report implements.
///
/// Reports are stateless: the same messages and context always give the
/// same output.
pub trait ChatReport: Send + Sync {
    /// Unique short name (used on the command line and in config).
    fn name(&self) -> &str;

    /// One-line description for listings.
    fn description(&self) -> &str;

    /// Compute the report over already filtered messages.
    fn run(&self, messages: &[NormalizedMessage<'_>], ctx: &ReportContext) -> Result<Report>;
}

// ============================================
// Engine
// ============================================

/// Engine that holds reports and runs them.
pub struct ReportEngine {
    reports: Vec<Box<dyn ChatReport>>,
    disabled: BTreeSet<String>,
}

impl ReportEngine {
    /// Create a new empty engine.
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
            disabled: BTreeSet::new(),
        }
    }

    /// Register a report with the engine.
    pub fn register(&mut self, report: Box<dyn ChatReport>) {
        tracing::debug!(report = report.name(), "Registered report");
        self.reports.push(report);
    }

    /// Skip the named reports in [`run_all`](Self::run_all).
    pub fn set_disabled<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled = names.into_iter().map(Into::into).collect();
    }

    /// Names of all registered reports, in registration order.
    pub fn report_names(&self) -> Vec<&str> {
        self.reports.iter().map(|r| r.name()).collect()
    }

    /// Look up a report by name.
    pub fn get(&self, name: &str) -> Option<&dyn ChatReport> {
        self.reports
            .iter()
            .find(|r| r.name() == name)
            .map(|r| r.as_ref())
    }

    /// Run a single report by name.
    pub fn run_report(
        &self,
        name: &str,
        messages: &[NormalizedMessage<'_>],
        ctx: &ReportContext,
    ) -> Option<ReportRun> {
        self.get(name).map(|report| Self::execute(report, messages, ctx))
    }

    /// Run every enabled report.
    pub fn run_all(&self, messages: &[NormalizedMessage<'_>], ctx: &ReportContext) -> Vec<ReportRun> {
        self.reports
            .iter()
            .filter(|r| !self.disabled.contains(r.name()))
            .map(|r| Self::execute(r.as_ref(), messages, ctx))
            .collect()
    }

    /// Run the named reports in the given order. Unknown names are skipped
    /// with a warning.
    pub fn run_selected(
        &self,
        names: &[String],
        messages: &[NormalizedMessage<'_>],
        ctx: &ReportContext,
    ) -> Vec<ReportRun> {
        names
            .iter()
            .filter_map(|name| {
                let run = self.run_report(name, messages, ctx);
                if run.is_none() {
                    tracing::warn!(report = %name, "Unknown report requested");
                }
                run
            })
            .collect()
    }

    fn execute(
        report: &dyn ChatReport,
        messages: &[NormalizedMessage<'_>],
        ctx: &ReportContext,
    ) -> ReportRun {
        let started = Instant::now();
        let result = report.run(messages, ctx);
        let duration_ms = started.elapsed().as_millis() as i64;

        match result {
            Ok(output) => {
                tracing::debug!(report = report.name(), duration_ms, "Report completed");
                ReportRun {
                    name: report.name().to_string(),
                    status: ReportRunStatus::Success,
                    duration_ms,
                    input_message_count: messages.len(),
                    report: Some(output),
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(report = report.name(), error = %e, "Report failed");
                ReportRun {
                    name: report.name().to_string(),
                    status: ReportRunStatus::Error,
                    duration_ms,
                    input_message_count: messages.len(),
                    report: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

impl Default for ReportEngine {
    fn default() -> Self {
        Self::new()
    }
}
