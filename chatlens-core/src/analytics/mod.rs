//! Analytics module for chatlens
//!
//! Every aggregator is a pure function over a slice of
//! [`NormalizedMessage`](crate::ingest::NormalizedMessage)s that returns a
//! plain, serializable value:
//! - Message counts per sender
//! - Activity per fixed-length period
//! - Hour-of-day and day-of-week rhythm
//! - Chat-wide silences and per-sender pause distributions
//! - Reaction tallies
//! - Reply network
//!
//! Messages without a sender or a parseable date are excluded everywhere.
//!
//! ## Report Framework
//!
//! Each aggregator is also exposed as a named report. See [`engine`] for the
//! framework and [`reports`] for the built-in reports.

pub mod counter;
pub mod cyclic;
pub mod engine;
pub mod filter;
pub mod gaps;
pub mod period;
pub mod reactions;
pub mod replies;
pub mod reports;
pub mod words;

// Engine exports
pub use engine::{
    ChatReport, ReplySummary, Report, ReportContext, ReportEngine, ReportRun, ReportRunStatus,
    SilenceSummary,
};
pub use reports::create_default_engine;

// Aggregator exports
pub use counter::{count_messages, ranked};
pub use cyclic::{
    hourly_activity, weekly_activity, HourlyActivity, WeekdayMode, WeeklyActivity,
    DEFAULT_ORIGIN_HOUR, WEEKDAY_LABELS,
};
pub use filter::{date_bounds, participants, MessageFilter};
pub use gaps::{
    pause_distribution, silence_periods, Gap, PauseBin, PauseDistribution, SenderPauses,
    DEFAULT_MIN_DISPLAY_PERCENT, DEFAULT_SILENCE_THRESHOLD_SECS,
};
pub use period::{
    aggregate_periods, series, PeriodBucket, PeriodSeries, SenderTally, DEFAULT_PERIOD_DAYS,
};
pub use reactions::{tally_reactions, ReactionTally};
pub use replies::{build_reply_graph, DisplayScale, ReplyEdge, ReplyGraph};
pub use words::{count_words, message_word_count};
