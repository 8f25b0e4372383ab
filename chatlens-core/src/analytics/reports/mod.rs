//! Built-in reports
//!
//! ## Built-in Reports
//!
//! - [`activity`]: `messages`, `activity`, `hourly`, `weekly`
//! - [`interaction`]: `silence`, `pauses`, `reactions`, `replies`
//!
//! ## Adding a Report
//!
//! 1. Implement [`ChatReport`](super::ChatReport) for a new type
//! 2. Register it with [`ReportEngine::register`](super::ReportEngine::register)
//!
//! Or use [`create_default_engine`] to get an engine with all built-in reports.

pub mod activity;
pub mod interaction;

use super::ReportEngine;

/// Create an engine with all built-in reports registered, in display order.
///
/// ```rust,ignore
/// use chatlens_core::analytics::create_default_engine;
///
/// let engine = create_default_engine();
/// println!("Reports: {:?}", engine.report_names());
/// ```
pub fn create_default_engine() -> ReportEngine {
    let mut engine = ReportEngine::new();
    engine.register(Box::new(activity::MessagesReport));
    engine.register(Box::new(activity::ActivityReport));
    engine.register(Box::new(activity::HourlyReport));
    engine.register(Box::new(activity::WeeklyReport));
    engine.register(Box::new(interaction::SilenceReport));
    engine.register(Box::new(interaction::PausesReport));
    engine.register(Box::new(interaction::ReactionsReport));
    engine.register(Box::new(interaction::RepliesReport));
    engine
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_engine_has_reports() {
        let engine = create_default_engine();
        assert_eq!(
            engine.report_names(),
            vec![
                "messages",
                "activity",
                "hourly",
                "weekly",
                "silence",
                "pauses",
                "reactions",
                "replies"
            ]
        );
    }
}
