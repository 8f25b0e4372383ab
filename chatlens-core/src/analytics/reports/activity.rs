//! Volume reports: message counts, activity per period, hourly and weekly rhythm.

use crate::analytics::counter::count_messages;
use crate::analytics::cyclic::{hourly_activity, weekly_activity};
use crate::analytics::engine::{ChatReport, Report, ReportContext};
use crate::analytics::filter::date_bounds;
use crate::analytics::period::aggregate_periods;
use crate::error::{Error, Result};
use crate::ingest::NormalizedMessage;

/// Total messages per sender.
pub struct MessagesReport;

impl ChatReport for MessagesReport {
    fn name(&self) -> &str {
        "messages"
    }

    fn description(&self) -> &str {
        "Messages sent by each participant"
    }

    fn run(&self, messages: &[NormalizedMessage<'_>], _ctx: &ReportContext) -> Result<Report> {
        Ok(Report::Messages(count_messages(messages)))
    }
}

/// Messages and words per fixed-length period.
pub struct ActivityReport;

impl ChatReport for ActivityReport {
    fn name(&self) -> &str {
        "activity"
    }

    fn description(&self) -> &str {
        "Messages and words per period"
    }

    fn run(&self, messages: &[NormalizedMessage<'_>], ctx: &ReportContext) -> Result<Report> {
        let bounds = date_bounds(messages);
        let start = ctx.start.or(bounds.map(|(min, _)| min));
        let end = ctx.end.or(bounds.map(|(_, max)| max));

        let (Some(start), Some(end)) = (start, end) else {
            return Err(Error::EmptyInput(
                "no dated messages to split into periods".to_string(),
            ));
        };

        let buckets = aggregate_periods(messages, start, end, ctx.period_days)?;
        Ok(Report::Activity(buckets))
    }
}

/// Messages per hour of the (shifted) day.
pub struct HourlyReport;

impl ChatReport for HourlyReport {
    fn name(&self) -> &str {
        "hourly"
    }

    fn description(&self) -> &str {
        "Messages per hour of day"
    }

    fn run(&self, messages: &[NormalizedMessage<'_>], ctx: &ReportContext) -> Result<Report> {
        Ok(Report::Hourly(hourly_activity(messages, ctx.origin_hour)?))
    }
}

/// Messages per weekly bucket.
pub struct WeeklyReport;

impl ChatReport for WeeklyReport {
    fn name(&self) -> &str {
        "weekly"
    }

    fn description(&self) -> &str {
        "Messages per day of week"
    }

    fn run(&self, messages: &[NormalizedMessage<'_>], ctx: &ReportContext) -> Result<Report> {
        Ok(Report::Weekly(weekly_activity(messages, ctx.weekday_mode)))
    }
}
