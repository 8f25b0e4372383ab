//! Formatting helpers shared across report renderers.

/// Format a duration as hours and minutes (e.g., "31h 5m", "31h", "12m", "40s").
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;

    match (hours, mins) {
        (0, 0) => format!("{}s", secs),
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Format a bin edge in the largest whole unit (e.g., "32s", "2m", "4h").
pub fn format_compact_secs(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else {
        format!("{}h", secs / 3600)
    }
}

/// Format a percentage without trailing noise (e.g., "40%", "12.5%").
pub fn format_percent(value: f64) -> String {
    if (value - value.round()).abs() < 0.05 {
        format!("{:.0}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(40), "40s");
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(12 * 60 + 5), "12m");
        assert_eq!(format_duration(31 * 3600), "31h");
        assert_eq!(format_duration(31 * 3600 + 5 * 60), "31h 5m");
    }

    #[test]
    fn test_format_compact_secs() {
        assert_eq!(format_compact_secs(1), "1s");
        assert_eq!(format_compact_secs(64), "1m");
        assert_eq!(format_compact_secs(4096), "1h");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(40.0), "40%");
        assert_eq!(format_percent(12.5), "12.5%");
    }
}
