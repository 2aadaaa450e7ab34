//! util — общие хелперы для статусного вывода.
//!
//! Содержит:
//! - human_bytes(): размер в человекочитаемом виде (десятичные единицы).
//! - format_age() / format_duration(): возраст таймстемпа / длительность.

use chrono::{DateTime, Duration, Utc};

/// Human-readable size with decimal units and one fractional digit:
/// 123.0 B, 1.2 KB, 3.4 GB.
pub fn human_bytes(num: f64) -> String {
    let mut n = num;
    for unit in ["", "K", "M", "G", "T", "P", "E", "Z"] {
        if n.abs() < 1000.0 {
            return format!("{:.1} {}B", n, unit);
        }
        n /= 1000.0;
    }
    format!("{:.1} YB", n)
}

/// Age of a timestamp relative to now, e.g. "3h 12m ago".
/// A timestamp from the future renders as "just now".
pub fn format_age(ts: DateTime<Utc>) -> String {
    let delta = Utc::now().signed_duration_since(ts);
    if delta < Duration::zero() {
        return "just now".to_string();
    }
    format!("{} ago", format_duration(delta))
}

/// Coarse two-component rendering of a duration: "3d 4h", "5h 12m", "42m",
/// "under a minute".
pub fn format_duration(d: Duration) -> String {
    let days = d.num_days();
    let hours = d.num_hours();
    let minutes = d.num_minutes();
    if days > 0 {
        format!("{}d {}h", days, hours - days * 24)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes - hours * 60)
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        "under a minute".to_string()
    }
}
