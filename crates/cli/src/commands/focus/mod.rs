//! `/focus` commands over the focus-session store.

mod start;
mod stats;
mod stop;

pub use start::StartFocusCommand;
pub use stats::FocusStatsCommand;
pub use stop::StopFocusCommand;

/// `45 min`, `2h`, `1h 30m`
pub(crate) fn format_duration(minutes: u64) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let (hours, rest) = (minutes / 60, minutes % 60);
    if rest > 0 {
        format!("{hours}h {rest}m")
    } else {
        format!("{hours}h")
    }
}
