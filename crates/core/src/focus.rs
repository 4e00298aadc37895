//! Focus (pomodoro) sessions and their aggregate statistics.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A focus session. Open while `completed_at` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: u64,
    /// Planned length in minutes.
    pub duration: u32,
    /// Break after the session, in minutes.
    pub break_time: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub interrupted: bool,
}

impl FocusSession {
    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }

    /// Finished without interruption.
    pub fn is_successful(&self) -> bool {
        self.completed_at.is_some() && !self.interrupted
    }

    /// Whole minutes elapsed between start and `until`.
    pub fn elapsed_minutes(&self, until: DateTime<Utc>) -> u32 {
        let minutes = (until - self.started_at).num_minutes();
        u32::try_from(minutes.max(0)).unwrap_or(u32::MAX)
    }

    /// Whole minutes left of the planned duration.
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> u32 {
        self.duration.saturating_sub(self.elapsed_minutes(now))
    }
}

/// Aggregates over a window of sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusStats {
    pub total_sessions: usize,
    pub total_minutes: u64,
    pub average_session_length: u64,
    /// Floored percentage of sessions finished without interruption.
    pub completion_rate: u32,
    pub longest_streak: u32,
    pub current_streak: u32,
}

impl FocusStats {
    /// Computes statistics for `sessions`, which must already be limited to the window.
    ///
    /// Streaks count consecutive local calendar days holding at least one
    /// successful session. The current streak is zero unless its last day is
    /// `today` or the day before.
    pub fn compute(sessions: &[FocusSession], today: NaiveDate) -> Self {
        let total_sessions = sessions.len();
        let successful: Vec<&FocusSession> =
            sessions.iter().filter(|s| s.is_successful()).collect();

        let total_minutes: u64 = successful
            .iter()
            .filter_map(|s| s.completed_at.map(|end| u64::from(s.elapsed_minutes(end))))
            .sum();

        let average_session_length = if successful.is_empty() {
            0
        } else {
            total_minutes / successful.len() as u64
        };

        let completion_rate = if total_sessions == 0 {
            0
        } else {
            (successful.len() * 100 / total_sessions) as u32
        };

        let mut days: Vec<NaiveDate> = successful
            .iter()
            .map(|s| s.started_at.with_timezone(&Local).date_naive())
            .collect();
        days.sort();
        days.dedup();
        let (longest_streak, current_streak) = streaks(&days, today);

        Self {
            total_sessions,
            total_minutes,
            average_session_length,
            completion_rate,
            longest_streak,
            current_streak,
        }
    }
}

/// Longest and current run of consecutive days in a sorted, deduplicated list.
fn streaks(days: &[NaiveDate], today: NaiveDate) -> (u32, u32) {
    let Some(last) = days.last() else {
        return (0, 0);
    };

    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        run = match previous {
            Some(prev) if (*day - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*day);
    }

    let current = if (today - *last).num_days() <= 1 { run } else { 0 };
    (longest, current)
}
