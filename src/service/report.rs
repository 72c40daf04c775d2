//! Human-readable rendering of a trip estimate

use crate::service::app::TripEstimate;
use std::fmt::Write;

const SECONDS_PER_HOUR: u64 = 3600;
const SECONDS_PER_MINUTE: u64 = 60;

/// How a total lead time is phrased
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadTimeDisplay {
    HoursMinutes { hours: u64, minutes: u64 },
    Minutes(u64),
    /// Under a minute, which usually means origin and airport coincide
    TooShort,
}

impl LeadTimeDisplay {
    pub fn from_seconds(total_seconds: u64) -> Self {
        if total_seconds > SECONDS_PER_HOUR {
            Self::HoursMinutes {
                hours: total_seconds / SECONDS_PER_HOUR,
                minutes: (total_seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            }
        } else if total_seconds > SECONDS_PER_MINUTE {
            Self::Minutes(total_seconds / SECONDS_PER_MINUTE)
        } else {
            Self::TooShort
        }
    }
}

impl std::fmt::Display for LeadTimeDisplay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HoursMinutes { hours, minutes } => write!(
                f,
                "Leave for the airport {} hours and {} minutes before the scheduled departure.",
                hours, minutes
            ),
            Self::Minutes(minutes) => write!(
                f,
                "Leave for the airport {} minutes before the scheduled departure.",
                minutes
            ),
            Self::TooShort => write!(
                f,
                "Total time is less than a minute. Did you put the airport as your departure address?"
            ),
        }
    }
}

fn minutes_or_unavailable(seconds: Option<u64>) -> String {
    match seconds {
        Some(seconds) => format!("{} minutes.", seconds / SECONDS_PER_MINUTE),
        None => "unavailable (no readings reported).".to_string(),
    }
}

/// Render the full console report
pub fn render_report(estimate: &TripEstimate) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = write_report(&mut out, estimate);
    out
}

fn write_report(out: &mut String, estimate: &TripEstimate) -> std::fmt::Result {
    writeln!(out, "Departing from: {}", estimate.origin)?;
    writeln!(out, "Going to: {}", estimate.airport_name)?;
    writeln!(out)?;
    writeln!(out, "{}", LeadTimeDisplay::from_seconds(estimate.total_seconds))?;
    writeln!(out)?;
    writeln!(
        out,
        "This estimate was calculated based on current traffic conditions and TSA checkpoint wait times."
    )?;
    writeln!(
        out,
        "Travel time: {} minutes.",
        estimate.travel.duration_seconds / SECONDS_PER_MINUTE
    )?;
    writeln!(
        out,
        "Checkpoint wait time: {}",
        minutes_or_unavailable(estimate.slowest_now_seconds)
    )?;
    writeln!(
        out,
        "Average wait time: {}",
        minutes_or_unavailable(estimate.average_all_seconds)
    )?;
    match &estimate.worst_ever {
        Some(worst) => writeln!(
            out,
            "Slowest wait time reported: {} minutes, at {} (checkpoint {})",
            worst.seconds / SECONDS_PER_MINUTE,
            worst.created_at.format("%-m/%-d/%Y %-I:%M:%S %p"),
            worst.checkpoint_id
        )?,
        None => writeln!(out, "Slowest wait time reported: unavailable (no readings reported).")?,
    }
    writeln!(
        out,
        "Buffer time: {} minutes.",
        estimate.buffer.total_seconds / SECONDS_PER_MINUTE
    )?;

    writeln!(out)?;
    writeln!(out, "Checkpoints: {}", estimate.checkpoints.len())?;
    for checkpoint in &estimate.checkpoints {
        writeln!(
            out,
            "  {} ({}): average {}",
            checkpoint.name,
            checkpoint.id,
            minutes_or_unavailable(checkpoint.average_seconds)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "{}", estimate.travel)
}
