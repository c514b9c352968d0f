//! Reminder scheduling utilities
//!
//! Workout reminders are set by wall-clock time ("remind me at 07:30"). This
//! module turns such a time into the next instant it occurs.

use chrono::{DateTime, Days, NaiveTime, TimeZone, Timelike};

use crate::{GymlogError, Result};

/// Next future occurrence of `hour:minute` in the time zone of `now`
///
/// If today's occurrence is not strictly after `now`, tomorrow's is returned.
/// Seconds are always zero.
///
/// # Errors
///
/// Returns an error if `hour` or `minute` is out of range, or if the local
/// time does not exist on the target day (skipped by a DST transition).
pub fn next_reminder_time<Tz: TimeZone>(
    now: &DateTime<Tz>,
    hour: u32,
    minute: u32,
) -> Result<DateTime<Tz>> {
    let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
        GymlogError::InvalidInput(format!("Invalid reminder time: {:02}:{:02}", hour, minute))
    })?;

    let today = now.date_naive();
    let candidate = localize(now, today.and_time(time))?;
    if candidate > *now {
        return Ok(candidate);
    }

    let tomorrow = today
        .checked_add_days(Days::new(1))
        .ok_or_else(|| GymlogError::InvalidInput("Date out of range".to_string()))?;
    localize(now, tomorrow.and_time(time))
}

fn localize<Tz: TimeZone>(
    now: &DateTime<Tz>,
    local: chrono::NaiveDateTime,
) -> Result<DateTime<Tz>> {
    now.timezone()
        .from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| {
            GymlogError::InvalidInput(format!("Local time {} does not exist", local))
        })
}

/// Parse "HH:MM" into an (hour, minute) pair
///
/// # Errors
///
/// Returns an error if the input is not a valid 24-hour time.
pub fn parse_reminder_time(input: &str) -> Result<(u32, u32)> {
    let time = NaiveTime::parse_from_str(input.trim(), "%H:%M").map_err(|e| {
        GymlogError::InvalidInput(format!("Could not parse reminder time '{}': {}", input, e))
    })?;
    Ok((time.hour(), time.minute()))
}
