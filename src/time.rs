use hifitime::{Duration, Epoch};

use crate::birdflow_errors::BirdFlowError;

/// Parse an `interval_start_time` value from the measurement feed.
///
/// The feed carries second-precision UTC timestamps in the form
/// `YYYY-MM-DD HH:mm:ss`, optionally suffixed with a `+00` offset marker.
/// The value is normalized to ISO-8601 before being handed to hifitime.
///
/// Argument
/// --------
/// * `raw`: the timestamp string as found in the feed
///
/// Return
/// ------
/// * the corresponding [`Epoch`], or [`BirdFlowError::InvalidTimestamp`]
pub fn parse_interval_start_time(raw: &str) -> Result<Epoch, BirdFlowError> {
    let trimmed = raw.trim();
    let trimmed = trimmed
        .strip_suffix("+00")
        .or_else(|| trimmed.strip_suffix(" UTC"))
        .unwrap_or(trimmed)
        .trim_end();

    let normalized = match trimmed.split_once(' ') {
        Some((date, clock)) => format!("{date}T{clock}"),
        None => trimmed.to_string(),
    };

    normalized
        .parse::<Epoch>()
        .map_err(|_| BirdFlowError::InvalidTimestamp(raw.to_string()))
}

/// Format an [`Epoch`] back into the feed's hashing format
/// (`YYYY-MM-DD HH:mm:ss+00`).
pub fn format_interval_start_time(epoch: Epoch) -> String {
    let (year, month, day, hour, minute, second, _) = epoch.to_gregorian_utc();
    format!("{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}+00")
}

/// Round an epoch down onto the time grid spanned by `step_minutes`.
///
/// Used when an arbitrary instant (e.g. a position clicked on a time chart)
/// must be mapped to the closest earlier feed interval: minutes are floored
/// to a multiple of the step and sub-minute precision is dropped.
pub fn align_to_step(epoch: Epoch, step_minutes: i64) -> Epoch {
    let (year, month, day, hour, minute, _, _) = epoch.to_gregorian_utc();
    let step = step_minutes.clamp(1, 60) as u8;
    let minute = minute - minute % step;
    Epoch::from_gregorian_utc(year, month, day, hour, minute, 0, 0)
}

/// Step size of the time cursor expressed as a [`Duration`].
pub fn step_duration(step_minutes: i64) -> Duration {
    Duration::from_seconds(step_minutes as f64 * 60.0)
}
