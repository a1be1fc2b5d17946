use std::time::{Duration, Instant};

/// Time between start and end, zero unless both are known.
pub fn elapsed(started_at: Option<Instant>, ended_at: Option<Instant>) -> Duration {
    match (started_at, ended_at) {
        (Some(start), Some(end)) => end.saturating_duration_since(start),
        _ => Duration::ZERO,
    }
}

/// Words per minute over the whole run: `round(words / minutes)`.
///
/// Returns 0 when either timestamp is missing or no time has passed.
pub fn words_per_minute(
    word_count: usize,
    started_at: Option<Instant>,
    ended_at: Option<Instant>,
) -> u32 {
    let minutes = elapsed(started_at, ended_at).as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }

    (word_count as f64 / minutes).round() as u32
}

/// Share of target positions never mistyped, as a rounded percentage.
pub fn accuracy(target_len: usize, error_count: usize) -> u32 {
    if target_len == 0 {
        return 0;
    }

    let clean = target_len.saturating_sub(error_count);
    ((clean as f64 / target_len as f64) * 100.0).round() as u32
}
