//! Elapsed-time and worker timestamp formatting.

/// Parse an `H:M:S` elapsed string into total seconds.
///
/// Returns None when any component is missing or non-numeric.
pub fn elapsed_seconds(elapsed: &str) -> Option<u64> {
    let parts: Vec<&str> = elapsed.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: u64 = parts[0].parse().ok()?;
    let mins: u64 = parts[1].parse().ok()?;
    let secs: u64 = parts[2].parse().ok()?;

    Some(hours * 3600 + mins * 60 + secs)
}

/// Render a worker timestamp for display. The wire format uses `_` as
/// the time-component separator; an absent timestamp renders blank.
pub fn format_worker_time(time: Option<&str>) -> String {
    match time {
        Some(t) => t.replace('_', ":"),
        None => String::new(),
    }
}
