//! Video offset helpers.
//!
//! Offsets are plain `f64` seconds. Timeline data may carry them as
//! `mm:ss:ms` text; the UI renders them back as `m:ss`.

/// Parse `mm:ss:ms` (e.g. `02:03:00`) or a bare number of seconds.
///
/// `ms` is milliseconds, so `01:30:500` is 90.5 seconds.
pub fn parse_timestamp(raw: &str) -> Result<f64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Timestamp must not be empty".to_string());
    }

    if !raw.contains(':') {
        let seconds: f64 = raw
            .parse()
            .map_err(|_| format!("Invalid timestamp '{raw}'"))?;
        validate_offset(seconds, None)?;
        return Ok(seconds);
    }

    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Invalid timestamp '{raw}'. Expected mm:ss:ms format"
        ));
    }

    let mut values = [0u32; 3];
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!(
                "Invalid timestamp '{raw}'. Segment {i} must be numeric"
            ));
        }
        values[i] = part
            .parse()
            .map_err(|_| format!("Invalid timestamp '{raw}'. Segment {i} is out of range"))?;
    }

    let [minutes, seconds, millis] = values;
    Ok(f64::from(minutes) * 60.0 + f64::from(seconds) + f64::from(millis) / 1000.0)
}

/// Render seconds as `m:ss`. Fractions are truncated.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// A video offset must be finite and non-negative, and must not pass the
/// end of the video when its duration is known.
pub fn validate_offset(seconds: f64, duration: Option<f64>) -> Result<(), String> {
    if !seconds.is_finite() {
        return Err("Timestamp must be a finite number".to_string());
    }
    if seconds < 0.0 {
        return Err("Timestamp must not be negative".to_string());
    }
    if let Some(duration) = duration.filter(|d| d.is_finite()) {
        if seconds > duration {
            return Err(format!(
                "Timestamp {seconds} exceeds video duration of {duration} seconds"
            ));
        }
    }
    Ok(())
}

/// Clamp a seek target into `[0, duration]`, or `[0, inf)` when unknown.
pub fn clamp_offset(seconds: f64, duration: Option<f64>) -> f64 {
    let lower = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    match duration.filter(|d| d.is_finite() && *d >= 0.0) {
        Some(duration) => lower.min(duration),
        None => lower,
    }
}
