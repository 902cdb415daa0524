/// Utility functions for display formatting
use time::macros::format_description;
use time::OffsetDateTime;

/// Current time in the local offset, or UTC when the offset can't be determined
///
/// `time` refuses to read the local offset while other threads are running,
/// which is the normal case inside the tokio runtime.
pub fn now_local_or_utc() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// Format a timestamp as time of day for the "last update" line
///
/// Produces HH:MM:SS, with a UTC marker when the timestamp is not in a local
/// offset. Falls back to the default string representation if formatting fails.
pub fn format_time_of_day(dt: &OffsetDateTime) -> String {
    let format = format_description!("[hour]:[minute]:[second]");
    match dt.format(format) {
        Ok(text) if dt.offset().is_utc() => format!("{} UTC", text),
        Ok(text) => text,
        Err(_) => dt.to_string(),
    }
}

/// Format a sensor value the way the device reports it
///
/// Whole numbers print without a fractional part, anything else with at
/// most two decimals.
pub fn format_reading(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let text = format!("{:.2}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

fn group_thousands(value: u32) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Format an illuminance value with thousands separators
///
/// A value at the calibration's cap is shown as a lower bound, since the
/// sensor is saturated there.
pub fn format_lux(lux: u32, max_lux: u32) -> String {
    if lux >= max_lux {
        format!("≥ {}", group_thousands(max_lux))
    } else {
        group_thousands(lux)
    }
}
