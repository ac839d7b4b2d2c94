use chrono::{DateTime, TimeZone};

const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size with 1024-based units and at most two decimals,
/// e.g. `1536` -> `"1.5 KB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    while unit + 1 < UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Hour and minute, zero padded.
pub fn format_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%H:%M").to_string()
}
