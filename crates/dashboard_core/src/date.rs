use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Display timezone offset: IST, UTC+05:30.
pub const DISPLAY_OFFSET_SECONDS: i32 = 5 * 3600 + 30 * 60;

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Formats a UTC timestamp as `DD Mon HH:MM` in IST.
///
/// Missing or blank input yields `N/A`; anything unparseable yields
/// `Invalid Date`. Timestamps without a zone are taken as UTC.
pub fn format_date(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return "N/A".to_string(),
    };
    let Some(offset) = FixedOffset::east_opt(DISPLAY_OFFSET_SECONDS) else {
        return "Invalid Date".to_string();
    };
    match parse_utc(raw) {
        Some(utc) => utc.with_timezone(&offset).format("%d %b %H:%M").to_string(),
        None => "Invalid Date".to_string(),
    }
}

fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
