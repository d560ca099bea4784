use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::model::ParsedParameters;

// ---------------------------------------------------------------------------
// Identifier layout
// ---------------------------------------------------------------------------

/// Container extensions stripped from the last parameter before parsing.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv", "avi"];

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Human-readable labels for the simulation parameters we know about.
const PARAM_LABELS: &[(&str, &str)] = &[
    ("vis", "Vision"),
    ("minsep", "Minimum separation"),
    ("maxalignturn", "Maximum alignment turn"),
    ("maxcohereturn", "Maximum coherence turn"),
    ("maxsepturn", "Maximum separation turn"),
    ("pop", "Population"),
];

/// Result of decoding one video identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedIdentifier {
    pub params: ParsedParameters,
    pub captured_at: Option<CaptureTimestamp>,
}

/// Parse a video identifier such as
/// `../public/swarm-videos//111407.893-PM-25-Aug-2025_vis=10_maxsepturn=3.mp4`.
///
/// Never fails: malformed segments are skipped and a bad timestamp yields `None`.
pub fn parse_identifier(identifier: &str) -> ParsedIdentifier {
    let file_part = strip_path_prefix(identifier);
    let stem = strip_video_extension(file_part);

    let mut segments = stem.split('_');
    let mut params = ParsedParameters::new();
    let mut captured_at = None;

    if let Some(first) = segments.next() {
        if first.contains('=') {
            insert_pair(&mut params, first);
        } else {
            captured_at = parse_timestamp(first);
        }
    }
    for segment in segments {
        insert_pair(&mut params, segment);
    }

    ParsedIdentifier {
        params,
        captured_at,
    }
}

/// The text after the last `/`, or the whole string when there is none.
pub fn strip_path_prefix(identifier: &str) -> &str {
    identifier.rsplit('/').next().unwrap_or(identifier)
}

/// `name.mp4` → `name`; unknown extensions are kept.
pub fn strip_video_extension(file: &str) -> &str {
    match file.rsplit_once('.') {
        Some((stem, ext))
            if VIDEO_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext)) =>
        {
            stem
        }
        _ => file,
    }
}

fn insert_pair(params: &mut ParsedParameters, segment: &str) {
    let Some((key, raw_value)) = segment.split_once('=') else {
        return;
    };
    let key = key.trim();
    if key.is_empty() {
        return;
    }
    if let Some(value) = parse_leading_float(raw_value) {
        params.insert(key.to_string(), value);
    }
}

/// Best-effort float conversion: the longest leading prefix that parses.
///
/// `"155.mp4"` → `155.0`, `"2.5x"` → `2.5`, `"abc"` → `None`.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let candidate_len = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;

    (1..=candidate_len)
        .rev()
        .find_map(|end| s[..end].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Capture timestamp
// ---------------------------------------------------------------------------

/// Wall-clock capture time encoded in the identifier prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CaptureTimestamp(pub NaiveDateTime);

impl fmt::Display for CaptureTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S %d/%m/%y"))
    }
}

/// Parse `HHMMSS.mmm-AM|PM-DD-Mon-YYYY`.
///
/// Returns `None` for anything that does not match the grammar or names an
/// impossible date/time.
pub fn parse_timestamp(field: &str) -> Option<CaptureTimestamp> {
    let mut parts = field.split('-');
    let (time_part, period, day, month, year) = (
        parts.next()?,
        parts.next()?,
        parts.next()?,
        parts.next()?,
        parts.next()?,
    );
    if parts.next().is_some() {
        return None;
    }

    let (hhmmss, millis) = time_part.split_once('.')?;
    if hhmmss.len() != 6 || !hhmmss.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut hour: u32 = hhmmss[0..2].parse().ok()?;
    let minute: u32 = hhmmss[2..4].parse().ok()?;
    let second: u32 = hhmmss[4..6].parse().ok()?;
    let millis: u32 = parse_digits(millis)?;

    if !(1..=12).contains(&hour) {
        return None;
    }
    match period {
        "PM" if hour < 12 => hour += 12,
        "AM" if hour == 12 => hour = 0,
        "AM" | "PM" => {}
        _ => return None,
    }

    let day: u32 = parse_digits(day)?;
    let month = MONTHS.iter().position(|m| *m == month)? as u32 + 1;
    let year: i32 = parse_digits::<u32>(year)?.try_into().ok()?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let time = NaiveTime::from_hms_milli_opt(hour, minute, second, millis)?;
    Some(CaptureTimestamp(NaiveDateTime::new(date, time)))
}

fn parse_digits<T: std::str::FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// ---------------------------------------------------------------------------
// Descriptions
// ---------------------------------------------------------------------------

/// Display label for a parameter name, falling back to the raw name.
pub fn param_label(name: &str) -> &str {
    PARAM_LABELS
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, label)| *label)
        .unwrap_or(name)
}

/// Format a parameter value the way it appeared in the file name.
pub fn format_value(value: f64) -> String {
    format!("{value}")
}

/// Multi-line description shown in a video card.
///
/// Known parameters are always listed (missing ones as `?`), followed by any
/// other parameters in name order.
pub fn describe(parsed: &ParsedIdentifier) -> String {
    let taken = parsed
        .captured_at
        .map(|ts| ts.to_string())
        .unwrap_or_default();
    let mut lines = vec![format!("Date taken: {taken}")];

    for (key, label) in PARAM_LABELS {
        let value = parsed
            .params
            .get(*key)
            .map(|v| format_value(*v))
            .unwrap_or_else(|| "?".to_string());
        lines.push(format!("{label}: {value}"));
    }
    for (key, value) in &parsed.params {
        if PARAM_LABELS.iter().any(|(known, _)| *known == key.as_str()) {
            continue;
        }
        lines.push(format!("{key}: {}", format_value(*value)));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    const SAMPLE: &str = "../public/swarm-videos//111407.893-PM-25-Aug-2025_vis=10_minsep=1.5_maxalignturn=5_maxcohereturn=3_maxsepturn=1.5_pop=155.mp4";

    #[test]
    fn recovers_parameters_and_timestamp() {
        let parsed = parse_identifier(SAMPLE);
        assert_eq!(parsed.params.get("vis"), Some(&10.0));
        assert_eq!(parsed.params.get("minsep"), Some(&1.5));
        assert_eq!(parsed.params.get("maxalignturn"), Some(&5.0));
        assert_eq!(parsed.params.get("maxcohereturn"), Some(&3.0));
        assert_eq!(parsed.params.get("maxsepturn"), Some(&1.5));
        assert_eq!(parsed.params.get("pop"), Some(&155.0));
        assert_eq!(parsed.params.len(), 6);

        let ts = parsed.captured_at.expect("timestamp should parse").0;
        assert_eq!(ts.hour(), 23);
        assert_eq!(ts.minute(), 14);
        assert_eq!(ts.second(), 7);
        assert_eq!(ts.nanosecond() / 1_000_000, 893);
        assert_eq!(ts.day(), 25);
        assert_eq!(ts.month(), 8);
        assert_eq!(ts.year(), 2025);
    }

    #[test]
    fn timestamp_renders_day_first() {
        let ts = parse_timestamp("111407.893-PM-25-Aug-2025").unwrap();
        assert_eq!(ts.to_string(), "23:14:07 25/08/25");
    }

    #[test]
    fn twelve_am_and_pm_map_correctly() {
        let midnight = parse_timestamp("120005.000-AM-01-Jan-2024").unwrap().0;
        assert_eq!(midnight.hour(), 0);
        let noon = parse_timestamp("120005.000-PM-01-Jan-2024").unwrap().0;
        assert_eq!(noon.hour(), 12);
    }

    #[test]
    fn invalid_timestamps_degrade_to_none() {
        assert!(parse_timestamp("111407.893-PM-31-Feb-2025").is_none());
        assert!(parse_timestamp("111407.893-PM-25-Foo-2025").is_none());
        assert!(parse_timestamp("131407.893-PM-25-Aug-2025").is_none());
        assert!(parse_timestamp("116107.893-AM-25-Aug-2025").is_none());
        assert!(parse_timestamp("111407.893-XX-25-Aug-2025").is_none());
        assert!(parse_timestamp("1114.893-PM-25-Aug-2025").is_none());
        assert!(parse_timestamp("garbage").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn bad_prefix_keeps_parameters() {
        let parsed = parse_identifier("clips/notatime_vis=4_maxsepturn=6.mp4");
        assert!(parsed.captured_at.is_none());
        assert_eq!(parsed.params.get("vis"), Some(&4.0));
        assert_eq!(parsed.params.get("maxsepturn"), Some(&6.0));
    }

    #[test]
    fn malformed_segments_are_skipped() {
        let params = parse_identifier("x/stamp_vis=abc_=3_noequals_maxsepturn=9_pop=2.5x").params;
        assert_eq!(params.get("vis"), None);
        assert_eq!(params.get("maxsepturn"), Some(&9.0));
        assert_eq!(params.get("pop"), Some(&2.5));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn combined_keys_parse_without_timestamp() {
        let params = parse_identifier("maxsepturn=3_vis=10").params;
        assert_eq!(params.get("maxsepturn"), Some(&3.0));
        assert_eq!(params.get("vis"), Some(&10.0));
    }

    #[test]
    fn decimal_last_value_is_not_mistaken_for_extension() {
        let params = parse_identifier("stamp_maxsepturn=1.5").params;
        assert_eq!(params.get("maxsepturn"), Some(&1.5));
    }

    #[test]
    fn leading_float_prefix() {
        assert_eq!(parse_leading_float("155.mp4"), Some(155.0));
        assert_eq!(parse_leading_float("-2.25"), Some(-2.25));
        assert_eq!(parse_leading_float("1e3"), Some(1000.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float(""), None);
    }

    #[test]
    fn description_uses_placeholders() {
        let parsed = parse_identifier("clips/bad_vis=2_extra=7");
        let desc = describe(&parsed);
        assert!(desc.starts_with("Date taken: \n"));
        assert!(desc.contains("Vision: 2"));
        assert!(desc.contains("Population: ?"));
        assert!(desc.ends_with("extra: 7"));
    }

    #[test]
    fn labels_fall_back_to_raw_name() {
        assert_eq!(param_label("vis"), "Vision");
        assert_eq!(param_label("speed"), "speed");
    }
}
