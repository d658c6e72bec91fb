//! Wall-clock helpers for the two timestamp encodings the upstream emits:
//! `YYYY-MM-DD HH:MM` and ISO-8601 (`YYYY-MM-DDTHH:MM[:SS[.fff]][offset]`).
//!
//! Offsets are never converted; labels show the wall clock as recorded.

use time::{format_description::well_known::Rfc3339, macros::format_description, OffsetDateTime, PrimitiveDateTime};

pub fn parse_wall_clock(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();

    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(PrimitiveDateTime::new(ts.date(), ts.time()));
    }

    let formats = [
        format_description!("[year]-[month]-[day] [hour]:[minute]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]"),
        format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    ];

    formats
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(raw, format).ok())
}

/// Hour-of-day read straight from the token after the date/time separator.
///
/// Works on strings the full parser rejects (e.g. trailing zone names) as
/// long as the `THH` / ` HH` token is intact.
pub fn hour_token(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    let sep = raw.find(['T', ' '])?;
    let digits = raw.get(sep + 1..sep + 3)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|hour| *hour < 24)
}

/// `HH:MM`
pub fn clock_label(raw: &str) -> Option<String> {
    let ts = parse_wall_clock(raw)?;
    ts.format(format_description!("[hour]:[minute]")).ok()
}

/// Day, short month and 12-hour clock, e.g. `05 Jan, 3 pm`.
pub fn day_hour_label(raw: &str) -> Option<String> {
    let ts = parse_wall_clock(raw)?;
    ts.format(format_description!(
        "[day] [month repr:short], [hour repr:12 padding:none] [period case:lower]"
    ))
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_upstream_encodings() {
        let spaced = parse_wall_clock("2024-03-05 14:00").unwrap();
        let iso = parse_wall_clock("2024-03-05T14:00:00").unwrap();
        let zoned = parse_wall_clock("2024-03-05T14:00:00+05:30").unwrap();

        assert_eq!(spaced, iso);
        assert_eq!(iso, zoned);
        assert!(parse_wall_clock("yesterday").is_none());
    }

    #[test]
    fn hour_token_reads_either_separator() {
        assert_eq!(hour_token("2024-01-01T23:00:00"), Some(23));
        assert_eq!(hour_token("2024-01-01 00:30"), Some(0));
        assert_eq!(hour_token("2024-01-01T01:00:00 Asia/Kolkata"), Some(1));
        assert_eq!(hour_token("2024-01-01"), None);
        assert_eq!(hour_token("2024-01-01 9:00"), None);
    }

    #[test]
    fn labels() {
        assert_eq!(clock_label("2024-01-01 07:45").as_deref(), Some("07:45"));
        assert_eq!(day_hour_label("2024-01-05T15:00:00").as_deref(), Some("05 Jan, 3 pm"));
        assert_eq!(day_hour_label("2024-01-05T00:00:00").as_deref(), Some("05 Jan, 12 am"));
        assert!(day_hour_label("not a date").is_none());
    }
}
