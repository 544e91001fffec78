//! Line parser: splits raw stream text into logical lines and extracts an
//! optional leading timestamp from each.
//!
//! Only complete lines (terminated by `\n`) are emitted. A trailing fragment
//! stays in the caller's buffer until the rest of the line arrives, so a line
//! is never rendered half-written.
//!
//! # Timestamp prefix
//!
//! ```text
//! YYYY-MM-DD(T| )HH:MM:SS(.fraction)?(Z| UTC)?<whitespace>message
//! ```
//!
//! All three zone forms (none, `Z`, ` UTC`) resolve to UTC. A prefix that
//! matches the pattern but names an impossible instant is treated as if there
//! were no prefix at all.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ParsedLine;

static TIMESTAMP_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4}-\d{2}-\d{2})[T ](\d{2}:\d{2}:\d{2}(?:\.\d+)?)(?:Z| UTC)?\s+")
        .expect("timestamp prefix pattern must compile")
});

/// Parse every complete line in `raw`. A trailing unterminated fragment is
/// ignored; see [`complete_len`].
pub fn parse(raw: &str) -> Vec<ParsedLine> {
    complete_lines(&raw[..complete_len(raw)])
        .map(parse_line)
        .collect()
}

/// Byte length of the prefix of `raw` that consists of complete lines.
pub fn complete_len(raw: &str) -> usize {
    raw.rfind('\n').map_or(0, |i| i + 1)
}

/// Iterate over the lines of `text`, which must end on a line boundary (or be
/// a final fragment being flushed). A `\r` before the `\n` is dropped.
pub fn complete_lines(text: &str) -> impl Iterator<Item = &str> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    let empty = text.is_empty();
    body.split('\n')
        .filter(move |_| !empty)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Parse a single line (without its terminator).
pub fn parse_line(line: &str) -> ParsedLine {
    let Some(caps) = TIMESTAMP_PREFIX.captures(line) else {
        return ParsedLine::plain(line);
    };

    let (Some(whole), Some(date), Some(time)) = (caps.get(0), caps.get(1), caps.get(2)) else {
        return ParsedLine::plain(line);
    };

    match parse_instant(date.as_str(), time.as_str()) {
        Some(ts) => ParsedLine {
            timestamp: Some(ts),
            message: line[whole.end()..].trim().to_string(),
        },
        None => {
            tracing::debug!(line, "timestamp prefix did not parse; keeping line as text");
            ParsedLine::plain(line)
        }
    }
}

fn parse_instant(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = if time.contains('.') {
        NaiveTime::parse_from_str(time, "%H:%M:%S%.f").ok()?
    } else {
        NaiveTime::parse_from_str(time, "%H:%M:%S").ok()?
    };
    Some(NaiveDateTime::new(date, time).and_utc())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[rstest]
    #[case::iso_z("2024-01-05T10:00:00Z Listening on port 3000")]
    #[case::space_utc("2024-01-05 10:00:00 UTC Listening on port 3000")]
    #[case::naive("2024-01-05T10:00:00 Listening on port 3000")]
    #[case::extra_space("2024-01-05T10:00:00Z    Listening on port 3000   ")]
    fn timestamp_variants_resolve_to_utc(#[case] line: &str) {
        let parsed = parse_line(line);
        assert_eq!(parsed.timestamp, Some(utc(2024, 1, 5, 10, 0, 0)));
        assert_eq!(parsed.message, "Listening on port 3000");
    }

    #[test]
    fn fractional_seconds_are_kept() {
        let parsed = parse_line("2024-01-05T10:00:00.250Z ready");
        let ts = parsed.timestamp.unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);
        assert_eq!(parsed.message, "ready");
    }

    #[test]
    fn impossible_date_falls_back_to_plain_text() {
        let line = "2024-13-45T10:00:00Z something happened";
        assert_eq!(parse_line(line), ParsedLine::plain(line));
    }

    #[test]
    fn timestamp_without_trailing_whitespace_is_not_a_prefix() {
        let line = "2024-01-05T10:00:00Z";
        assert_eq!(parse_line(line), ParsedLine::plain(line));
    }

    #[test]
    fn plain_lines_pass_through_untrimmed() {
        let line = "  indented output  ";
        assert_eq!(parse_line(line), ParsedLine::plain(line));
    }

    #[test]
    fn trailing_fragment_is_held_back() {
        let lines = parse("first\nsecond\nthi");
        assert_eq!(
            lines,
            vec![ParsedLine::plain("first"), ParsedLine::plain("second")]
        );
        assert_eq!(complete_len("first\nsecond\nthi"), "first\nsecond\n".len());
        assert_eq!(complete_len("no break yet"), 0);
    }

    #[test]
    fn blank_lines_keep_their_position() {
        let lines = parse("a\n\n  \nb\n");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].is_blank());
        assert!(lines[2].is_blank());
        assert_eq!(lines[3].message, "b");
    }

    #[test]
    fn crlf_terminators_are_stripped() {
        let lines = parse("one\r\ntwo\r\n");
        assert_eq!(lines, vec![ParsedLine::plain("one"), ParsedLine::plain("two")]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(parse("").is_empty());
        assert_eq!(complete_lines("").count(), 0);
    }
}
