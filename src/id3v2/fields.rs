//! Typed fields derived from the frame map.

use crate::id3v2::frame_map::FrameMap;
use crate::id3v2::{ParseError, ParseResult};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// The frames searched for a timestamp, in order of preference.
const DATE_FRAMES: &[&str] = &["TDRC", "TDRL", "TDOR", "TDAT", "TIME", "TYER"];

#[derive(Clone, Copy)]
enum Layout {
    /// A timestamp with a UTC offset. A trailing `Z` is read as `+0000`.
    Zoned(&'static str),
    /// A timestamp with no offset, taken to be UTC.
    Naive(&'static str),
    /// A timestamp that stops at the hour.
    Hour,
    /// A date with no time.
    Date(&'static str),
    /// A year and a month.
    Month,
    /// Exactly four digits.
    Year,
}

const DATE_LAYOUTS: &[Layout] = &[
    Layout::Zoned("%Y-%m-%dT%H:%M:%S%z"),
    Layout::Zoned("%Y-%m-%dT%H:%M:%S%:z"),
    Layout::Naive("%Y-%m-%dT%H:%M:%S"),
    Layout::Zoned("%Y-%m-%dT%H:%M%z"),
    Layout::Zoned("%Y-%m-%dT%H:%M%:z"),
    Layout::Naive("%Y-%m-%dT%H:%M"),
    Layout::Hour,
    Layout::Date("%Y-%m-%d"),
    Layout::Month,
    Layout::Year,
    Layout::Date("%Y/%m/%d"),
    Layout::Date("%Y.%m.%d"),
];

/// Parses a `TPOS`/`TRCK` style field into a value and a total, such as `2/10` or
/// `2 of 10`. Missing numbers are zero.
pub(crate) fn parse_number_pair(field: &str) -> ParseResult<(i32, i32)> {
    let mut numbers = field
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty() && !token.eq_ignore_ascii_case("of"))
        .take(2)
        .map(|token| {
            token
                .parse::<i32>()
                .map_err(|_| ParseError::BadNumberField(field.to_string()))
        });

    let value = numbers.next().transpose()?.unwrap_or(0);
    let total = numbers.next().transpose()?.unwrap_or(0);

    Ok((value, total))
}

/// Resolves the release date of a tag. ID3v2.3 splits the date across `TYER`, `TDAT`
/// and `TIME`, which are tried together first. Failing that, every date frame is tried
/// against every known layout.
pub(crate) fn parse_date(frames: &FrameMap) -> Option<DateTime<FixedOffset>> {
    let field = |id: &str| frames.get(id).filter(|value| !value.is_empty());

    if let Some(year) = field("TYER") {
        let date = match field("TDAT") {
            Some(day_month) => compose_date(year, day_month, field("TIME").unwrap_or("0000"))
                .or_else(|| parse_year(year)),
            None => parse_year(year),
        };

        if let Some(date) = date {
            return Some(utc(date));
        }
    }

    DATE_FRAMES
        .iter()
        .filter_map(|id| frames.get(id))
        .find_map(parse_timestamp)
}

/// Composes a `YYYY` year, `DDMM` day and month and `HHMM` time into one timestamp.
fn compose_date(year: &str, day_month: &str, time: &str) -> Option<NaiveDateTime> {
    let year = parse_digits(year)?;
    let day_month = parse_digits(day_month)?;
    let time = parse_digits(time)?;

    NaiveDate::from_ymd_opt(year as i32, day_month % 100, day_month / 100)?.and_hms_opt(
        time / 100,
        time % 100,
        0,
    )
}

fn parse_year(year: &str) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(parse_digits(year)? as i32, 1, 1)?.and_hms_opt(0, 0, 0)
}

/// Parses exactly four ASCII digits.
fn parse_digits(digits: &str) -> Option<u32> {
    if digits.len() != 4 || !digits.bytes().all(|ch| ch.is_ascii_digit()) {
        return None;
    }

    digits.parse().ok()
}

fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DATE_LAYOUTS
        .iter()
        .find_map(|&layout| parse_layout(value, layout))
}

fn parse_layout(value: &str, layout: Layout) -> Option<DateTime<FixedOffset>> {
    match layout {
        Layout::Zoned(fmt) => {
            let value = match value.strip_suffix('Z') {
                Some(value) => format!("{}+0000", value),
                None => value.to_string(),
            };

            DateTime::parse_from_str(&value, fmt).ok()
        }

        Layout::Naive(fmt) => NaiveDateTime::parse_from_str(value, fmt).ok().map(utc),

        Layout::Hour => {
            NaiveDateTime::parse_from_str(&format!("{}:00", value), "%Y-%m-%dT%H:%M")
                .ok()
                .map(utc)
        }

        Layout::Date(fmt) => NaiveDate::parse_from_str(value, fmt)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(utc),

        Layout::Month => NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(utc),

        Layout::Year => parse_year(value).map(utc),
    }
}

fn utc(date: NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.from_utc_datetime(&date).into()
}
