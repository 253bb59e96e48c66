//! Decoding and formatting of date, date-time, and duration values.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

/// Decode a DTSTART/DTEND-style value into an instant plus an all-day flag.
///
/// A value is all-day when its `VALUE` parameter is `DATE` or its raw length
/// is exactly eight characters (`YYYYMMDD`). Zulu-suffixed date-times are
/// UTC; naive ones are adopted as-is with no zone conversion. Undecodable
/// input yields `None`.
pub fn decode_date(
    value: &str,
    params: &HashMap<String, String>,
) -> Option<(DateTime<Utc>, bool)> {
    let value = value.trim();
    let all_day =
        params.get("VALUE").map(String::as_str) == Some("DATE") || value.len() == 8;

    if all_day {
        let date = NaiveDate::parse_from_str(value.get(..8)?, "%Y%m%d").ok()?;
        return Some((date.and_hms_opt(0, 0, 0)?.and_utc(), true));
    }

    let body = value.strip_suffix('Z').unwrap_or(value);
    let dt = NaiveDateTime::parse_from_str(body, "%Y%m%dT%H%M%S")
        .or_else(|_| NaiveDateTime::parse_from_str(body, "%Y%m%dT%H%M"))
        .ok()?;
    Some((dt.and_utc(), false))
}

/// Add an ISO 8601 duration subset (`P[nW][nD][T[nH][nM][nS]]`) to `start`.
/// Input outside the subset returns `start` unchanged.
pub fn decode_duration(start: DateTime<Utc>, value: &str) -> DateTime<Utc> {
    let Some(body) = value.trim().strip_prefix('P') else {
        return start;
    };

    let mut total = TimeDelta::zero();
    let mut digits = String::new();
    let mut in_time = false;

    for c in body.chars() {
        match c {
            'T' => {
                in_time = true;
                digits.clear();
            }
            '0'..='9' => digits.push(c),
            'W' | 'D' | 'H' | 'M' | 'S' => {
                let Ok(n) = digits.parse::<i64>() else {
                    return start;
                };
                digits.clear();
                let step = match (c, in_time) {
                    ('W', false) => TimeDelta::weeks(n),
                    ('D', false) => TimeDelta::days(n),
                    ('H', true) => TimeDelta::hours(n),
                    ('M', true) => TimeDelta::minutes(n),
                    ('S', true) => TimeDelta::seconds(n),
                    _ => return start,
                };
                total += step;
            }
            _ => return start,
        }
    }

    start + total
}

/// `YYYYMMDDTHHMMSSZ` — timed values are always re-emitted in UTC.
pub fn format_utc(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}

/// `YYYYMMDD` for all-day values.
pub fn format_date(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%d").to_string()
}
