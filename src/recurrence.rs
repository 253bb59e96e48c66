//! Recurrence rule decoding and bounded expansion.
//!
//! Expansion replaces a recurring event with concrete instances inside a
//! window. It always terminates: besides `COUNT`/`UNTIL`, a hard cap on
//! accepted instances bounds rules that carry neither.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Months, TimeDelta, Utc, Weekday};

use crate::config::EngineConfig;
use crate::timeline::event::{EventMetadata, UnifiedEvent};
use crate::timeline::time_utils::add_months;

/// Repetition frequency. Unrecognized input falls back to daily.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// Decoded form of a recurrence rule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceRule {
    pub freq: Frequency,
    /// Frequency units between candidates, always at least 1.
    pub interval: u32,
    pub count: Option<u32>,
    pub until: Option<DateTime<Utc>>,
    pub by_day: Option<Vec<Weekday>>,
    /// Parsed but informational; not consulted during expansion.
    pub by_month_day: Option<Vec<i32>>,
    /// Parsed but informational; not consulted during expansion.
    pub by_month: Option<Vec<u32>>,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        Self {
            freq: Frequency::default(),
            interval: 1,
            count: None,
            until: None,
            by_day: None,
            by_month_day: None,
            by_month: None,
        }
    }
}

impl RecurrenceRule {
    /// Decode `KEY=VALUE;...`. Unrecognized keys are ignored and malformed
    /// values fall back to the field default rather than failing.
    pub fn parse(rule: &str) -> Self {
        let mut out = Self::default();
        for part in rule.split(';') {
            let Some((key, value)) = part.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "FREQ" => out.freq = Frequency::from_str(value).unwrap_or_default(),
                "INTERVAL" => {
                    out.interval = value.parse().ok().filter(|&n| n >= 1).unwrap_or(1)
                }
                "COUNT" => out.count = value.parse().ok().filter(|&n| n >= 1),
                "UNTIL" => out.until = parse_until(value),
                "BYDAY" => {
                    out.by_day = Some(value.split(',').filter_map(parse_weekday_code).collect())
                }
                "BYMONTHDAY" => {
                    out.by_month_day =
                        Some(value.split(',').filter_map(|v| v.trim().parse().ok()).collect())
                }
                "BYMONTH" => {
                    out.by_month =
                        Some(value.split(',').filter_map(|v| v.trim().parse().ok()).collect())
                }
                _ => {}
            }
        }
        out
    }
}

/// `UNTIL` accepts the same `YYYYMMDD` / `YYYYMMDDTHHMMSSZ` forms as
/// DTSTART values.
fn parse_until(value: &str) -> Option<DateTime<Utc>> {
    crate::ics::values::decode_date(value, &HashMap::new()).map(|(dt, _)| dt)
}

/// Map a BYDAY code, tolerating ordinal prefixes like `2MO` or `-1SU`.
/// Unmappable codes are ignored.
fn parse_weekday_code(code: &str) -> Option<Weekday> {
    let code = code
        .trim()
        .trim_start_matches(|c: char| c == '+' || c == '-' || c.is_ascii_digit());
    match code {
        "SU" => Some(Weekday::Sun),
        "MO" => Some(Weekday::Mon),
        "TU" => Some(Weekday::Tue),
        "WE" => Some(Weekday::Wed),
        "TH" => Some(Weekday::Thu),
        "FR" => Some(Weekday::Fri),
        "SA" => Some(Weekday::Sat),
        _ => None,
    }
}

/// Next candidate. Saturates to `current` when the step overflows the
/// calendar range; the expander treats a non-advancing candidate as the end.
fn advance(current: DateTime<Utc>, freq: Frequency, interval: u32) -> DateTime<Utc> {
    match freq {
        Frequency::Daily => current
            .checked_add_signed(TimeDelta::days(i64::from(interval)))
            .unwrap_or(current),
        Frequency::Weekly => current
            .checked_add_signed(TimeDelta::weeks(i64::from(interval)))
            .unwrap_or(current),
        Frequency::Monthly => current
            .checked_add_months(Months::new(interval))
            .unwrap_or(current),
        Frequency::Yearly => current
            .checked_add_months(Months::new(interval.saturating_mul(12)))
            .unwrap_or(current),
    }
}

/// Expand one event into concrete instances within the window.
///
/// Non-recurring events (or recurring ones without a stored rule) pass
/// through unchanged as a single-element list. `window` defaults to one
/// month before `now` through `config.expansion_months` after.
pub fn expand_event(
    event: &UnifiedEvent,
    now: DateTime<Utc>,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    config: &EngineConfig,
) -> Vec<UnifiedEvent> {
    let rule_text = match &event.metadata {
        EventMetadata::CalendarFeed { rrule: Some(rule), .. } if event.is_recurring => {
            rule.clone()
        }
        _ => return vec![event.clone()],
    };
    let rule = RecurrenceRule::parse(&rule_text);

    let (range_start, range_end) = window.unwrap_or_else(|| {
        (add_months(now, -1), add_months(now, config.expansion_months as i32))
    });

    let duration = match event.end_date {
        Some(end) if end > event.start_date => Some(end - event.start_date),
        _ => None,
    };

    let mut instances = Vec::new();
    let mut accepted: u32 = 0;
    let mut current = event.start_date;

    // The anchor occurrence is instance 0 when it falls inside the window.
    if current >= range_start && current <= range_end {
        instances.push(make_instance(event, current, duration, accepted));
        accepted += 1;
    }

    while accepted < config.max_instances {
        let next = advance(current, rule.freq, rule.interval);
        if next <= current {
            break;
        }
        current = next;

        if rule.until.is_some_and(|until| current > until) {
            break;
        }
        if current > range_end {
            break;
        }
        if rule.count.is_some_and(|count| accepted >= count) {
            break;
        }

        // Weekly BYDAY constraint: skipped candidates are not counted.
        if rule.freq == Frequency::Weekly {
            if let Some(ref by_day) = rule.by_day {
                if !by_day.contains(&current.weekday()) {
                    continue;
                }
            }
        }
        // Candidates before the window are skipped, not counted.
        if current < range_start {
            continue;
        }

        instances.push(make_instance(event, current, duration, accepted));
        accepted += 1;
    }

    if accepted >= config.max_instances {
        tracing::warn!(
            event = %event.id,
            cap = config.max_instances,
            "recurrence expansion stopped at the instance cap"
        );
    }

    instances
}

/// Expand every event in a merged list.
pub fn expand_all(
    events: &[UnifiedEvent],
    now: DateTime<Utc>,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    config: &EngineConfig,
) -> Vec<UnifiedEvent> {
    events
        .iter()
        .flat_map(|event| expand_event(event, now, window, config))
        .collect()
}

fn make_instance(
    parent: &UnifiedEvent,
    start: DateTime<Utc>,
    duration: Option<TimeDelta>,
    index: u32,
) -> UnifiedEvent {
    let mut instance = parent.clone();
    instance.id = format!("{}-{}", parent.id, index);
    instance.start_date = start;
    instance.end_date = duration.map(|d| start + d);
    instance.recurrence_anchor_id = Some(parent.id.clone());
    if let EventMetadata::CalendarFeed { instance_index, .. } = &mut instance.metadata {
        *instance_index = Some(index);
    }
    instance
}
