use chrono::{DateTime, Months, Utc};

/// Midnight at the start of the instant's calendar day.
pub fn start_of_day(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc()
}

pub fn is_same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.date_naive() == b.date_naive()
}

/// Past means strictly before the start of `now`'s calendar day.
pub fn is_past(dt: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    dt < start_of_day(now)
}

/// Calendar-aware month stepping; day-of-month clamps at month end
/// (Jan 31 + 1 month = Feb 29/28).
pub fn add_months(dt: DateTime<Utc>, months: i32) -> DateTime<Utc> {
    if months >= 0 {
        dt.checked_add_months(Months::new(months as u32)).unwrap_or(dt)
    } else {
        dt.checked_sub_months(Months::new(months.unsigned_abs())).unwrap_or(dt)
    }
}

/// Human label for a day group: "Today", "Tomorrow", or the full date.
pub fn date_label(day: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let date = day.date_naive();
    let today = now.date_naive();
    if date == today {
        "Today".to_string()
    } else if today.succ_opt() == Some(date) {
        "Tomorrow".to_string()
    } else {
        date.format("%A, %B %-d, %Y").to_string()
    }
}

/// Clock time for display, e.g. "9:00 AM".
pub fn format_time(dt: DateTime<Utc>) -> String {
    dt.format("%-I:%M %p").to_string()
}

/// Compact start/end range for an event row.
pub fn format_date_range(
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
    is_all_day: bool,
) -> String {
    if is_all_day {
        return match end {
            Some(end) if !is_same_day(start, end) => {
                format!("{} - {}", start.format("%b %-d"), end.format("%b %-d"))
            }
            _ => "All day".to_string(),
        };
    }

    match end {
        None => format_time(start),
        Some(end) if is_same_day(start, end) => {
            format!("{} - {}", format_time(start), format_time(end))
        }
        Some(end) => format!(
            "{} - {}",
            start.format("%b %-d, %-I:%M %p"),
            end.format("%b %-d, %-I:%M %p")
        ),
    }
}
