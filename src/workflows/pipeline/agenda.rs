use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::calendar::CalendarEvent;

/// Events falling on an exact calendar day, time-of-day ignored. The
/// relative order of `events` is preserved so callers may pre-sort.
pub fn events_on_day<'a>(events: &'a [CalendarEvent], day: NaiveDate) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|event| event.date.date() == day)
        .collect()
}

/// Events within a calendar month, order preserved. An out-of-range
/// month simply matches nothing.
pub fn events_in_month<'a>(
    events: &'a [CalendarEvent],
    year: i32,
    month: u32,
) -> Vec<&'a CalendarEvent> {
    events
        .iter()
        .filter(|event| {
            let date = event.date.date();
            date.year() == year && date.month() == month
        })
        .collect()
}

/// Events strictly after `now`, soonest first, truncated to `limit`.
/// A zero limit yields an empty list; date ties keep input order.
pub fn upcoming<'a>(
    events: &'a [CalendarEvent],
    now: NaiveDateTime,
    limit: usize,
) -> Vec<&'a CalendarEvent> {
    let mut future: Vec<&CalendarEvent> =
        events.iter().filter(|event| event.date > now).collect();
    future.sort_by_key(|event| event.date);
    future.truncate(limit);
    future
}
