//! Timeline label helpers.
//!
//! A timeline is an ordered list of date labels such as `"1/1"`. Order defines
//! the period sequence; the labels themselves are opaque to the cost engine.

use chrono::{Datelike, Days, NaiveDate};

#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("{days} days from {start} runs past the last supported date")]
    RangeOutOfBounds { start: NaiveDate, days: u32 },
}

/// Format a calendar date as a `month/day` label without zero padding.
pub fn format_label(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

/// One label per calendar day from `start` to `end`, inclusive. Empty when
/// `end` precedes `start`.
pub fn generate_dates(start: NaiveDate, end: NaiveDate) -> Vec<String> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(format_label)
        .collect()
}

pub fn generate_dates_from_str(start: &str, end: &str) -> Result<Vec<String>, TimelineError> {
    let start = parse_iso(start)?;
    let end = parse_iso(end)?;
    Ok(generate_dates(start, end))
}

/// `days` consecutive labels starting at `today`.
pub fn quick_range(today: NaiveDate, days: u32) -> Result<Vec<String>, TimelineError> {
    if days == 0 {
        return Ok(Vec::new());
    }
    let end = today
        .checked_add_days(Days::new(u64::from(days) - 1))
        .ok_or(TimelineError::RangeOutOfBounds { start: today, days })?;
    Ok(generate_dates(today, end))
}

/// Label used when a date is appended by hand: `1/{len + 1}`, moved forward
/// past labels already in the timeline.
pub fn next_label(dates: &[String]) -> String {
    let mut n = dates.len() + 1;
    loop {
        let candidate = format!("1/{n}");
        if !dates.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Remove the label at `index`, keeping at least one label in the timeline.
/// Returns the new sequence, or `None` when nothing was removed.
pub fn remove_label(dates: &[String], index: usize) -> Option<Vec<String>> {
    if dates.len() <= 1 || index >= dates.len() {
        return None;
    }
    let mut next = dates.to_vec();
    next.remove(index);
    Some(next)
}

fn parse_iso(s: &str) -> Result<NaiveDate, TimelineError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| TimelineError::InvalidDate(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_generate_across_month_boundary() {
        let dates = generate_dates(date(2026, 1, 30), date(2026, 2, 2));
        assert_eq!(dates, vec!["1/30", "1/31", "2/1", "2/2"]);
    }

    #[test]
    fn test_generate_reversed_range_is_empty() {
        assert!(generate_dates(date(2026, 3, 2), date(2026, 3, 1)).is_empty());
    }

    #[test]
    fn test_generate_from_str() {
        let dates = generate_dates_from_str("2026-01-01", "2026-01-03").unwrap();
        assert_eq!(dates, vec!["1/1", "1/2", "1/3"]);

        assert!(matches!(
            generate_dates_from_str("01/01/2026", "2026-01-03"),
            Err(TimelineError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_quick_range() {
        let dates = quick_range(date(2026, 12, 30), 7).unwrap();
        assert_eq!(dates.len(), 7);
        assert_eq!(dates.first().unwrap(), "12/30");
        assert_eq!(dates.last().unwrap(), "1/5");

        assert!(quick_range(date(2026, 1, 1), 0).unwrap().is_empty());
    }

    #[test]
    fn test_quick_range_past_calendar_end() {
        let result = quick_range(date(2026, 10, 19), 200_000_000);
        assert!(matches!(
            result,
            Err(TimelineError::RangeOutOfBounds { days: 200_000_000, .. })
        ));

        assert!(quick_range(NaiveDate::MAX, 2).is_err());
    }

    #[test]
    fn test_next_and_remove_label() {
        let dates = vec!["1/1".to_string(), "1/2".to_string()];
        assert_eq!(next_label(&dates), "1/3");
        assert_eq!(next_label(&["1/2".to_string()]), "1/3");

        assert_eq!(remove_label(&dates, 0), Some(vec!["1/2".to_string()]));
        assert_eq!(remove_label(&dates, 5), None);
        assert_eq!(remove_label(&dates[..1], 0), None);
    }
}
