use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};

use crate::models::tag::Tag;

#[derive(Serialize, Deserialize, Default, Clone)]
pub struct Task {
    /// Short opaque id, unique within the task collection
    pub id: String,
    /// Title of the task
    pub title: String,
    /// Whether the task has been completed
    pub completed: bool,
    /// Snapshot of the tag at assignment time, embedded by value
    pub tag: Tag,
    /// The group this task belongs to
    #[serde(rename = "groupId")]
    pub group_id: String,
    /// ISO-8601 timestamp; must always parse (see `parse_timestamp`)
    pub date: String,
    /// Estimated minutes, >= 1
    pub time: u32,
    /// Point value, >= 1
    pub points: u32,
}

/// Parse a stored task date. Accepts a full civil datetime
/// ("2024-03-10T14:00:00") or a bare calendar date, which is read
/// as midnight of that day.
pub fn parse_timestamp(value: &str) -> Option<DateTime> {
    if let Ok(datetime) = value.parse::<DateTime>() {
        return Some(datetime);
    }
    value.parse::<Date>().ok().map(|date| date.at(0, 0, 0, 0))
}

pub fn is_valid_timestamp(value: &str) -> bool {
    parse_timestamp(value).is_some()
}

impl Task {
    /// Calendar day this task is scheduled on, if the date parses.
    pub fn scheduled_day(&self) -> Option<Date> {
        parse_timestamp(&self.date).map(|datetime| datetime.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_datetime() {
        let datetime = parse_timestamp("2024-03-10T14:30:00").unwrap();
        assert_eq!(datetime.date(), Date::new(2024, 3, 10).unwrap());
        assert_eq!(datetime.hour(), 14);
        assert_eq!(datetime.minute(), 30);
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        let datetime = parse_timestamp("2024-03-10").unwrap();
        assert_eq!(datetime.hour(), 0);
        assert_eq!(datetime.minute(), 0);
    }

    #[test]
    fn test_invalid_timestamps_rejected() {
        assert!(!is_valid_timestamp(""));
        assert!(!is_valid_timestamp("not a date"));
        assert!(!is_valid_timestamp("2024-13-40"));
    }
}
