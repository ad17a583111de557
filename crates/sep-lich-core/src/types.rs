// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the alarm bridge.

use chrono::Weekday;
use serde::Serialize;
use serde_json::Value;

/// Highest valid hour of day.
pub const MAX_HOUR: u8 = 23;
/// Highest valid minute of hour.
pub const MAX_MINUTE: u8 = 59;

/// Map the app's day-of-week code (1 = Monday … 7 = Sunday) to a weekday.
///
/// Any other code means "no specific day".
pub fn weekday_from_code(code: i64) -> Option<Weekday> {
    match code {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// `java.util.Calendar` day constant for a weekday (SUNDAY = 1 … SATURDAY = 7).
pub fn calendar_day(day: Weekday) -> i32 {
    day.number_from_sunday() as i32
}

/// One "set alarm" request, built per call and dropped after dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlarmRequest {
    /// Hour of day, 0–23.
    pub hour: u8,
    /// Minute of hour, 0–59.
    pub minute: u8,
    /// Label shown by the clock app.
    pub message: String,
    /// Recurrence days. Empty means the clock app decides (usually one-shot).
    pub days: Vec<Weekday>,
    /// Whether the clock app may skip its confirmation screen. Always `false`.
    pub skip_ui: bool,
}

impl AlarmRequest {
    pub fn new(hour: u8, minute: u8, message: impl Into<String>) -> Self {
        Self {
            hour,
            minute,
            message: message.into(),
            days: Vec::new(),
            skip_ui: false,
        }
    }

    /// Attach a single recurrence day, replacing any previous one.
    pub fn with_weekday(mut self, day: Weekday) -> Self {
        self.days = vec![day];
        self
    }

    /// Decode the `createAlarm` argument map.
    ///
    /// Never fails. Each field is read independently and falls back to its
    /// default when missing, of the wrong type, or out of range: hour and
    /// minute to 0, message to "", weekday to no day. A non-map argument
    /// value yields the all-defaults request.
    pub fn from_arguments(arguments: &Value) -> Self {
        let hour = bounded_argument(arguments, "hour", MAX_HOUR);
        let minute = bounded_argument(arguments, "minute", MAX_MINUTE);
        let message = arguments
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();

        let request = Self::new(hour, minute, message);
        match arguments
            .get("weekday")
            .and_then(Value::as_i64)
            .and_then(weekday_from_code)
        {
            Some(day) => request.with_weekday(day),
            None => request,
        }
    }

    /// Recurrence days as `java.util.Calendar` constants.
    pub fn calendar_days(&self) -> Vec<i32> {
        self.days.iter().copied().map(calendar_day).collect()
    }
}

fn bounded_argument(arguments: &Value, key: &str, max: u8) -> u8 {
    arguments
        .get(key)
        .and_then(Value::as_i64)
        .and_then(|v| u8::try_from(v).ok())
        .filter(|v| *v <= max)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn weekday_codes_start_on_monday() {
        let expected = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        for (code, day) in (1..=7).zip(expected) {
            assert_eq!(weekday_from_code(code), Some(day));
        }
    }

    #[test]
    fn unknown_weekday_codes_mean_no_day() {
        for code in [0, 8, -1, 100, i64::MAX] {
            assert_eq!(weekday_from_code(code), None, "code {code}");
        }
    }

    #[test]
    fn calendar_constants_match_java() {
        assert_eq!(calendar_day(Weekday::Sun), 1);
        assert_eq!(calendar_day(Weekday::Mon), 2);
        assert_eq!(calendar_day(Weekday::Fri), 6);
        assert_eq!(calendar_day(Weekday::Sat), 7);
    }

    #[test]
    fn wake_up_scenario() {
        let args = json!({"hour": 7, "minute": 30, "message": "Wake up", "weekday": 1});
        let request = AlarmRequest::from_arguments(&args);
        assert_eq!(request.hour, 7);
        assert_eq!(request.minute, 30);
        assert_eq!(request.message, "Wake up");
        assert_eq!(request.days, vec![Weekday::Mon]);
        assert_eq!(request.calendar_days(), vec![2]);
        assert!(!request.skip_ui);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let request = AlarmRequest::from_arguments(&json!({"hour": 9, "minute": 0}));
        assert_eq!(request, AlarmRequest::new(9, 0, ""));

        let request = AlarmRequest::from_arguments(&json!({}));
        assert_eq!(request, AlarmRequest::new(0, 0, ""));
    }

    #[test]
    fn wrong_types_take_defaults() {
        let args = json!({"hour": "7", "minute": 30.5, "message": 12, "weekday": "1"});
        let request = AlarmRequest::from_arguments(&args);
        assert_eq!(request, AlarmRequest::new(0, 0, ""));
    }

    #[test]
    fn out_of_range_time_takes_defaults() {
        let request = AlarmRequest::from_arguments(&json!({"hour": 24, "minute": 60}));
        assert_eq!((request.hour, request.minute), (0, 0));

        let request = AlarmRequest::from_arguments(&json!({"hour": -1, "minute": 300}));
        assert_eq!((request.hour, request.minute), (0, 0));
    }

    #[test]
    fn boundary_times_are_kept() {
        let request = AlarmRequest::from_arguments(&json!({"hour": 23, "minute": 59}));
        assert_eq!((request.hour, request.minute), (23, 59));
    }

    #[test]
    fn non_map_arguments_decode_to_defaults() {
        for args in [Value::Null, json!([7, 30]), json!("createAlarm"), json!(true)] {
            assert_eq!(AlarmRequest::from_arguments(&args), AlarmRequest::new(0, 0, ""));
        }
    }

    #[test]
    fn invalid_weekday_is_dropped() {
        let request = AlarmRequest::from_arguments(&json!({"hour": 6, "weekday": 9}));
        assert!(request.days.is_empty());
        assert_eq!(request.hour, 6);
    }

    #[test]
    fn with_weekday_replaces_previous_day() {
        let request = AlarmRequest::new(8, 15, "Gym")
            .with_weekday(Weekday::Tue)
            .with_weekday(Weekday::Sun);
        assert_eq!(request.days, vec![Weekday::Sun]);
    }
}
