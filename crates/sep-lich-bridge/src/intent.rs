// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The `AlarmClock.ACTION_SET_ALARM` intent as plain data, and the scheduler
// that resolves and starts it through an `IntentHost`.

use sep_lich_core::AlarmRequest;
use sep_lich_core::error::{Result, SepLichError};
use tracing::{info, warn};

use crate::traits::{AlarmScheduler, IntentHost};

/// `AlarmClock.ACTION_SET_ALARM`
pub const ACTION_SET_ALARM: &str = "android.intent.action.SET_ALARM";
/// `AlarmClock.EXTRA_HOUR`
pub const EXTRA_HOUR: &str = "android.intent.extra.alarm.HOUR";
/// `AlarmClock.EXTRA_MINUTES`
pub const EXTRA_MINUTES: &str = "android.intent.extra.alarm.MINUTES";
/// `AlarmClock.EXTRA_MESSAGE`
pub const EXTRA_MESSAGE: &str = "android.intent.extra.alarm.MESSAGE";
/// `AlarmClock.EXTRA_SKIP_UI`
pub const EXTRA_SKIP_UI: &str = "android.intent.extra.alarm.SKIP_UI";
/// `AlarmClock.EXTRA_DAYS`
pub const EXTRA_DAYS: &str = "android.intent.extra.alarm.DAYS";

/// Typed value of an intent extra; picks the `putExtra` overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtraValue {
    Int(i32),
    Bool(bool),
    Text(String),
    /// `ArrayList<Integer>`
    IntList(Vec<i32>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentExtra {
    pub key: &'static str,
    pub value: ExtraValue,
}

/// An implicit intent: an action plus its extras, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmIntent {
    pub action: &'static str,
    pub extras: Vec<IntentExtra>,
}

impl AlarmIntent {
    /// Build the set-alarm intent for a request.
    ///
    /// The DAYS extra is only attached when the request carries a day, so the
    /// clock app applies its own one-shot semantics otherwise.
    pub fn set_alarm(request: &AlarmRequest) -> Self {
        let mut extras = vec![
            IntentExtra {
                key: EXTRA_HOUR,
                value: ExtraValue::Int(i32::from(request.hour)),
            },
            IntentExtra {
                key: EXTRA_MINUTES,
                value: ExtraValue::Int(i32::from(request.minute)),
            },
            IntentExtra {
                key: EXTRA_MESSAGE,
                value: ExtraValue::Text(request.message.clone()),
            },
            IntentExtra {
                key: EXTRA_SKIP_UI,
                value: ExtraValue::Bool(request.skip_ui),
            },
        ];

        let days = request.calendar_days();
        if !days.is_empty() {
            extras.push(IntentExtra {
                key: EXTRA_DAYS,
                value: ExtraValue::IntList(days),
            });
        }

        Self {
            action: ACTION_SET_ALARM,
            extras,
        }
    }

    /// Look up an extra by key.
    pub fn extra(&self, key: &str) -> Option<&ExtraValue> {
        self.extras.iter().find(|e| e.key == key).map(|e| &e.value)
    }
}

/// `AlarmScheduler` for hosts that take alarms as intents.
pub struct IntentScheduler<H> {
    host: H,
}

impl<H: IntentHost> IntentScheduler<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl<H: IntentHost> AlarmScheduler for IntentScheduler<H> {
    fn platform_name(&self) -> &str {
        self.host.platform_name()
    }

    fn schedule(&self, request: &AlarmRequest) -> Result<bool> {
        let intent = AlarmIntent::set_alarm(request);

        if !self.host.resolves(&intent)? {
            warn!(
                platform = self.host.platform_name(),
                "no activity resolves {}", intent.action
            );
            return Err(SepLichError::NoClockApp);
        }

        self.host.start(&intent)?;
        info!(
            hour = request.hour,
            minute = request.minute,
            days = ?request.days,
            "set-alarm intent handed to clock app"
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use chrono::Weekday;

    use super::*;

    /// Records every intent it is asked about.
    struct FakeHost {
        has_clock_app: bool,
        resolved: Mutex<Vec<AlarmIntent>>,
        started: Mutex<Vec<AlarmIntent>>,
    }

    impl FakeHost {
        fn new(has_clock_app: bool) -> Self {
            Self {
                has_clock_app,
                resolved: Mutex::new(Vec::new()),
                started: Mutex::new(Vec::new()),
            }
        }
    }

    impl IntentHost for FakeHost {
        fn platform_name(&self) -> &str {
            "fake"
        }

        fn resolves(&self, intent: &AlarmIntent) -> Result<bool> {
            self.resolved.lock().unwrap().push(intent.clone());
            Ok(self.has_clock_app)
        }

        fn start(&self, intent: &AlarmIntent) -> Result<()> {
            self.started.lock().unwrap().push(intent.clone());
            Ok(())
        }
    }

    #[test]
    fn intent_carries_time_message_and_confirmation_flag() {
        let intent = AlarmIntent::set_alarm(&AlarmRequest::new(9, 0, ""));
        assert_eq!(intent.action, ACTION_SET_ALARM);
        assert_eq!(intent.extra(EXTRA_HOUR), Some(&ExtraValue::Int(9)));
        assert_eq!(intent.extra(EXTRA_MINUTES), Some(&ExtraValue::Int(0)));
        assert_eq!(intent.extra(EXTRA_MESSAGE), Some(&ExtraValue::Text(String::new())));
        assert_eq!(intent.extra(EXTRA_SKIP_UI), Some(&ExtraValue::Bool(false)));
        assert_eq!(intent.extra(EXTRA_DAYS), None);
    }

    #[test]
    fn days_extra_uses_calendar_constants() {
        let request = AlarmRequest::new(7, 30, "Wake up").with_weekday(Weekday::Mon);
        let intent = AlarmIntent::set_alarm(&request);
        assert_eq!(intent.extra(EXTRA_DAYS), Some(&ExtraValue::IntList(vec![2])));

        let request = AlarmRequest::new(7, 30, "Wake up").with_weekday(Weekday::Sun);
        let intent = AlarmIntent::set_alarm(&request);
        assert_eq!(intent.extra(EXTRA_DAYS), Some(&ExtraValue::IntList(vec![1])));
    }

    #[test]
    fn resolvable_intent_is_started() {
        let scheduler = IntentScheduler::new(FakeHost::new(true));
        let request = AlarmRequest::new(6, 45, "Run");

        assert!(scheduler.schedule(&request).unwrap());
        let started = scheduler.host().started.lock().unwrap();
        assert_eq!(started.as_slice(), &[AlarmIntent::set_alarm(&request)]);
    }

    #[test]
    fn unresolvable_intent_is_never_started() {
        let scheduler = IntentScheduler::new(FakeHost::new(false));

        let err = scheduler.schedule(&AlarmRequest::new(6, 45, "Run")).unwrap_err();
        assert!(matches!(err, SepLichError::NoClockApp));
        assert_eq!(scheduler.host().resolved.lock().unwrap().len(), 1);
        assert!(scheduler.host().started.lock().unwrap().is_empty());
    }
}
