// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub intent host for desktop/CI builds where there is no clock app to hand
// alarms to. Nothing ever resolves, so the channel answers NO_CLOCK_APP.

use sep_lich_core::error::{Result, SepLichError};

use crate::intent::AlarmIntent;
use crate::traits::IntentHost;

/// No-op host returned on non-Android platforms.
pub struct StubIntentHost;

impl IntentHost for StubIntentHost {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn resolves(&self, intent: &AlarmIntent) -> Result<bool> {
        tracing::warn!(action = intent.action, "IntentHost::resolves called on stub host");
        Ok(false)
    }

    fn start(&self, _intent: &AlarmIntent) -> Result<()> {
        tracing::warn!("IntentHost::start called on stub host");
        Err(SepLichError::PlatformUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use sep_lich_core::BridgeConfig;

    use super::*;
    use crate::alarm_scheduler;
    use crate::channel::{AlarmChannel, CREATE_ALARM, MethodResponse};
    use crate::traits::AlarmScheduler;

    #[test]
    fn platform_name() {
        assert_eq!(alarm_scheduler().platform_name(), "Desktop (stub)");
    }

    #[test]
    fn desktop_has_no_clock_app() {
        let channel = AlarmChannel::new(&BridgeConfig::default(), alarm_scheduler());
        match channel.handle(CREATE_ALARM, &json!({"hour": 7, "minute": 30})) {
            MethodResponse::Error { code, details, .. } => {
                assert_eq!(code, "NO_CLOCK_APP");
                assert!(details.is_none());
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn start_is_unavailable() {
        let intent = AlarmIntent::set_alarm(&sep_lich_core::AlarmRequest::new(1, 2, ""));
        assert!(matches!(
            StubIntentHost.start(&intent),
            Err(SepLichError::PlatformUnavailable)
        ));
    }
}
