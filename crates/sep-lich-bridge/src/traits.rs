// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the native alarm capability.
//
// The channel only ever sees `AlarmScheduler`. Intent-based platforms split
// the work further into `IntentHost`, so the "resolve, then start" order can
// be exercised without a device.

use sep_lich_core::AlarmRequest;
use sep_lich_core::error::Result;

use crate::intent::AlarmIntent;

/// Hands an alarm request to the host's clock facility.
pub trait AlarmScheduler: Send + Sync {
    /// Human-readable platform name (e.g. "Android", "Desktop (stub)").
    fn platform_name(&self) -> &str;

    /// Ask the host to create the alarm.
    ///
    /// Returns `Ok(true)` once the request has been handed off. The user may
    /// still dismiss the clock app's confirmation screen; that is not observed.
    /// Returns `SepLichError::NoClockApp` when nothing on the device can take it.
    fn schedule(&self, request: &AlarmRequest) -> Result<bool>;
}

impl<T: AlarmScheduler + ?Sized> AlarmScheduler for Box<T> {
    fn platform_name(&self) -> &str {
        (**self).platform_name()
    }

    fn schedule(&self, request: &AlarmRequest) -> Result<bool> {
        (**self).schedule(request)
    }
}

/// Host side of intent dispatch.
pub trait IntentHost: Send + Sync {
    /// Human-readable platform name.
    fn platform_name(&self) -> &str;

    /// Whether any installed application can handle the intent.
    fn resolves(&self, intent: &AlarmIntent) -> Result<bool>;

    /// Start the activity that handles the intent.
    fn start(&self, intent: &AlarmIntent) -> Result<()>;
}
