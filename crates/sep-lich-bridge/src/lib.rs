// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

//! Sep Lich: alarm bridge between the Flutter method channel and the
//! host clock application.
//!
//! The Flutter side calls `createAlarm` on the `com.example.sep_lich/alarm`
//! channel. [`channel::AlarmChannel`] decodes the arguments into an
//! [`AlarmRequest`](sep_lich_core::AlarmRequest) and hands it to an
//! [`traits::AlarmScheduler`], which on Android fires the system
//! `SET_ALARM` intent through JNI.

pub mod channel;
pub mod intent;
pub mod logging;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

use intent::IntentScheduler;

/// Retrieves the alarm scheduler for the target operating system.
///
/// RETURNS: A boxed trait object (`dyn AlarmScheduler`) that hides whether the
/// intent goes to a real clock app or nowhere at all.
pub fn alarm_scheduler() -> Box<dyn traits::AlarmScheduler> {
    #[cfg(target_os = "android")]
    {
        // Android: Uses `jni-rs` to build and start the intent on the JVM/ART.
        Box::new(IntentScheduler::new(android::AndroidIntentHost::new()))
    }
    #[cfg(not(target_os = "android"))]
    {
        // DESKTOP/CI: No clock app ever resolves, so callers see NO_CLOCK_APP.
        Box::new(IntentScheduler::new(stub::StubIntentHost))
    }
}
