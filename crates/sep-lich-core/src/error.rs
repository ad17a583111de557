// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the alarm bridge.

use thiserror::Error;

/// Error code reported to the Flutter caller when no clock app can take the alarm.
pub const NO_CLOCK_APP_CODE: &str = "NO_CLOCK_APP";

/// Fixed caller-facing message for [`SepLichError::NoClockApp`].
/// Shown verbatim by the app; it is not localized.
pub const NO_CLOCK_APP_MESSAGE: &str = "Không tìm thấy ứng dụng Đồng hồ trên thiết bị.";

/// Top-level error type for all alarm bridge operations.
#[derive(Debug, Error)]
pub enum SepLichError {
    // -- Host capability --
    #[error("no clock application found on the device")]
    NoClockApp,

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SepLichError {
    /// Error code carried in the method channel's error response.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoClockApp => NO_CLOCK_APP_CODE,
            Self::Bridge(_) => "BRIDGE_ERROR",
            Self::PlatformUnavailable => "PLATFORM_UNAVAILABLE",
            Self::Io(_) => "IO_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Message carried in the method channel's error response.
    ///
    /// `NoClockApp` always answers with [`NO_CLOCK_APP_MESSAGE`]; everything
    /// else reports its `Display` text.
    pub fn reply_message(&self) -> String {
        match self {
            Self::NoClockApp => NO_CLOCK_APP_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SepLichError>;
