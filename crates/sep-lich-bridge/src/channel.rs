// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Method channel dispatch.
//
// Mirrors Flutter's `MethodCallHandler`: a method name plus an argument map
// comes in, exactly one of success / error / not-implemented goes out. The
// handler is a plain function of its inputs so it can run without an engine.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info_span};

use sep_lich_core::error::{Result, SepLichError};
use sep_lich_core::{AlarmRequest, BridgeConfig};

use crate::traits::AlarmScheduler;

/// The only method this channel implements.
pub const CREATE_ALARM: &str = "createAlarm";

/// Reply to one method call.
///
/// Serialized as a tagged envelope for the JNI boundary, e.g.
/// `{"status":"success","result":true}` or `{"status":"not_implemented"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MethodResponse {
    /// `result.success(result)`
    Success { result: Value },
    /// `result.error(code, message, details)`
    Error {
        code: String,
        message: String,
        details: Option<Value>,
    },
    /// `result.notImplemented()`
    NotImplemented,
}

impl MethodResponse {
    pub fn success(result: impl Into<Value>) -> Self {
        Self::Success {
            result: result.into(),
        }
    }

    /// Error reply for a bridge error. No details payload is ever attached.
    pub fn error(err: &SepLichError) -> Self {
        Self::Error {
            code: err.code().to_string(),
            message: err.reply_message(),
            details: None,
        }
    }
}

/// Handler for the alarm method channel.
pub struct AlarmChannel<S> {
    name: String,
    scheduler: S,
}

impl<S: AlarmScheduler> AlarmChannel<S> {
    pub fn new(config: &BridgeConfig, scheduler: S) -> Self {
        Self {
            name: config.channel.clone(),
            scheduler,
        }
    }

    /// Channel name the Flutter side must use.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Dispatch one method call.
    pub fn handle(&self, method: &str, arguments: &Value) -> MethodResponse {
        let _span = info_span!("method_call", channel = %self.name, method).entered();

        match method {
            CREATE_ALARM => self.create_alarm(arguments),
            _ => {
                debug!("method not implemented");
                MethodResponse::NotImplemented
            }
        }
    }

    /// Dispatch a call whose arguments arrive as JSON text and encode the
    /// reply the same way.
    ///
    /// Blank or malformed argument JSON is treated as "no arguments" so the
    /// call still falls through to the usual defaults.
    pub fn handle_json(&self, method: &str, arguments_json: &str) -> Result<String> {
        let arguments = if arguments_json.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(arguments_json).unwrap_or_else(|e| {
                debug!(error = %e, "unreadable arguments; using defaults");
                Value::Null
            })
        };

        let response = self.handle(method, &arguments);
        Ok(serde_json::to_string(&response)?)
    }

    fn create_alarm(&self, arguments: &Value) -> MethodResponse {
        let request = AlarmRequest::from_arguments(arguments);
        debug!(?request, platform = self.scheduler.platform_name(), "createAlarm");

        match self.scheduler.schedule(&request) {
            Ok(handed_off) => MethodResponse::success(handed_off),
            Err(err) => MethodResponse::error(&err),
        }
    }
}
