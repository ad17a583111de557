// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Android platform bridge via JNI.
//
// Requires the Android NDK and targets `aarch64-linux-android` or
// `armv7-linux-androideabi`. The set-alarm intent is built, resolved and
// started through JNI calls into the ART runtime.
//
// ## Host app wiring
//
// The Flutter activity owns the method channel and forwards calls here through
// a small Kotlin class, `com.example.sep_lich.AlarmBridge`:
//
// ```kotlin
// object AlarmBridge {
//     init { System.loadLibrary("sep_lich_bridge") }
//     external fun nativeInit(context: Context, configJson: String): Boolean
//     external fun nativeChannelName(): String
//     external fun nativeHandle(method: String, argumentsJson: String): String
// }
// ```
//
// `nativeInit` must be called with the Activity (not the application context)
// before the first `nativeHandle`, since `startActivity` from a non-Activity
// context needs FLAG_ACTIVITY_NEW_TASK. `nativeHandle` returns the JSON reply
// envelope, which the Kotlin side maps onto `result.success`, `result.error`
// or `result.notImplemented`.
//
// Calling `nativeInit` again with a new Activity (after a back-exit and
// relaunch, say) swaps the bridge over to it and releases the old one.
//
// This library owns the process-wide `ndk-context`: it installs and replaces
// it on `nativeInit`. If another library has already installed one,
// `nativeInit` fails and returns `false` instead of taking it over.
//
// On Android 11+ `resolveActivity` only sees clock apps the manifest declares
// a `<queries>` entry for (`android.intent.action.SET_ALARM`), and the app
// needs the `com.android.alarm.permission.SET_ALARM` permission.

#![cfg(target_os = "android")]

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Mutex, RwLock};

use jni::objects::{GlobalRef, JClass, JObject, JString, JValue};
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean, jstring};
use jni::{JNIEnv, JavaVM};

use sep_lich_core::BridgeConfig;
use sep_lich_core::error::{Result, SepLichError};

use crate::channel::{AlarmChannel, MethodResponse};
use crate::intent::{AlarmIntent, ExtraValue, IntentExtra, IntentScheduler};
use crate::traits::IntentHost;

// ---------------------------------------------------------------------------
// JNI bootstrap helpers
// ---------------------------------------------------------------------------

/// Global ref to the Activity from the latest `nativeInit`, mirrored into
/// `ndk-context`.
static CONTEXT: Mutex<Option<GlobalRef>> = Mutex::new(None);

/// Config from the latest successful `nativeInit`.
static CONFIG: RwLock<Option<BridgeConfig>> = RwLock::new(None);

/// What `nativeInit` does with the Activity it is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContextChange {
    /// Nothing installed yet.
    Install,
    /// A different Activity is installed; swap it out.
    Replace,
    /// The same Activity re-initialised the bridge.
    Keep,
}

fn context_change(installed: bool, same_object: bool) -> ContextChange {
    match (installed, same_object) {
        (false, _) => ContextChange::Install,
        (true, false) => ContextChange::Replace,
        (true, true) => ContextChange::Keep,
    }
}

/// Run `f` with a [`JNIEnv`] for the current thread and the hosting Activity.
///
/// Obtains the `JavaVM*` from `ndk_context::android_context()` and attaches
/// the current thread if it is not already attached. A Java exception left
/// pending by a failed call is logged and cleared before returning.
fn with_env<T>(f: impl FnOnce(&mut JNIEnv<'_>, &JObject<'_>) -> Result<T>) -> Result<T> {
    // Hold our own clone so a concurrent re-init cannot free the Activity
    // ref while this call is using it.
    let activity = CONTEXT
        .lock()
        .map_err(|_| SepLichError::Bridge("Android context lock poisoned".into()))?
        .clone()
        .ok_or_else(|| {
            SepLichError::Bridge(
                "Android context is not set; call AlarmBridge.nativeInit first".into(),
            )
        })?;

    let ctx = ndk_context::android_context();
    // SAFETY: `ctx.vm()` is the `JavaVM*` registered in `nativeInit`, valid
    // for the lifetime of the process.
    let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }
        .map_err(|e| SepLichError::Bridge(format!("failed to obtain JavaVM: {e}")))?;
    let mut env = vm
        .attach_current_thread()
        .map_err(|e| SepLichError::Bridge(format!("failed to attach JNI thread: {e}")))?;

    let result = f(&mut env, activity.as_obj());
    if result.is_err() && env.exception_check().unwrap_or(false) {
        let _ = env.exception_describe();
        let _ = env.exception_clear();
    }
    result
}

/// Convenience: map any `jni::errors::Error` into `SepLichError::Bridge`.
fn jni_err(context: &str, e: jni::errors::Error) -> SepLichError {
    SepLichError::Bridge(format!("{context}: {e}"))
}

/// Config in effect: the latest `nativeInit`'s, or the defaults.
fn config() -> BridgeConfig {
    CONFIG
        .read()
        .ok()
        .and_then(|config| config.clone())
        .unwrap_or_default()
}

/// Replace the config in effect.
fn install_config(config: BridgeConfig) {
    match CONFIG.write() {
        Ok(mut slot) => *slot = Some(config),
        Err(poisoned) => *poisoned.into_inner() = Some(config),
    }
}

// ---------------------------------------------------------------------------
// Intent host — android.provider.AlarmClock
// ---------------------------------------------------------------------------

/// Android implementation of the intent host.
///
/// Zero-sized; all state lives on the Java side.
pub struct AndroidIntentHost;

impl AndroidIntentHost {
    /// Create a new Android host.
    ///
    /// This does **not** touch JNI. The first JNI call happens when the
    /// scheduler resolves an intent.
    pub fn new() -> Self {
        Self
    }
}

impl Default for AndroidIntentHost {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentHost for AndroidIntentHost {
    fn platform_name(&self) -> &str {
        "Android"
    }

    /// `intent.resolveActivity(activity.getPackageManager()) != null`
    fn resolves(&self, intent: &AlarmIntent) -> Result<bool> {
        with_env(|env, activity| {
            let j_intent = build_intent(env, intent)?;

            let package_manager: JObject = env
                .call_method(
                    activity,
                    "getPackageManager",
                    "()Landroid/content/pm/PackageManager;",
                    &[],
                )
                .map_err(|e| jni_err("getPackageManager", e))?
                .l()
                .map_err(|e| jni_err("getPackageManager->l", e))?;

            let component: JObject = env
                .call_method(
                    &j_intent,
                    "resolveActivity",
                    "(Landroid/content/pm/PackageManager;)Landroid/content/ComponentName;",
                    &[JValue::Object(&package_manager)],
                )
                .map_err(|e| jni_err("resolveActivity", e))?
                .l()
                .map_err(|e| jni_err("resolveActivity->l", e))?;

            tracing::debug!(resolved = !component.is_null(), "Android: resolveActivity");
            Ok(!component.is_null())
        })
    }

    /// `activity.startActivity(intent)`
    fn start(&self, intent: &AlarmIntent) -> Result<()> {
        with_env(|env, activity| {
            let j_intent = build_intent(env, intent)?;

            env.call_method(
                activity,
                "startActivity",
                "(Landroid/content/Intent;)V",
                &[JValue::Object(&j_intent)],
            )
            .map_err(|e| jni_err("startActivity(SET_ALARM)", e))?;

            tracing::info!(action = intent.action, "Android: intent dispatched");
            Ok(())
        })
    }
}

/// `new Intent(action)` followed by one `putExtra` per extra.
fn build_intent<'local>(env: &mut JNIEnv<'local>, intent: &AlarmIntent) -> Result<JObject<'local>> {
    let j_action: JString = env
        .new_string(intent.action)
        .map_err(|e| jni_err("new_string(action)", e))?;

    let j_intent: JObject = env
        .new_object(
            "android/content/Intent",
            "(Ljava/lang/String;)V",
            &[JValue::Object(&j_action)],
        )
        .map_err(|e| jni_err("new Intent", e))?;

    for extra in &intent.extras {
        put_extra(env, &j_intent, extra)?;
    }
    Ok(j_intent)
}

fn put_extra(env: &mut JNIEnv<'_>, j_intent: &JObject<'_>, extra: &IntentExtra) -> Result<()> {
    let j_key: JString = env
        .new_string(extra.key)
        .map_err(|e| jni_err("new_string(extra key)", e))?;

    let called = match &extra.value {
        ExtraValue::Int(value) => env.call_method(
            j_intent,
            "putExtra",
            "(Ljava/lang/String;I)Landroid/content/Intent;",
            &[JValue::Object(&j_key), JValue::Int(*value)],
        ),
        ExtraValue::Bool(value) => env.call_method(
            j_intent,
            "putExtra",
            "(Ljava/lang/String;Z)Landroid/content/Intent;",
            &[JValue::Object(&j_key), JValue::Bool(u8::from(*value))],
        ),
        ExtraValue::Text(value) => {
            let j_value: JString = env
                .new_string(value)
                .map_err(|e| jni_err("new_string(extra value)", e))?;
            env.call_method(
                j_intent,
                "putExtra",
                "(Ljava/lang/String;Ljava/lang/String;)Landroid/content/Intent;",
                &[JValue::Object(&j_key), JValue::Object(&j_value)],
            )
        }
        ExtraValue::IntList(values) => {
            let list = integer_array_list(env, values)?;
            env.call_method(
                j_intent,
                "putIntegerArrayListExtra",
                "(Ljava/lang/String;Ljava/util/ArrayList;)Landroid/content/Intent;",
                &[JValue::Object(&j_key), JValue::Object(&list)],
            )
        }
    };

    called.map_err(|e| jni_err(&format!("putExtra({})", extra.key), e))?;
    Ok(())
}

/// Box the values into a `java.util.ArrayList<Integer>`.
fn integer_array_list<'local>(env: &mut JNIEnv<'local>, values: &[i32]) -> Result<JObject<'local>> {
    let list: JObject = env
        .new_object("java/util/ArrayList", "()V", &[])
        .map_err(|e| jni_err("new ArrayList", e))?;

    for value in values {
        let boxed: JObject = env
            .call_static_method(
                "java/lang/Integer",
                "valueOf",
                "(I)Ljava/lang/Integer;",
                &[JValue::Int(*value)],
            )
            .map_err(|e| jni_err("Integer.valueOf", e))?
            .l()
            .map_err(|e| jni_err("Integer.valueOf->l", e))?;

        env.call_method(&list, "add", "(Ljava/lang/Object;)Z", &[JValue::Object(&boxed)])
            .map_err(|e| jni_err("ArrayList.add", e))?;
    }
    Ok(list)
}

// ---------------------------------------------------------------------------
// JNI exports — com.example.sep_lich.AlarmBridge
// ---------------------------------------------------------------------------

/// `AlarmBridge.nativeInit(context: Context, configJson: String): Boolean`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_sep_1lich_AlarmBridge_nativeInit<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    context: JObject<'local>,
    config_json: JString<'local>,
) -> jboolean {
    match init(&mut env, &context, &config_json) {
        Ok(()) => JNI_TRUE,
        Err(e) => {
            tracing::error!(error = %e, "Android: bridge init failed");
            JNI_FALSE
        }
    }
}

fn init(env: &mut JNIEnv<'_>, context: &JObject<'_>, config_json: &JString<'_>) -> Result<()> {
    let text: String = if config_json.is_null() {
        String::new()
    } else {
        env.get_string(config_json)
            .map_err(|e| jni_err("get_string(configJson)", e))?
            .into()
    };
    let config = BridgeConfig::from_json(&text)?;
    crate::logging::init_tracing(&config);

    let mut slot = CONTEXT
        .lock()
        .map_err(|_| SepLichError::Bridge("Android context lock poisoned".into()))?;
    let same_object = match slot.as_ref() {
        Some(current) => env
            .is_same_object(current.as_obj(), context)
            .map_err(|e| jni_err("is_same_object(context)", e))?,
        None => false,
    };

    let change = context_change(slot.is_some(), same_object);
    if change != ContextChange::Keep {
        let global = env
            .new_global_ref(context)
            .map_err(|e| jni_err("new_global_ref(context)", e))?;
        let vm = env.get_java_vm().map_err(|e| jni_err("get_java_vm", e))?;

        install_ndk_context(
            vm.get_java_vm_pointer().cast(),
            global.as_obj().as_raw().cast(),
            change == ContextChange::Replace,
        )?;
        // Dropping the previous ref lets the destroyed Activity be collected.
        *slot = Some(global);
    }
    drop(slot);

    tracing::info!(channel = %config.channel, ?change, "Android: alarm bridge initialised");
    install_config(config);
    Ok(())
}

/// Publish the Activity through `ndk-context`, releasing ours first when
/// `replacing`.
///
/// `ndk-context` panics if a context is already installed; that happens when
/// another library in the app owns it, and is reported as an error rather than
/// unwinding across the JNI boundary.
fn install_ndk_context(
    vm: *mut std::ffi::c_void,
    context: *mut std::ffi::c_void,
    replacing: bool,
) -> Result<()> {
    // SAFETY: `vm` is the process JavaVM, which never unloads. `context` is a
    // global ref that `CONTEXT` keeps alive until the next replacement, which
    // releases it from `ndk-context` before the ref is dropped.
    catch_unwind(AssertUnwindSafe(|| unsafe {
        if replacing {
            ndk_context::release_android_context();
        }
        ndk_context::initialize_android_context(vm, context);
    }))
    .map_err(|_| {
        SepLichError::Bridge(
            "ndk-context is already initialised by another library".into(),
        )
    })
}

/// `AlarmBridge.nativeChannelName(): String`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_sep_1lich_AlarmBridge_nativeChannelName<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
) -> jstring {
    to_jstring(&mut env, &config().channel)
}

/// `AlarmBridge.nativeHandle(method: String, argumentsJson: String): String`
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_sep_1lich_AlarmBridge_nativeHandle<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    method: JString<'local>,
    arguments_json: JString<'local>,
) -> jstring {
    let reply = handle_call(&mut env, &method, &arguments_json).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Android: method call failed");
        serde_json::to_string(&MethodResponse::error(&e)).unwrap_or_else(|_| {
            r#"{"status":"error","code":"BRIDGE_ERROR","message":"unencodable reply","details":null}"#
                .to_string()
        })
    });
    to_jstring(&mut env, &reply)
}

fn handle_call(env: &mut JNIEnv<'_>, method: &JString<'_>, arguments_json: &JString<'_>) -> Result<String> {
    let method: String = env
        .get_string(method)
        .map_err(|e| jni_err("get_string(method)", e))?
        .into();
    let arguments: String = if arguments_json.is_null() {
        String::new()
    } else {
        env.get_string(arguments_json)
            .map_err(|e| jni_err("get_string(argumentsJson)", e))?
            .into()
    };

    let channel = AlarmChannel::new(&config(), IntentScheduler::new(AndroidIntentHost::new()));
    channel.handle_json(&method, &arguments)
}

fn to_jstring(env: &mut JNIEnv<'_>, text: &str) -> jstring {
    match env.new_string(text) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            tracing::error!(error = %e, "Android: failed to allocate reply string");
            std::ptr::null_mut()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Verify that the host reports the correct platform name.
    #[test]
    fn platform_name() {
        assert_eq!(AndroidIntentHost::new().platform_name(), "Android");
    }

    #[test]
    fn recreated_activity_replaces_the_old_one() {
        assert_eq!(context_change(false, false), ContextChange::Install);
        assert_eq!(context_change(true, false), ContextChange::Replace);
        assert_eq!(context_change(true, true), ContextChange::Keep);
    }

    #[test]
    fn reinit_config_takes_effect() {
        install_config(BridgeConfig::default());
        assert_eq!(config().channel, "com.example.sep_lich/alarm");

        install_config(BridgeConfig {
            channel: "org.example/alarm".into(),
            ..Default::default()
        });
        assert_eq!(config().channel, "org.example/alarm");
    }

    // Resolving and starting the intent needs a running Activity; those paths
    // are exercised from the app's instrumented tests rather than `cargo test`.
}
