//! Android permission host using the activity runtime-permission API via JNI.
//!
//! The activity forwards `onRequestPermissionsResult` to the native method
//! declared by `PermissionBridge.kt` next to this module:
//!
//! ```java
//! package camgate.permission;
//!
//! public final class PermissionBridge {
//!     public static native boolean nativeOnRequestPermissionsResult(
//!         long handle, int requestCode, int[] grantResults);
//! }
//! ```
//!
//! `handle` is the value returned by [`registry::register`](crate::registry::register).
//! When the native side answers `false` the response is not ours and the
//! activity should call `super`.

use jni::objects::{GlobalRef, JClass, JIntArray, JObject, JValue};
use jni::sys::{JNI_FALSE, JNI_TRUE, jboolean, jint, jlong};
use jni::{JNIEnv, JavaVM};
use log::warn;

use crate::{CorrelationToken, Permission, PermissionError, PermissionHost, ResponseDisposition, registry};

/// `PackageManager.PERMISSION_GRANTED`.
const PERMISSION_GRANTED: jint = 0;

/// Permission host backed by an Android `Activity`.
pub struct AndroidPermissionHost {
    vm: JavaVM,
    activity: GlobalRef,
}

impl std::fmt::Debug for AndroidPermissionHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndroidPermissionHost").finish_non_exhaustive()
    }
}

impl AndroidPermissionHost {
    /// Create a host from a valid Android `Activity`.
    ///
    /// # Errors
    /// Returns [`PermissionError::Host`] if the activity reference cannot be retained.
    pub fn new(env: &mut JNIEnv<'_>, activity: &JObject<'_>) -> Result<Self, PermissionError> {
        let vm = env.get_java_vm().map_err(host_error)?;
        let activity = env.new_global_ref(activity).map_err(host_error)?;
        Ok(Self { vm, activity })
    }

    /// Create a host from the activity published through `ndk-context`.
    ///
    /// # Errors
    /// Returns [`PermissionError::Host`] if the VM cannot be attached.
    pub fn from_process_context() -> Result<Self, PermissionError> {
        let ctx = ndk_context::android_context();
        // SAFETY: ndk-context hands out the JavaVM pointer of the running process.
        let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }.map_err(host_error)?;
        let mut env = vm.attach_current_thread().map_err(host_error)?;
        // SAFETY: ndk-context hands out a live global reference to the activity.
        let activity = unsafe { JObject::from_raw(ctx.context().cast()) };
        Self::new(&mut env, &activity)
    }
}

impl PermissionHost for AndroidPermissionHost {
    fn is_granted(&self, permission: Permission) -> Result<bool, PermissionError> {
        let mut env = self.vm.attach_current_thread().map_err(host_error)?;

        let name = env
            .new_string(permission.android_name())
            .map_err(host_error)?;
        let status = env
            .call_method(
                self.activity.as_obj(),
                "checkSelfPermission",
                "(Ljava/lang/String;)I",
                &[JValue::Object(&name)],
            )
            .map_err(|e| clear_exception(&mut env, e))
            .and_then(|status| status.i().map_err(host_error));
        release(&env, name);

        Ok(status? == PERMISSION_GRANTED)
    }

    fn request_permissions(
        &self,
        permissions: &[Permission],
        token: CorrelationToken,
    ) -> Result<(), PermissionError> {
        let mut env = self.vm.attach_current_thread().map_err(host_error)?;

        let length = i32::try_from(permissions.len())
            .map_err(|_| PermissionError::Host("too many permissions".into()))?;
        let names = env
            .new_object_array(length, "java/lang/String", JObject::null())
            .map_err(host_error)?;
        for (index, permission) in (0..length).zip(permissions) {
            let name = env
                .new_string(permission.android_name())
                .map_err(host_error)?;
            let stored = env.set_object_array_element(&names, index, &name);
            release(&env, name);
            stored.map_err(host_error)?;
        }

        let shown = env
            .call_method(
                self.activity.as_obj(),
                "requestPermissions",
                "([Ljava/lang/String;I)V",
                &[JValue::Object(&names), JValue::Int(token.request_code())],
            )
            .map_err(|e| clear_exception(&mut env, e))
            .and_then(|shown| shown.v().map_err(host_error));
        release(&env, names);
        shown
    }
}

fn host_error(e: jni::errors::Error) -> PermissionError {
    PermissionError::Host(e.to_string())
}

fn clear_exception(env: &mut JNIEnv<'_>, e: jni::errors::Error) -> PermissionError {
    if matches!(e, jni::errors::Error::JavaException) {
        if let Err(clear) = env.exception_clear() {
            warn!("failed to clear java exception: {clear}");
        }
    }
    host_error(e)
}

fn release<'other_local, O>(env: &JNIEnv<'_>, obj: O)
where
    O: Into<JObject<'other_local>>,
{
    if let Err(e) = env.delete_local_ref(obj) {
        warn!("failed to delete local reference: {e}");
    }
}

fn read_grant_results(
    env: &mut JNIEnv<'_>,
    grant_results: &JIntArray<'_>,
) -> jni::errors::Result<Vec<bool>> {
    if grant_results.is_null() {
        return Ok(Vec::new());
    }
    let length = env.get_array_length(grant_results)?;
    let mut results = vec![0; usize::try_from(length).unwrap_or_default()];
    env.get_int_array_region(grant_results, 0, &mut results)?;
    Ok(results.iter().map(|r| *r == PERMISSION_GRANTED).collect())
}

/// Entry point for `PermissionBridge.nativeOnRequestPermissionsResult`.
///
/// Returns `true` when the response resolved a pending request.
#[allow(non_snake_case)]
#[unsafe(no_mangle)]
pub extern "system" fn Java_camgate_permission_PermissionBridge_nativeOnRequestPermissionsResult(
    mut env: JNIEnv<'_>,
    _class: JClass<'_>,
    handle: jlong,
    request_code: jint,
    grant_results: JIntArray<'_>,
) -> jboolean {
    let Some(token) = CorrelationToken::from_request_code(request_code) else {
        return JNI_FALSE;
    };

    // An unreadable array fails closed as a malformed response.
    let flags = read_grant_results(&mut env, &grant_results).unwrap_or_else(|e| {
        warn!("failed to read grant results: {e}");
        Vec::new()
    });

    match registry::dispatch(handle, token, &flags) {
        ResponseDisposition::Handled(_) => JNI_TRUE,
        ResponseDisposition::NotOwned => JNI_FALSE,
    }
}
