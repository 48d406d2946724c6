//! Android camera device query using the Camera2 `CameraManager` via JNI.

use crate::{CameraDeviceInfo, CameraError, DeviceQuery, HardwareTier, LensFacing};
use jni::objects::{GlobalRef, JObject, JObjectArray, JString, JValue};
use jni::{JNIEnv, JavaVM};
use log::warn;

const CHARACTERISTICS_CLASS: &str = "android/hardware/camera2/CameraCharacteristics";
const KEY_SIG: &str = "Landroid/hardware/camera2/CameraCharacteristics$Key;";

/// Device query backed by `android.hardware.camera2.CameraManager`.
pub struct AndroidDeviceQuery {
    vm: JavaVM,
    manager: GlobalRef,
}

impl std::fmt::Debug for AndroidDeviceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AndroidDeviceQuery").finish_non_exhaustive()
    }
}

impl AndroidDeviceQuery {
    /// Create a query from a valid Android `Context`.
    ///
    /// # Errors
    /// Returns [`CameraError::EnumerationFailed`] if the camera service is unavailable.
    pub fn new(env: &mut JNIEnv<'_>, context: &JObject<'_>) -> Result<Self, CameraError> {
        let vm = env.get_java_vm().map_err(enumeration_error)?;

        let service_name = env.new_string("camera").map_err(enumeration_error)?;
        let manager = env
            .call_method(
                context,
                "getSystemService",
                "(Ljava/lang/String;)Ljava/lang/Object;",
                &[JValue::Object(&service_name)],
            )
            .map_err(|e| exception_to(env, e, enumeration_error))
            .and_then(|manager| manager.l().map_err(enumeration_error));
        release(env, service_name);
        let manager = manager?;

        if manager.is_null() {
            return Err(CameraError::EnumerationFailed(
                "camera service unavailable".into(),
            ));
        }

        let global = env.new_global_ref(&manager).map_err(enumeration_error);
        release(env, manager);
        Ok(Self {
            vm,
            manager: global?,
        })
    }

    /// Create a query from the process-wide context published by the activity glue.
    ///
    /// # Errors
    /// Returns [`CameraError::EnumerationFailed`] if the VM cannot be attached.
    pub fn from_process_context() -> Result<Self, CameraError> {
        let ctx = ndk_context::android_context();
        // SAFETY: ndk-context hands out the JavaVM pointer of the running process.
        let vm = unsafe { JavaVM::from_raw(ctx.vm().cast()) }.map_err(enumeration_error)?;
        let mut env = vm.attach_current_thread().map_err(enumeration_error)?;
        // SAFETY: ndk-context hands out a live global reference to the activity.
        let context = unsafe { JObject::from_raw(ctx.context().cast()) };
        Self::new(&mut env, &context)
    }

    fn int_characteristic(
        env: &mut JNIEnv<'_>,
        characteristics: &JObject<'_>,
        id: &str,
        key_name: &str,
    ) -> Result<i32, CameraError> {
        let key = env
            .get_static_field(CHARACTERISTICS_CLASS, key_name, KEY_SIG)
            .map_err(|e| exception_to(env, e, |e| device_error(id, e)))?
            .l()
            .map_err(|e| device_error(id, e))?;

        let value = env
            .call_method(
                characteristics,
                "get",
                "(Landroid/hardware/camera2/CameraCharacteristics$Key;)Ljava/lang/Object;",
                &[JValue::Object(&key)],
            )
            .map_err(|e| exception_to(env, e, |e| device_error(id, e)))
            .and_then(|value| value.l().map_err(|e| device_error(id, e)));
        release(env, key);
        let value = value?;

        if value.is_null() {
            return Err(CameraError::DeviceQuery {
                id: id.to_string(),
                reason: format!("{key_name} not reported"),
            });
        }

        let level = env
            .call_method(&value, "intValue", "()I", &[])
            .map_err(|e| exception_to(env, e, |e| device_error(id, e)))
            .and_then(|level| level.i().map_err(|e| device_error(id, e)));
        release(env, value);
        level
    }
}

impl DeviceQuery for AndroidDeviceQuery {
    fn camera_ids(&self) -> Result<Vec<String>, CameraError> {
        let mut env = self.vm.attach_current_thread().map_err(enumeration_error)?;

        let ids = env
            .call_method(
                self.manager.as_obj(),
                "getCameraIdList",
                "()[Ljava/lang/String;",
                &[],
            )
            .map_err(|e| exception_to(&mut env, e, enumeration_error))?
            .l()
            .map_err(enumeration_error)?;
        let ids = JObjectArray::from(ids);

        let length = env.get_array_length(&ids).map_err(enumeration_error)?;
        let mut result = Vec::with_capacity(usize::try_from(length).unwrap_or_default());
        for i in 0..length {
            let element = JString::from(
                env.get_object_array_element(&ids, i)
                    .map_err(enumeration_error)?,
            );
            let id = env.get_string(&element).map(String::from);
            // Each element is a fresh local ref; the caller's frame may be long-lived.
            release(&env, element);
            result.push(id.map_err(enumeration_error)?);
        }
        release(&env, ids);
        Ok(result)
    }

    fn describe(&self, id: &str) -> Result<CameraDeviceInfo, CameraError> {
        let mut env = self.vm.attach_current_thread().map_err(enumeration_error)?;

        let jid = env.new_string(id).map_err(|e| device_error(id, e))?;
        let characteristics = env
            .call_method(
                self.manager.as_obj(),
                "getCameraCharacteristics",
                "(Ljava/lang/String;)Landroid/hardware/camera2/CameraCharacteristics;",
                &[JValue::Object(&jid)],
            )
            .map_err(|e| exception_to(&mut env, e, |e| device_error(id, e)))
            .and_then(|characteristics| characteristics.l().map_err(|e| device_error(id, e)));
        release(&env, jid);
        let characteristics = characteristics?;

        let values =
            Self::int_characteristic(&mut env, &characteristics, id, "INFO_SUPPORTED_HARDWARE_LEVEL")
                .and_then(|level| {
                    Self::int_characteristic(&mut env, &characteristics, id, "LENS_FACING")
                        .map(|facing| (level, facing))
                });
        release(&env, characteristics);
        let (level, facing) = values?;

        let hardware_tier =
            HardwareTier::from_android_level(level).ok_or_else(|| {
                CameraError::UnknownHardwareLevel {
                    id: id.to_string(),
                    level,
                }
            })?;
        let facing = LensFacing::from_android_facing(facing).ok_or_else(|| {
            CameraError::DeviceQuery {
                id: id.to_string(),
                reason: format!("unknown lens facing {facing}"),
            }
        })?;

        Ok(CameraDeviceInfo::new(id, hardware_tier, facing))
    }
}

fn enumeration_error(e: jni::errors::Error) -> CameraError {
    CameraError::EnumerationFailed(e.to_string())
}

/// Drop a local reference early instead of leaving it to the caller's frame.
fn release<'other_local, O>(env: &JNIEnv<'_>, obj: O)
where
    O: Into<JObject<'other_local>>,
{
    if let Err(e) = env.delete_local_ref(obj) {
        warn!("failed to delete local reference: {e}");
    }
}

fn device_error(id: &str, e: jni::errors::Error) -> CameraError {
    CameraError::DeviceQuery {
        id: id.to_string(),
        reason: e.to_string(),
    }
}

/// Clear a pending Java exception (e.g. `CameraAccessException`) before mapping the error.
fn exception_to<F>(env: &mut JNIEnv<'_>, e: jni::errors::Error, map: F) -> CameraError
where
    F: FnOnce(jni::errors::Error) -> CameraError,
{
    if matches!(e, jni::errors::Error::JavaException) {
        if let Err(clear) = env.exception_clear() {
            warn!("failed to clear java exception: {clear}");
        }
    }
    map(e)
}
