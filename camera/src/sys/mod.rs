//! Platform-specific camera device queries.

#[cfg(target_os = "android")]
pub mod android;

// Android
#[cfg(target_os = "android")]
pub use android::AndroidDeviceQuery as SystemDeviceQuery;

// Fallback for platforms without a capability-tier query
#[cfg(not(target_os = "android"))]
mod fallback {
    use crate::{CameraDeviceInfo, CameraError, DeviceQuery};

    /// Device query for platforms without a native backend.
    ///
    /// Every call fails with [`CameraError::NotSupported`], which the probe
    /// treats as an inadequate device set.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemDeviceQuery;

    impl SystemDeviceQuery {
        /// Bind to the current process's platform context.
        ///
        /// # Errors
        /// Always returns [`CameraError::NotSupported`].
        pub const fn from_process_context() -> Result<Self, CameraError> {
            Err(CameraError::NotSupported)
        }
    }

    impl DeviceQuery for SystemDeviceQuery {
        fn camera_ids(&self) -> Result<Vec<String>, CameraError> {
            Err(CameraError::NotSupported)
        }

        fn describe(&self, _id: &str) -> Result<CameraDeviceInfo, CameraError> {
            Err(CameraError::NotSupported)
        }
    }
}

#[cfg(not(target_os = "android"))]
pub use fallback::SystemDeviceQuery;
