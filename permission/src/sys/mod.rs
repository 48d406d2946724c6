//! Platform-specific permission hosts.

#[cfg(target_os = "android")]
pub mod android;

use camgate_camera::SystemDeviceQuery;

use crate::{CameraPermissionListener, CoordinatorConfig, PermissionCoordinator, PermissionError};

// Android
#[cfg(target_os = "android")]
pub use android::AndroidPermissionHost as SystemPermissionHost;

// Fallback for platforms without a runtime permission dialog
#[cfg(not(target_os = "android"))]
mod fallback {
    use crate::{CorrelationToken, Permission, PermissionError, PermissionHost};

    /// Permission host for platforms without a native backend.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemPermissionHost;

    impl SystemPermissionHost {
        /// Bind to the current process's platform context.
        ///
        /// # Errors
        /// Always returns [`PermissionError::NotSupported`].
        pub const fn from_process_context() -> Result<Self, PermissionError> {
            Err(PermissionError::NotSupported)
        }
    }

    impl PermissionHost for SystemPermissionHost {
        fn is_granted(&self, _permission: Permission) -> Result<bool, PermissionError> {
            Err(PermissionError::NotSupported)
        }

        fn request_permissions(
            &self,
            _permissions: &[Permission],
            _token: CorrelationToken,
        ) -> Result<(), PermissionError> {
            Err(PermissionError::NotSupported)
        }
    }
}

#[cfg(not(target_os = "android"))]
pub use fallback::SystemPermissionHost;

/// Build a coordinator on top of the platform's camera and permission backends.
///
/// # Errors
/// Returns [`PermissionError::NotSupported`] where no backend exists, or the
/// backend's error if it cannot bind to the process context.
pub fn system_coordinator<L>(
    config: CoordinatorConfig,
    listener: L,
) -> Result<PermissionCoordinator<SystemDeviceQuery, SystemPermissionHost, L>, PermissionError>
where
    L: CameraPermissionListener,
{
    let host = SystemPermissionHost::from_process_context()?;
    let query = SystemDeviceQuery::from_process_context()?;
    PermissionCoordinator::new(config, query, host, listener)
}
