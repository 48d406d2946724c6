//! Camera permission acquisition.
//!
//! This crate gates access to the device camera behind two independent
//! checks: the camera hardware must expose an adequate capability tier, and
//! the user must have granted runtime permission. [`PermissionCoordinator`]
//! runs that sequence, tracks the single outstanding OS permission request,
//! matches the asynchronous response by [`CorrelationToken`] and tells the
//! native consumer the result exactly once.
//!
//! The host environment is injected through three seams:
//!
//! - [`DeviceQuery`](camgate_camera::DeviceQuery) enumerates cameras,
//! - [`PermissionHost`] checks and requests permissions,
//! - [`CameraPermissionListener`] receives the boolean outcome.
//!
//! ```rust
//! use camgate_camera::{CameraDeviceInfo, HardwareTier, LensFacing, StaticDeviceQuery};
//! use camgate_permission::{
//!     CoordinatorConfig, CorrelationToken, Permission, PermissionCoordinator, PermissionError,
//!     PermissionHost,
//! };
//!
//! struct AlwaysGranted;
//!
//! impl PermissionHost for AlwaysGranted {
//!     fn is_granted(&self, _: Permission) -> Result<bool, PermissionError> {
//!         Ok(true)
//!     }
//!
//!     fn request_permissions(
//!         &self,
//!         _: &[Permission],
//!         _: CorrelationToken,
//!     ) -> Result<(), PermissionError> {
//!         Ok(())
//!     }
//! }
//!
//! let cameras = StaticDeviceQuery::new(vec![CameraDeviceInfo::new(
//!     "0",
//!     HardwareTier::Full,
//!     LensFacing::Back,
//! )]);
//! let coordinator = PermissionCoordinator::new(
//!     CoordinatorConfig::default(),
//!     cameras,
//!     AlwaysGranted,
//!     |granted: bool| println!("camera permission: {granted}"),
//! )
//! .unwrap();
//!
//! coordinator.request_camera();
//! ```

#![warn(missing_docs)]

mod config;
mod coordinator;
mod error;
mod host;
mod notify;
mod request;

pub mod registry;

/// Platform-specific implementations.
pub mod sys;

use serde::{Deserialize, Serialize};

pub use config::CoordinatorConfig;
pub use coordinator::{Admission, CoordinatorPhase, PermissionCoordinator, ResponseDisposition};
pub use error::PermissionError;
pub use host::{CameraPermissionListener, PermissionHost, ResponseSink};
pub use notify::{ChannelListener, GrantReceiver};
pub use request::{CorrelationToken, GrantOutcome, OutcomeSource, PermissionRequest};
pub use sys::{SystemPermissionHost, system_coordinator};

/// Capabilities that can be requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum Permission {
    /// Access to device location.
    Location,
    /// Access to device camera.
    Camera,
    /// Access to device microphone.
    Microphone,
    /// Access to photo library.
    Photos,
    /// Access to contacts.
    Contacts,
    /// Access to calendar.
    Calendar,
}

impl Permission {
    /// The Android manifest permission backing this capability.
    #[must_use]
    pub const fn android_name(self) -> &'static str {
        match self {
            Self::Location => "android.permission.ACCESS_FINE_LOCATION",
            Self::Camera => "android.permission.CAMERA",
            Self::Microphone => "android.permission.RECORD_AUDIO",
            Self::Photos => "android.permission.READ_MEDIA_IMAGES",
            Self::Contacts => "android.permission.READ_CONTACTS",
            Self::Calendar => "android.permission.READ_CALENDAR",
        }
    }
}
