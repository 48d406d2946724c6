//! Camera device enumeration and capability probing.
//!
//! This crate describes the cameras a host exposes and decides whether the
//! set as a whole is usable by a generic Camera2-style capture path. A single
//! device reporting the legacy hardware tier disqualifies the whole set, since
//! the application cannot choose which device a generic capture path opens.

#![warn(missing_docs)]

/// Platform-specific device query implementations.
pub mod sys;

use std::fmt;
use std::sync::Arc;

use log::info;

pub use sys::SystemDeviceQuery;

/// Self-reported support level of a camera for the advanced camera APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HardwareTier {
    /// Backwards-compatibility mode; insufficient for the advanced APIs.
    Legacy,
    /// Limited feature set.
    Limited,
    /// Full feature set.
    Full,
    /// Full feature set plus YUV reprocessing and RAW capture.
    Level3,
    /// Externally attached camera (e.g. USB), roughly equivalent to `Limited`.
    External,
}

impl HardwareTier {
    /// Map an Android `INFO_SUPPORTED_HARDWARE_LEVEL` value to a tier.
    ///
    /// Returns `None` for values this crate does not know about.
    #[must_use]
    pub const fn from_android_level(level: i32) -> Option<Self> {
        match level {
            0 => Some(Self::Limited),
            1 => Some(Self::Full),
            2 => Some(Self::Legacy),
            3 => Some(Self::Level3),
            4 => Some(Self::External),
            _ => None,
        }
    }

    /// Whether this tier disqualifies a device set.
    #[must_use]
    pub const fn is_legacy(self) -> bool {
        matches!(self, Self::Legacy)
    }
}

impl fmt::Display for HardwareTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Legacy => "legacy",
            Self::Limited => "limited",
            Self::Full => "full",
            Self::Level3 => "level-3",
            Self::External => "external",
        };
        f.write_str(name)
    }
}

/// Direction a camera lens faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LensFacing {
    /// Same side as the screen.
    Front,
    /// Opposite side from the screen.
    Back,
    /// External camera with no fixed orientation.
    External,
}

impl LensFacing {
    /// Map an Android `LENS_FACING` value to a facing.
    #[must_use]
    pub const fn from_android_facing(facing: i32) -> Option<Self> {
        match facing {
            0 => Some(Self::Front),
            1 => Some(Self::Back),
            2 => Some(Self::External),
            _ => None,
        }
    }
}

impl fmt::Display for LensFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::External => "external",
        };
        f.write_str(name)
    }
}

/// Information about a camera device as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraDeviceInfo {
    /// Host-assigned camera identifier.
    pub id: String,
    /// Reported hardware support tier.
    pub hardware_tier: HardwareTier,
    /// Lens facing direction.
    pub facing: LensFacing,
}

impl CameraDeviceInfo {
    /// Create a new device description.
    pub fn new(id: impl Into<String>, hardware_tier: HardwareTier, facing: LensFacing) -> Self {
        Self {
            id: id.into(),
            hardware_tier,
            facing,
        }
    }
}

/// Errors that can occur while querying camera devices.
///
/// Every variant is a device query failure from the point of view of
/// [`CapabilityProbe`]; callers must treat it like an inadequate verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    /// No device query backend exists on this platform.
    #[error("camera query not supported on this platform")]
    NotSupported,
    /// The list of camera identifiers could not be obtained.
    #[error("failed to enumerate cameras: {0}")]
    EnumerationFailed(String),
    /// Describing a particular device failed.
    #[error("failed to query camera {id}: {reason}")]
    DeviceQuery {
        /// Identifier of the device being described.
        id: String,
        /// Backend-provided failure description.
        reason: String,
    },
    /// The device identifier is not known to the backend.
    #[error("camera not found: {0}")]
    NotFound(String),
    /// The device reported a hardware level this crate cannot classify.
    #[error("camera {id} reports unknown hardware level {level}")]
    UnknownHardwareLevel {
        /// Identifier of the device.
        id: String,
        /// Raw level reported by the backend.
        level: i32,
    },
}

/// Host service that enumerates and describes camera devices.
pub trait DeviceQuery: Send + Sync {
    /// List the identifiers of every camera reachable from the host.
    ///
    /// # Errors
    /// Returns [`CameraError::EnumerationFailed`] if the backend cannot list devices.
    fn camera_ids(&self) -> Result<Vec<String>, CameraError>;

    /// Read the characteristics of a single device.
    ///
    /// # Errors
    /// Returns a [`CameraError`] if the device cannot be described.
    fn describe(&self, id: &str) -> Result<CameraDeviceInfo, CameraError>;

    /// Describe every camera reachable from the host.
    ///
    /// # Errors
    /// Fails with the first error produced by [`camera_ids`](Self::camera_ids)
    /// or [`describe`](Self::describe).
    fn list_devices(&self) -> Result<Vec<CameraDeviceInfo>, CameraError> {
        self.camera_ids()?
            .iter()
            .map(|id| self.describe(id))
            .collect()
    }
}

impl<T: DeviceQuery + ?Sized> DeviceQuery for Arc<T> {
    fn camera_ids(&self) -> Result<Vec<String>, CameraError> {
        (**self).camera_ids()
    }

    fn describe(&self, id: &str) -> Result<CameraDeviceInfo, CameraError> {
        (**self).describe(id)
    }

    fn list_devices(&self) -> Result<Vec<CameraDeviceInfo>, CameraError> {
        (**self).list_devices()
    }
}

impl<T: DeviceQuery + ?Sized> DeviceQuery for &T {
    fn camera_ids(&self) -> Result<Vec<String>, CameraError> {
        (**self).camera_ids()
    }

    fn describe(&self, id: &str) -> Result<CameraDeviceInfo, CameraError> {
        (**self).describe(id)
    }

    fn list_devices(&self) -> Result<Vec<CameraDeviceInfo>, CameraError> {
        (**self).list_devices()
    }
}

/// A device query over a fixed, pre-enumerated list of devices.
///
/// Useful for hosts that enumerate cameras up front and hand the result over.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticDeviceQuery {
    devices: Vec<CameraDeviceInfo>,
}

impl StaticDeviceQuery {
    /// Create a query answering from `devices`.
    #[must_use]
    pub const fn new(devices: Vec<CameraDeviceInfo>) -> Self {
        Self { devices }
    }
}

impl FromIterator<CameraDeviceInfo> for StaticDeviceQuery {
    fn from_iter<I: IntoIterator<Item = CameraDeviceInfo>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl DeviceQuery for StaticDeviceQuery {
    fn camera_ids(&self) -> Result<Vec<String>, CameraError> {
        Ok(self.devices.iter().map(|d| d.id.clone()).collect())
    }

    fn describe(&self, id: &str) -> Result<CameraDeviceInfo, CameraError> {
        self.devices
            .iter()
            .find(|d| d.id == id)
            .cloned()
            .ok_or_else(|| CameraError::NotFound(id.to_string()))
    }
}

/// Result of classifying a device set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityVerdict {
    /// Whether the device set is usable.
    pub adequate: bool,
    /// Number of devices inspected.
    pub inspected: usize,
    /// Identifiers of devices that reported the legacy tier.
    pub legacy_devices: Vec<String>,
}

impl CapabilityVerdict {
    /// Classify a device set.
    ///
    /// An empty set is adequate: there is nothing to disqualify it.
    #[must_use]
    pub fn evaluate(devices: &[CameraDeviceInfo]) -> Self {
        let legacy_devices: Vec<String> = devices
            .iter()
            .filter(|d| d.hardware_tier.is_legacy())
            .map(|d| d.id.clone())
            .collect();

        Self {
            adequate: legacy_devices.is_empty(),
            inspected: devices.len(),
            legacy_devices,
        }
    }
}

/// Classifies the cameras reachable through a [`DeviceQuery`].
#[derive(Debug, Clone)]
pub struct CapabilityProbe<Q> {
    query: Q,
}

impl<Q: DeviceQuery> CapabilityProbe<Q> {
    /// Create a probe over `query`.
    pub const fn new(query: Q) -> Self {
        Self { query }
    }

    /// The underlying device query.
    pub const fn query(&self) -> &Q {
        &self.query
    }

    /// Enumerate the host's cameras and classify them.
    ///
    /// The device list is read fresh on every call.
    ///
    /// # Errors
    /// Returns the [`CameraError`] of the first device that could not be
    /// described. Callers must treat this as an inadequate verdict.
    pub fn probe(&self) -> Result<CapabilityVerdict, CameraError> {
        let devices = self.query.list_devices()?;
        info!("checking camera capability across {} device(s)", devices.len());

        for device in &devices {
            info!(
                "camera[{}] tier={} facing={}",
                device.id, device.hardware_tier, device.facing
            );
            if device.hardware_tier.is_legacy() {
                info!("camera[{}] is a legacy device", device.id);
            }
        }

        Ok(CapabilityVerdict::evaluate(&devices))
    }
}
