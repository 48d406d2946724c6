use serde::{Deserialize, Serialize};

use crate::{Permission, PermissionError};

/// Configuration for a [`PermissionCoordinator`](crate::PermissionCoordinator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Capabilities requested by [`request_camera`](crate::PermissionCoordinator::request_camera).
    pub capabilities: Vec<Permission>,
    /// First request code handed to the host as a correlation token.
    pub first_request_code: u16,
    /// Number of consecutive request codes reserved for this coordinator.
    ///
    /// Codes are reused once the window wraps. A stale duplicate response
    /// that arrives `request_code_span` cycles after its own request carries
    /// the same code as the current one and is accepted as its answer, so
    /// the span bounds how late a stray response may be and still be ignored.
    pub request_code_span: u16,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            capabilities: vec![Permission::Camera],
            first_request_code: 1,
            request_code_span: 64,
        }
    }
}

impl CoordinatorConfig {
    /// Check that the request-code window is usable.
    ///
    /// # Errors
    /// Returns [`PermissionError::InvalidConfig`] if the window is empty,
    /// starts at zero, or runs past `u16::MAX`.
    pub fn validate(&self) -> Result<(), PermissionError> {
        if self.request_code_span == 0 {
            return Err(PermissionError::InvalidConfig(
                "request_code_span must be at least 1".into(),
            ));
        }
        if self.first_request_code == 0 {
            return Err(PermissionError::InvalidConfig(
                "first_request_code must be positive".into(),
            ));
        }
        let last = u32::from(self.first_request_code) + u32::from(self.request_code_span) - 1;
        if last > u32::from(u16::MAX) {
            return Err(PermissionError::InvalidConfig(format!(
                "request code window ends at {last}, past {}",
                u16::MAX
            )));
        }
        Ok(())
    }
}
