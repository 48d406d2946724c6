use crate::{CorrelationToken, Permission, PermissionError, ResponseDisposition};

/// The host's permission primitive.
pub trait PermissionHost: Send + Sync {
    /// Whether `permission` is currently granted.
    ///
    /// # Errors
    /// Returns a [`PermissionError`] if the host cannot answer. The
    /// coordinator then treats the permission as not yet granted.
    fn is_granted(&self, permission: Permission) -> Result<bool, PermissionError>;

    /// Show the host's permission UI for `permissions`, tagged with `token`.
    ///
    /// Fire-and-forget: the answer arrives later through
    /// [`PermissionCoordinator::on_permission_response`](crate::PermissionCoordinator::on_permission_response).
    ///
    /// # Errors
    /// Returns a [`PermissionError`] if the UI could not be shown. The
    /// pending cycle is then resolved as denied.
    fn request_permissions(
        &self,
        permissions: &[Permission],
        token: CorrelationToken,
    ) -> Result<(), PermissionError>;
}

/// The native consumer of the final grant decision.
///
/// Called exactly once per accepted permission cycle. Implementations must
/// not block the calling context.
pub trait CameraPermissionListener: Send + Sync {
    /// Receive the outcome of a permission cycle.
    fn notify_camera_permission(&self, granted: bool);
}

impl<F> CameraPermissionListener for F
where
    F: Fn(bool) + Send + Sync,
{
    fn notify_camera_permission(&self, granted: bool) {
        self(granted);
    }
}

/// Anything that can take delivery of OS permission responses.
///
/// Lets host glue route responses to a coordinator without knowing its
/// concrete type.
pub trait ResponseSink: Send + Sync {
    /// Deliver a permission response.
    fn on_permission_response(
        &self,
        token: CorrelationToken,
        granted_flags: &[bool],
    ) -> ResponseDisposition;
}
