use camgate_camera::CameraError;
use thiserror::Error;

/// Errors that can occur while acquiring camera permission.
///
/// None of these reach the native consumer: the coordinator logs them and
/// resolves the cycle as denied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// No permission backend exists on this platform.
    #[error("permission not supported on this platform")]
    NotSupported,

    /// The coordinator configuration is unusable.
    #[error("invalid coordinator configuration: {0}")]
    InvalidConfig(String),

    /// The camera devices could not be queried.
    #[error("camera query failed: {0}")]
    Camera(#[from] CameraError),

    /// The host answered with a grant array of unexpected shape.
    #[error("malformed permission response: expected {expected} result(s), got {actual}")]
    MalformedResponse {
        /// Number of capabilities that were requested.
        expected: usize,
        /// Number of results the host delivered.
        actual: usize,
    },

    /// The host's permission primitive failed.
    #[error("host error: {0}")]
    Host(String),
}
