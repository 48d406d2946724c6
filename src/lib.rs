//! # Camgate
//!
//! Capability-gated camera permission acquisition for native app runtimes.
//!
//! Camgate decides whether a native application may use the device camera.
//! Access requires two independent checks: every camera the host exposes must
//! report a hardware tier above legacy, and the user must grant the runtime
//! permission. The result reaches the native consumer as a single boolean,
//! exactly once per request.
//!
//! ## Features
//!
//! - `camera`: Camera enumeration and capability-tier probing.
//! - `permission`: The permission coordinator (enabled by default, implies `camera`).
//!
//! Use the `full` feature to enable everything.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! camgate = { version = "0.1", features = ["full"] }
//! ```
//!
//! ```rust,ignore
//! use camgate::permission::{ChannelListener, CoordinatorConfig, system_coordinator};
//!
//! async fn camera_allowed() -> bool {
//!     let (listener, decisions) = ChannelListener::new();
//!     let Ok(coordinator) = system_coordinator(CoordinatorConfig::default(), listener) else {
//!         return false;
//!     };
//!     coordinator.request_camera();
//!     decisions.recv().await.unwrap_or(false)
//! }
//! ```

#[cfg(feature = "camera")]
pub use camgate_camera as camera;

#[cfg(feature = "permission")]
pub use camgate_permission as permission;
