//! The permission-acquisition state machine.

use std::sync::{Mutex, MutexGuard, PoisonError};

use camgate_camera::{CapabilityProbe, DeviceQuery};
use log::{debug, info, warn};

use crate::request::TokenAllocator;
use crate::{
    CameraPermissionListener, CoordinatorConfig, CorrelationToken, GrantOutcome, OutcomeSource,
    Permission, PermissionError, PermissionHost, PermissionRequest, ResponseSink,
};

/// Observable phase of a [`PermissionCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinatorPhase {
    /// Ready to start a new cycle.
    Idle,
    /// Classifying the camera devices.
    Probing,
    /// Asking the host whether the capabilities are already granted.
    CheckingPermission,
    /// Waiting for the user to answer the OS permission UI.
    AwaitingResponse,
    /// Torn down; every entry point is a no-op.
    Closed,
}

/// What happened to a [`begin_request`](PermissionCoordinator::begin_request) call.
///
/// Informational only: the listener is the authoritative receiver of the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The cycle finished synchronously and the listener has been notified.
    Resolved(GrantOutcome),
    /// The host is showing its permission UI; the answer must carry this token.
    Awaiting(CorrelationToken),
    /// Another cycle is in flight; nothing was done.
    Busy,
    /// The coordinator was torn down; nothing was or will be delivered.
    Closed,
}

/// What happened to a permission response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDisposition {
    /// The response resolved the pending request.
    Handled(GrantOutcome),
    /// The response does not belong to this coordinator; the host should
    /// apply its default handling.
    NotOwned,
}

#[derive(Debug)]
enum Phase {
    Idle,
    Probing,
    CheckingPermission,
    AwaitingResponse(PermissionRequest),
    Closed,
}

#[derive(Debug)]
struct State {
    phase: Phase,
    tokens: TokenAllocator,
}

/// Acquires camera permission and reports the decision exactly once per cycle.
///
/// Both entry points serialize on an internal lock, so OS events may arrive
/// from any thread. The lock is never held while calling the host or the
/// listener, which lets either of them call back into the coordinator.
///
/// Each cycle notifies exactly once, but notifications are ordered only when
/// the entry points are called from a single thread. If a response and a new
/// request race on different threads, the first cycle's notification may
/// reach the listener after the second cycle's.
#[derive(Debug)]
pub struct PermissionCoordinator<Q, H, L> {
    config: CoordinatorConfig,
    probe: CapabilityProbe<Q>,
    host: H,
    listener: L,
    state: Mutex<State>,
}

impl<Q, H, L> PermissionCoordinator<Q, H, L>
where
    Q: DeviceQuery,
    H: PermissionHost,
    L: CameraPermissionListener,
{
    /// Create an idle coordinator.
    ///
    /// # Errors
    /// Returns [`PermissionError::InvalidConfig`] if `config` does not validate.
    pub fn new(
        config: CoordinatorConfig,
        query: Q,
        host: H,
        listener: L,
    ) -> Result<Self, PermissionError> {
        config.validate()?;
        let tokens = TokenAllocator::new(&config);
        Ok(Self {
            config,
            probe: CapabilityProbe::new(query),
            host,
            listener,
            state: Mutex::new(State {
                phase: Phase::Idle,
                tokens,
            }),
        })
    }

    /// The configuration this coordinator was built with.
    pub const fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// The host permission primitive.
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Current phase.
    pub fn phase(&self) -> CoordinatorPhase {
        match self.lock().phase {
            Phase::Idle => CoordinatorPhase::Idle,
            Phase::Probing => CoordinatorPhase::Probing,
            Phase::CheckingPermission => CoordinatorPhase::CheckingPermission,
            Phase::AwaitingResponse(_) => CoordinatorPhase::AwaitingResponse,
            Phase::Closed => CoordinatorPhase::Closed,
        }
    }

    /// Token of the pending OS request, if one is outstanding.
    pub fn pending_token(&self) -> Option<CorrelationToken> {
        match &self.lock().phase {
            Phase::AwaitingResponse(request) => Some(request.token()),
            _ => None,
        }
    }

    /// Start a cycle for the configured capabilities.
    pub fn request_camera(&self) -> Admission {
        self.begin_request(self.config.capabilities.iter().copied())
    }

    /// Start a permission cycle for `required`.
    ///
    /// Ignored while another cycle is in flight. Otherwise the listener is
    /// notified exactly once: immediately if the cameras are inadequate or
    /// every capability is already granted, or later when the matching
    /// response arrives.
    pub fn begin_request<I>(&self, required: I) -> Admission
    where
        I: IntoIterator<Item = Permission>,
    {
        {
            let mut state = self.lock();
            match state.phase {
                Phase::Idle => {}
                Phase::Closed => return Admission::Closed,
                _ => {
                    debug!("camera permission request ignored: another request is in flight");
                    return Admission::Busy;
                }
            }
            state.phase = Phase::Probing;
        }

        let mut capabilities: Vec<Permission> = Vec::new();
        for permission in required {
            if !capabilities.contains(&permission) {
                capabilities.push(permission);
            }
        }

        match self.probe.probe() {
            Ok(verdict) if verdict.adequate => {}
            Ok(verdict) => {
                warn!(
                    "legacy camera device(s) {:?} found; camera permission denied without prompting",
                    verdict.legacy_devices
                );
                return self.resolve_early(
                    &Phase::Probing,
                    GrantOutcome::denied(OutcomeSource::CapabilityRejected),
                );
            }
            Err(e) => {
                warn!("camera capability probe failed: {e}");
                return self.resolve_early(
                    &Phase::Probing,
                    GrantOutcome::denied(OutcomeSource::DeviceQueryFailed),
                );
            }
        }

        {
            let mut state = self.lock();
            if !matches!(state.phase, Phase::Probing) {
                return Admission::Closed;
            }
            state.phase = Phase::CheckingPermission;
        }

        let all_granted = capabilities.iter().all(|permission| {
            self.host.is_granted(*permission).unwrap_or_else(|e| {
                warn!("checking {permission:?} failed, treating as not granted: {e}");
                false
            })
        });
        if all_granted {
            debug!("camera permission already granted");
            return self.resolve_early(
                &Phase::CheckingPermission,
                GrantOutcome::granted(OutcomeSource::AlreadyGranted),
            );
        }

        let token = {
            let mut state = self.lock();
            if !matches!(state.phase, Phase::CheckingPermission) {
                return Admission::Closed;
            }
            let token = state.tokens.next_token();
            state.phase =
                Phase::AwaitingResponse(PermissionRequest::new(token, capabilities.clone()));
            token
        };

        info!("requesting {capabilities:?} with token {token}");
        if let Err(e) = self.host.request_permissions(&capabilities, token) {
            warn!("permission request {token} could not be shown: {e}");
            if let Some(outcome) = self.take_pending(token, |_| {
                Ok(GrantOutcome::denied(OutcomeSource::HostFailure))
            }) {
                self.deliver(outcome);
                return Admission::Resolved(outcome);
            }
        }
        Admission::Awaiting(token)
    }

    /// Deliver an OS permission response.
    ///
    /// Responses whose token does not match the pending request, including
    /// duplicates of an already handled response, change nothing and are
    /// reported as [`ResponseDisposition::NotOwned`].
    pub fn on_permission_response(
        &self,
        token: CorrelationToken,
        granted_flags: &[bool],
    ) -> ResponseDisposition {
        let outcome = self.take_pending(token, |request| request.resolve(granted_flags));
        match outcome {
            Some(outcome) => {
                self.deliver(outcome);
                ResponseDisposition::Handled(outcome)
            }
            None => {
                debug!("permission response {token} is not ours");
                ResponseDisposition::NotOwned
            }
        }
    }

    /// Tear down with the hosting context.
    ///
    /// A pending request is abandoned without notification, and every later
    /// call is a no-op.
    pub fn teardown(&self) {
        let mut state = self.lock();
        if let Phase::AwaitingResponse(request) = &state.phase {
            info!("abandoning permission request {}", request.token());
        }
        state.phase = Phase::Closed;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Finish a cycle that never reached the OS, unless it was torn down meanwhile.
    fn resolve_early(&self, expected: &Phase, outcome: GrantOutcome) -> Admission {
        {
            let mut state = self.lock();
            if std::mem::discriminant(&state.phase) != std::mem::discriminant(expected) {
                return Admission::Closed;
            }
            state.phase = Phase::Idle;
        }
        self.deliver(outcome);
        Admission::Resolved(outcome)
    }

    /// Remove the pending request if `token` matches it and compute its outcome.
    fn take_pending<F>(&self, token: CorrelationToken, resolve: F) -> Option<GrantOutcome>
    where
        F: FnOnce(PermissionRequest) -> Result<GrantOutcome, PermissionError>,
    {
        let request = {
            let mut state = self.lock();
            match std::mem::replace(&mut state.phase, Phase::Idle) {
                Phase::AwaitingResponse(request) if request.token() == token => request,
                other => {
                    state.phase = other;
                    return None;
                }
            }
        };

        Some(resolve(request).unwrap_or_else(|e| {
            warn!("permission request {token} failed closed: {e}");
            GrantOutcome::denied(OutcomeSource::MalformedResponse)
        }))
    }

    // Runs after the state lock is released; see the type docs on ordering.
    fn deliver(&self, outcome: GrantOutcome) {
        debug!(
            "camera permission {} ({:?})",
            if outcome.granted { "granted" } else { "denied" },
            outcome.source
        );
        self.listener.notify_camera_permission(outcome.granted);
    }
}

impl<Q, H, L> ResponseSink for PermissionCoordinator<Q, H, L>
where
    Q: DeviceQuery,
    H: PermissionHost,
    L: CameraPermissionListener,
{
    fn on_permission_response(
        &self,
        token: CorrelationToken,
        granted_flags: &[bool],
    ) -> ResponseDisposition {
        Self::on_permission_response(self, token, granted_flags)
    }
}
