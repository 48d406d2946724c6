use std::fmt;

use crate::{CoordinatorConfig, Permission, PermissionError};

/// Opaque identifier tying an OS permission response to the request that caused it.
///
/// On Android this is the `requestCode` passed to `requestPermissions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CorrelationToken(u16);

impl CorrelationToken {
    /// The host request code carrying this token.
    #[must_use]
    pub fn request_code(self) -> i32 {
        i32::from(self.0)
    }

    /// Recover a token from a host request code.
    ///
    /// Codes outside the `u16` range cannot belong to any coordinator.
    #[must_use]
    pub fn from_request_code(code: i32) -> Option<Self> {
        u16::try_from(code).ok().map(Self)
    }
}

impl fmt::Display for CorrelationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out tokens cycling through the configured request-code window.
#[derive(Debug)]
pub(crate) struct TokenAllocator {
    first: u16,
    span: u16,
    offset: u16,
}

impl TokenAllocator {
    pub(crate) const fn new(config: &CoordinatorConfig) -> Self {
        Self {
            first: config.first_request_code,
            span: config.request_code_span,
            offset: 0,
        }
    }

    pub(crate) fn next_token(&mut self) -> CorrelationToken {
        let token = CorrelationToken(self.first + self.offset);
        self.offset = (self.offset + 1) % self.span;
        token
    }
}

/// Where a [`GrantOutcome`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeSource {
    /// A camera reported the legacy hardware tier.
    CapabilityRejected,
    /// The camera devices could not be queried.
    DeviceQueryFailed,
    /// Every capability was already granted; no dialog was shown.
    AlreadyGranted,
    /// The user answered the OS permission dialog.
    UserResponse,
    /// The OS answered with a grant array of unexpected shape.
    MalformedResponse,
    /// The host failed to display its permission UI.
    HostFailure,
}

/// Terminal result of a permission cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GrantOutcome {
    /// Whether camera access may be used.
    pub granted: bool,
    /// What decided the outcome.
    pub source: OutcomeSource,
}

impl GrantOutcome {
    pub(crate) const fn granted(source: OutcomeSource) -> Self {
        Self {
            granted: true,
            source,
        }
    }

    pub(crate) const fn denied(source: OutcomeSource) -> Self {
        Self {
            granted: false,
            source,
        }
    }
}

/// The single outstanding OS permission request.
///
/// A request is pending for as long as it exists; [`resolve`](Self::resolve)
/// consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRequest {
    token: CorrelationToken,
    capabilities: Vec<Permission>,
}

impl PermissionRequest {
    pub(crate) const fn new(token: CorrelationToken, capabilities: Vec<Permission>) -> Self {
        Self {
            token,
            capabilities,
        }
    }

    /// Token the host must echo back with its response.
    #[must_use]
    pub const fn token(&self) -> CorrelationToken {
        self.token
    }

    /// Capabilities shown in the permission UI.
    #[must_use]
    pub fn capabilities(&self) -> &[Permission] {
        &self.capabilities
    }

    /// Turn the host's grant flags into an outcome.
    ///
    /// The response grants access only if it carries exactly one flag and
    /// that flag is set. Any other shape is malformed and denies, including a
    /// fully granted answer for a multi-capability request.
    pub(crate) fn resolve(self, granted_flags: &[bool]) -> Result<GrantOutcome, PermissionError> {
        let [granted] = granted_flags else {
            return Err(PermissionError::MalformedResponse {
                expected: 1,
                actual: granted_flags.len(),
            });
        };
        Ok(GrantOutcome {
            granted: *granted,
            source: OutcomeSource::UserResponse,
        })
    }
}
