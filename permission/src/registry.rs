//! Handle registry routing host responses to live coordinators.
//!
//! Platform callbacks (the Android activity, for one) cannot carry a Rust
//! reference, so a coordinator is registered under an integer handle and the
//! callback passes that handle back. Only weak references are kept: once the
//! coordinator is dropped, responses routed to its handle are not owned by
//! anything.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError, Weak};

use log::debug;

use crate::{CorrelationToken, ResponseDisposition, ResponseSink};

static NEXT_HANDLE: AtomicI64 = AtomicI64::new(1);
static SINKS: OnceLock<Mutex<HashMap<i64, Weak<dyn ResponseSink>>>> = OnceLock::new();

fn sinks() -> &'static Mutex<HashMap<i64, Weak<dyn ResponseSink>>> {
    SINKS.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Make `sink` reachable through the returned handle.
pub fn register<S: ResponseSink + 'static>(sink: &Arc<S>) -> i64 {
    let weak: Weak<dyn ResponseSink> = Arc::<S>::downgrade(sink);
    let handle = NEXT_HANDLE.fetch_add(1, Ordering::Relaxed);
    sinks()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(handle, weak);
    handle
}

/// Stop routing responses to the sink registered under `handle`.
pub fn unregister(handle: i64) {
    sinks()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&handle);
}

/// Hand a response to the sink registered under `handle`.
///
/// Unknown, unregistered and released handles answer
/// [`ResponseDisposition::NotOwned`]. The registry lock is released before
/// the sink runs, so the sink may register or unregister handles itself.
pub fn dispatch(handle: i64, token: CorrelationToken, granted_flags: &[bool]) -> ResponseDisposition {
    let sink = {
        let mut sinks = sinks().lock().unwrap_or_else(PoisonError::into_inner);
        let sink = sinks.get(&handle).and_then(Weak::upgrade);
        if sink.is_none() {
            // Released sinks never come back.
            sinks.remove(&handle);
        }
        sink
    };
    match sink {
        Some(sink) => sink.on_permission_response(token, granted_flags),
        None => {
            debug!("permission response {token} for released handle {handle}");
            ResponseDisposition::NotOwned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Refusing;

    impl ResponseSink for Refusing {
        fn on_permission_response(&self, _: CorrelationToken, _: &[bool]) -> ResponseDisposition {
            ResponseDisposition::NotOwned
        }
    }

    #[test]
    fn handles_are_distinct() {
        let sink = Arc::new(Refusing);
        let first = register(&sink);
        let second = register(&sink);
        assert_ne!(first, second);
        unregister(first);
        unregister(second);
    }

    #[test]
    fn unknown_handle_is_not_owned() {
        let token = CorrelationToken::from_request_code(1).unwrap();
        assert_eq!(dispatch(-7, token, &[true]), ResponseDisposition::NotOwned);
    }
}
