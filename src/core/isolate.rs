//! Failure isolation for callbacks.

use std::panic::{self, AssertUnwindSafe};

use tracing::error;

/// Run `f`, containing any panic it raises.
///
/// Returns `false` when `f` panicked. The panic is logged under `label`
/// and does not propagate to the caller.
pub fn call_isolated<F: FnOnce()>(label: &str, f: F) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => true,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(callback = label, %message, "callback failed; isolated");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_isolated_success() {
        let mut hit = false;
        assert!(call_isolated("ok", || hit = true));
        assert!(hit);
    }

    #[test]
    fn test_call_isolated_contains_panic() {
        assert!(!call_isolated("boom", || panic!("listener exploded")));
    }
}
