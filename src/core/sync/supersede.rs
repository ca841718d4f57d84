//! Per-panel request supersession.
//!
//! Starting a load cancels the previous load of the same panel; the older
//! request's completion is then dropped instead of overwriting newer state.

use std::cell::RefCell;
use std::future::Future;

use tokio_util::sync::CancellationToken;

#[derive(Debug, Default)]
pub(super) struct Supersede {
    current: RefCell<CancellationToken>,
}

impl Supersede {
    /// Cancel the in-flight load of this panel, if any, and return the token of a new one.
    pub(super) fn begin(&self) -> CancellationToken {
        let fresh = CancellationToken::new();
        let previous = self.current.replace(fresh.clone());
        previous.cancel();
        fresh
    }
}

/// Run `fut` unless `token` is cancelled first. `None` means superseded.
pub(super) async fn unless_superseded<F: Future>(
    token: &CancellationToken,
    fut: F,
) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = token.cancelled() => None,
        out = fut => Some(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_cancels_previous_token() {
        let slot = Supersede::default();
        let first = slot.begin();
        assert!(!first.is_cancelled());
        let second = slot.begin();
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[tokio::test]
    async fn cancelled_token_skips_future() {
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(unless_superseded(&token, async { 1 }).await, None);
    }

    #[tokio::test]
    async fn live_token_returns_output() {
        let token = CancellationToken::new();
        assert_eq!(unless_superseded(&token, async { 1 }).await, Some(1));
    }
}
