//! Ties in-flight requests to the lifetime of the view that started them.
//!
//! Work run through `ViewScope::run` is aborted when the scope is cancelled
//! or dropped. Each flow writes the session in a single all-or-nothing step
//! and never awaits after it, so an aborted flow either finished its write
//! or left the session untouched.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use futures::future::{AbortHandle, Abortable};
use tracing::debug;

#[derive(Default)]
pub struct ViewScope {
    handles: Mutex<HashMap<u64, AbortHandle>>,
    next_id: AtomicU64,
}

/// Removes its handle from the scope when the run ends, however it ends
struct Registration<'a> {
    scope: &'a ViewScope,
    id: u64,
}

impl Drop for Registration<'_> {
    fn drop(&mut self) {
        if let Ok(mut handles) = self.scope.handles.lock() {
            handles.remove(&self.id);
        }
    }
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `fut` inside this scope. `None` means the scope was cancelled
    /// before it finished.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let (handle, abort_registration) = AbortHandle::new_pair();
        let _registration = self.register(handle);
        Abortable::new(fut, abort_registration).await.ok()
    }

    /// Number of runs still in progress
    pub fn in_flight(&self) -> usize {
        self.handles.lock().map(|h| h.len()).unwrap_or(0)
    }

    /// Abort everything still running in this scope
    pub fn cancel(&self) {
        if let Ok(mut handles) = self.handles.lock() {
            if !handles.is_empty() {
                debug!(count = handles.len(), "Cancelling in-flight requests");
            }
            for (_, handle) in handles.drain() {
                handle.abort();
            }
        }
    }

    fn register(&self, handle: AbortHandle) -> Registration<'_> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut handles) = self.handles.lock() {
            handles.insert(id, handle);
        }
        Registration { scope: self, id }
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::api::fake::{FakeApi, Reply};
    use crate::auth::{MemoryTokenStore, Session, SessionContext, SessionStore, TokenStore};

    #[tokio::test]
    async fn test_run_completes() {
        let scope = ViewScope::new();
        assert_eq!(scope.run(async { 7 }).await, Some(7));
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_completed_runs_release_handles() {
        let scope = ViewScope::new();
        for i in 0..1000 {
            assert_eq!(scope.run(async move { i }).await, Some(i));
        }
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_in_flight_counts_pending_runs() {
        let scope = ViewScope::new();

        let (result, ()) = tokio::join!(scope.run(std::future::pending::<()>()), async {
            tokio::task::yield_now().await;
            assert_eq!(scope.in_flight(), 1);
            scope.cancel();
            assert_eq!(scope.in_flight(), 0);
        });

        assert_eq!(result, None);
        assert_eq!(scope.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_login_leaves_session_untouched() {
        let mut api = FakeApi::new();
        api.authorize = Reply::Hang;
        let tokens = Arc::new(MemoryTokenStore::new());
        let store = SessionStore::new(Arc::new(api), tokens.clone(), SessionContext::new());
        let scope = ViewScope::new();

        let (result, ()) = tokio::join!(scope.run(store.login("alice", "secret", None)), async {
            tokio::task::yield_now().await;
            scope.cancel();
        });

        assert!(result.is_none());
        assert_eq!(store.session().snapshot().await, Session::default());
        assert_eq!(tokens.get().unwrap(), None);
    }

    #[tokio::test]
    async fn test_cancelled_restore_leaves_session_untouched() {
        let mut api = FakeApi::new();
        api.user_info = Reply::Hang;
        let store = SessionStore::new(
            Arc::new(api),
            Arc::new(MemoryTokenStore::with_token("abc")),
            SessionContext::new(),
        );
        let scope = ViewScope::new();

        let (result, ()) = tokio::join!(scope.run(store.initialize()), async {
            tokio::task::yield_now().await;
            scope.cancel();
        });

        assert_eq!(result, None);
        assert!(!store.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_for_session_write_persists_nothing() {
        let tokens = Arc::new(MemoryTokenStore::new());
        let store = SessionStore::new(Arc::new(FakeApi::new()), tokens.clone(), SessionContext::new());
        let scope = ViewScope::new();

        let held = store.session().hold_write().await;
        let (result, ()) = tokio::join!(scope.run(store.login("alice", "secret", None)), async {
            tokio::task::yield_now().await;
            scope.cancel();
        });
        drop(held);

        assert!(result.is_none());
        assert_eq!(store.session().snapshot().await, Session::default());
        assert_eq!(tokens.get().unwrap(), None);
    }
}
