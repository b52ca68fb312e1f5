//! Per-session turn serialization.
//!
//! A keyed async mutex: turns on the same session run one at a time, turns
//! on different sessions do not contend. Entries are removed once no task
//! holds or waits for them, so the map only contains active sessions.

use std::pin::Pin;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<String, Arc<Mutex<()>>>;
type LockWait = Pin<Box<dyn Future<Output = OwnedMutexGuard<()>> + Send>>;

/// Keyed mutex over session ids.
#[derive(Default)]
pub struct SessionLocks {
    locks: LockMap,
}

impl SessionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until no other turn holds `session_id`, then hold it until the
    /// returned guard is dropped.
    pub async fn acquire(&self, session_id: &str) -> SessionGuard<'_> {
        let lock = self
            .locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        let mut waiter = Waiter {
            locks: &self.locks,
            session_id,
            wait: Box::pin(lock.lock_owned()),
        };
        let guard = (&mut waiter.wait).await;
        drop(waiter);

        SessionGuard {
            locks: &self.locks,
            session_id: session_id.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of sessions currently held or waited on.
    pub fn active_sessions(&self) -> usize {
        self.locks.len()
    }
}

fn prune_if_idle(locks: &LockMap, session_id: &str) {
    locks.remove_if(session_id, |_, lock| Arc::strong_count(lock) == 1);
}

/// A pending `acquire`. Prunes the entry if the wait is dropped before it
/// completes, e.g. when the caller's future is cancelled.
struct Waiter<'a> {
    locks: &'a LockMap,
    session_id: &'a str,
    wait: LockWait,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        // The pending wait owns a handle to the lock; release it before checking.
        self.wait = Box::pin(std::future::pending::<OwnedMutexGuard<()>>());
        prune_if_idle(self.locks, self.session_id);
    }
}

/// Holds one session's lock; releases and prunes it on drop.
pub struct SessionGuard<'a> {
    locks: &'a LockMap,
    session_id: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        // Release first so the map entry is the only remaining owner when idle.
        self.guard.take();
        prune_if_idle(self.locks, &self.session_id);
    }
}
