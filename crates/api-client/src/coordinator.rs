//! Single-flight session refresh coordinator
//!
//! Guarantees that no matter how many requests fail with 401 at the same
//! time, at most one refresh call is outstanding per client. The first
//! failure to arrive runs the refresh cycle; every later failure parks as
//! a FIFO waiter on a oneshot channel and is released with the cycle's
//! outcome. The refreshing flag and the waiter queue live behind one
//! mutex, so checking the flag and flipping it is atomic with respect to
//! task interleaving, and the lock is never held across the network await.
//!
//! The gate is a `std::sync::Mutex`: every critical section is a few
//! pointer moves with no await inside, and the teardown guard must be
//! able to drain it from a `Drop` impl when the runner's future is
//! dropped mid-refresh.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use session::{IdentitySink, UserProfile};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::navigation::Navigator;
use crate::transport::RequestAttempt;

/// What the caller should do after consulting the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The session was renewed; reissue the original request once.
    Replay,
    /// The session is void; surface the original auth failure.
    Reauthenticate,
}

/// The one privileged call that renews the session.
///
/// Implementations must not retry or loop — one invocation is one network
/// call. Uses `Pin<Box<dyn Future>>` for dyn-compatibility.
pub trait SessionRefresher: Send + Sync {
    fn refresh(&self) -> Pin<Box<dyn Future<Output = session::Result<UserProfile>> + Send + '_>>;
}

/// Production refresher: posts to the refresh endpoint with the shared
/// cookie jar.
pub struct HttpRefresher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRefresher {
    /// `client` must be the same reqwest client the transport uses, so the
    /// refresh call carries (and receives) the session cookies.
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl SessionRefresher for HttpRefresher {
    fn refresh(&self) -> Pin<Box<dyn Future<Output = session::Result<UserProfile>> + Send + '_>> {
        Box::pin(session::refresh_session(&self.client, &self.base_url))
    }
}

/// Refresh state plus waiter queue, guarded as one unit.
#[derive(Default)]
struct RefreshGate {
    refreshing: bool,
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
}

/// Coordinates concurrent 401 recovery for one client instance.
///
/// Owns the refresh state exclusively; no other component reads or writes
/// it. Instantiated per client so tests can create independent instances
/// without shared global state.
pub struct RefreshCoordinator {
    gate: Mutex<RefreshGate>,
    refresher: Arc<dyn SessionRefresher>,
    session: Arc<dyn IdentitySink>,
    navigator: Arc<dyn Navigator>,
    signin_path: String,
}

impl RefreshCoordinator {
    pub fn new(
        refresher: Arc<dyn SessionRefresher>,
        session: Arc<dyn IdentitySink>,
        navigator: Arc<dyn Navigator>,
        signin_path: impl Into<String>,
    ) -> Self {
        Self {
            gate: Mutex::new(RefreshGate::default()),
            refresher,
            session,
            navigator,
            signin_path: signin_path.into(),
        }
    }

    /// Decide how an attempt that just failed with 401 should proceed.
    ///
    /// An attempt that has already been replayed once is a hard auth
    /// failure — a second refresh cycle for the same logical request would
    /// loop forever against a server that keeps answering 401.
    pub async fn ensure_fresh_session(&self, attempt: &RequestAttempt) -> RefreshOutcome {
        if attempt.retried() {
            debug!(path = %attempt.path, "replayed attempt still unauthenticated, giving up");
            return RefreshOutcome::Reauthenticate;
        }

        // Check-and-transition must be atomic: either this call becomes
        // the cycle runner or it enqueues behind the cycle in flight.
        let waiter = {
            let mut gate = self.gate.lock().expect("refresh gate lock poisoned");
            if gate.refreshing {
                let (tx, rx) = oneshot::channel();
                gate.waiters.push_back(tx);
                debug!(
                    path = %attempt.path,
                    queued = gate.waiters.len(),
                    "refresh in flight, waiting"
                );
                Some(rx)
            } else {
                gate.refreshing = true;
                None
            }
        };

        match waiter {
            Some(rx) => {
                // The runner always drains the queue, so the sender side
                // cannot be dropped before delivering; treat the
                // impossible case as a void session.
                rx.await.unwrap_or(RefreshOutcome::Reauthenticate)
            }
            None => self.run_cycle().await,
        }
    }

    /// Run one refresh cycle: invoke the refresher, then return the gate
    /// to idle and drain every waiter exactly once.
    ///
    /// The teardown is guard-backed: if this future is dropped while the
    /// refresh call is in flight (caller timeout, task abort) or the
    /// refresher panics, the guard still idles the gate and releases the
    /// waiters with `Reauthenticate` — otherwise every future request
    /// would park behind a cycle that no longer exists.
    async fn run_cycle(&self) -> RefreshOutcome {
        info!("session expired, starting refresh cycle");
        let guard = CycleGuard::new(self);

        match self.refresher.refresh().await {
            Ok(user) => {
                info!(user_id = %user.id, "session refresh succeeded");
                self.session.set_identity(user);
                guard.finish(RefreshOutcome::Replay);
                RefreshOutcome::Replay
            }
            Err(e) => {
                warn!(error = %e, "session refresh failed, forcing sign-in");
                guard.finish(RefreshOutcome::Reauthenticate);
                self.session.clear();
                self.navigator.redirect_to(&self.signin_path);
                RefreshOutcome::Reauthenticate
            }
        }
    }

    /// Flip back to idle and release all waiters in FIFO enqueue order.
    ///
    /// One critical section covers both, so a request failing right after
    /// this cycle starts a new one instead of queueing behind a ghost.
    fn finish_cycle(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut gate = self.gate.lock().expect("refresh gate lock poisoned");
            gate.refreshing = false;
            std::mem::take(&mut gate.waiters)
        };

        let released = waiters.len();
        for tx in waiters {
            // A waiter whose caller went away dropped its receiver; the
            // outcome is still delivered to every queued waiter.
            let _ = tx.send(outcome);
        }
        if released > 0 {
            debug!(released, ?outcome, "released refresh waiters");
        }
    }
}

/// Teardown guard for one refresh cycle.
///
/// `finish` is the normal exit. If the guard drops un-finished, the
/// runner's future died between flipping the gate to refreshing and
/// draining it; the drop restores idle and releases every waiter with
/// `Reauthenticate` so nobody waits on a cycle that will never resolve.
/// Session teardown and navigation stay out of the drop path — the next
/// 401 starts a clean cycle and decides those.
struct CycleGuard<'a> {
    coordinator: &'a RefreshCoordinator,
}

impl<'a> CycleGuard<'a> {
    fn new(coordinator: &'a RefreshCoordinator) -> Self {
        Self { coordinator }
    }

    fn finish(self, outcome: RefreshOutcome) {
        self.coordinator.finish_cycle(outcome);
        std::mem::forget(self);
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        warn!("refresh cycle interrupted, releasing waiters for re-authentication");
        self.coordinator.finish_cycle(RefreshOutcome::Reauthenticate);
    }
}
