//! # One-shot, broadcast signal latch.
//!
//! [`Latch`] starts unsignalled. [`Latch::signal`] flips it permanently and wakes
//! every current waiter; later waiters return immediately.
//!
//! ## Waiting
//! ```text
//! async:     wait()                      until signalled
//!            wait_timeout(d)  -> bool    signalled within d?
//!            wait_cancellable(token)     Err(Interrupted) if token fires first
//!            wait_uninterruptibly(token) keeps waiting across token cancellation
//! blocking:  blocking_wait()             parks the OS thread (Condvar)
//!            blocking_wait_timeout(d)    absolute deadline, spurious wakeups re-wait
//! ```
//!
//! ## Rules
//! - `signal()` is idempotent; the flag never reverts.
//! - A [`CancellationToken`] plays the role of thread interruption. The latch only
//!   observes it, so the caller's interruption state is left as it was.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Returned when a cancellable wait was interrupted before the latch was signalled.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("wait interrupted before the latch was signalled")]
pub struct Interrupted;

/// One-shot broadcast latch.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use lifevisor::Latch;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let latch = Arc::new(Latch::new());
/// let waiter = {
///     let latch = Arc::clone(&latch);
///     tokio::spawn(async move { latch.wait().await })
/// };
/// latch.signal();
/// waiter.await.unwrap();
/// assert!(latch.is_signalled());
/// # }
/// ```
#[derive(Debug, Default)]
pub struct Latch {
    signalled: AtomicBool,
    notify: Notify,
    /// Guards the flag for blocking waiters.
    lock: Mutex<()>,
    cond: Condvar,
}

impl Latch {
    /// Creates an unsignalled latch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals the latch and wakes every waiter. Idempotent.
    pub fn signal(&self) {
        {
            let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
            if self.signalled.swap(true, Ordering::SeqCst) {
                return;
            }
        }
        self.cond.notify_all();
        self.notify.notify_waiters();
    }

    /// Returns true once [`signal`](Self::signal) has been called.
    #[inline]
    pub fn is_signalled(&self) -> bool {
        self.signalled.load(Ordering::SeqCst)
    }

    /// Waits until signalled. Returns immediately if already signalled.
    pub async fn wait(&self) {
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Register before checking the flag so a concurrent signal is not lost.
            notified.as_mut().enable();
            if self.is_signalled() {
                return;
            }
            notified.await;
        }
    }

    /// Waits up to `timeout`; returns whether the latch was signalled in time.
    pub async fn wait_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.wait()).await.is_ok() || self.is_signalled()
    }

    /// Waits until signalled or until `token` is cancelled.
    ///
    /// A latch that is already signalled wins over a cancelled token.
    pub async fn wait_cancellable(&self, token: &CancellationToken) -> Result<(), Interrupted> {
        if self.is_signalled() {
            return Ok(());
        }
        tokio::select! {
            biased;
            _ = self.wait() => Ok(()),
            _ = token.cancelled() => {
                if self.is_signalled() { Ok(()) } else { Err(Interrupted) }
            }
        }
    }

    /// Waits until truly signalled, ignoring cancellation of `token`.
    ///
    /// Returns true if the token was cancelled at some point during the wait.
    /// The token itself is left cancelled.
    pub async fn wait_uninterruptibly(&self, token: &CancellationToken) -> bool {
        match self.wait_cancellable(token).await {
            Ok(()) => token.is_cancelled(),
            Err(Interrupted) => {
                self.wait().await;
                true
            }
        }
    }

    /// Blocks the current thread until signalled.
    ///
    /// Must not be called from inside an async runtime worker.
    pub fn blocking_wait(&self) {
        let mut guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        while !self.is_signalled() {
            guard = self
                .cond
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Blocks the current thread up to `timeout`; returns whether the latch was signalled.
    ///
    /// The wait tracks an absolute deadline, so neither spurious wakeups nor
    /// coarse timer resolution end it early.
    pub fn blocking_wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if self.is_signalled() {
                return true;
            }
            let Some(deadline) = deadline else {
                // Overflowing deadline: effectively unbounded.
                guard = self
                    .cond
                    .wait(guard)
                    .unwrap_or_else(PoisonError::into_inner);
                continue;
            };
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            guard = self
                .cond
                .wait_timeout(guard, remaining)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_signal_before_wait_returns_immediately() {
        let latch = Latch::new();
        latch.signal();
        tokio::time::timeout(Duration::from_secs(1), latch.wait())
            .await
            .expect("wait should not block once signalled");
        assert!(latch.wait_timeout(Duration::ZERO).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_timeout_elapses_unsignalled() {
        let latch = Latch::new();
        assert!(!latch.wait_timeout(Duration::from_millis(50)).await);
        assert!(!latch.is_signalled());
    }

    #[tokio::test]
    async fn test_signal_wakes_all_waiters() {
        let latch = Arc::new(Latch::new());
        let mut waiters = Vec::new();
        for _ in 0..4 {
            let latch = Arc::clone(&latch);
            waiters.push(tokio::spawn(async move {
                latch.wait_timeout(Duration::from_secs(5)).await
            }));
        }
        tokio::task::yield_now().await;
        latch.signal();
        for w in waiters {
            assert!(w.await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_signal_is_idempotent_and_permanent() {
        let latch = Latch::new();
        latch.signal();
        latch.signal();
        assert!(latch.is_signalled());
        latch.wait().await;
        assert!(latch.is_signalled());
    }

    #[tokio::test]
    async fn test_cancellable_wait_is_interrupted() {
        let latch = Latch::new();
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(latch.wait_cancellable(&token).await, Err(Interrupted));

        latch.signal();
        assert_eq!(latch.wait_cancellable(&token).await, Ok(()));
    }

    #[tokio::test]
    async fn test_uninterruptible_wait_survives_cancellation() {
        let latch = Arc::new(Latch::new());
        let token = CancellationToken::new();

        let waiter = {
            let latch = Arc::clone(&latch);
            let token = token.clone();
            tokio::spawn(async move { latch.wait_uninterruptibly(&token).await })
        };

        token.cancel();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        latch.signal();
        assert!(waiter.await.unwrap(), "interruption must be reported");
        assert!(token.is_cancelled(), "interruption state is preserved");
    }

    #[test]
    fn test_blocking_wait_from_other_thread() {
        let latch = Arc::new(Latch::new());
        let waiter = {
            let latch = Arc::clone(&latch);
            std::thread::spawn(move || latch.blocking_wait_timeout(Duration::from_secs(5)))
        };
        std::thread::sleep(Duration::from_millis(10));
        latch.signal();
        assert!(waiter.join().unwrap());
        latch.blocking_wait();
    }

    #[test]
    fn test_blocking_wait_timeout_never_wakes_early() {
        let latch = Latch::new();
        let timeout = Duration::from_millis(30);
        let started = Instant::now();
        assert!(!latch.blocking_wait_timeout(timeout));
        assert!(started.elapsed() >= timeout);
    }
}
