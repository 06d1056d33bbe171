//! # Cross-platform OS signal handling.
//!
//! Provides [`wait_for_shutdown_signal`], an async helper that completes when the process receives a termination signal.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//! - `SIGQUIT` (quit signal)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

use crate::sync::Latch;

/// Why [`Container::run`](crate::Container::run) stopped waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Wakeup {
    /// A component requested termination.
    Requested,
    /// The process received a termination signal.
    Signal,
}

/// Waits for a termination request on `latch`, and for an OS signal when `os_signals` is set.
///
/// A failure to install signal handlers is logged and the wait falls back to the latch alone.
pub(crate) async fn wait_for_termination(latch: &Latch, os_signals: bool) -> Wakeup {
    if !os_signals {
        latch.wait().await;
        return Wakeup::Requested;
    }
    tokio::select! {
        _ = latch.wait() => Wakeup::Requested,
        res = wait_for_shutdown_signal() => match res {
            Ok(()) => Wakeup::Signal,
            Err(err) => {
                tracing::warn!(error = %err, "cannot listen for OS signals; waiting for a termination request only");
                latch.wait().await;
                Wakeup::Requested
            }
        },
    }
}

/// Waits for a termination signal.
///
/// Returns `Ok(())` when any signal is received, or `Err` if signal registration fails.
#[cfg(unix)]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv()  => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

/// Waits for a termination signal.
#[cfg(not(unix))]
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_latch_wakes_termination_wait() {
        let latch = Arc::new(Latch::new());
        let waiter = {
            let latch = Arc::clone(&latch);
            tokio::spawn(async move { wait_for_termination(&latch, false).await })
        };
        latch.signal();
        assert_eq!(waiter.await.unwrap(), Wakeup::Requested);
    }
}
