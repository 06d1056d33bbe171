//! # Per-component lifecycle status.
//!
//! Values are strictly ordered; a component's status only ever moves forward.
//! ```text
//! New < Initializing < Initialized < Starting < Started
//!     < Stopping < Stopped < Destroying < Destroyed
//! ```
//! A component whose `init()` failed stays `Initializing` until teardown
//! moves it to `Destroying`/`Destroyed`; statuses may skip values but never go back.

/// Position of one component in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LifecycleStatus {
    /// Registered, nothing called yet.
    #[default]
    New,
    /// `init()` in progress (or failed).
    Initializing,
    /// `init()` succeeded.
    Initialized,
    /// `start()` in progress (or failed).
    Starting,
    /// `start()` succeeded.
    Started,
    /// `stop()` in progress.
    Stopping,
    /// `stop()` returned (errors included).
    Stopped,
    /// `destroy()` in progress.
    Destroying,
    /// `destroy()` returned (errors included).
    Destroyed,
}

impl LifecycleStatus {
    /// Returns true once `start()` has succeeded and teardown has not begun.
    pub fn is_started(self) -> bool {
        self == LifecycleStatus::Started
    }

    /// Returns a short stable label (snake_case).
    pub fn as_label(self) -> &'static str {
        match self {
            LifecycleStatus::New => "new",
            LifecycleStatus::Initializing => "initializing",
            LifecycleStatus::Initialized => "initialized",
            LifecycleStatus::Starting => "starting",
            LifecycleStatus::Started => "started",
            LifecycleStatus::Stopping => "stopping",
            LifecycleStatus::Stopped => "stopped",
            LifecycleStatus::Destroying => "destroying",
            LifecycleStatus::Destroyed => "destroyed",
        }
    }
}
