//! # Container state machine: states and transition table.
//!
//! The container occupies exactly one [`State`]. Entering a state runs that
//! state's activity over every component; the activity's [`Outcome`] picks the
//! next state from the table below. A state with no target for the outcome
//! parks the machine.
//!
//! ```text
//! State         Activity                    Success      Failure
//! ───────────── ─────────────────────────── ──────────── ────────────
//! New           -                           Initializing Destroyed
//! Initializing  init() each, abort on error Initialized  Destroying
//! Initialized   resolve dependency order    Starting     Destroying
//! Starting      start() each, abort on err  Started      Stopping
//! Started       -                           Running      -
//! Running       park                        -            -
//! Stopping      stop() each, never aborts   Stopped      Stopped
//! Stopped       -                           Destroying   -
//! Destroying    destroy() each, never abort Destroyed    Destroyed
//! Destroyed     terminal                    -            -
//! ```

/// Result of one state's activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every component processed without a phase-fatal error.
    Success,
    /// A phase-fatal error aborted the activity.
    Failure,
}

/// Position of the container in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum State {
    /// Nothing attempted yet; registration is open.
    #[default]
    New,
    /// Calling `init()` on every component.
    Initializing,
    /// Every component initialized; computing the dependency order.
    Initialized,
    /// Calling `start()` on every component.
    Starting,
    /// Every component started.
    Started,
    /// Parked until [`Container::stop`](crate::Container::stop).
    Running,
    /// Calling `stop()` on every component.
    Stopping,
    /// Every component stopped.
    Stopped,
    /// Calling `destroy()` on every component.
    Destroying,
    /// Terminal.
    Destroyed,
}

impl State {
    /// Target after the activity of `self` ended with `outcome`.
    ///
    /// `None` parks the machine in `self`.
    ///
    /// # Example
    /// ```
    /// use lifevisor::{Outcome, State};
    ///
    /// assert_eq!(State::Starting.next(Outcome::Failure), Some(State::Stopping));
    /// assert_eq!(State::Initializing.next(Outcome::Failure), Some(State::Destroying));
    /// assert_eq!(State::Running.next(Outcome::Success), None);
    /// ```
    pub fn next(self, outcome: Outcome) -> Option<State> {
        match outcome {
            Outcome::Success => self.on_success(),
            Outcome::Failure => self.on_failure(),
        }
    }

    /// Target when the activity succeeded.
    pub fn on_success(self) -> Option<State> {
        match self {
            State::New => Some(State::Initializing),
            State::Initializing => Some(State::Initialized),
            State::Initialized => Some(State::Starting),
            State::Starting => Some(State::Started),
            State::Started => Some(State::Running),
            State::Running => None,
            State::Stopping => Some(State::Stopped),
            State::Stopped => Some(State::Destroying),
            State::Destroying => Some(State::Destroyed),
            State::Destroyed => None,
        }
    }

    /// Target when the activity failed.
    pub fn on_failure(self) -> Option<State> {
        match self {
            State::New => Some(State::Destroyed),
            State::Initializing => Some(State::Destroying),
            State::Initialized => Some(State::Destroying),
            State::Starting => Some(State::Stopping),
            State::Started => None,
            State::Running => None,
            State::Stopping => Some(State::Stopped),
            State::Stopped => None,
            State::Destroying => Some(State::Destroyed),
            State::Destroyed => None,
        }
    }

    /// Where an explicit stop request enters the teardown path from `self`.
    ///
    /// `None` when there is nothing to tear down (never started, or already finished).
    pub fn stop_target(self) -> Option<State> {
        match self {
            State::Running => Some(State::Stopping),
            _ => None,
        }
    }

    /// Returns true when no transition leads out of this state and it is not the
    /// `Running` park.
    pub fn is_finished(self) -> bool {
        self != State::Running && self.on_success().is_none() && self.on_failure().is_none()
    }

    /// Returns a short stable label (snake_case).
    pub fn as_label(self) -> &'static str {
        match self {
            State::New => "new",
            State::Initializing => "initializing",
            State::Initialized => "initialized",
            State::Starting => "starting",
            State::Started => "started",
            State::Running => "running",
            State::Stopping => "stopping",
            State::Stopped => "stopped",
            State::Destroying => "destroying",
            State::Destroyed => "destroyed",
        }
    }
}
