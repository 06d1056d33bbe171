//! # Container configuration.
//!
//! [`Config`] controls the event bus, the shared executor's pool limit and
//! whether [`Container::run`](crate::Container::run) reacts to OS signals.
//!
//! # Example
//! ```
//! use lifevisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.max_concurrent = 4;
//! cfg.listen_os_signals = false;
//!
//! assert_eq!(cfg.concurrency_limit(), Some(4));
//! ```

/// Global configuration for a container.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
    /// Maximum number of executor tasks running at once (0 = unlimited).
    pub max_concurrent: usize,
    /// Whether [`Container::run`](crate::Container::run) also stops on SIGINT/SIGTERM/SIGQUIT/Ctrl-C.
    pub listen_os_signals: bool,
}

impl Config {
    /// Pool limit for the shared executor, `None` when unlimited.
    pub fn concurrency_limit(&self) -> Option<usize> {
        match self.max_concurrent {
            0 => None,
            n => Some(n),
        }
    }

    /// Bus capacity, never below 1.
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `bus_capacity = 1024`
    /// - `max_concurrent = 0` (unlimited)
    /// - `listen_os_signals = true`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            max_concurrent: 0,
            listen_os_signals: true,
        }
    }
}
