use std::fmt;

use crate::lifecycle::LifecycleStatus;

/// One of the four component callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// [`Component::init`](crate::Component::init).
    Init,
    /// [`Component::start`](crate::Component::start).
    Start,
    /// [`Component::stop`](crate::Component::stop).
    Stop,
    /// [`Component::destroy`](crate::Component::destroy).
    Destroy,
}

impl Phase {
    /// Status a component enters when the callback begins.
    pub fn entering(self) -> LifecycleStatus {
        match self {
            Phase::Init => LifecycleStatus::Initializing,
            Phase::Start => LifecycleStatus::Starting,
            Phase::Stop => LifecycleStatus::Stopping,
            Phase::Destroy => LifecycleStatus::Destroying,
        }
    }

    /// Status a component enters when the callback succeeds.
    pub fn completed(self) -> LifecycleStatus {
        match self {
            Phase::Init => LifecycleStatus::Initialized,
            Phase::Start => LifecycleStatus::Started,
            Phase::Stop => LifecycleStatus::Stopped,
            Phase::Destroy => LifecycleStatus::Destroyed,
        }
    }

    /// Teardown phases never abort and never change the machine's path.
    pub fn is_teardown(self) -> bool {
        matches!(self, Phase::Stop | Phase::Destroy)
    }

    /// Returns a short stable label (snake_case).
    pub fn as_label(self) -> &'static str {
        match self {
            Phase::Init => "init",
            Phase::Start => "start",
            Phase::Stop => "stop",
            Phase::Destroy => "destroy",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
