use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{EntrySpec, Signal};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct EntryId(usize);

impl EntryId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComebackAction {
    pub terminate: bool,
    pub force_kill: bool,
    pub suspend: bool,
    pub deprioritize: bool,
}

impl ComebackAction {
    pub const STAY: Self = Self {
        terminate: false,
        force_kill: false,
        suspend: false,
        deprioritize: false,
    };

    pub fn terminate() -> Self {
        Self {
            terminate: true,
            ..Self::STAY
        }
    }

    pub fn force_kill() -> Self {
        Self {
            force_kill: true,
            ..Self::STAY
        }
    }

    pub fn terminate_then_kill() -> Self {
        Self {
            terminate: true,
            force_kill: true,
            ..Self::STAY
        }
    }

    pub fn suspend() -> Self {
        Self {
            suspend: true,
            ..Self::STAY
        }
    }

    pub fn deprioritize() -> Self {
        Self {
            deprioritize: true,
            ..Self::STAY
        }
    }

    pub fn is_stay(&self) -> bool {
        *self == Self::STAY
    }

    /// Force-kill is delayed by the grace period only when a graceful
    /// terminate was sent first.
    pub fn needs_grace(&self) -> bool {
        self.terminate && self.force_kill
    }
}

impl fmt::Display for ComebackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_stay() {
            return write!(f, "stay");
        }
        let mut parts = Vec::new();
        if self.terminate {
            parts.push("term");
        }
        if self.force_kill {
            parts.push("kill");
        }
        if self.suspend {
            parts.push("stop");
        }
        if self.deprioritize {
            parts.push("prio");
        }
        write!(f, "{}", parts.join("+"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunState {
    NotStarted,
    Running(u32),
    Suspended(u32),
    Finished,
    Disabled,
}

impl RunState {
    pub fn pid(&self) -> Option<u32> {
        match self {
            Self::Running(pid) | Self::Suspended(pid) => Some(*pid),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlAction {
    Terminate,
    Kill,
    Suspend,
    Resume,
    LowerPriority,
}

impl From<Signal> for ControlAction {
    fn from(signal: Signal) -> Self {
        match signal {
            Signal::Terminate => Self::Terminate,
            Signal::Kill => Self::Kill,
            Signal::Stop => Self::Suspend,
            Signal::Continue => Self::Resume,
        }
    }
}

impl fmt::Display for ControlAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Terminate => "terminate",
            Self::Kill => "kill",
            Self::Suspend => "suspend",
            Self::Resume => "resume",
            Self::LowerPriority => "lower priority",
        };
        f.write_str(name)
    }
}

/// A control operation that could not be delivered. While present, the
/// tracked `run_state` may not match the real process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlFailure {
    pub action: ControlAction,
    pub pid: u32,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct Entry {
    pub id: EntryId,
    pub spec: EntrySpec,
    run_state: RunState,
    drift: Option<ControlFailure>,
}

impl Entry {
    pub fn new(id: EntryId, spec: EntrySpec) -> Self {
        Self {
            id,
            spec,
            run_state: RunState::NotStarted,
            drift: None,
        }
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn drift(&self) -> Option<&ControlFailure> {
        self.drift.as_ref()
    }

    pub fn mark_started(&mut self, pid: u32) -> bool {
        if self.run_state != RunState::NotStarted {
            return false;
        }
        self.transition(RunState::Running(pid));
        true
    }

    pub fn mark_suspended(&mut self) -> bool {
        match self.run_state {
            RunState::Running(pid) => {
                self.transition(RunState::Suspended(pid));
                true
            }
            _ => false,
        }
    }

    pub fn mark_resumed(&mut self) -> bool {
        match self.run_state {
            RunState::Suspended(pid) => {
                self.transition(RunState::Running(pid));
                true
            }
            _ => false,
        }
    }

    /// The process `pid` is gone (reaped or force-killed). Single-shot
    /// entries become `Finished`, the rest become eligible again. Ignored
    /// unless the entry still tracks `pid`.
    pub fn mark_gone(&mut self, pid: u32) -> bool {
        if self.run_state.pid() != Some(pid) {
            return false;
        }
        let next = if self.spec.single_shot {
            RunState::Finished
        } else {
            RunState::NotStarted
        };
        self.transition(next);
        true
    }

    pub fn mark_disabled(&mut self) {
        self.transition(RunState::Disabled);
    }

    pub fn record_failure(&mut self, action: ControlAction, pid: u32, reason: impl Into<String>) {
        self.drift = Some(ControlFailure {
            action,
            pid,
            reason: reason.into(),
        });
    }

    fn transition(&mut self, next: RunState) {
        self.run_state = next;
        self.drift = None;
    }
}
