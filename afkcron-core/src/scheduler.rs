use tracing::{debug, error, info, warn};

use crate::{
    ControlAction, EntryId, ExitStatus, GraceTimer, LaunchPolicy, ProcessControl, Registry,
    RunState, Signal,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub comeback: bool,
    pub launched: Vec<EntryId>,
    pub resumed: Vec<EntryId>,
    pub grace_timers: Vec<GraceTimer>,
}

/// Idle-threshold scheduler. Owns the registry; every `run_state` change
/// goes through one of its methods, called from a single control loop.
pub struct Scheduler<C> {
    pub(crate) registry: Registry,
    pub(crate) control: C,
    previous_idle: u64,
    launch_policy: LaunchPolicy,
}

impl<C: ProcessControl> Scheduler<C> {
    pub fn new(registry: Registry, control: C, launch_policy: LaunchPolicy) -> Self {
        Self {
            registry,
            control,
            previous_idle: 0,
            launch_policy,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn previous_idle(&self) -> u64 {
        self.previous_idle
    }

    /// Feeds one idle-time sample. A drop in idle time means the user is
    /// back; anything else runs the launch/resume pass.
    pub fn on_idle_sample(&mut self, idle_secs: u64) -> crate::Result<PollOutcome> {
        let outcome = if idle_secs < self.previous_idle {
            info!(
                "User activity resumed (idle {}s -> {}s)",
                self.previous_idle, idle_secs
            );
            PollOutcome {
                comeback: true,
                grace_timers: self.handle_comeback(),
                ..Default::default()
            }
        } else {
            self.launch_pass(idle_secs)?
        };

        self.previous_idle = idle_secs;
        Ok(outcome)
    }

    fn launch_pass(&mut self, idle_secs: u64) -> crate::Result<PollOutcome> {
        let mut outcome = PollOutcome::default();

        for id in self.registry.ids() {
            let Some(entry) = self.registry.get(id) else {
                continue;
            };
            if entry.spec.idle_threshold_secs > idle_secs {
                continue;
            }

            match entry.run_state() {
                RunState::NotStarted => {
                    if self.launch(id)? {
                        outcome.launched.push(id);
                    }
                }
                RunState::Suspended(pid) => {
                    if self.resume(id, pid) {
                        outcome.resumed.push(id);
                    }
                }
                RunState::Running(_) | RunState::Finished | RunState::Disabled => {}
            }
        }

        Ok(outcome)
    }

    fn launch(&mut self, id: EntryId) -> crate::Result<bool> {
        let Some(entry) = self.registry.get_mut(id) else {
            return Ok(false);
        };

        match self.control.spawn(id, &entry.spec) {
            Ok(pid) => {
                info!("Starting execution of {} (pid {})", entry.spec.path, pid);
                entry.mark_started(pid);
                Ok(true)
            }
            Err(e) => match self.launch_policy {
                LaunchPolicy::FailFast => {
                    error!("Failed to start {}: {}", entry.spec.path, e);
                    Err(e)
                }
                LaunchPolicy::Isolate => {
                    error!(
                        "Failed to start {}: {}; entry {} disabled",
                        entry.spec.path, e, id
                    );
                    entry.mark_disabled();
                    Ok(false)
                }
            },
        }
    }

    fn resume(&mut self, id: EntryId, pid: u32) -> bool {
        if !self.deliver(id, pid, Signal::Continue) {
            return false;
        }
        info!("Continuing {}", pid);
        self.registry
            .get_mut(id)
            .is_some_and(|entry| entry.mark_resumed())
    }

    pub fn on_child_exit(&mut self, id: EntryId, pid: u32, status: ExitStatus) {
        let Some(entry) = self.registry.get_mut(id) else {
            warn!("Exit of pid {} reported for unknown entry {}", pid, id);
            return;
        };

        if entry.mark_gone(pid) {
            info!(
                "Process {} ({}) exited with {}, now {:?}",
                pid,
                entry.spec.path,
                status,
                entry.run_state()
            );
        } else {
            debug!(
                "Ignoring exit of pid {} no longer tracked by entry {}",
                pid, id
            );
        }
    }

    pub fn release_suspended(&mut self) {
        for id in self.registry.ids() {
            if let Some(RunState::Suspended(pid)) = self.registry.get(id).map(|e| e.run_state()) {
                self.resume(id, pid);
            }
        }
    }

    pub(crate) fn deliver(&mut self, id: EntryId, pid: u32, signal: Signal) -> bool {
        match self.control.signal(pid, signal) {
            Ok(()) => true,
            Err(e) => {
                let action = ControlAction::from(signal);
                warn!("Failed to {} pid {}: {}", action, pid, e);
                if let Some(entry) = self.registry.get_mut(id) {
                    entry.record_failure(action, pid, e.to_string());
                }
                false
            }
        }
    }
}
