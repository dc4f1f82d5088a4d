use tracing::{debug, info, warn};

use crate::{ControlAction, EntryId, ProcessControl, RunState, Scheduler, Signal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraceTimer {
    pub entry: EntryId,
    pub pid: u32,
}

impl<C: ProcessControl> Scheduler<C> {
    pub fn handle_comeback(&mut self) -> Vec<GraceTimer> {
        let mut timers = Vec::new();

        for id in self.registry.ids() {
            let Some(entry) = self.registry.get(id) else {
                continue;
            };
            let RunState::Running(pid) = entry.run_state() else {
                continue;
            };
            let action = entry.spec.comeback;

            if action.is_stay() {
                debug!("Leaving {} (pid {}) running", entry.spec.path, pid);
                continue;
            }

            if action.terminate {
                info!("Terminating {}", pid);
                self.deliver(id, pid, Signal::Terminate);
            }

            if action.force_kill {
                if action.needs_grace() {
                    timers.push(GraceTimer { entry: id, pid });
                } else {
                    self.force_kill(id, pid);
                }
            }

            if action.suspend && self.tracks(id, pid) && self.deliver(id, pid, Signal::Stop) {
                info!("Stopped {}", pid);
                if let Some(entry) = self.registry.get_mut(id) {
                    entry.mark_suspended();
                }
            }

            if action.deprioritize && self.tracks(id, pid) {
                info!("Lowering priority for {}", pid);
                if let Err(e) = self.control.lower_priority(pid) {
                    warn!("Failed to lower priority of pid {}: {}", pid, e);
                    if let Some(entry) = self.registry.get_mut(id) {
                        entry.record_failure(ControlAction::LowerPriority, pid, e.to_string());
                    }
                }
            }
        }

        timers
    }

    /// Delivers a deferred force-kill, unless the child is already gone.
    pub fn on_grace_expired(&mut self, timer: GraceTimer) {
        if !self.tracks(timer.entry, timer.pid) {
            debug!(
                "Pid {} exited during the grace period, skipping kill",
                timer.pid
            );
            return;
        }
        self.force_kill(timer.entry, timer.pid);
    }

    fn force_kill(&mut self, id: EntryId, pid: u32) {
        if !self.deliver(id, pid, Signal::Kill) {
            return;
        }
        info!("Killed {}", pid);
        // Reset now so the next launch pass cannot race the reaper.
        if let Some(entry) = self.registry.get_mut(id) {
            entry.mark_gone(pid);
        }
    }

    fn tracks(&self, id: EntryId, pid: u32) -> bool {
        self.registry
            .get(id)
            .is_some_and(|e| e.run_state().pid() == Some(pid))
    }
}
