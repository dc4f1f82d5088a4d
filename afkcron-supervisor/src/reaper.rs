use afkcron_core::{ExitStatus, SupervisorEvent};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::Pid;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, trace};

use crate::common::ProcessRegistry;

/// Backstop for SIGCHLDs that arrive before a pid is registered.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Reaps every registered child that has terminated, without blocking.
///
/// Only registered pids are waited on, so children owned by other code in
/// the process (such as the idle probe) are never stolen.
pub fn reap_exited(registry: &ProcessRegistry) -> Vec<SupervisorEvent> {
    let mut events = Vec::new();

    for pid in registry.pids() {
        let Ok(raw) = i32::try_from(pid) else {
            registry.unregister(pid);
            events.push(SupervisorEvent::ReapFailed {
                pid,
                reason: "pid out of range".to_string(),
            });
            continue;
        };

        let status = match waitpid(Pid::from_raw(raw), Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(_, code)) => ExitStatus::exited(code),
            Ok(WaitStatus::Signaled(_, sig, _)) => ExitStatus::signaled(sig as i32),
            Ok(other) => {
                trace!("Pid {} not terminated: {:?}", pid, other);
                continue;
            }
            Err(e) => {
                registry.unregister(pid);
                events.push(SupervisorEvent::ReapFailed {
                    pid,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Some(entry) = registry.unregister(pid) {
            debug!("Reaped pid {} of entry {}: {}", pid, entry, status);
            events.push(SupervisorEvent::ChildExited { entry, pid, status });
        }
    }

    events
}

/// Turns SIGCHLD into [`SupervisorEvent`]s on a channel; no entry state is
/// touched here.
pub struct ChildReaper;

impl ChildReaper {
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        registry: Arc<ProcessRegistry>,
        events: mpsc::Sender<SupervisorEvent>,
    ) -> std::io::Result<JoinHandle<()>> {
        let mut sigchld = signal(SignalKind::child())?;

        Ok(tokio::spawn(async move {
            let mut sweep = time::interval(SWEEP_INTERVAL);
            sweep.set_missed_tick_behavior(time::MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = sigchld.recv() => {}
                    _ = sweep.tick() => {}
                }

                for event in reap_exited(&registry) {
                    if events.send(event).await.is_err() {
                        debug!("Event channel closed, child reaper exiting");
                        return;
                    }
                }
            }
        }))
    }
}
