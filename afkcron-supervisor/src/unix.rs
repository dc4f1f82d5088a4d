use afkcron_core::{EntryId, EntrySpec, Error, ProcessBuilder, ProcessControl, Result, Signal};
use nix::errno::Errno;
use nix::sys::signal;
use nix::unistd::Pid;
use std::sync::Arc;
use tracing::debug;

use crate::common::ProcessRegistry;

/// Nice value given to deprioritized children.
pub const LOWEST_PRIORITY: libc::c_int = 19;

pub struct UnixSupervisor {
    registry: Arc<ProcessRegistry>,
}

impl Default for UnixSupervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl UnixSupervisor {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ProcessRegistry::new()),
        }
    }

    pub fn registry(&self) -> Arc<ProcessRegistry> {
        self.registry.clone()
    }

    // pid 0 and negative pids address process groups, never a single child.
    fn to_pid(pid: u32) -> Result<Pid> {
        match i32::try_from(pid) {
            Ok(raw) if raw > 0 => Ok(Pid::from_raw(raw)),
            _ => Err(Error::Signal {
                pid,
                reason: "not a valid child pid".to_string(),
            }),
        }
    }
}

impl ProcessControl for UnixSupervisor {
    fn spawn(&self, entry: EntryId, spec: &EntrySpec) -> Result<u32> {
        let pid = ProcessBuilder::from_spec(spec).spawn()?;
        self.registry.register(pid, entry);
        debug!("Registered pid {} for entry {}", pid, entry);
        Ok(pid)
    }

    fn signal(&self, pid: u32, sig: Signal) -> Result<()> {
        let target = Self::to_pid(pid)?;
        signal::kill(target, sig.to_nix()).map_err(|e| Error::Signal {
            pid,
            reason: e.to_string(),
        })
    }

    fn lower_priority(&self, pid: u32) -> Result<()> {
        let target = Self::to_pid(pid)?;
        // SAFETY: plain syscall on integer arguments.
        let rc = unsafe {
            libc::setpriority(
                libc::PRIO_PROCESS,
                target.as_raw() as libc::id_t,
                LOWEST_PRIORITY,
            )
        };
        if rc == -1 {
            return Err(Error::Unix(Errno::last()));
        }
        Ok(())
    }
}

impl Drop for UnixSupervisor {
    fn drop(&mut self) {
        self.registry.clear();
    }
}
