use afkcron_core::EntryId;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Children started by the supervisor and not yet reaped, keyed by pid.
///
/// Shared between the launcher, which registers, and the reaper, which
/// waits only on registered pids and unregisters them.
#[derive(Debug, Default)]
pub struct ProcessRegistry {
    pid_to_entry: RwLock<HashMap<u32, EntryId>>,
}

impl ProcessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, pid: u32, entry: EntryId) {
        self.pid_to_entry.write().insert(pid, entry);
    }

    pub fn unregister(&self, pid: u32) -> Option<EntryId> {
        self.pid_to_entry.write().remove(&pid)
    }

    pub fn get(&self, pid: u32) -> Option<EntryId> {
        self.pid_to_entry.read().get(&pid).copied()
    }

    pub fn pids(&self) -> Vec<u32> {
        self.pid_to_entry.read().keys().copied().collect()
    }

    pub fn count(&self) -> usize {
        self.pid_to_entry.read().len()
    }

    pub fn clear(&self) {
        self.pid_to_entry.write().clear();
    }
}
