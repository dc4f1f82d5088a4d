use crate::{EntryId, EntrySpec, ExitStatus, GraceTimer, Signal};

#[derive(Debug, Clone)]
pub enum SupervisorEvent {
    ChildExited {
        entry: EntryId,
        pid: u32,
        status: ExitStatus,
    },
    ReapFailed {
        pid: u32,
        reason: String,
    },
    GraceExpired(GraceTimer),
}

/// Implementations must not block for long: they run on the control loop.
pub trait ProcessControl {
    fn spawn(&self, entry: EntryId, spec: &EntrySpec) -> crate::Result<u32>;

    fn signal(&self, pid: u32, signal: Signal) -> crate::Result<()>;

    fn lower_priority(&self, pid: u32) -> crate::Result<()>;
}

impl<T: ProcessControl + ?Sized> ProcessControl for std::sync::Arc<T> {
    fn spawn(&self, entry: EntryId, spec: &EntrySpec) -> crate::Result<u32> {
        (**self).spawn(entry, spec)
    }

    fn signal(&self, pid: u32, signal: Signal) -> crate::Result<()> {
        (**self).signal(pid, signal)
    }

    fn lower_priority(&self, pid: u32) -> crate::Result<()> {
        (**self).lower_priority(pid)
    }
}
