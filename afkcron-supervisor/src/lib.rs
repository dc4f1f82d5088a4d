mod common;
pub use common::ProcessRegistry;

#[cfg(unix)]
mod reaper;
#[cfg(unix)]
pub use reaper::{ChildReaper, SWEEP_INTERVAL, reap_exited};

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UnixSupervisor as PlatformSupervisor;

#[cfg(unix)]
pub fn create_supervisor() -> std::sync::Arc<PlatformSupervisor> {
    tracing::debug!("Creating platform supervisor");
    std::sync::Arc::new(PlatformSupervisor::new())
}
