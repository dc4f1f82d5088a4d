pub mod comeback;
pub mod config;
pub mod entry;
pub mod error;
pub mod idle;
pub mod process;
pub mod registry;
pub mod scheduler;
pub mod supervisor;

pub use comeback::GraceTimer;
pub use config::{ConfigLoader, DaemonConfig, EntrySpec, LaunchPolicy};
pub use entry::{ComebackAction, ControlAction, ControlFailure, Entry, EntryId, RunState};
pub use error::{Error, Result};
pub use idle::{CommandIdleSource, IdleSource, ScriptedIdleSource};
pub use process::{ExitStatus, ProcessBuilder, Signal};
pub use registry::Registry;
pub use scheduler::{PollOutcome, Scheduler};
pub use supervisor::{ProcessControl, SupervisorEvent};
