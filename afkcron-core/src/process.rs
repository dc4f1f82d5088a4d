use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Signal {
    Terminate,
    Kill,
    Stop,
    Continue,
}

impl Signal {
    #[cfg(unix)]
    pub fn to_nix(self) -> nix::sys::signal::Signal {
        use nix::sys::signal::Signal as NixSignal;
        match self {
            Signal::Terminate => NixSignal::SIGTERM,
            Signal::Kill => NixSignal::SIGKILL,
            Signal::Stop => NixSignal::SIGSTOP,
            Signal::Continue => NixSignal::SIGCONT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitStatus {
    code: Option<i32>,
    signal: Option<i32>,
}

impl ExitStatus {
    pub fn new(code: Option<i32>, signal: Option<i32>) -> Self {
        Self { code, signal }
    }

    pub fn exited(code: i32) -> Self {
        Self::new(Some(code), None)
    }

    pub fn signaled(signal: i32) -> Self {
        Self::new(None, Some(signal))
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn signal(&self) -> Option<i32> {
        self.signal
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.code, self.signal) {
            (Some(code), _) => write!(f, "exit code {}", code),
            (None, Some(signal)) => write!(f, "signal {}", signal),
            (None, None) => write!(f, "unknown status"),
        }
    }
}

pub fn split_arguments(arguments: &str) -> Vec<String> {
    arguments.split_whitespace().map(str::to_string).collect()
}

/// Builds and starts a child that the caller reaps itself.
///
/// The `std::process::Child` is dropped right after spawning; only the pid
/// is kept, and exit status is collected by the child reaper. The program
/// is executed as given and never looked up in `PATH`.
pub struct ProcessBuilder {
    program: String,
    args: Vec<String>,
}

impl ProcessBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn from_spec(spec: &crate::EntrySpec) -> Self {
        Self::new(&spec.path).args(split_arguments(&spec.arguments))
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    // A bare name resolves against the working directory.
    fn executable(&self) -> PathBuf {
        if self.program.contains('/') {
            PathBuf::from(&self.program)
        } else {
            Path::new(".").join(&self.program)
        }
    }

    pub fn spawn(self) -> crate::Result<u32> {
        tracing::debug!(
            "Spawning process: program='{}', args={:?}",
            self.program,
            self.args
        );

        let child = Command::new(self.executable())
            .args(&self.args)
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| crate::Error::SpawnFailed(format!("{}: {}", self.program, e)))?;

        Ok(child.id())
    }
}
