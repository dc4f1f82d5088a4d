use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::process::Command;

#[async_trait]
pub trait IdleSource: Send {
    async fn idle_seconds(&mut self) -> crate::Result<u64>;
}

#[derive(Debug, Clone)]
pub struct CommandIdleSource {
    program: String,
    args: Vec<String>,
}

impl CommandIdleSource {
    pub fn new(command: &str) -> crate::Result<Self> {
        let mut words = crate::process::split_arguments(command).into_iter();
        let program = words
            .next()
            .ok_or_else(|| crate::Error::IdleSource("empty idle command".to_string()))?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    fn parse_millis(stdout: &str) -> crate::Result<u64> {
        let text = stdout.trim();
        text.parse::<u64>().map(|ms| ms / 1000).map_err(|_| {
            crate::Error::IdleSource(format!("unexpected probe output '{}'", text))
        })
    }
}

#[async_trait]
impl IdleSource for CommandIdleSource {
    async fn idle_seconds(&mut self) -> crate::Result<u64> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| crate::Error::IdleSource(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(crate::Error::IdleSource(format!(
                "{} failed ({}): {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Self::parse_millis(&String::from_utf8_lossy(&output.stdout))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedIdleSource {
    samples: VecDeque<u64>,
}

impl ScriptedIdleSource {
    pub fn new(samples: impl IntoIterator<Item = u64>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }
}

#[async_trait]
impl IdleSource for ScriptedIdleSource {
    async fn idle_seconds(&mut self) -> crate::Result<u64> {
        self.samples
            .pop_front()
            .ok_or_else(|| crate::Error::IdleSource("no more idle samples".to_string()))
    }
}
