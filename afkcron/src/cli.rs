use afkcron_core::config::CONFIG_DEFAULT_PATH;
use afkcron_core::{DaemonConfig, LaunchPolicy};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "afkcron")]
#[command(about = "Runs programs while the machine is idle and reins them in when the user returns", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file to load; repeat to load several (default: /etc/afkcron)
    #[arg(short = 'c', long = "config")]
    pub config: Vec<PathBuf>,

    /// Append log lines to this file
    #[arg(short = 'l', long = "log")]
    pub log: Option<PathBuf>,

    /// Seconds between idle-time polls
    #[arg(long, env = "AFKCRON_POLL_INTERVAL", default_value = "10",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Seconds between SIGTERM and SIGKILL for "termkill" entries
    #[arg(long, env = "AFKCRON_GRACE", default_value = "2")]
    pub grace: u64,

    /// Command printing the idle time in milliseconds
    #[arg(long, env = "AFKCRON_IDLE_COMMAND", default_value = "xprintidle")]
    pub idle_command: String,

    /// Disable an entry that fails to start instead of exiting
    #[arg(long)]
    pub isolate_failures: bool,

    /// Validate the configuration, print it as JSON and exit
    #[arg(long)]
    pub check: bool,
}

impl Cli {
    pub fn config_paths(&self) -> Vec<PathBuf> {
        if self.config.is_empty() {
            vec![PathBuf::from(CONFIG_DEFAULT_PATH)]
        } else {
            self.config.clone()
        }
    }

    pub fn daemon_config(&self) -> DaemonConfig {
        DaemonConfig {
            poll_interval: Duration::from_secs(self.interval),
            grace_period: Duration::from_secs(self.grace),
            idle_command: self.idle_command.clone(),
            launch_policy: if self.isolate_failures {
                LaunchPolicy::Isolate
            } else {
                LaunchPolicy::FailFast
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["afkcron"]);
        assert!(cli.log.is_none());
        assert!(!cli.check);
        assert_eq!(cli.config_paths(), vec![PathBuf::from("/etc/afkcron")]);

        let config = cli.daemon_config();
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.grace_period, Duration::from_secs(2));
        assert_eq!(config.idle_command, "xprintidle");
        assert_eq!(config.launch_policy, LaunchPolicy::FailFast);
    }

    #[test]
    fn test_cli_repeated_config() {
        let cli = Cli::parse_from(["afkcron", "-c", "a.conf", "-l", "x.log", "-c", "b.conf"]);
        assert_eq!(
            cli.config_paths(),
            vec![PathBuf::from("a.conf"), PathBuf::from("b.conf")]
        );
        assert_eq!(cli.log, Some(PathBuf::from("x.log")));
    }

    #[test]
    fn test_cli_tuning() {
        let cli = Cli::parse_from([
            "afkcron",
            "--interval",
            "3",
            "--grace",
            "5",
            "--idle-command",
            "cat /tmp/idle",
            "--isolate-failures",
        ]);
        let config = cli.daemon_config();
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.grace_period, Duration::from_secs(5));
        assert_eq!(config.idle_command, "cat /tmp/idle");
        assert_eq!(config.launch_policy, LaunchPolicy::Isolate);
    }

    #[test]
    fn test_cli_rejects_zero_interval() {
        assert!(Cli::try_parse_from(["afkcron", "--interval", "0"]).is_err());
    }
}
