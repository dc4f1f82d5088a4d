pub mod loader;

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ComebackAction;

pub use loader::ConfigLoader;

pub const CONFIG_DEFAULT_PATH: &str = "/etc/afkcron";
pub const CONFIG_DELIMITER: char = ':';
pub const FIELD_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntrySpec {
    pub path: String,
    pub arguments: String,
    pub comeback: ComebackAction,
    pub idle_threshold_secs: u64,
    pub single_shot: bool,
}

impl EntrySpec {
    pub fn from_line(line: &str) -> crate::Result<Self> {
        let fields: Vec<&str> = line.split(CONFIG_DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(crate::Error::Config(format!(
                "expected {} fields separated by '{}', found {}",
                FIELD_COUNT,
                CONFIG_DELIMITER,
                fields.len()
            )));
        }

        let spec = Self {
            path: fields[0].to_string(),
            arguments: fields[1].to_string(),
            comeback: parse_comeback_action(fields[2])?,
            idle_threshold_secs: parse_idle_duration(fields[3])?,
            single_shot: parse_single_shot(fields[4]),
        };
        spec.validate()?;
        Ok(spec)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if self.path.is_empty() {
            return Err(crate::Error::Config("path must not be empty".to_string()));
        }
        if self.idle_threshold_secs == 0 {
            return Err(crate::Error::Config(
                "idle duration must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn parse_idle_duration(token: &str) -> crate::Result<u64> {
    let invalid = || crate::Error::InvalidDuration(token.to_string());

    let (digits, multiplier) = match token.char_indices().last() {
        None => return Err(invalid()),
        Some((idx, unit)) if !unit.is_ascii_digit() => {
            let multiplier = match unit {
                'd' => 24 * 60 * 60,
                'h' => 60 * 60,
                'm' => 60,
                's' => 1,
                _ => return Err(invalid()),
            };
            (&token[..idx], multiplier)
        }
        Some(_) => (token, 1),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let value: u64 = digits.parse().map_err(|_| invalid())?;
    value.checked_mul(multiplier).ok_or_else(invalid)
}

/// An unknown token means stay; an empty one is an error.
pub fn parse_comeback_action(token: &str) -> crate::Result<ComebackAction> {
    let action = match token {
        "" => {
            return Err(crate::Error::Config(
                "comeback action must not be empty".to_string(),
            ));
        }
        "kill" => ComebackAction::force_kill(),
        "stop" => ComebackAction::suspend(),
        "prio" => ComebackAction::deprioritize(),
        "term" => ComebackAction::terminate(),
        "termkill" => ComebackAction::terminate_then_kill(),
        _ => ComebackAction::STAY,
    };
    Ok(action)
}

pub fn parse_single_shot(token: &str) -> bool {
    token.contains("oneshot")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LaunchPolicy {
    #[default]
    FailFast,
    Isolate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    pub poll_interval: Duration,
    pub grace_period: Duration,
    pub idle_command: String,
    pub launch_policy: LaunchPolicy,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(10),
            grace_period: Duration::from_secs(2),
            idle_command: "xprintidle".to_string(),
            launch_policy: LaunchPolicy::FailFast,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_units() {
        assert_eq!(parse_idle_duration("30s").unwrap(), 30);
        assert_eq!(parse_idle_duration("2m").unwrap(), 120);
        assert_eq!(parse_idle_duration("1h").unwrap(), 3600);
        assert_eq!(parse_idle_duration("2h").unwrap(), 7200);
        assert_eq!(parse_idle_duration("1d").unwrap(), 86400);
        assert_eq!(parse_idle_duration("10").unwrap(), 10);
        assert_eq!(parse_idle_duration("45").unwrap(), 45);
    }

    #[test]
    fn test_duration_rejects_garbage() {
        assert!(parse_idle_duration("").is_err());
        assert!(parse_idle_duration("h").is_err());
        assert!(parse_idle_duration("5x").is_err());
        assert!(parse_idle_duration("-5").is_err());
        assert!(parse_idle_duration("1.5h").is_err());
        assert!(parse_idle_duration("99999999999999999999d").is_err());
        assert!(parse_idle_duration("999999999999999999d").is_err());
    }

    #[test]
    fn test_comeback_tokens() {
        assert_eq!(parse_comeback_action("kill").unwrap(), ComebackAction::force_kill());
        assert_eq!(parse_comeback_action("stop").unwrap(), ComebackAction::suspend());
        assert_eq!(
            parse_comeback_action("prio").unwrap(),
            ComebackAction::deprioritize()
        );
        assert_eq!(parse_comeback_action("term").unwrap(), ComebackAction::terminate());

        let termkill = parse_comeback_action("termkill").unwrap();
        assert!(termkill.terminate);
        assert!(termkill.force_kill);
        assert!(!termkill.suspend);
        assert!(!termkill.deprioritize);

        assert!(parse_comeback_action("stay").unwrap().is_stay());
        assert!(parse_comeback_action("KILL").unwrap().is_stay());
        assert!(parse_comeback_action("").is_err());
    }

    #[test]
    fn test_single_shot_substring() {
        assert!(parse_single_shot("oneshot"));
        assert!(parse_single_shot("x,oneshot,y"));
        assert!(!parse_single_shot(""));
        assert!(!parse_single_shot("once"));
    }

    #[test]
    fn test_from_line() {
        let spec = EntrySpec::from_line("/usr/bin/updatedb:--quiet:termkill:2h:oneshot").unwrap();
        assert_eq!(spec.path, "/usr/bin/updatedb");
        assert_eq!(spec.arguments, "--quiet");
        assert_eq!(spec.comeback, ComebackAction::terminate_then_kill());
        assert_eq!(spec.idle_threshold_secs, 7200);
        assert!(spec.single_shot);
    }

    #[test]
    fn test_from_line_rejects_invalid() {
        assert!(EntrySpec::from_line("/bin/true::kill:10").is_err());
        assert!(EntrySpec::from_line("/bin/true::kill:10::extra").is_err());
        assert!(EntrySpec::from_line("::kill:10:").is_err());
        assert!(EntrySpec::from_line("/bin/true::kill:0:").is_err());
        assert!(EntrySpec::from_line("/bin/true::kill:0m:").is_err());
        assert!(EntrySpec::from_line("/bin/true:::30:").is_err());
    }
}
