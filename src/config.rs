use std::collections::HashMap;
use std::env;
use std::fs;
use std::time::Duration;

use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::errors::ConfigError;

const DEFAULT_TIMEZONE: Tz = chrono_tz::America::New_York;
const DEFAULT_RSVP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::Syntax {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    /// File values win over the process environment.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned().or_else(|| env::var(key).ok())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Bot,
    Console,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub discord_token: Option<String>,
    pub timezone: Tz,
    pub rsvp_timeout: Duration,
    pub run_mode: RunMode,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let timezone = match config.get("BOT_TIMEZONE") {
            Some(raw) => raw.parse::<Tz>().map_err(|_| ConfigError::Invalid {
                key: "BOT_TIMEZONE",
                value: raw,
            })?,
            None => DEFAULT_TIMEZONE,
        };
        let rsvp_timeout_secs = match config.get("RSVP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid {
                    key: "RSVP_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => DEFAULT_RSVP_TIMEOUT_SECS,
        };
        let run_mode = match config.get("RUN_MODE").as_deref().map(str::trim) {
            None | Some("bot") => RunMode::Bot,
            Some("console") => RunMode::Console,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "RUN_MODE",
                    value: other.to_string(),
                });
            }
        };
        let log_format = match config.get("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("compact") => LogFormat::Compact,
            Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            discord_token: config.get("DISCORD_TOKEN").filter(|t| !t.trim().is_empty()),
            timezone,
            rsvp_timeout: Duration::from_secs(rsvp_timeout_secs),
            run_mode,
            log_format,
        })
    }

    pub fn require_token(&self) -> Result<&str, ConfigError> {
        self.discord_token
            .as_deref()
            .ok_or(ConfigError::Missing("DISCORD_TOKEN"))
    }
}

/// Wall-clock "now" in the bot's timezone.
pub fn local_now(timezone: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&timezone).naive_local()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_env_style_lines() {
        let config = AppConfig::parse(
            "# comment\n\nexport DISCORD_TOKEN=\"abc\"\nBOT_TIMEZONE='Europe/Berlin'\nRSVP_TIMEOUT_SECS = 90\n",
        )
        .unwrap();
        assert_eq!(config.get("DISCORD_TOKEN").as_deref(), Some("abc"));
        assert_eq!(config.get("BOT_TIMEZONE").as_deref(), Some("Europe/Berlin"));
        assert_eq!(config.get("RSVP_TIMEOUT_SECS").as_deref(), Some("90"));
    }

    #[test]
    fn rejects_lines_without_assignment() {
        let err = AppConfig::parse("DISCORD_TOKEN=abc\nnonsense\n").unwrap_err();
        assert!(matches!(err, ConfigError::Syntax { line: 2, .. }));
    }

    #[test]
    fn settings_read_typed_values() {
        let config = AppConfig::parse(
            "DISCORD_TOKEN=abc\nBOT_TIMEZONE=Europe/Berlin\nRSVP_TIMEOUT_SECS=90\nRUN_MODE=console\nLOG_FORMAT=json\n",
        )
        .unwrap();
        let settings = Settings::from_config(&config).unwrap();
        assert_eq!(settings.require_token().unwrap(), "abc");
        assert_eq!(settings.timezone, chrono_tz::Europe::Berlin);
        assert_eq!(settings.rsvp_timeout, Duration::from_secs(90));
        assert_eq!(settings.run_mode, RunMode::Console);
        assert_eq!(settings.log_format, LogFormat::Json);
    }

    #[test]
    fn settings_reject_bad_values() {
        for (line, key) in [
            ("BOT_TIMEZONE=Mars/Olympus", "BOT_TIMEZONE"),
            ("RSVP_TIMEOUT_SECS=0", "RSVP_TIMEOUT_SECS"),
            ("RUN_MODE=daemon", "RUN_MODE"),
            ("LOG_FORMAT=xml", "LOG_FORMAT"),
        ] {
            let config = AppConfig::parse(line).unwrap();
            match Settings::from_config(&config) {
                Err(ConfigError::Invalid { key: got, .. }) => assert_eq!(got, key),
                other => panic!("expected invalid {key}, got {other:?}"),
            }
        }
    }
}
