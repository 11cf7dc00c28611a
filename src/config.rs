use pcm_engine::TransferOptions;
use std::str::FromStr;
use tracing::Level;

pub const LOG_ENV: &str = "PCM_PROBE_LOG";
pub const OUTPUT_ENV: &str = "PCM_PROBE_OUTPUT";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

/// Settings of one program run, read once from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    pub log_level: Level,
    pub output: OutputFormat,
    pub transfer: TransferOptions,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            log_level: Level::WARN,
            output: OutputFormat::Text,
            transfer: TransferOptions::default(),
        }
    }
}

impl ProbeConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(LOG_ENV).ok().as_deref(),
            std::env::var(OUTPUT_ENV).ok().as_deref(),
            TransferOptions::from_env(),
        )
    }

    fn from_values(log: Option<&str>, output: Option<&str>, transfer: TransferOptions) -> Self {
        let defaults = Self::default();
        Self {
            log_level: log
                .and_then(|v| Level::from_str(v.trim()).ok())
                .unwrap_or(defaults.log_level),
            output: output
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.output),
            transfer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_values_fall_back_to_defaults() {
        let config = ProbeConfig::from_values(None, None, TransferOptions::default());
        assert_eq!(config, ProbeConfig::default());
    }

    #[test]
    fn level_and_output_are_parsed() {
        let config =
            ProbeConfig::from_values(Some("debug"), Some(" JSON "), TransferOptions::default());
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.output, OutputFormat::Json);
    }

    #[test]
    fn garbage_is_ignored() {
        let config =
            ProbeConfig::from_values(Some("loud"), Some("yaml"), TransferOptions::default());
        assert_eq!(config.log_level, Level::WARN);
        assert_eq!(config.output, OutputFormat::Text);
    }
}
