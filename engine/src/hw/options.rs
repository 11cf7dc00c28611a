use super::config::{
    AUTO_START_ENV, MAX_WAITS_ENV, WAIT_MS_ENV, env_flag, env_number,
};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Upper bound of one readiness wait.
    pub wait_timeout: Duration,
    /// Issue START after PREPARE instead of relying on the first write.
    /// Capture is started either way.
    pub explicit_start: bool,
    /// Stop after this many readiness waits.
    pub max_waits: Option<u64>,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_millis(200),
            explicit_start: true,
            max_waits: None,
        }
    }
}

impl TransferOptions {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            wait_timeout: env_number(WAIT_MS_ENV)
                .map(Duration::from_millis)
                .unwrap_or(defaults.wait_timeout),
            explicit_start: !env_flag(AUTO_START_ENV),
            max_waits: env_number(MAX_WAITS_ENV),
        }
    }
}
