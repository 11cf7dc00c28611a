pub const WAIT_MS_ENV: &str = "PCM_PROBE_WAIT_MS";
pub const AUTO_START_ENV: &str = "PCM_PROBE_AUTO_START";
pub const MAX_WAITS_ENV: &str = "PCM_PROBE_MAX_WAITS";

pub fn env_flag(key: &str) -> bool {
    std::env::var(key)
        .ok()
        .map(|v| parse_flag(&v))
        .unwrap_or(false)
}

pub fn env_number(key: &str) -> Option<u64> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> bool {
    let s = value.trim().to_ascii_lowercase();
    s == "1" || s == "true" || s == "yes" || s == "on"
}
