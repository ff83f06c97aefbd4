use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_AGENT_ENDPOINT: &str = "https://inference.do-ai.run/v1/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_STATIC_DIR: &str = "./static";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    /// Sent as the bearer token on every agent call.
    pub agent_id: Option<String>,
    pub agent_endpoint: String,
    pub agent_timeout: Duration,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            agent_id: None,
            agent_endpoint: DEFAULT_AGENT_ENDPOINT.to_string(),
            agent_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = non_empty("PORT")
            .map(|raw| parse_or("PORT", &raw, DEFAULT_PORT))
            .unwrap_or(defaults.port);
        let timeout_secs = non_empty("AGENT_TIMEOUT_SECS")
            .map(|raw| parse_or("AGENT_TIMEOUT_SECS", &raw, DEFAULT_TIMEOUT_SECS))
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            port,
            agent_id: non_empty("GRADIENT_AGENT_ID").map(|v| v.trim().to_string()),
            agent_endpoint: non_empty("AGENT_ENDPOINT").unwrap_or(defaults.agent_endpoint),
            agent_timeout: Duration::from_secs(timeout_secs),
            static_dir: non_empty("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
        }
    }
}

fn parse_or<T>(key: &str, raw: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match raw.trim().parse() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(key, value = raw, %default, "invalid value, using default");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.port, 8080);
        assert!(cfg.agent_id.is_none());
        assert_eq!(cfg.agent_endpoint, DEFAULT_AGENT_ENDPOINT);
        assert_eq!(cfg.agent_timeout, Duration::from_secs(10));
        assert_eq!(cfg.static_dir, PathBuf::from("./static"));
    }

    #[test]
    fn reads_overrides() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("GRADIENT_AGENT_ID", " agent-123 "),
            ("AGENT_ENDPOINT", "http://127.0.0.1:9999/chat"),
            ("AGENT_TIMEOUT_SECS", "3"),
            ("STATIC_DIR", "/srv/www"),
        ]));
        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.agent_id.as_deref(), Some("agent-123"));
        assert_eq!(cfg.agent_endpoint, "http://127.0.0.1:9999/chat");
        assert_eq!(cfg.agent_timeout, Duration::from_secs(3));
        assert_eq!(cfg.static_dir, PathBuf::from("/srv/www"));
    }

    #[test]
    fn garbage_numbers_fall_back() {
        let cfg = AppConfig::from_lookup(lookup(&[("PORT", "eighty"), ("AGENT_TIMEOUT_SECS", "-1")]));
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.agent_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn blank_agent_id_counts_as_unset() {
        let cfg = AppConfig::from_lookup(lookup(&[("GRADIENT_AGENT_ID", "   ")]));
        assert!(cfg.agent_id.is_none());
    }
}
