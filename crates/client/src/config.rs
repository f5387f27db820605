use std::path::PathBuf;
use std::time::Duration;

/// Client configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development against a
/// backend on `localhost:8000`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub api_url: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// File backing the persisted local store.
    pub store_path: PathBuf,
    /// Optional WebSocket URL of the invalidation push channel.
    pub live_url: Option<String>,
    /// Deadline for the guest practice join flow.
    pub join_timeout: Duration,
}

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}'")]
    Invalid { var: &'static str, value: String },
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8000/api".to_string(),
            request_timeout: Duration::from_secs(30),
            store_path: PathBuf::from(".learnhub/store.json"),
            live_url: None,
            join_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                          | Default                      |
    /// |----------------------------------|------------------------------|
    /// | `LEARNHUB_API_URL`               | `http://localhost:8000/api`  |
    /// | `LEARNHUB_REQUEST_TIMEOUT_SECS`  | `30`                         |
    /// | `LEARNHUB_STORE_PATH`            | `.learnhub/store.json`       |
    /// | `LEARNHUB_LIVE_URL`              | unset                        |
    /// | `LEARNHUB_JOIN_TIMEOUT_SECS`     | `10`                         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_url = lookup("LEARNHUB_API_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.api_url);

        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "LEARNHUB_API_URL",
                value: api_url,
            });
        }

        let request_timeout = parse_secs(&lookup, "LEARNHUB_REQUEST_TIMEOUT_SECS")?
            .unwrap_or(defaults.request_timeout);

        let store_path = lookup("LEARNHUB_STORE_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);

        let live_url = lookup("LEARNHUB_LIVE_URL").filter(|v| !v.trim().is_empty());

        let join_timeout =
            parse_secs(&lookup, "LEARNHUB_JOIN_TIMEOUT_SECS")?.unwrap_or(defaults.join_timeout);

        Ok(Self {
            api_url,
            request_timeout,
            store_path,
            live_url,
            join_timeout,
        })
    }
}

fn parse_secs<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Some(Duration::from_secs(secs))),
        _ => Err(ConfigError::Invalid { var, value: raw }),
    }
}
