use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use tracing::warn;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base_url: String,
    pub data_path: PathBuf,
    pub download_dir: PathBuf,
    pub refresh_delay: Duration,
    /// Zero disables the periodic refresh.
    pub poll_interval: Duration,
    pub transcript_clear_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            api_base_url: DEFAULT_API_URL.to_string(),
            data_path: PathBuf::from("data/session.json"),
            download_dir: PathBuf::from("downloads"),
            refresh_delay: Duration::from_millis(500),
            poll_interval: Duration::from_secs(30),
            transcript_clear_delay: Duration::from_millis(3000),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_base_url = env::var("HEALTHVOICE_API_URL")
            .ok()
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.api_base_url);

        Self {
            port: parse_var("PORT", defaults.port),
            api_base_url,
            data_path: path_var("APP_DATA_PATH", defaults.data_path),
            download_dir: path_var("HEALTHVOICE_DOWNLOAD_DIR", defaults.download_dir),
            refresh_delay: Duration::from_millis(parse_var(
                "HEALTHVOICE_REFRESH_DELAY_MS",
                defaults.refresh_delay.as_millis() as u64,
            )),
            poll_interval: Duration::from_secs(parse_var(
                "HEALTHVOICE_POLL_INTERVAL_SECS",
                defaults.poll_interval.as_secs(),
            )),
            transcript_clear_delay: Duration::from_millis(parse_var(
                "HEALTHVOICE_TRANSCRIPT_CLEAR_MS",
                defaults.transcript_clear_delay.as_millis() as u64,
            )),
        }
    }
}

fn path_var(key: &str, default: PathBuf) -> PathBuf {
    match env::var(key) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => default,
    }
}

fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    let Ok(raw) = env::var(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(err) => {
            warn!("invalid {key} value {raw:?}: {err}, using default {default}");
            default
        }
    }
}
