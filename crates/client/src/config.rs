//! Environment configuration for the client.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Settings read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `IDLE_CONTENT_DIR`: content directory when `--content` is absent.
    pub content_dir: Option<PathBuf>,
    /// `IDLE_FRAME_MS`: frame timer period.
    pub frame_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            content_dir: None,
            frame_interval: Duration::from_millis(16),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("IDLE_CONTENT_DIR") {
            config.content_dir = Some(dir);
        }
        if let Some(ms) = read_env::<u64>("IDLE_FRAME_MS") {
            config.frame_interval = Duration::from_millis(ms.max(1));
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
