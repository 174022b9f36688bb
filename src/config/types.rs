//! Launcher configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Resolve a path against the working directory without touching the
/// filesystem (the target may not exist yet).
fn absolute(path: &str) -> PathBuf {
    std::path::absolute(Path::new(path)).unwrap_or_else(|_| PathBuf::from(path))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// RPC port the download daemon listens on.
    pub aria2_port: u16,
    /// aria2 session file, shared between input-file and save-session.
    pub session_file: PathBuf,
    /// Wine prefix the runtime is bound to.
    pub runtime_prefix: PathBuf,
    /// Conventional Wine install location (loader at `<wine_dir>/bin/wine64`).
    pub wine_dir: PathBuf,
    /// Channel client selector; the WINDLASS_CHANNEL_CLIENT environment
    /// variable takes precedence when set.
    pub channel_client: Option<String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        LauncherConfig {
            aria2_port: 6868,
            session_file: absolute("./aria2.session"),
            runtime_prefix: absolute("./wineprefix"),
            wine_dir: absolute("./wine"),
            channel_client: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_paths_are_absolute() {
        let cfg = LauncherConfig::default();
        assert!(cfg.session_file.is_absolute());
        assert!(cfg.runtime_prefix.is_absolute());
        assert!(cfg.wine_dir.is_absolute());
        assert_eq!(cfg.aria2_port, 6868);
        assert!(cfg.channel_client.is_none());
    }

    #[test]
    fn round_trips_through_json() {
        let mut cfg = LauncherConfig::default();
        cfg.channel_client = Some("hk4eos".to_string());
        let text = serde_json::to_string(&cfg).unwrap();
        let back: LauncherConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.aria2_port, cfg.aria2_port);
        assert_eq!(back.channel_client.as_deref(), Some("hk4eos"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: LauncherConfig = serde_json::from_str(r#"{"aria2_port": 7000}"#).unwrap();
        assert_eq!(cfg.aria2_port, 7000);
        assert!(cfg.session_file.is_absolute());
    }
}
