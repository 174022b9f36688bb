//! Wine runtime readiness gate
//!
//! Strict two-state machine: a usable runtime either exists (continue with a
//! handle bound to the prefix) or it doesn't (hand the session to the
//! install flow, which restarts the orchestration when done).

use crate::config::LauncherConfig;
use crate::feed::ReleaseFeed;
use crate::paths::CROSSOVER_LOADER;

use std::error::Error;
use std::path::PathBuf;

/// Tag reported for the CrossOver distribution, which ships its own loader
/// at a fixed location instead of the conventional install dir.
pub const CROSSOVER_TAG: &str = "crossover";

#[derive(Clone, Debug)]
pub struct RuntimeStatus {
    pub is_ready: bool,
    pub update_artifact: Option<String>,
    pub update_tag: Option<String>,
    pub installed_tag: Option<String>,
}

pub trait RuntimeCheck {
    fn check(&self, feed: &dyn ReleaseFeed) -> Result<RuntimeStatus, Box<dyn Error>>;
}

/// Immutable once constructed; shared by reference with every later stage.
#[derive(Clone, Debug)]
pub struct RuntimeHandle {
    pub loader_bin: PathBuf,
    pub prefix: PathBuf,
}

/// Payload for the runtime-install flow once it owns the session.
#[derive(Clone, Debug)]
pub struct InstallHandoff {
    pub artifact_url: String,
    pub tag: String,
    pub prefix: PathBuf,
}

pub fn build_runtime_handle(cfg: &LauncherConfig, installed_tag: Option<&str>) -> RuntimeHandle {
    let loader_bin = match installed_tag {
        Some(CROSSOVER_TAG) => CROSSOVER_LOADER.clone(),
        _ => cfg.wine_dir.join("bin/wine64"),
    };
    RuntimeHandle {
        loader_bin,
        prefix: cfg.runtime_prefix.clone(),
    }
}

/// Default check: the runtime is ready when the conventional loader exists.
/// The installed tag sits next to it in a marker file written by the
/// install flow; when missing, plain `wine` is assumed.
pub struct FsRuntimeCheck {
    pub wine_dir: PathBuf,
}

impl FsRuntimeCheck {
    fn tag_file(&self) -> PathBuf {
        self.wine_dir.join(".windlass-tag")
    }
}

impl RuntimeCheck for FsRuntimeCheck {
    fn check(&self, feed: &dyn ReleaseFeed) -> Result<RuntimeStatus, Box<dyn Error>> {
        let loader = self.wine_dir.join("bin/wine64");
        let installed_tag = std::fs::read_to_string(self.tag_file())
            .map(|t| t.trim().to_string())
            .ok();

        if loader.exists() || installed_tag.as_deref() == Some(CROSSOVER_TAG) {
            return Ok(RuntimeStatus {
                is_ready: true,
                update_artifact: None,
                update_tag: None,
                installed_tag: Some(installed_tag.unwrap_or_else(|| "wine".to_string())),
            });
        }

        // Runtime builds ride the same release feed as the launcher itself
        let release = feed.runtime_release()?;
        Ok(RuntimeStatus {
            is_ready: false,
            update_artifact: Some(release.artifact_url),
            update_tag: Some(release.tag),
            installed_tag: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::{RuntimeRelease, UpdateInfo};

    struct StubFeed;

    impl ReleaseFeed for StubFeed {
        fn check(&self) -> Result<UpdateInfo, Box<dyn Error>> {
            unreachable!("runtime check must not run the update check")
        }

        fn runtime_release(&self) -> Result<RuntimeRelease, Box<dyn Error>> {
            Ok(RuntimeRelease {
                tag: "wine-9.2".to_string(),
                artifact_url: "https://example.com/wine-9.2.tar.gz".to_string(),
            })
        }
    }

    fn cfg_in(dir: &std::path::Path) -> LauncherConfig {
        LauncherConfig {
            runtime_prefix: dir.join("wineprefix"),
            wine_dir: dir.join("wine"),
            ..LauncherConfig::default()
        }
    }

    #[test]
    fn crossover_tag_selects_the_fixed_loader() {
        let dir = tempfile::tempdir().unwrap();
        let handle = build_runtime_handle(&cfg_in(dir.path()), Some(CROSSOVER_TAG));
        assert_eq!(handle.loader_bin, *CROSSOVER_LOADER);
    }

    #[test]
    fn other_tags_resolve_under_the_install_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = cfg_in(dir.path());
        let handle = build_runtime_handle(&cfg, Some("wine-9.2"));
        assert_eq!(handle.loader_bin, cfg.wine_dir.join("bin/wine64"));
        assert_eq!(handle.prefix, cfg.runtime_prefix);
    }

    #[test]
    fn present_loader_reports_ready() {
        let dir = tempfile::tempdir().unwrap();
        let wine_dir = dir.path().join("wine");
        std::fs::create_dir_all(wine_dir.join("bin")).unwrap();
        std::fs::write(wine_dir.join("bin/wine64"), "").unwrap();
        std::fs::write(wine_dir.join(".windlass-tag"), "wine-9.2\n").unwrap();

        let status = FsRuntimeCheck { wine_dir }.check(&StubFeed).unwrap();
        assert!(status.is_ready);
        assert_eq!(status.installed_tag.as_deref(), Some("wine-9.2"));
        assert!(status.update_artifact.is_none());
    }

    #[test]
    fn missing_loader_reports_install_target_from_feed() {
        let dir = tempfile::tempdir().unwrap();
        let status = FsRuntimeCheck {
            wine_dir: dir.path().join("wine"),
        }
        .check(&StubFeed)
        .unwrap();

        assert!(!status.is_ready);
        assert_eq!(status.update_tag.as_deref(), Some("wine-9.2"));
        assert_eq!(
            status.update_artifact.as_deref(),
            Some("https://example.com/wine-9.2.tar.gz")
        );
        assert!(status.installed_tag.is_none());
    }
}
