//! Release feed contract + GitHub provider
//!
//! The feed owns the "is this build the latest" decision; gates downstream
//! only look at the boolean and never compare version strings themselves.

use semver::Version;
use serde::Deserialize;
use std::error::Error;

/// Produced once per startup by the update check; immutable afterwards.
#[derive(Clone, Debug)]
pub struct UpdateInfo {
    pub is_latest: bool,
    pub download_url: String,
    pub description: String,
    pub version: String,
}

/// Latest runtime (Wine build) release carried on the same feed.
#[derive(Clone, Debug)]
pub struct RuntimeRelease {
    pub tag: String,
    pub artifact_url: String,
}

pub trait ReleaseFeed {
    fn check(&self) -> Result<UpdateInfo, Box<dyn Error>>;
    fn runtime_release(&self) -> Result<RuntimeRelease, Box<dyn Error>>;
}

#[derive(Deserialize, Clone, Debug)]
pub struct GithubRelease {
    pub tag_name: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub assets: Vec<GithubAsset>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct GithubAsset {
    pub name: String,
    pub browser_download_url: String,
}

pub const FEED_REPO: &str = "windlass-gg/windlass";
pub const RUNTIME_REPO: &str = "windlass-gg/wine-builds";

pub struct GithubFeed {
    client: reqwest::blocking::Client,
    current_version: Version,
}

impl GithubFeed {
    pub fn new(current_version: &str) -> Result<Self, Box<dyn Error>> {
        Ok(GithubFeed {
            client: reqwest::blocking::Client::new(),
            current_version: Version::parse(current_version)?,
        })
    }

    fn latest_release(&self, repo: &str) -> Result<GithubRelease, Box<dyn Error>> {
        let url = format!("https://api.github.com/repos/{repo}/releases/latest");
        let response = self
            .client
            .get(&url)
            .header("User-Agent", "windlass")
            .send()?;

        if !response.status().is_success() {
            return Err(format!("failed to fetch {repo} releases: HTTP {}", response.status()).into());
        }

        let release: GithubRelease = response.json()?;
        Ok(release)
    }
}

impl ReleaseFeed for GithubFeed {
    fn check(&self) -> Result<UpdateInfo, Box<dyn Error>> {
        let release = self.latest_release(FEED_REPO)?;
        evaluate_release(&self.current_version, &release)
    }

    fn runtime_release(&self) -> Result<RuntimeRelease, Box<dyn Error>> {
        let release = self.latest_release(RUNTIME_REPO)?;
        // Runtime releases also carry checksum files; the tarball is the artifact
        let asset = release
            .assets
            .iter()
            .find(|asset| asset.name.ends_with(".tar.gz") || asset.name.ends_with(".tar.xz"))
            .or_else(|| release.assets.first())
            .ok_or_else(|| format!("runtime release {} has no assets", release.tag_name))?;
        Ok(RuntimeRelease {
            tag: release.tag_name.clone(),
            artifact_url: asset.browser_download_url.clone(),
        })
    }
}

/// Compare the remote tag against the running build. Tags may carry a
/// leading `v`; anything else unparseable is a feed error, not "latest".
pub fn evaluate_release(
    current: &Version,
    release: &GithubRelease,
) -> Result<UpdateInfo, Box<dyn Error>> {
    let tag = release.tag_name.trim_start_matches('v');
    let remote = Version::parse(tag)
        .map_err(|e| format!("bad release tag {}: {e}", release.tag_name))?;

    let download_url = release
        .assets
        .first()
        .map(|asset| asset.browser_download_url.clone())
        .unwrap_or_default();

    Ok(UpdateInfo {
        is_latest: remote <= *current,
        download_url,
        description: release.body.clone(),
        version: remote.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE_JSON: &str = r#"{
        "tag_name": "v0.2.0",
        "body": "Fixes the session-file resume bug.",
        "assets": [
            {"name": "windlass-0.2.0.tar.gz",
             "browser_download_url": "https://example.com/windlass-0.2.0.tar.gz"}
        ]
    }"#;

    #[test]
    fn newer_remote_tag_means_not_latest() {
        let release: GithubRelease = serde_json::from_str(RELEASE_JSON).unwrap();
        let info = evaluate_release(&Version::new(0, 1, 0), &release).unwrap();

        assert!(!info.is_latest);
        assert_eq!(info.version, "0.2.0");
        assert_eq!(info.download_url, "https://example.com/windlass-0.2.0.tar.gz");
        assert_eq!(info.description, "Fixes the session-file resume bug.");
    }

    #[test]
    fn equal_or_older_remote_tag_means_latest() {
        let release: GithubRelease = serde_json::from_str(RELEASE_JSON).unwrap();

        let info = evaluate_release(&Version::new(0, 2, 0), &release).unwrap();
        assert!(info.is_latest);

        let info = evaluate_release(&Version::new(0, 3, 0), &release).unwrap();
        assert!(info.is_latest);
    }

    #[test]
    fn unparseable_tag_is_an_error() {
        let release = GithubRelease {
            tag_name: "nightly".to_string(),
            body: String::new(),
            assets: vec![],
        };
        assert!(evaluate_release(&Version::new(0, 1, 0), &release).is_err());
    }

    #[test]
    fn release_without_assets_still_evaluates() {
        let release = GithubRelease {
            tag_name: "0.9.0".to_string(),
            body: String::new(),
            assets: vec![],
        };
        let info = evaluate_release(&Version::new(0, 1, 0), &release).unwrap();
        assert!(!info.is_latest);
        assert_eq!(info.download_url, "");
    }
}
