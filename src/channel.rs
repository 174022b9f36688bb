//! Channel-client selection
//!
//! One game/server variant is picked per run from a single configuration
//! value. The selection itself never fails; constructing the chosen client
//! can, and that is fatal for the run (no fallback to another variant).

pub mod clients;

pub use clients::{Bh3Client, Hk4eClient};

use crate::daemon::DaemonHandle;
use crate::locale::Locale;
use crate::runtime::RuntimeHandle;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

pub const CHANNEL_ENV: &str = "WINDLASS_CHANNEL_CLIENT";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelId {
    Hk4eCn,
    Hk4eOs,
    Bh3Glb,
}

impl ChannelId {
    /// Deterministic, infallible mapping; anything unrecognized or absent
    /// is the CN default.
    pub fn from_config_value(value: Option<&str>) -> ChannelId {
        match value {
            Some("hk4eos") => ChannelId::Hk4eOs,
            Some("bh3glb") => ChannelId::Bh3Glb,
            _ => ChannelId::Hk4eCn,
        }
    }
}

/// Resolve the selector value: environment first, then the config file.
pub fn configured_channel(config_value: Option<&str>) -> ChannelId {
    let env_value = std::env::var(CHANNEL_ENV).ok();
    ChannelId::from_config_value(env_value.as_deref().or(config_value))
}

#[derive(Debug, PartialEq, Eq)]
pub struct ServerDescriptor {
    pub id: &'static str,
    pub display_name: &'static str,
    /// Full game package; downloads go through the daemon.
    pub package_url: &'static str,
    /// Install location under the prefix's drive_c.
    pub data_dir: &'static str,
    pub exe_name: &'static str,
}

pub static CN_SERVER: ServerDescriptor = ServerDescriptor {
    id: "hk4e_cn",
    display_name: "HK4E (CN)",
    package_url: "https://dl.windlass.gg/hk4e/cn/game-full.tar.gz",
    data_dir: "Program Files/Genshin Impact",
    exe_name: "YuanShen.exe",
};

pub static OS_SERVER: ServerDescriptor = ServerDescriptor {
    id: "hk4e_global",
    display_name: "HK4E (global)",
    package_url: "https://dl.windlass.gg/hk4e/os/game-full.tar.gz",
    data_dir: "Program Files/Genshin Impact",
    exe_name: "GenshinImpact.exe",
};

pub static BH3_GLB: ServerDescriptor = ServerDescriptor {
    id: "bh3_global",
    display_name: "BH3 (global)",
    package_url: "https://dl.windlass.gg/bh3/glb/game-full.tar.gz",
    data_dir: "Program Files/Honkai Impact 3rd",
    exe_name: "BH3.exe",
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InstallState {
    NotInstalled,
    Installed { game_dir: PathBuf },
}

/// Everything a variant needs to exist. The daemon and locale are shared
/// by reference with the rest of the launcher; the runtime handle is cheap
/// to clone and immutable.
pub struct ChannelDeps {
    pub locale: Arc<dyn Locale>,
    pub daemon: Arc<DaemonHandle>,
    pub runtime: RuntimeHandle,
}

pub trait ChannelClient {
    fn server(&self) -> &'static ServerDescriptor;
    fn install_state(&self) -> &InstallState;
    fn install(&self) -> Result<(), Box<dyn Error>>;
    fn launch(&self) -> Result<(), Box<dyn Error>>;
}

pub fn build_channel_client(
    id: ChannelId,
    deps: ChannelDeps,
) -> Result<Box<dyn ChannelClient>, Box<dyn Error>> {
    let client: Box<dyn ChannelClient> = match id {
        ChannelId::Hk4eCn => Box::new(Hk4eClient::new(&CN_SERVER, deps)?),
        ChannelId::Hk4eOs => Box::new(Hk4eClient::new(&OS_SERVER, deps)?),
        ChannelId::Bh3Glb => Box::new(Bh3Client::new(&BH3_GLB, deps)?),
    };
    println!(
        "[windlass] channel - selected {} ({})",
        client.server().display_name,
        client.server().id
    );
    Ok(client)
}
