//! Concrete channel-client variants
//!
//! Both variants share the same shape: probe the prefix for an existing
//! install at construction, enqueue the game package through the daemon on
//! install, and run the game exe through the Wine loader on launch.

use crate::channel::{ChannelClient, ChannelDeps, InstallState, ServerDescriptor};
use crate::rpc::HttpRpcProbe;

use std::error::Error;
use std::path::PathBuf;
use std::process::Command;

fn game_dir(deps: &ChannelDeps, server: &ServerDescriptor) -> PathBuf {
    deps.runtime.prefix.join("drive_c").join(server.data_dir)
}

fn probe_install_state(
    deps: &ChannelDeps,
    server: &ServerDescriptor,
) -> Result<InstallState, Box<dyn Error>> {
    let prefix = &deps.runtime.prefix;
    if prefix.exists() && !prefix.is_dir() {
        return Err(format!("prefix {} exists but is not a directory", prefix.display()).into());
    }

    let dir = game_dir(deps, server);
    if dir.join(server.exe_name).exists() {
        Ok(InstallState::Installed { game_dir: dir })
    } else {
        Ok(InstallState::NotInstalled)
    }
}

fn enqueue_package(deps: &ChannelDeps, server: &ServerDescriptor) -> Result<(), Box<dyn Error>> {
    let confirmed = deps.locale.prompt(
        "DOWNLOAD_GAME_PACKAGE",
        "DOWNLOAD_GAME_PACKAGE_DESC",
        &[server.display_name],
    );
    if !confirmed {
        println!("[windlass] channel - {} download declined", server.id);
        return Ok(());
    }

    let rpc = HttpRpcProbe::from_endpoint(&deps.daemon.rpc_endpoint)?;
    let gid = rpc.add_uri(server.package_url, &game_dir(deps, server))?;
    println!(
        "[windlass] channel - queued {} as gid {gid} (queue starts paused)",
        server.package_url
    );
    Ok(())
}

fn spawn_game(deps: &ChannelDeps, server: &ServerDescriptor) -> Result<(), Box<dyn Error>> {
    let exe = game_dir(deps, server).join(server.exe_name);
    let status = Command::new(&deps.runtime.loader_bin)
        .arg(&exe)
        .env("WINEPREFIX", &deps.runtime.prefix)
        .status()?;

    if !status.success() {
        return Err(format!("{} exited with {status}", exe.display()).into());
    }
    Ok(())
}

pub struct Hk4eClient {
    server: &'static ServerDescriptor,
    deps: ChannelDeps,
    state: InstallState,
}

impl Hk4eClient {
    pub fn new(
        server: &'static ServerDescriptor,
        deps: ChannelDeps,
    ) -> Result<Self, Box<dyn Error>> {
        let state = probe_install_state(&deps, server)?;
        Ok(Hk4eClient {
            server,
            deps,
            state,
        })
    }
}

impl ChannelClient for Hk4eClient {
    fn server(&self) -> &'static ServerDescriptor {
        self.server
    }

    fn install_state(&self) -> &InstallState {
        &self.state
    }

    fn install(&self) -> Result<(), Box<dyn Error>> {
        if let InstallState::Installed { game_dir } = &self.state {
            println!(
                "[windlass] channel - {} already installed at {}",
                self.server.id,
                game_dir.display()
            );
            return Ok(());
        }
        enqueue_package(&self.deps, self.server)
    }

    fn launch(&self) -> Result<(), Box<dyn Error>> {
        spawn_game(&self.deps, self.server)
    }
}

/// The alternate-title variant. Same dependency shape; kept as its own type
/// because its install layout diverges from HK4E as patching support grows.
pub struct Bh3Client {
    server: &'static ServerDescriptor,
    deps: ChannelDeps,
    state: InstallState,
}

impl Bh3Client {
    pub fn new(
        server: &'static ServerDescriptor,
        deps: ChannelDeps,
    ) -> Result<Self, Box<dyn Error>> {
        let state = probe_install_state(&deps, server)?;
        Ok(Bh3Client {
            server,
            deps,
            state,
        })
    }
}

impl ChannelClient for Bh3Client {
    fn server(&self) -> &'static ServerDescriptor {
        self.server
    }

    fn install_state(&self) -> &InstallState {
        &self.state
    }

    fn install(&self) -> Result<(), Box<dyn Error>> {
        if matches!(self.state, InstallState::Installed { .. }) {
            return Ok(());
        }
        enqueue_package(&self.deps, self.server)
    }

    fn launch(&self) -> Result<(), Box<dyn Error>> {
        spawn_game(&self.deps, self.server)
    }
}
