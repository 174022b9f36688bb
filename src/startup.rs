//! Top-level startup pipeline
//!
//! The ordered, fallible sequence behind the first screen the user sees:
//! singleton claim, daemon bring-up, update gate, runtime gate, channel
//! selection, launcher composition. Stages run strictly in order; a gate
//! either lets control through or hands the whole foreground session to a
//! flow that never returns here.


use crate::channel::{build_channel_client, configured_channel, ChannelDeps};
use crate::config::LauncherConfig;
use crate::daemon::DaemonStarter;
use crate::feed::ReleaseFeed;
use crate::launcher::Launcher;
use crate::locale::Locale;
use crate::runtime::{build_runtime_handle, InstallHandoff, RuntimeCheck};
use crate::shutdown::ShutdownCoordinator;
use crate::update::{run_update_gate, GateDecision, UpdateHandoff};

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// The three errors that abort startup outright. Everything else a stage
/// can produce propagates unchanged from its collaborator.
#[derive(Debug)]
pub enum StartupError {
    SingletonClaim(String),
    DaemonUnreachable(String),
    ChannelConstruction(String),
}

impl fmt::Display for StartupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::SingletonClaim(e) => write!(f, "singleton claim failed: {e}"),
            StartupError::DaemonUnreachable(e) => write!(f, "download daemon failed: {e}"),
            StartupError::ChannelConstruction(e) => {
                write!(f, "channel client construction failed: {e}")
            }
        }
    }
}

impl Error for StartupError {}

pub struct StartupDeps<'a> {
    pub coordinator: Arc<ShutdownCoordinator>,
    pub cfg: &'a LauncherConfig,
    pub locale: Arc<dyn Locale>,
    pub feed: Arc<dyn ReleaseFeed>,
    pub daemon: &'a dyn DaemonStarter,
    pub runtime_check: &'a dyn RuntimeCheck,
}

/// Tagged outcome instead of never-returning branches: the caller pattern
/// matches, which makes "this branch is terminal for the run" explicit.
pub enum StartupOutcome {
    Ready(Launcher),
    HandedOffToUpdateFlow(UpdateHandoff),
    HandedOffToInstallFlow(InstallHandoff),
}

impl std::fmt::Debug for StartupOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartupOutcome::Ready(_) => f.write_str("Ready(..)"),
            StartupOutcome::HandedOffToUpdateFlow(h) => {
                f.debug_tuple("HandedOffToUpdateFlow").field(h).finish()
            }
            StartupOutcome::HandedOffToInstallFlow(h) => {
                f.debug_tuple("HandedOffToInstallFlow").field(h).finish()
            }
        }
    }
}

pub fn run_startup(deps: StartupDeps) -> Result<StartupOutcome, Box<dyn Error>> {
    deps.coordinator
        .claim_singleton()
        .map_err(StartupError::SingletonClaim)?;

    let daemon = deps
        .daemon
        .start(deps.cfg, &deps.coordinator)
        .map_err(StartupError::DaemonUnreachable)?;
    println!(
        "[windlass] startup - daemon ready (pid {}, aria2 {})",
        daemon.pid, daemon.version
    );

    let info = deps.feed.check()?;
    if let GateDecision::HandOff(handoff) = run_update_gate(&info, &*deps.locale) {
        println!(
            "[windlass] startup - handing session to the update flow ({})",
            handoff.version
        );
        return Ok(StartupOutcome::HandedOffToUpdateFlow(handoff));
    }

    let status = deps.runtime_check.check(&*deps.feed)?;
    if !status.is_ready {
        let handoff = InstallHandoff {
            artifact_url: status.update_artifact.unwrap_or_default(),
            tag: status.update_tag.unwrap_or_default(),
            prefix: deps.cfg.runtime_prefix.clone(),
        };
        println!(
            "[windlass] startup - handing session to the runtime install flow ({})",
            handoff.tag
        );
        return Ok(StartupOutcome::HandedOffToInstallFlow(handoff));
    }

    let runtime = build_runtime_handle(deps.cfg, status.installed_tag.as_deref());
    let id = configured_channel(deps.cfg.channel_client.as_deref());
    let channel = build_channel_client(
        id,
        ChannelDeps {
            locale: deps.locale.clone(),
            daemon,
            runtime: runtime.clone(),
        },
    )
    .map_err(|e| StartupError::ChannelConstruction(e.to_string()))?;

    Ok(StartupOutcome::Ready(Launcher::compose(
        runtime,
        deps.locale,
        deps.feed,
        channel,
    )))
}
