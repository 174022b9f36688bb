mod channel;
mod config;
mod daemon;
mod feed;
mod launcher;
mod locale;
mod paths;
mod rpc;
mod runtime;
mod shutdown;
mod startup;
mod update;

use crate::channel::InstallState;
use crate::config::{load_cfg, save_cfg};
use crate::daemon::Aria2Supervisor;
use crate::feed::{GithubFeed, ReleaseFeed};
use crate::launcher::Launcher;
use crate::locale::{DialogLocale, Locale};
use crate::runtime::FsRuntimeCheck;
use crate::shutdown::ShutdownCoordinator;
use crate::startup::{run_startup, StartupDeps, StartupOutcome};

use std::sync::Arc;

fn main() {
    if std::env::args().any(|arg| arg == "--help") {
        println!("{}", USAGE_TEXT);
        std::process::exit(0);
    }

    let cfg = load_cfg();

    if std::env::args().any(|arg| arg == "--write-config") {
        match save_cfg(&cfg) {
            Ok(()) => {
                println!("[windlass] wrote settings.json");
                std::process::exit(0);
            }
            Err(e) => {
                eprintln!("[windlass] failed to write settings.json: {e}");
                std::process::exit(1);
            }
        }
    }

    let coordinator = ShutdownCoordinator::new();
    let locale: Arc<dyn Locale> = Arc::new(DialogLocale);
    let feed: Arc<dyn ReleaseFeed> = match GithubFeed::new(env!("CARGO_PKG_VERSION")) {
        Ok(feed) => Arc::new(feed),
        Err(e) => {
            eprintln!("[windlass] bad build version: {e}");
            std::process::exit(1);
        }
    };

    let outcome = run_startup(StartupDeps {
        coordinator: coordinator.clone(),
        cfg: &cfg,
        locale,
        feed,
        daemon: &Aria2Supervisor,
        runtime_check: &FsRuntimeCheck {
            wine_dir: cfg.wine_dir.clone(),
        },
    });

    let code = match outcome {
        Ok(StartupOutcome::Ready(launcher)) => {
            println!("[windlass] startup complete: {}", launcher.summary());
            drive_launcher(&launcher)
        }
        Ok(StartupOutcome::HandedOffToUpdateFlow(handoff)) => {
            // The update flow owns the rest of the foreground session
            println!(
                "[windlass] update flow: downloading {} from {}",
                handoff.version, handoff.download_url
            );
            0
        }
        Ok(StartupOutcome::HandedOffToInstallFlow(handoff)) => {
            println!(
                "[windlass] runtime install flow: {} -> {}",
                handoff.tag,
                handoff.prefix.display()
            );
            0
        }
        Err(e) => {
            eprintln!("[windlass] startup failed: {e}");
            1
        }
    };

    coordinator.run_termination_hooks();
    std::process::exit(code);
}

/// What the GUI shell would do with the composed launcher; the headless
/// binary launches an installed game directly or offers the install.
fn drive_launcher(launcher: &Launcher) -> i32 {
    match launcher.channel.install_state() {
        InstallState::Installed { .. } => match launcher.channel.launch() {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("[windlass] launch failed: {e}");
                1
            }
        },
        InstallState::NotInstalled => match launcher.channel.install() {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("[windlass] install failed: {e}");
                1
            }
        },
    }
}

static USAGE_TEXT: &str = r#"
Usage: windlass [OPTIONS]

Options:
    --help            Show this help text
    --write-config    Write the active configuration to settings.json and exit

Configuration lives in $XDG_DATA_HOME/windlass/settings.json. The
WINDLASS_CHANNEL_CLIENT environment variable (hk4eos, bh3glb) overrides the
configured channel client; anything else selects the CN default.
"#;
