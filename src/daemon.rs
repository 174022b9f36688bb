//! Download-daemon process supervision
//!
//! Starts exactly one aria2 instance per run and guarantees a kill attempt
//! on every exit path via a termination hook. Nothing else in the crate may
//! spawn or kill the daemon.

use crate::config::LauncherConfig;
use crate::paths::BIN_ARIA2;
use crate::rpc::{HttpRpcProbe, RpcProbe};
use crate::shutdown::ShutdownCoordinator;

use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How long the daemon gets to answer on its RPC port after spawn. No retry
/// past the deadline; the user restarts the application.
pub const RPC_READY_TIMEOUT: Duration = Duration::from_secs(10);

const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Live daemon. Owned by the supervisor's caller; downstream components
/// share it by reference (`Arc` clones).
#[derive(Debug)]
pub struct DaemonHandle {
    pub pid: u32,
    pub rpc_endpoint: String,
    pub version: String,
}

pub trait DaemonStarter {
    fn start(
        &self,
        cfg: &LauncherConfig,
        coordinator: &Arc<ShutdownCoordinator>,
    ) -> Result<Arc<DaemonHandle>, String>;
}

/// The real supervisor: session file, spawn, kill hook, readiness wait.
pub struct Aria2Supervisor;

impl DaemonStarter for Aria2Supervisor {
    fn start(
        &self,
        cfg: &LauncherConfig,
        coordinator: &Arc<ShutdownCoordinator>,
    ) -> Result<Arc<DaemonHandle>, String> {
        ensure_session_file(&cfg.session_file).map_err(|e| {
            format!(
                "cannot prepare session file {}: {e}",
                cfg.session_file.display()
            )
        })?;

        let child = daemon_command(cfg, std::process::id())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| format!("failed to spawn {}: {e}", BIN_ARIA2.display()))?;
        let pid = child.id();

        register_kill_hook(coordinator, pid);

        let probe = HttpRpcProbe::new("127.0.0.1", cfg.aria2_port).map_err(|e| e.to_string())?;
        let version = wait_rpc_ready(&probe, RPC_READY_TIMEOUT)?;
        println!("[windlass] daemon - launched aria2 version {version} (pid {pid})");

        Ok(Arc::new(DaemonHandle {
            pid,
            rpc_endpoint: format!("http://127.0.0.1:{}/jsonrpc", cfg.aria2_port),
            version,
        }))
    }
}

/// The daemon resumes its queue from this file and persists back to it.
/// Created empty when absent; existing contents are never touched here.
pub fn ensure_session_file(path: &Path) -> std::io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, "")
}

/// Fixed invocation: no daemon-side config, RPC open to all origins on the
/// configured port, queue paused until commanded, and self-termination when
/// the parent pid disappears.
pub fn daemon_command(cfg: &LauncherConfig, parent_pid: u32) -> Command {
    let mut cmd = Command::new(&*BIN_ARIA2);
    cmd.arg("-d")
        .arg("/")
        .arg("--no-conf")
        .arg("--enable-rpc")
        .arg(format!("--rpc-listen-port={}", cfg.aria2_port))
        .arg("--rpc-listen-all=true")
        .arg("--rpc-allow-origin-all")
        .arg("--input-file")
        .arg(&cfg.session_file)
        .arg("--save-session")
        .arg(&cfg.session_file)
        .arg("--pause")
        .arg("true")
        .arg("--stop-with-process")
        .arg(parent_pid.to_string());
    cmd
}

/// Double insurance on top of --stop-with-process, mainly for self-restart.
fn register_kill_hook(coordinator: &Arc<ShutdownCoordinator>, pid: u32) {
    coordinator.add_termination_hook(Box::new(move || {
        println!("[windlass] daemon - killing process {pid}");
        let ret = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
        match ret {
            0 => Ok(()),
            _ => Err(format!(
                "kill {pid} failed: {}",
                std::io::Error::last_os_error()
            )),
        }
    }));
}

/// Poll the RPC endpoint until it answers or the deadline passes. The poll
/// abandons the attempt on timeout; the spawned process is only reaped by
/// the registered termination hook.
pub fn wait_rpc_ready(probe: &dyn RpcProbe, timeout: Duration) -> Result<String, String> {
    let start = Instant::now();

    loop {
        match probe.get_version() {
            Ok(version) => return Ok(version),
            Err(_) if start.elapsed() < timeout => std::thread::sleep(POLL_INTERVAL),
            Err(e) => {
                return Err(format!(
                    "daemon unreachable after {:.1}s: {e}",
                    start.elapsed().as_secs_f32()
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::error::Error;
    use std::ffi::OsString;

    struct ScriptedProbe {
        failures_before_ok: Cell<u32>,
    }

    impl RpcProbe for ScriptedProbe {
        fn get_version(&self) -> Result<String, Box<dyn Error>> {
            let left = self.failures_before_ok.get();
            if left == 0 {
                return Ok("1.37.0".to_string());
            }
            self.failures_before_ok.set(left - 1);
            Err("connection refused".into())
        }
    }

    fn cfg_in(dir: &Path) -> LauncherConfig {
        LauncherConfig {
            session_file: dir.join("aria2.session"),
            ..LauncherConfig::default()
        }
    }

    #[test]
    fn session_file_created_empty_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aria2.session");

        ensure_session_file(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn session_file_contents_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aria2.session");
        std::fs::write(&path, "https://example.com/pkg.tar.gz\n").unwrap();

        ensure_session_file(&path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "https://example.com/pkg.tar.gz\n"
        );
    }

    #[test]
    fn daemon_command_uses_fixed_flags() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = cfg_in(dir.path());
        let cmd = daemon_command(&cfg, 4242);
        let args: Vec<OsString> = cmd.get_args().map(|a| a.to_os_string()).collect();

        let expected: Vec<OsString> = [
            "-d",
            "/",
            "--no-conf",
            "--enable-rpc",
            "--rpc-listen-port=6868",
            "--rpc-listen-all=true",
            "--rpc-allow-origin-all",
            "--input-file",
            cfg.session_file.to_str().unwrap(),
            "--save-session",
            cfg.session_file.to_str().unwrap(),
            "--pause",
            "true",
            "--stop-with-process",
            "4242",
        ]
        .iter()
        .map(OsString::from)
        .collect();
        assert_eq!(args, expected);
    }

    #[test]
    fn wait_succeeds_once_probe_answers() {
        let probe = ScriptedProbe {
            failures_before_ok: Cell::new(2),
        };
        let version = wait_rpc_ready(&probe, Duration::from_secs(5)).unwrap();
        assert_eq!(version, "1.37.0");
    }

    #[test]
    fn wait_fails_after_deadline() {
        let probe = ScriptedProbe {
            failures_before_ok: Cell::new(u32::MAX),
        };
        let err = wait_rpc_ready(&probe, Duration::from_millis(50)).unwrap_err();
        assert!(err.contains("daemon unreachable"), "got: {err}");
    }
}
