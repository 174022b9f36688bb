//! Process-wide shutdown coordination
//!
//! One `ShutdownCoordinator` is built at process start and threaded through
//! every component that needs to register cleanup or ask "should we actually
//! close now". It replaces the usual trio of hidden globals: the singleton
//! marker, the termination-hook list and the window-close arbiter.

use crate::paths::PATH_DATA;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Best-effort cleanup action. Failures are logged and swallowed; a hook
/// must be safe to run even if its target is already gone.
pub type TerminationHook = Box<dyn FnOnce() -> Result<(), String> + Send>;

/// Close guard consulted on a window-close request. Returning false defers
/// the close (e.g. a mid-download warning the user declined).
pub type CloseGuard = Box<dyn Fn() -> bool + Send>;

struct Inner {
    hooks: Vec<TerminationHook>,
    hooks_run: bool,
    close_guards: Vec<CloseGuard>,
}

pub struct ShutdownCoordinator {
    inner: Mutex<Inner>,
    lock_file: PathBuf,
}

impl ShutdownCoordinator {
    pub fn new() -> Arc<Self> {
        Self::with_lock_file(PATH_DATA.join("windlass.lock"))
    }

    pub fn with_lock_file(lock_file: PathBuf) -> Arc<Self> {
        Arc::new(ShutdownCoordinator {
            inner: Mutex::new(Inner {
                hooks: Vec::new(),
                hooks_run: false,
                close_guards: Vec::new(),
            }),
            lock_file,
        })
    }

    /// Claim the process-wide singleton marker. Fatal on failure: a second
    /// orchestrator would spawn a second daemon on the same RPC port.
    ///
    /// The marker is a lock file holding the claimant pid; a dead claimant
    /// leaves a stale file that is silently reclaimed. The window between
    /// reading a stale file and rewriting it is not closed here, which
    /// matches the guarantee of the marker this replaces.
    pub fn claim_singleton(&self) -> Result<(), String> {
        if let Ok(text) = std::fs::read_to_string(&self.lock_file) {
            if let Ok(pid) = text.trim().parse::<u32>() {
                if pid != std::process::id() && pid_alive(pid) {
                    return Err(format!(
                        "another instance is running (pid {pid}, lock {})",
                        self.lock_file.display()
                    ));
                }
            }
        }

        if let Some(parent) = self.lock_file.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
        std::fs::write(&self.lock_file, std::process::id().to_string())
            .map_err(|e| e.to_string())?;

        let lock_file = self.lock_file.clone();
        self.add_termination_hook(Box::new(move || {
            std::fs::remove_file(&lock_file).map_err(|e| e.to_string())
        }));
        Ok(())
    }

    /// Append-only; hooks are never removed within a run.
    pub fn add_termination_hook(&self, hook: TerminationHook) {
        let mut inner = self.inner.lock().unwrap();
        if inner.hooks_run {
            println!("[windlass] shutdown - hook registered after teardown, dropping it");
            return;
        }
        inner.hooks.push(hook);
    }

    pub fn add_close_guard(&self, guard: CloseGuard) {
        self.inner.lock().unwrap().close_guards.push(guard);
    }

    /// Adjudicate a window-close request. Every registered guard must agree;
    /// with no guards registered the close always proceeds.
    pub fn confirm_close(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.close_guards.iter().all(|guard| guard())
    }

    /// Run every registered hook once, sequentially, in registration order.
    /// Hook failures are logged and swallowed; they never abort shutdown.
    /// Calling this a second time is a no-op.
    pub fn run_termination_hooks(&self) {
        let hooks = {
            let mut inner = self.inner.lock().unwrap();
            inner.hooks_run = true;
            std::mem::take(&mut inner.hooks)
        };

        for hook in hooks {
            if let Err(e) = hook() {
                println!("[windlass] shutdown - termination hook failed: {e}");
            }
        }
    }
}

/// Signal 0 probes existence without touching the process. EPERM still
/// means "exists" (owned by another user).
fn pid_alive(pid: u32) -> bool {
    let ret = unsafe { libc::kill(pid as libc::pid_t, 0) };
    ret == 0 || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}
