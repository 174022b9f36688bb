use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;

pub static PATH_HOME: LazyLock<PathBuf> =
    LazyLock::new(|| PathBuf::from(env::var("HOME").unwrap()));

pub static PATH_LOCAL_SHARE: LazyLock<PathBuf> = LazyLock::new(|| PATH_HOME.join(".local/share"));

/// Per-user data directory: settings, singleton lock, session file default.
pub static PATH_DATA: LazyLock<PathBuf> = LazyLock::new(|| {
    if let Ok(xdg_data_home) = env::var("XDG_DATA_HOME") {
        return PathBuf::from(xdg_data_home).join("windlass");
    }
    PATH_LOCAL_SHARE.join("windlass")
});

pub static BIN_ARIA2: LazyLock<PathBuf> = LazyLock::new(|| {
    let bin_candidates = [PathBuf::from("/usr/bin"), PathBuf::from("/usr/local/bin")];

    for candidate in &bin_candidates {
        let bin = candidate.join("aria2c");
        if bin.exists() {
            return bin;
        }
    }

    // Bundled sidecar next to the executable
    env::current_exe()
        .unwrap()
        .parent()
        .unwrap()
        .join("sidecar/aria2/aria2c")
});

/// Fixed loader shipped by the CrossOver distribution. Only used when the
/// runtime check reports the `crossover` tag as installed.
pub static CROSSOVER_LOADER: LazyLock<PathBuf> = LazyLock::new(|| {
    PathBuf::from("/Applications/CrossOver.app/Contents/SharedSupport/CrossOver/bin/wineloader64")
});
