use crate::config::types::LauncherConfig;
use crate::paths::PATH_DATA;

use std::error::Error;
use std::fs::File;
use std::io::BufReader;

pub fn load_cfg() -> LauncherConfig {
    let path = PATH_DATA.join("settings.json");

    if let Ok(file) = File::open(path) {
        if let Ok(config) = serde_json::from_reader::<_, LauncherConfig>(BufReader::new(file)) {
            return config;
        }
    }

    // Return default settings if file doesn't exist or has an error
    LauncherConfig::default()
}

pub fn save_cfg(config: &LauncherConfig) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(&*PATH_DATA)?;
    let path = PATH_DATA.join("settings.json");
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, config)?;
    Ok(())
}
