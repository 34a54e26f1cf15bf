use std::fs;
use std::path::PathBuf;

use crate::settings::ControlSettings;

const SETTINGS_FILE: &str = "control.json";

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("YAXSHI_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("yaxshi").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn settings_file() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join(SETTINGS_FILE))
}

pub fn load_settings() -> anyhow::Result<ControlSettings> {
    Ok(ControlSettings::load(&settings_file()?)?)
}

pub fn save_settings(settings: &ControlSettings) -> anyhow::Result<()> {
    settings.save(&settings_file()?)?;
    Ok(())
}
