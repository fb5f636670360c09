use std::path::PathBuf;

const APP_NAME: &str = "gptzator";

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "GPTZATOR_CONFIG_DIR";

/// Config directory: `$GPTZATOR_CONFIG_DIR`, else `<platform config dir>/gptzator`.
pub fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Some(PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join(APP_NAME))
}
