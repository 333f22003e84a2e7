use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "GYMRAT_DATA_DIR";

pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolve the data directory: `--data-dir`, then `GYMRAT_DATA_DIR`,
    /// then the platform data dir. Created if missing.
    pub fn load(data_dir: Option<PathBuf>) -> Result<Self> {
        let env_dir = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        let data_dir = match data_dir.or(env_dir) {
            Some(dir) => dir,
            None => ProjectDirs::from("", "", "gymrat")
                .context("Could not determine home directory")?
                .data_dir()
                .to_path_buf(),
        };

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;

        Ok(Config { data_dir })
    }
}
