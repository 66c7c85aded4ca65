use crate::error::{Error, Result};
use crate::offset::OffsetFormat;
use crate::scanner::FillByte;
use crate::viewport::DEFAULT_HALF_WIDTH;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Plain-text file holding the absolute path of the most recently loaded
/// ROM, overwritten after every successful load.
pub const LAST_ROM_FILE: &str = "last_rom_path.txt";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    pub open_last_rom: bool,
    #[serde(default)]
    pub default_fill: FillByte,
    #[serde(default)]
    pub offset_format: OffsetFormat,
    #[serde(default = "default_view_buffer_rows")]
    pub view_buffer_rows: usize,
}

fn default_view_buffer_rows() -> usize {
    DEFAULT_HALF_WIDTH
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            open_last_rom: true,
            default_fill: FillByte::Ff,
            offset_format: OffsetFormat::Hex0x,
            view_buffer_rows: DEFAULT_HALF_WIDTH,
        }
    }
}

impl SystemConfig {
    pub fn load() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "freespacer") {
            let config_path = proj_dirs.config_dir().join("config.json");
            if config_path.exists()
                && let Ok(data) = std::fs::read_to_string(config_path)
                && let Ok(config) = serde_json::from_str(&data)
            {
                return config;
            }
        }
        Self::default()
    }

    pub fn save(&self) -> anyhow::Result<()> {
        if let Some(proj_dirs) = ProjectDirs::from("", "", "freespacer") {
            let config_dir = proj_dirs.config_dir();
            std::fs::create_dir_all(config_dir)?;
            let config_path = config_dir.join("config.json");
            let data = serde_json::to_string_pretty(self)?;
            std::fs::write(config_path, data)?;
        }
        Ok(())
    }
}

/// Records `rom_path` (canonicalized when possible) in the given tracking
/// file.
pub fn save_last_rom_path_to(file: &Path, rom_path: &Path) -> Result<()> {
    let abs = std::fs::canonicalize(rom_path).unwrap_or_else(|_| rom_path.to_path_buf());
    std::fs::write(file, abs.display().to_string())?;
    Ok(())
}

/// Reads the tracking file back; fails with `NotFound` when nothing was
/// recorded or the recorded ROM no longer exists.
pub fn read_last_rom_path_from(file: &Path) -> Result<PathBuf> {
    let text = std::fs::read_to_string(file)
        .map_err(|_| Error::NotFound("no previous ROM recorded".to_string()))?;
    let path = PathBuf::from(text.trim());
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "last ROM not found: {}",
            path.display()
        )));
    }
    Ok(path)
}

pub fn save_last_rom_path(rom_path: &Path) -> Result<()> {
    save_last_rom_path_to(Path::new(LAST_ROM_FILE), rom_path)
}

pub fn read_last_rom_path() -> Result<PathBuf> {
    read_last_rom_path_from(Path::new(LAST_ROM_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_rom_path_round_trip() {
        let dir = std::env::temp_dir();
        let tracking = dir.join("freespacer_last_rom_path.txt");
        let rom = dir.join("freespacer_config_test.gba");
        std::fs::write(&rom, [0u8; 4]).unwrap();

        save_last_rom_path_to(&tracking, &rom).unwrap();
        let read_back = read_last_rom_path_from(&tracking).unwrap();
        assert!(read_back.ends_with("freespacer_config_test.gba"));

        // A recorded path that disappeared is NotFound
        std::fs::remove_file(&rom).unwrap();
        assert!(matches!(
            read_last_rom_path_from(&tracking),
            Err(Error::NotFound(_))
        ));

        let _ = std::fs::remove_file(tracking);
    }

    #[test]
    fn test_missing_tracking_file() {
        let tracking = std::env::temp_dir().join("freespacer_no_such_tracking.txt");
        let _ = std::fs::remove_file(&tracking);
        assert!(matches!(
            read_last_rom_path_from(&tracking),
            Err(Error::NotFound(_))
        ));
    }
}
