use crate::error::{Error, Result};
use crate::events::AppEvent;
use crate::rom::RomBuffer;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

/// Read granularity for streaming loads. Small enough to keep transient
/// memory bounded, large enough that progress callbacks stay cheap.
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Streams the file at `path` into memory, reporting a non-decreasing
/// percentage after each chunk. All or nothing: any read failure discards
/// the partial buffer and surfaces the error.
pub fn read_rom<F: FnMut(u8)>(path: &Path, mut progress: F) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(Error::NotFound(format!(
            "file not found: {}",
            path.display()
        )));
    }

    let mut file = File::open(path)?;
    let total = file.metadata()?.len();

    let mut bytes = Vec::with_capacity(total as usize);
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut read_total: u64 = 0;

    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        bytes.extend_from_slice(&chunk[..n]);
        read_total += n as u64;
        let percent = if total == 0 {
            100
        } else {
            ((read_total * 100) / total).min(100) as u8
        };
        progress(percent);
    }
    progress(100);

    log::info!("loaded {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Spawns the load worker. It communicates with the session exclusively
/// through the event queue; the receiver applies the buffer on
/// `LoadFinished`, so a failed load leaves prior state untouched.
pub fn spawn_load(path: PathBuf, tx: Sender<AppEvent>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let size_mb = std::fs::metadata(&path)
            .map(|m| m.len() as f64 / 1024.0 / 1024.0)
            .unwrap_or(0.0);
        let _ = tx.send(AppEvent::LoadProgress {
            percent: 0,
            message: Some(format!("Loading ROM ({:.1} MB)...", size_mb)),
        });

        let result = read_rom(&path, |percent| {
            let _ = tx.send(AppEvent::LoadProgress { percent, message: None });
        });

        match result {
            Ok(bytes) => {
                let _ = tx.send(AppEvent::LoadFinished { path, bytes });
            }
            Err(e) => {
                let _ = tx.send(AppEvent::LoadFailed { path, error: e.to_string() });
            }
        }
    })
}

fn backup_path(path: &Path) -> PathBuf {
    let mut os = path.as_os_str().to_os_string();
    os.push(".bak");
    PathBuf::from(os)
}

/// Writes the buffer to `path`, preserving the previous file contents at
/// `path + ".bak"` first. The overwrite never starts unless the backup
/// copy succeeded, so a failed save always leaves a readable copy of the
/// prior contents on disk.
pub fn save_rom(rom: &RomBuffer, path: &Path) -> Result<PathBuf> {
    if rom.is_empty() {
        return Err(Error::NoRomLoaded);
    }

    let backup = backup_path(path);
    if path.exists() {
        std::fs::copy(path, &backup)?;
        log::info!("backup written to {}", backup.display());
    }
    std::fs::write(path, rom.bytes())?;
    log::info!("saved {} bytes to {}", rom.len(), path.display());
    Ok(backup)
}
