use crate::config::{self, SystemConfig};
use crate::editor;
use crate::error::Result;
use crate::events::AppEvent;
use crate::loader;
use crate::names::NameTables;
use crate::offset::format_offset;
use crate::rom::RomBuffer;
use crate::scanner::{self, FillByte, RangeReport, RunMatch};
use crate::viewport::{Debounce, HexRow, ViewportState};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::thread;

/// The editing session: one ROM buffer, one viewport, one owner. All
/// mutation goes through here so the single-mutator rule is enforceable —
/// while a load worker is running, every other mutation entry point
/// refuses to run.
pub struct AppState {
    pub rom_path: Option<PathBuf>,
    pub rom: RomBuffer,
    pub viewport: ViewportState,
    pub names: NameTables,
    pub system_config: SystemConfig,
    pub status_message: String,
    pub load_percent: u8,
    loading: bool,
    scroll_debounce: Debounce,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        let system_config = SystemConfig::load();
        Self {
            rom_path: None,
            rom: RomBuffer::new(),
            viewport: ViewportState::with_half_width(system_config.view_buffer_rows),
            names: NameTables::load_from(Path::new(".")),
            system_config,
            status_message: "No ROM loaded.".to_string(),
            load_percent: 0,
            loading: false,
            scroll_debounce: Debounce::default(),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Starts the load worker. The session keeps running; progress and the
    /// final buffer arrive through the event queue.
    pub fn begin_load(
        &mut self,
        path: PathBuf,
        tx: Sender<AppEvent>,
    ) -> anyhow::Result<thread::JoinHandle<()>> {
        if self.loading {
            anyhow::bail!("a load is already in progress");
        }
        self.loading = true;
        self.status_message = format!("Loading {}...", path.display());
        Ok(loader::spawn_load(path, tx))
    }

    /// Synchronous load used by the CLI and tests. All or nothing: on
    /// failure the previous buffer and viewport stay as they were.
    pub fn load_rom(&mut self, path: PathBuf) -> anyhow::Result<Vec<HexRow>> {
        if self.loading {
            anyhow::bail!("a load is already in progress");
        }
        let bytes = loader::read_rom(&path, |_| {})?;
        Ok(self.install_rom(path, bytes))
    }

    /// Loads the ROM recorded in `last_rom_path.txt`.
    pub fn load_last_rom(&mut self) -> anyhow::Result<Vec<HexRow>> {
        let path = config::read_last_rom_path()?;
        self.load_rom(path)
    }

    fn install_rom(&mut self, path: PathBuf, bytes: Vec<u8>) -> Vec<HexRow> {
        self.rom.replace(bytes);
        self.viewport.reset_for(&self.rom);
        self.loading = false;
        self.load_percent = 100;

        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        self.status_message = format!("ROM loaded: {} ({} bytes)", name, self.rom.len());

        if let Err(e) = config::save_last_rom_path(&path) {
            log::warn!("could not record last ROM path: {}", e);
        }
        self.rom_path = Some(path);

        // Initial window: the first 2 x half_width rows
        self.viewport.render(&self.rom, self.viewport.half_width)
    }

    /// Drains one event from the queue. Returns freshly materialized rows
    /// whenever the event caused a render.
    pub fn handle_event(&mut self, event: AppEvent) -> Option<Vec<HexRow>> {
        match event {
            AppEvent::LoadProgress { percent, message } => {
                self.load_percent = percent;
                if let Some(msg) = message {
                    self.status_message = msg;
                }
                None
            }
            AppEvent::LoadFinished { path, bytes } => Some(self.install_rom(path, bytes)),
            AppEvent::LoadFailed { path, error } => {
                self.loading = false;
                log::error!("load of {} failed: {}", path.display(), error);
                self.status_message = format!("Error loading ROM: {}", error);
                None
            }
            AppEvent::Scrolled { fraction } => {
                if self.viewport.needs_rerender(fraction) && self.scroll_debounce.ready() {
                    let center = self.viewport.visible_row(fraction);
                    Some(self.viewport.render(&self.rom, center))
                } else {
                    None
                }
            }
            AppEvent::JumpToOffset { offset } => {
                match self.viewport.scroll_to_offset(&self.rom, offset) {
                    Ok(rows) => {
                        self.status_message = format!(
                            "Jumped to {}",
                            format_offset(offset, self.system_config.offset_format)
                        );
                        Some(rows)
                    }
                    Err(e) => {
                        self.status_message = format!("Invalid offset: {}", e);
                        None
                    }
                }
            }
        }
    }

    /// First-fit free-space search; on a hit the viewport re-centers on
    /// the match so the presentation layer can show it highlighted.
    pub fn find_free_space(
        &mut self,
        start_offset: usize,
        needed_size: usize,
        fill: FillByte,
    ) -> Result<(RunMatch, Vec<HexRow>)> {
        let m = scanner::find_free_space(&self.rom, start_offset, needed_size, fill)?;
        let rows = self.viewport.scroll_to_offset(&self.rom, m.start)?;
        self.status_message = format!(
            "Free space found ({}): {}",
            fill,
            format_offset(m.start, self.system_config.offset_format)
        );
        Ok((m, rows))
    }

    pub fn check_range(&self, start: usize, size: usize) -> Result<RangeReport> {
        scanner::check_range(&self.rom, start, size)
    }

    pub fn byte_difference(&self, a: usize, b: usize) -> Result<RangeReport> {
        scanner::byte_difference(&self.rom, a, b)
    }

    pub fn scroll_to_offset(&mut self, offset: usize) -> Result<Vec<HexRow>> {
        self.viewport.scroll_to_offset(&self.rom, offset)
    }

    pub fn erase_range(&mut self, start: usize, end: usize, fill: FillByte) -> anyhow::Result<()> {
        if self.loading {
            anyhow::bail!("cannot erase while a load is in progress");
        }
        editor::erase_range(&mut self.rom, start, end, fill)?;
        self.viewport.invalidate_range(start, end);
        self.status_message = format!("Erased bytes from 0x{:X} to 0x{:X}", start, end);
        Ok(())
    }

    pub fn erase_count(&mut self, start: usize, count: usize, fill: FillByte) -> anyhow::Result<()> {
        if self.loading {
            anyhow::bail!("cannot erase while a load is in progress");
        }
        editor::erase_count(&mut self.rom, start, count, fill)?;
        self.viewport
            .invalidate_range(start, start + count.saturating_sub(1));
        self.status_message = format!("Erased {} bytes from 0x{:X}", count, start);
        Ok(())
    }

    /// Writes a single byte and invalidates the row it lands in. This is
    /// the direct-edit path the hex editor uses.
    pub fn write_byte(&mut self, offset: usize, value: u8) -> anyhow::Result<()> {
        if self.loading {
            anyhow::bail!("cannot edit while a load is in progress");
        }
        self.rom.write_byte(offset, value)?;
        self.viewport.invalidate_range(offset, offset);
        Ok(())
    }

    /// Saves back to the loaded path, backup first.
    pub fn save(&mut self) -> anyhow::Result<PathBuf> {
        if self.loading {
            anyhow::bail!("cannot save while a load is in progress");
        }
        let path = self
            .rom_path
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no ROM loaded"))?;
        let backup = loader::save_rom(&self.rom, &path)?;
        self.status_message = format!("ROM saved, backup at {}", backup.display());
        Ok(backup)
    }

    pub fn save_as(&mut self, path: PathBuf) -> anyhow::Result<PathBuf> {
        if self.loading {
            anyhow::bail!("cannot save while a load is in progress");
        }
        let backup = loader::save_rom(&self.rom, &path)?;
        self.status_message = format!("ROM saved to {}", path.display());
        self.rom_path = Some(path);
        Ok(backup)
    }
}
