use crate::error::{Error, Result};
use crate::rom::RomBuffer;
use std::time::{Duration, Instant};

pub const BYTES_PER_ROW: usize = 16;
/// Rows rendered above and below the requested center row.
pub const DEFAULT_HALF_WIDTH: usize = 500;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(30);

// 16 bytes as "XX " minus the trailing space
const HEX_CELL_WIDTH: usize = BYTES_PER_ROW * 3 - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportStatus {
    #[default]
    Empty,
    Loaded,
    Rendering,
}

/// One materialized 16-byte row: fixed-width hex cell plus the printable
/// ASCII cell. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexRow {
    pub row: usize,
    pub offset: usize,
    pub hex: String,
    pub ascii: String,
}

/// Sliding window of formatted rows over the ROM. Only the rows within
/// `half_width` of the last requested center are ever materialized, so
/// rendering cost tracks the window, not the file.
#[derive(Debug)]
pub struct ViewportState {
    pub total_rows: usize,
    pub view_start_row: usize,
    pub view_end_row: usize,
    pub half_width: usize,
    pub highlighted_offset: Option<usize>,
    status: ViewportStatus,
    dirty: bool,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    pub fn new() -> Self {
        Self::with_half_width(DEFAULT_HALF_WIDTH)
    }

    pub fn with_half_width(half_width: usize) -> Self {
        Self {
            total_rows: 0,
            view_start_row: 0,
            view_end_row: 0,
            half_width,
            highlighted_offset: None,
            status: ViewportStatus::Empty,
            dirty: false,
        }
    }

    pub fn status(&self) -> ViewportStatus {
        self.status
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Re-keys the viewport to freshly loaded ROM contents. This is the
    /// `Empty -> Loaded` transition.
    pub fn reset_for(&mut self, rom: &RomBuffer) {
        self.total_rows = rom.len().div_ceil(BYTES_PER_ROW);
        self.view_start_row = 0;
        self.view_end_row = 0;
        self.highlighted_offset = None;
        self.status = ViewportStatus::Loaded;
        self.dirty = true;
    }

    /// Marks every materialized row stale; the next display access must
    /// re-render.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Marks the viewport stale only when `[start, end]` (inclusive byte
    /// offsets) overlaps a materialized row.
    pub fn invalidate_range(&mut self, start: usize, end: usize) {
        let first_row = start / BYTES_PER_ROW;
        let last_row = end / BYTES_PER_ROW;
        if first_row < self.view_end_row && last_row >= self.view_start_row {
            self.dirty = true;
        }
    }

    /// Materializes the rows around `center_row`. Exactly
    /// `view_end_row - view_start_row` rows are produced; the bounds are
    /// clamped to `[0, total_rows]`.
    pub fn render(&mut self, rom: &RomBuffer, center_row: usize) -> Vec<HexRow> {
        if self.status == ViewportStatus::Empty {
            return Vec::new();
        }
        self.status = ViewportStatus::Rendering;

        let start = center_row.saturating_sub(self.half_width);
        let end = center_row
            .saturating_add(self.half_width)
            .min(self.total_rows);
        let start = start.min(end);

        let rows = (start..end).map(|row| format_row(rom, row)).collect();

        self.view_start_row = start;
        self.view_end_row = end;
        self.dirty = false;
        self.status = ViewportStatus::Loaded;
        rows
    }

    /// Row the host's fractional scroll position corresponds to.
    pub fn visible_row(&self, scroll_fraction: f64) -> usize {
        (scroll_fraction.clamp(0.0, 1.0) * self.total_rows as f64) as usize
    }

    /// Scroll hysteresis: a re-render is due only when the visible row has
    /// drifted within `half_width / 2` rows of either edge of the
    /// materialized window. Edges already clamped to the ROM cannot
    /// trigger; there is nothing further to materialize beyond them.
    pub fn needs_rerender(&self, scroll_fraction: f64) -> bool {
        if self.status == ViewportStatus::Empty || self.total_rows == 0 {
            return false;
        }
        if self.dirty {
            return true;
        }
        let visible = self.visible_row(scroll_fraction);
        let margin = self.half_width / 2;
        let near_top = self.view_start_row > 0 && visible < self.view_start_row + margin;
        let near_bottom =
            self.view_end_row < self.total_rows && visible + margin > self.view_end_row;
        near_top || near_bottom
    }

    /// Re-centers the viewport on the row containing `offset`, bypassing
    /// the hysteresis check, and flags the byte for highlight.
    pub fn scroll_to_offset(&mut self, rom: &RomBuffer, offset: usize) -> Result<Vec<HexRow>> {
        if offset >= rom.len() {
            return Err(Error::OutOfBounds { offset, len: rom.len() });
        }
        let target_row = offset / BYTES_PER_ROW;
        self.highlighted_offset = Some(offset);
        Ok(self.render(rom, target_row))
    }

    /// Maps the highlighted offset to `(window row index, hex column)` for
    /// the presentation layer, if it falls inside the materialized window.
    pub fn highlight_cell(&self) -> Option<(usize, usize)> {
        let offset = self.highlighted_offset?;
        let row = offset / BYTES_PER_ROW;
        if row < self.view_start_row || row >= self.view_end_row {
            return None;
        }
        Some((row - self.view_start_row, (offset % BYTES_PER_ROW) * 3))
    }
}

/// Formats the 16-byte slice at `row` as paired hex/ASCII cells. The final
/// row of an unaligned ROM is short; missing bytes are omitted, not
/// zero-padded.
pub fn format_row(rom: &RomBuffer, row: usize) -> HexRow {
    let offset = row * BYTES_PER_ROW;
    let end = (offset + BYTES_PER_ROW).min(rom.len());
    let chunk = rom.bytes().get(offset..end).unwrap_or(&[]);

    let mut hex = String::with_capacity(HEX_CELL_WIDTH);
    let mut ascii = String::with_capacity(BYTES_PER_ROW);
    for (i, &b) in chunk.iter().enumerate() {
        if i > 0 {
            hex.push(' ');
        }
        hex.push_str(&format!("{:02X}", b));
        ascii.push(if (32..=126).contains(&b) { b as char } else { '.' });
    }
    // Right-pad the hex cell so the ASCII column lines up on short rows
    while hex.len() < HEX_CELL_WIDTH {
        hex.push(' ');
    }

    HexRow { row, offset, hex, ascii }
}

/// Address label for a row, matching the offset column the presentation
/// layer draws next to each rendered line.
pub fn row_label(row: usize) -> String {
    format!("{:08X}", row * BYTES_PER_ROW)
}

/// Gate that coalesces rapid successive scroll events: the first event in
/// an interval passes, the rest are dropped.
#[derive(Debug)]
pub struct Debounce {
    interval: Duration,
    last: Option<Instant>,
}

impl Default for Debounce {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debounce {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn ready(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rom_of_rows(rows: usize) -> RomBuffer {
        RomBuffer::from_bytes(vec![0x00; rows * BYTES_PER_ROW])
    }

    fn loaded_viewport(rom: &RomBuffer, half_width: usize) -> ViewportState {
        let mut vp = ViewportState::with_half_width(half_width);
        vp.reset_for(rom);
        vp
    }

    #[test]
    fn test_render_clamps_at_end() {
        let rom = rom_of_rows(10_000);
        let mut vp = loaded_viewport(&rom, 500);

        let rows = vp.render(&rom, 9_990);
        assert_eq!(vp.view_start_row, 9_490);
        assert_eq!(vp.view_end_row, 10_000);
        assert_eq!(rows.len(), vp.view_end_row - vp.view_start_row);
    }

    #[test]
    fn test_render_clamps_at_start() {
        let rom = rom_of_rows(100);
        let mut vp = loaded_viewport(&rom, 20);

        let rows = vp.render(&rom, 3);
        assert_eq!(vp.view_start_row, 0);
        assert_eq!(vp.view_end_row, 23);
        assert_eq!(rows.len(), 23);
        assert_eq!(rows[0].offset, 0);
    }

    #[test]
    fn test_render_before_load_is_empty() {
        let rom = rom_of_rows(4);
        let mut vp = ViewportState::new();
        assert_eq!(vp.status(), ViewportStatus::Empty);
        assert!(vp.render(&rom, 0).is_empty());
    }

    #[test]
    fn test_row_formatting() {
        let rom = RomBuffer::from_bytes(vec![
            0x00, 0x41, 0x42, 0x7E, 0x7F, 0x20, 0xFF, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
            0x08, 0x09,
        ]);
        let row = format_row(&rom, 0);
        assert_eq!(row.hex.len(), 47);
        assert_eq!(
            row.hex,
            "00 41 42 7E 7F 20 FF 01 02 03 04 05 06 07 08 09"
        );
        assert_eq!(row.ascii, ".AB~. ..........");
    }

    #[test]
    fn test_short_final_row() {
        let rom = RomBuffer::from_bytes(vec![0x41; 20]);
        let row = format_row(&rom, 1);
        assert_eq!(row.offset, 16);
        assert_eq!(row.ascii, "AAAA");
        // Hex cell stays at fixed width, missing bytes are blank
        assert_eq!(row.hex.len(), 47);
        assert_eq!(row.hex.trim_end(), "41 41 41 41");
    }

    #[test]
    fn test_scroll_to_offset() {
        let rom = rom_of_rows(1_000);
        let mut vp = loaded_viewport(&rom, 100);

        let rows = vp.scroll_to_offset(&rom, 0x2003).unwrap();
        let target_row = 0x2003 / BYTES_PER_ROW;
        assert!(vp.view_start_row <= target_row && target_row < vp.view_end_row);
        assert!(!rows.is_empty());
        assert_eq!(vp.highlighted_offset, Some(0x2003));
        assert_eq!(vp.highlight_cell(), Some((target_row - vp.view_start_row, 9)));

        assert!(matches!(
            vp.scroll_to_offset(&rom, 16_000),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_hysteresis() {
        let rom = rom_of_rows(10_000);
        let mut vp = loaded_viewport(&rom, 500);
        vp.render(&rom, 5_000);
        // Window is 4500..5500, margin 250

        let mid = 5_000.0 / 10_000.0;
        assert!(!vp.needs_rerender(mid));
        // Within 250 rows of the bottom edge
        assert!(vp.needs_rerender(5_300.0 / 10_000.0));
        // Within 250 rows of the top edge
        assert!(vp.needs_rerender(4_700.0 / 10_000.0));
        assert!(!vp.needs_rerender(4_800.0 / 10_000.0));
    }

    #[test]
    fn test_hysteresis_quiet_at_clamped_edges() {
        let rom = rom_of_rows(100);
        let mut vp = loaded_viewport(&rom, 500);
        vp.render(&rom, 0);
        // The whole ROM is materialized; no scroll position warrants work
        assert!(!vp.needs_rerender(0.0));
        assert!(!vp.needs_rerender(1.0));
    }

    #[test]
    fn test_invalidate_range_overlap() {
        let rom = rom_of_rows(1_000);
        let mut vp = loaded_viewport(&rom, 50);
        vp.render(&rom, 500);
        // Window is 450..550
        assert!(!vp.is_dirty());

        vp.invalidate_range(0, 0x100);
        assert!(!vp.is_dirty());

        vp.invalidate_range(460 * BYTES_PER_ROW, 460 * BYTES_PER_ROW + 4);
        assert!(vp.is_dirty());
    }

    #[test]
    fn test_row_label() {
        assert_eq!(row_label(0), "00000000");
        assert_eq!(row_label(0x1234), "00012340");
    }

    #[test]
    fn test_debounce_gate() {
        let mut debounce = Debounce::new(Duration::from_millis(250));
        assert!(debounce.ready());
        assert!(!debounce.ready());
    }
}
