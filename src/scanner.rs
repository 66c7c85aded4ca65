use crate::error::{Error, Result};
use crate::rom::RomBuffer;
use serde::{Deserialize, Serialize};

/// The byte value conventionally used to mark unused ROM space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FillByte {
    #[default]
    Ff,
    Zero,
}

impl FillByte {
    pub fn value(self) -> u8 {
        match self {
            FillByte::Ff => 0xFF,
            FillByte::Zero => 0x00,
        }
    }

    pub fn all() -> &'static [FillByte] {
        &[FillByte::Ff, FillByte::Zero]
    }

    pub fn from_name(name: &str) -> Option<FillByte> {
        match name {
            "FF" | "ff" | "0xFF" => Some(FillByte::Ff),
            "00" | "0x00" => Some(FillByte::Zero),
            _ => None,
        }
    }
}

impl std::fmt::Display for FillByte {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:02X}", self.value())
    }
}

/// A located run of free space. Consumed immediately by the caller to
/// report the find and recenter the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunMatch {
    pub start: usize,
    pub length: usize,
    pub fill: FillByte,
}

impl RunMatch {
    /// Inclusive end offset of the run.
    pub fn end(&self) -> usize {
        self.start + self.length - 1
    }
}

/// Classification of an arbitrary range: which fill value (if any) covers
/// it uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeReport {
    pub start: usize,
    /// Inclusive.
    pub end: usize,
    pub size: usize,
    pub free: Option<FillByte>,
}

/// Scans forward from `start_offset` for the first run of `needed_size`
/// bytes all equal to the fill value. First fit, not best fit: the
/// lowest-offset match wins. Single pass over the buffer; a mismatching
/// byte resets the run counter instead of re-scanning the window.
pub fn find_free_space(
    rom: &RomBuffer,
    start_offset: usize,
    needed_size: usize,
    fill: FillByte,
) -> Result<RunMatch> {
    if rom.is_empty() {
        return Err(Error::NoRomLoaded);
    }
    if needed_size == 0 || needed_size > rom.len().saturating_sub(start_offset) {
        return Err(Error::InvalidSize(needed_size));
    }

    let value = fill.value();
    let mut run = 0usize;
    for (i, &b) in rom.bytes()[start_offset..].iter().enumerate() {
        if b == value {
            run += 1;
            if run == needed_size {
                return Ok(RunMatch {
                    start: start_offset + i + 1 - needed_size,
                    length: needed_size,
                    fill,
                });
            }
        } else {
            run = 0;
        }
    }

    Err(Error::NotFound(format!(
        "no free space of {} bytes ({}) found",
        needed_size, fill
    )))
}

/// True iff every byte in `[start, start + size)` equals the fill value.
/// Vacuously true for `size == 0`. A uniformly filled range that happens
/// to be meaningful data is indistinguishable from free space; callers
/// treat the answer as a heuristic, not a guarantee.
pub fn is_range_free(rom: &RomBuffer, start: usize, size: usize, fill: FillByte) -> bool {
    let Some(end) = start.checked_add(size) else {
        return false;
    };
    let value = fill.value();
    rom.bytes()
        .get(start..end)
        .is_some_and(|block| block.iter().all(|&b| b == value))
}

fn classify(rom: &RomBuffer, start: usize, size: usize) -> Option<FillByte> {
    FillByte::all()
        .iter()
        .copied()
        .find(|&fill| is_range_free(rom, start, size, fill))
}

/// Computes the inclusive end offset of a `size`-byte block at `start` and
/// reports whether the block is free. Ranges that overlap used data are
/// still reported; the warning is logged, never suppressed.
pub fn check_range(rom: &RomBuffer, start: usize, size: usize) -> Result<RangeReport> {
    if rom.is_empty() {
        return Err(Error::NoRomLoaded);
    }
    if size == 0 {
        return Err(Error::InvalidSize(size));
    }
    let end = start
        .checked_add(size - 1)
        .ok_or(Error::InvalidSize(size))?;
    if end >= rom.len() {
        return Err(Error::OutOfBounds { offset: end, len: rom.len() });
    }

    let free = classify(rom, start, size);
    if free.is_none() {
        log::warn!(
            "range 0x{:X}..=0x{:X} includes offsets used by the ROM",
            start,
            end
        );
    }
    Ok(RangeReport { start, end, size, free })
}

/// Inclusive byte span between two offsets, in either order, with the same
/// free/in-use classification as [`check_range`].
pub fn byte_difference(rom: &RomBuffer, a: usize, b: usize) -> Result<RangeReport> {
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    check_range(rom, start, end - start + 1)
}
