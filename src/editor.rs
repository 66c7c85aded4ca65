use crate::error::{Error, Result};
use crate::rom::RomBuffer;
use crate::scanner::FillByte;

/// Overwrites `[start, end]` (inclusive) with the fill value. Confirmation
/// is the caller's responsibility; this layer only enforces bounds.
pub fn erase_range(rom: &mut RomBuffer, start: usize, end: usize, fill: FillByte) -> Result<()> {
    if rom.is_empty() {
        return Err(Error::NoRomLoaded);
    }
    if start > end || end >= rom.len() {
        return Err(Error::InvalidRange { start, end });
    }
    rom.fill(start, end - start + 1, fill.value())?;
    log::info!("erased 0x{:X}..=0x{:X} with {}", start, end, fill);
    Ok(())
}

/// Overwrites `[start, start + count)` with the fill value.
pub fn erase_count(rom: &mut RomBuffer, start: usize, count: usize, fill: FillByte) -> Result<()> {
    if rom.is_empty() {
        return Err(Error::NoRomLoaded);
    }
    let end = start
        .checked_add(count)
        .ok_or(Error::InvalidSize(count))?;
    if end > rom.len() {
        return Err(Error::OutOfBounds { offset: end, len: rom.len() });
    }
    rom.fill(start, count, fill.value())?;
    log::info!("erased {} bytes from 0x{:X} with {}", count, start, fill);
    Ok(())
}
