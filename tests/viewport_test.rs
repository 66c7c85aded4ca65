#[cfg(test)]
mod tests {
    use freespacer::events::AppEvent;
    use freespacer::rom::RomBuffer;
    use freespacer::state::AppState;
    use freespacer::viewport::{BYTES_PER_ROW, ViewportState};

    fn rom_of_rows(rows: usize) -> RomBuffer {
        RomBuffer::from_bytes(vec![0xAB; rows * BYTES_PER_ROW])
    }

    #[test]
    fn test_row_count_always_matches_bounds() {
        let rom = rom_of_rows(1_000);
        let mut vp = ViewportState::with_half_width(100);
        vp.reset_for(&rom);

        for center in [0, 1, 50, 99, 100, 500, 950, 999, 1_000, 5_000] {
            let rows = vp.render(&rom, center);
            assert_eq!(rows.len(), vp.view_end_row - vp.view_start_row);
            assert!(vp.view_end_row <= vp.total_rows);
            assert!(vp.view_start_row <= vp.view_end_row);
        }
    }

    #[test]
    fn test_materialized_range_contains_target_row() {
        let rom = rom_of_rows(4_096);
        let mut vp = ViewportState::with_half_width(64);
        vp.reset_for(&rom);

        for offset in [0usize, 1, 15, 16, 0x7FFF, 0xFFFE, 0xFFFF] {
            let rows = vp.scroll_to_offset(&rom, offset).unwrap();
            let row = offset / BYTES_PER_ROW;
            assert!(vp.view_start_row <= row && row < vp.view_end_row);
            assert!(rows.iter().any(|r| r.row == row));
        }
    }

    #[test]
    fn test_rows_carry_consecutive_offsets() {
        let rom = rom_of_rows(64);
        let mut vp = ViewportState::with_half_width(8);
        vp.reset_for(&rom);

        let rows = vp.render(&rom, 32);
        for (a, b) in rows.iter().zip(rows.iter().skip(1)) {
            assert_eq!(b.offset, a.offset + BYTES_PER_ROW);
            assert_eq!(b.row, a.row + 1);
        }
    }

    #[test]
    fn test_jump_event_renders_and_highlights() {
        let mut state = AppState::new();
        state.rom.replace(vec![0x00; 0x4000]);
        state.viewport.reset_for(&state.rom);

        let rows = state.handle_event(AppEvent::JumpToOffset { offset: 0x2000 });
        assert!(rows.is_some());
        assert_eq!(state.viewport.highlighted_offset, Some(0x2000));
        assert!(state.viewport.highlight_cell().is_some());

        // Out of bounds jumps render nothing and leave a message
        let rows = state.handle_event(AppEvent::JumpToOffset { offset: 0x4000 });
        assert!(rows.is_none());
        assert!(state.status_message.contains("Invalid offset"));
    }

    #[test]
    fn test_scroll_event_honours_hysteresis() {
        let mut state = AppState::new();
        state.rom.replace(vec![0x00; 10_000 * BYTES_PER_ROW]);
        state.viewport = ViewportState::with_half_width(500);
        state.viewport.reset_for(&state.rom);
        state.viewport.render(&state.rom, 5_000);

        // Dead center: nothing to do
        assert!(state.handle_event(AppEvent::Scrolled { fraction: 0.5 }).is_none());
        // Near the bottom edge of the window: re-render
        assert!(state.handle_event(AppEvent::Scrolled { fraction: 0.53 }).is_some());
    }
}
