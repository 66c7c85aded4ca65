#[cfg(test)]
mod tests {
    use freespacer::scanner::FillByte;
    use freespacer::state::AppState;
    use freespacer::viewport::BYTES_PER_ROW;

    fn state_with_planted_rom() -> AppState {
        let mut state = AppState::new();
        // 64 bytes, bytes 32..48 are 0xFF, the rest 0x00
        let mut bytes = vec![0x00; 64];
        bytes[32..48].fill(0xFF);
        state.rom.replace(bytes);
        state.viewport.reset_for(&state.rom);
        state
    }

    #[test]
    fn test_find_recenters_viewport() {
        let mut state = state_with_planted_rom();

        let (m, rows) = state.find_free_space(0, 16, FillByte::Ff).unwrap();
        assert_eq!(m.start, 32);
        assert_eq!(m.length, 16);
        assert!(!rows.is_empty());

        let target_row = m.start / BYTES_PER_ROW;
        assert!(state.viewport.view_start_row <= target_row);
        assert!(target_row < state.viewport.view_end_row);
        assert_eq!(state.viewport.highlighted_offset, Some(32));
    }

    #[test]
    fn test_find_zero_fill_prefers_lowest_offset() {
        let mut state = state_with_planted_rom();
        let (m, _rows) = state.find_free_space(0, 16, FillByte::Zero).unwrap();
        assert_eq!(m.start, 0);
    }

    #[test]
    fn test_erase_opens_up_space() {
        let mut state = state_with_planted_rom();

        // No 32-byte 0xFF run yet
        assert!(state.find_free_space(0, 32, FillByte::Ff).is_err());

        // Erasing 16..=31 joins up with the planted run
        state.erase_range(16, 31, FillByte::Ff).unwrap();
        let (m, _rows) = state.find_free_space(0, 32, FillByte::Ff).unwrap();
        assert_eq!(m.start, 16);

        // The erase left the rest untouched
        assert_eq!(&state.rom.bytes()[..16], &[0x00; 16]);
        assert_eq!(&state.rom.bytes()[48..], &[0x00; 16]);
    }

    #[test]
    fn test_erase_invalidates_overlapping_rows() {
        let mut state = state_with_planted_rom();
        let _ = state.scroll_to_offset(0).unwrap();
        assert!(!state.viewport.is_dirty());

        state.erase_count(0, 4, FillByte::Ff).unwrap();
        assert!(state.viewport.is_dirty());
    }

    #[test]
    fn test_check_range_reports_usage() {
        let state = state_with_planted_rom();

        let report = state.check_range(32, 16).unwrap();
        assert_eq!(report.free, Some(FillByte::Ff));

        let report = state.check_range(0, 16).unwrap();
        assert_eq!(report.free, Some(FillByte::Zero));

        // Straddling both regions is in use under either fill value
        let report = state.check_range(24, 16).unwrap();
        assert_eq!(report.free, None);
    }
}
