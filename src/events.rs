use std::path::PathBuf;

/// Events consumed by the session's single-threaded loop. The load worker
/// is the only producer on another thread; navigation events come from the
/// presentation layer on the session thread itself. Ordering within the
/// queue is the whole cross-thread contract: the worker never touches
/// session state directly.
#[derive(Debug)]
pub enum AppEvent {
    /// Monotonically non-decreasing percentage in `[0, 100]`.
    LoadProgress { percent: u8, message: Option<String> },
    LoadFinished { path: PathBuf, bytes: Vec<u8> },
    LoadFailed { path: PathBuf, error: String },
    /// The host's fractional scroll position, `0.0..=1.0`.
    Scrolled { fraction: f64 },
    /// Explicit offset entry; forces a render and a highlight.
    JumpToOffset { offset: usize },
}
