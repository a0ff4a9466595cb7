use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// The one contract the pipeline has with the visible UI: replace the
/// currently displayed text. Window creation, styling and layout live behind
/// whatever implements this.
///
/// Implementations are only ever called from the UI task, so they need no
/// internal synchronization of their own.
pub trait TextSurface: Send {
    fn set_text(&mut self, text: &str);
}

/// Surface that rewrites a single terminal line in place
pub struct ConsoleSurface;

impl ConsoleSurface {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ConsoleSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TextSurface for ConsoleSurface {
    fn set_text(&mut self, text: &str) {
        // \r + clear-to-end keeps the animation on one line
        print!("\r\x1b[2K{}", text);
        let _ = std::io::stdout().flush();
    }
}

/// Surface that records every write, for tests and embedding
#[derive(Clone, Default)]
pub struct RecordingSurface {
    writes: Arc<Mutex<Vec<String>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// All texts written so far, oldest first
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().clone()
    }

    /// The most recent write, if any
    pub fn current(&self) -> Option<String> {
        self.writes.lock().last().cloned()
    }
}

impl TextSurface for RecordingSurface {
    fn set_text(&mut self, text: &str) {
        self.writes.lock().push(text.to_string());
    }
}
