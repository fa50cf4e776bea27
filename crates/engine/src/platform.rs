//! Presenter implementations.
//!
//! - [`TerminalPresenter`]: writes a right-aligned display line to stdout
//! - [`RecordingPresenter`]: keeps frames in memory (headless / tests)

use crate::traits::*;
use std::io::Write;
use std::sync::Mutex;

// ===========================================================================
// Terminal – one line per frame
// ===========================================================================

pub struct TerminalPresenter {
    pub width: usize,
    pub show_mode: bool,
}

impl TerminalPresenter {
    pub fn new(width: usize, show_mode: bool) -> Self {
        Self { width, show_mode }
    }

    /// The line written for `frame`, without the trailing newline.
    pub fn render(&self, frame: &Frame) -> String {
        let body = format!("{:>width$}", frame.display, width = self.width);
        if self.show_mode {
            format!("[{}] {}", frame.angle_mode.label(), body)
        } else {
            body
        }
    }
}

impl Default for TerminalPresenter {
    fn default() -> Self {
        Self::new(20, true)
    }
}

impl Presenter for TerminalPresenter {
    fn present(&self, frame: &Frame) -> CapResult<()> {
        let mut out = std::io::stdout().lock();
        writeln!(out, "{}", self.render(frame))?;
        out.flush()?;
        Ok(())
    }
}

// ===========================================================================
// Recording – headless
// ===========================================================================

#[derive(Default)]
pub struct RecordingPresenter {
    frames: Mutex<Vec<Frame>>,
}

impl RecordingPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> Vec<Frame> {
        self.frames
            .lock()
            .map(|f| f.clone())
            .unwrap_or_default()
    }

    pub fn last(&self) -> Option<Frame> {
        self.frames.lock().ok().and_then(|f| f.last().cloned())
    }
}

impl Presenter for RecordingPresenter {
    fn present(&self, frame: &Frame) -> CapResult<()> {
        self.frames
            .lock()
            .map_err(|_| CapError::Other("recording presenter lock poisoned".into()))?
            .push(frame.clone());
        Ok(())
    }
}
