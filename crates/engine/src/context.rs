//! Application context – one calculator session plus its presenter.

use crate::calculator::Calculator;
use crate::event::AngleMode;
use crate::platform::RecordingPresenter;
use crate::traits::*;
use std::sync::Mutex;

/// Central context passed to all commands.
///
/// Each context owns exactly one calculator; sessions never share state.
/// The presenter is a trait object so callers (CLI / REPL / tests) can swap
/// the rendering without touching the engine.
pub struct AppContext {
    calculator: Mutex<Calculator>,
    presenter: Box<dyn Presenter>,
}

impl AppContext {
    pub fn new(presenter: Box<dyn Presenter>) -> Self {
        Self {
            calculator: Mutex::new(Calculator::new()),
            presenter,
        }
    }

    /// Context suitable for headless / CI environments.
    pub fn default_headless() -> Self {
        Self::new(Box::new(RecordingPresenter::new()))
    }

    pub fn with_angle_mode(self, mode: AngleMode) -> Self {
        self.with_calculator(|c| c.set_angle_mode(mode));
        self
    }

    /// Run `f` against the session's calculator.
    pub fn with_calculator<R>(&self, f: impl FnOnce(&mut Calculator) -> R) -> R {
        // Events never leave the engine half-updated; a poisoned lock is fine.
        let mut calc = self
            .calculator
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut calc)
    }

    /// Hand the current state to the presenter.
    pub fn present(&self) -> CapResult<()> {
        let frame = self.with_calculator(|c| Frame::from(&*c));
        self.presenter.present(&frame)
    }
}
