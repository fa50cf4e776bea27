use crate::calculator::Calculator;
use crate::event::{AngleMode, BinaryOp};
use serde::{Deserialize, Serialize};

/// Result type for presentation-side operations.
pub type CapResult<T> = Result<T, CapError>;

#[derive(Debug, thiserror::Error)]
pub enum CapError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Everything a presentation layer needs to draw the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub display: String,
    pub angle_mode: AngleMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending: Option<BinaryOp>,
}

impl From<&Calculator> for Frame {
    fn from(calc: &Calculator) -> Self {
        Self {
            display: calc.display().to_string(),
            angle_mode: calc.angle_mode(),
            pending: calc.pending_operator(),
        }
    }
}

/// Renders frames. Implementations own their own styling; nothing flows
/// back into the engine.
pub trait Presenter: Send + Sync {
    fn present(&self, frame: &Frame) -> CapResult<()>;
}
