//! Engine crate – the desk-calculator core shared by every front end.
//!
//! The calculator is driven purely by symbolic key events and reports a
//! display string after each one. This crate does NOT draw anything: a
//! presentation layer (terminal, GUI, test harness) sends [`Event`]s and
//! renders whatever [`Calculator::display`] returns.

pub mod calculator;
pub mod commands;
pub mod context;
pub mod event;
pub mod format;
pub mod math;
pub mod platform;
pub mod scenario;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use calculator::{Calculator, Snapshot};
pub use commands::CommandRegistry;
pub use context::AppContext;
pub use event::{AngleMode, BinaryOp, Constant, Event, Paren, UnaryFn};
pub use math::CalcError;
pub use types::{CommandResult, ErrorCode, ErrorInfo, Status};
