//! Command registry and built-in calculator commands.
//!
//! Commands are registered by name and invoked with JSON input/output.

use crate::context::AppContext;
use crate::event::{self, AngleMode, Event, ParseEventError};
use crate::types::*;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

/// Signature for all engine commands.
pub type CommandHandler = fn(Value, &AppContext) -> Result<Value, CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Key(#[from] ParseEventError),
    #[error("{0}")]
    Other(String),
}

impl CommandError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            CommandError::InvalidInput(_) | CommandError::Key(_) => ErrorCode::InvalidInput,
            CommandError::Other(_) => ErrorCode::InternalError,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        let mut reg = Self {
            handlers: HashMap::new(),
        };
        reg.register("ping", cmd_ping);
        reg.register("press", cmd_press);
        reg.register("display", cmd_display);
        reg.register("state", cmd_state);
        reg.register("clear", cmd_clear);
        reg.register("set_mode", cmd_set_mode);
        reg.register("keys", cmd_keys);
        reg
    }

    pub fn register(&mut self, name: &str, handler: CommandHandler) {
        self.handlers.insert(name.to_string(), handler);
    }

    pub fn list(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Execute a command by name and return a full CommandResult.
    pub fn execute(&self, name: &str, args: Value, ctx: &AppContext) -> CommandResult {
        let run_id = new_run_id();
        let start = Instant::now();

        let handler = match self.handlers.get(name) {
            Some(h) => h,
            None => {
                return result_err(
                    "call",
                    name,
                    &run_id,
                    start.elapsed().as_millis() as u64,
                    ErrorCode::InvalidInput,
                    format!("unknown command: {}", name),
                );
            }
        };

        match handler(args, ctx) {
            Ok(data) => {
                let mut r = result_ok("call", name, &run_id, start.elapsed().as_millis() as u64);
                r.data = Some(data);
                r
            }
            Err(e) => {
                tracing::debug!(command = name, error = %e, "command failed");
                result_err(
                    "call",
                    name,
                    &run_id,
                    start.elapsed().as_millis() as u64,
                    e.error_code(),
                    e.to_string(),
                )
            }
        }
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn snapshot_json(ctx: &AppContext) -> Result<Value, CommandError> {
    let snap = ctx.with_calculator(|c| c.snapshot());
    serde_json::to_value(snap).map_err(|e| CommandError::Other(e.to_string()))
}

fn present(ctx: &AppContext) {
    if let Err(e) = ctx.present() {
        tracing::warn!(error = %e, "presenter failed");
    }
}

/// Read the `keys` argument: either a key line or an array of key symbols.
fn parse_keys(args: &Value) -> Result<Vec<Event>, CommandError> {
    match args.get("keys") {
        Some(Value::String(line)) => Ok(event::tokenize_keys(line)?),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| CommandError::InvalidInput("keys must be strings".into()))
                    .and_then(|s| s.parse::<Event>().map_err(CommandError::from))
            })
            .collect(),
        _ => Err(CommandError::InvalidInput(
            "missing 'keys' string or array field".into(),
        )),
    }
}

// ===========================================================================
// Built-in commands
// ===========================================================================

/// `ping` – returns { "pong": true }. Proves wiring works.
fn cmd_ping(_args: Value, _ctx: &AppContext) -> Result<Value, CommandError> {
    Ok(serde_json::json!({ "pong": true }))
}

/// `press` – dispatch keys to the session calculator.
///
/// Args: `{ "keys": "3.5 + 2 =" }` or `{ "keys": ["3", ".", "5", "+", "2", "="] }`
/// Returns: the calculator snapshot.
///
/// Keys are validated before any is dispatched, so a bad symbol leaves the
/// session untouched.
fn cmd_press(args: Value, ctx: &AppContext) -> Result<Value, CommandError> {
    let events = parse_keys(&args)?;
    ctx.with_calculator(|c| c.dispatch_all(events));
    present(ctx);
    snapshot_json(ctx)
}

/// `display` – returns { "display": "..." }.
fn cmd_display(_args: Value, ctx: &AppContext) -> Result<Value, CommandError> {
    let display = ctx.with_calculator(|c| c.display().to_string());
    Ok(serde_json::json!({ "display": display }))
}

/// `state` – full calculator snapshot.
fn cmd_state(_args: Value, ctx: &AppContext) -> Result<Value, CommandError> {
    snapshot_json(ctx)
}

/// `clear` – the C key.
fn cmd_clear(_args: Value, ctx: &AppContext) -> Result<Value, CommandError> {
    ctx.with_calculator(|c| c.clear());
    present(ctx);
    snapshot_json(ctx)
}

/// `set_mode` – `{ "mode": "deg" | "rad" }`.
fn cmd_set_mode(args: Value, ctx: &AppContext) -> Result<Value, CommandError> {
    let mode: AngleMode = args
        .get("mode")
        .and_then(|v| v.as_str())
        .ok_or_else(|| CommandError::InvalidInput("missing 'mode' string field".into()))?
        .parse()?;
    ctx.with_calculator(|c| c.set_angle_mode(mode));
    present(ctx);
    snapshot_json(ctx)
}

/// `keys` – every accepted canonical key symbol.
fn cmd_keys(_args: Value, _ctx: &AppContext) -> Result<Value, CommandError> {
    Ok(serde_json::json!({ "keys": event::key_symbols() }))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AppContext;

    #[test]
    fn test_ping_command() {
        let ctx = AppContext::default_headless();
        let reg = CommandRegistry::new();
        let result = reg.execute("ping", serde_json::json!({}), &ctx);
        assert_eq!(result.status, Status::Pass);
        assert_eq!(result.data.unwrap()["pong"], true);
    }

    #[test]
    fn test_unknown_command() {
        let ctx = AppContext::default_headless();
        let reg = CommandRegistry::new();
        let result = reg.execute("nonexistent", serde_json::json!({}), &ctx);
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.error.unwrap().code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_press_line_and_array() {
        let ctx = AppContext::default_headless();
        let reg = CommandRegistry::new();

        let r = reg.execute("press", serde_json::json!({ "keys": "3.5 + 2 =" }), &ctx);
        assert_eq!(r.status, Status::Pass);
        assert_eq!(r.data.unwrap()["display"], "5.5");

        let r = reg.execute(
            "press",
            serde_json::json!({ "keys": ["×", "2", "="] }),
            &ctx,
        );
        assert_eq!(r.data.unwrap()["display"], "11");
    }

    #[test]
    fn test_press_unknown_key_leaves_state() {
        let ctx = AppContext::default_headless();
        let reg = CommandRegistry::new();
        reg.execute("press", serde_json::json!({ "keys": "4" }), &ctx);

        let r = reg.execute("press", serde_json::json!({ "keys": "1 sinh" }), &ctx);
        assert_eq!(r.status, Status::Error);
        assert_eq!(r.error.unwrap().code, ErrorCode::InvalidInput);

        let d = reg.execute("display", serde_json::json!({}), &ctx);
        assert_eq!(d.data.unwrap()["display"], "4");
    }

    #[test]
    fn test_set_mode_and_state() {
        let ctx = AppContext::default_headless();
        let reg = CommandRegistry::new();
        let r = reg.execute("set_mode", serde_json::json!({ "mode": "rad" }), &ctx);
        assert_eq!(r.status, Status::Pass);
        assert_eq!(r.data.unwrap()["angle_mode"], "radians");

        let bad = reg.execute("set_mode", serde_json::json!({ "mode": "grad" }), &ctx);
        assert_eq!(bad.status, Status::Error);
    }

    #[test]
    fn test_clear_command() {
        let ctx = AppContext::default_headless();
        let reg = CommandRegistry::new();
        reg.execute("press", serde_json::json!({ "keys": "8 ÷" }), &ctx);
        let r = reg.execute("clear", serde_json::json!({}), &ctx);
        let data = r.data.unwrap();
        assert_eq!(data["display"], "0");
        assert!(data.get("pending_operator").is_none());
    }

    #[test]
    fn test_list_commands() {
        let reg = CommandRegistry::new();
        let names = reg.list();
        for name in ["ping", "press", "display", "state", "clear", "set_mode", "keys"] {
            assert!(names.contains(&name), "missing command {}", name);
        }
    }
}
