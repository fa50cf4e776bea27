//! The calculator engine: an eager, left-to-right key-driven state machine.
//!
//! There is no expression parser. A binary operator stores the typed operand
//! and waits for the next one; pressing another operator (or `=`) applies the
//! pending pair immediately, regardless of precedence. Unary keys act on the
//! operand being edited and write the result back into it.

use crate::event::{AngleMode, BinaryOp, Constant, Event, Paren, UnaryFn};
use crate::format::{self, ERROR_SENTINEL};
use crate::math::{self, CalcError, UnaryValue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Calculator {
    /// Operand text being edited. Empty means nothing typed yet.
    input: String,
    accumulator: Option<f64>,
    pending: Option<BinaryOp>,
    /// The next digit starts a new operand instead of extending `input`.
    awaiting_operand: bool,
    angle_mode: AngleMode,
    display: String,
}

/// Serializable view of the engine state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub display: String,
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accumulator: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_operator: Option<BinaryOp>,
    pub awaiting_operand: bool,
    pub angle_mode: AngleMode,
    pub error: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_angle_mode(AngleMode::default())
    }

    pub fn with_angle_mode(angle_mode: AngleMode) -> Self {
        Self {
            input: String::new(),
            accumulator: None,
            pending: None,
            awaiting_operand: false,
            angle_mode,
            display: "0".to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// What the display currently shows.
    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn angle_mode(&self) -> AngleMode {
        self.angle_mode
    }

    pub fn pending_operator(&self) -> Option<BinaryOp> {
        self.pending
    }

    pub fn is_error(&self) -> bool {
        self.display == ERROR_SENTINEL
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            display: self.display.clone(),
            input: self.input.clone(),
            accumulator: self.accumulator,
            pending_operator: self.pending,
            awaiting_operand: self.awaiting_operand,
            angle_mode: self.angle_mode,
            error: self.is_error(),
        }
    }

    // -----------------------------------------------------------------------
    // Events
    // -----------------------------------------------------------------------

    pub fn dispatch(&mut self, event: Event) {
        tracing::trace!(%event, input = %self.input, "dispatch");
        match event {
            Event::Digit(d) => self.press_digit(d),
            Event::Decimal => self.press_decimal(),
            Event::Operator(op) => self.press_operator(op),
            Event::Unary(fun) => self.press_unary(fun),
            Event::Constant(c) => self.press_constant(c),
            Event::Paren(p) => self.press_paren(p),
            Event::Equals => self.calculate(),
            Event::Clear => self.clear(),
            Event::Backspace => self.backspace(),
            Event::ToggleAngleMode => self.toggle_angle_mode(),
        }
    }

    pub fn dispatch_all<I: IntoIterator<Item = Event>>(&mut self, events: I) {
        for event in events {
            self.dispatch(event);
        }
    }

    pub fn press_digit(&mut self, digit: u8) {
        if digit > 9 {
            tracing::warn!(digit, "ignoring out-of-range digit");
            return;
        }
        self.begin_operand();
        if self.input == "0" {
            self.input.clear();
        }
        self.input.push(char::from(b'0' + digit));
        self.refresh();
    }

    pub fn press_decimal(&mut self) {
        self.begin_operand();
        if !self.input.contains('.') {
            if self.input.is_empty() {
                self.input.push_str("0.");
            } else {
                self.input.push('.');
            }
        }
        self.refresh();
    }

    pub fn press_operator(&mut self, op: BinaryOp) {
        if self.input.is_empty() {
            return;
        }

        // Chained operator: settle the pending pair first.
        if self.accumulator.is_some() && !self.awaiting_operand && !self.evaluate() {
            return;
        }

        let left = match math::parse_operand(&self.input) {
            Ok(v) => v,
            Err(e) => return self.fail(e),
        };
        self.accumulator = Some(left);
        self.pending = Some(op);
        self.awaiting_operand = true;
        self.display = format!("{} {}", self.input, op.display_symbol());
    }

    /// The `=` key.
    pub fn calculate(&mut self) {
        self.evaluate();
    }

    pub fn press_unary(&mut self, fun: UnaryFn) {
        let value = if self.input.is_empty() {
            0.0
        } else {
            match math::parse_operand(&self.input) {
                Ok(v) => v,
                Err(e) => return self.fail(e),
            }
        };

        match math::apply_unary(fun, value, self.angle_mode) {
            Ok(UnaryValue::Float(v)) => {
                self.input = format::number_to_buffer(format::normalize(v));
            }
            Ok(UnaryValue::Exact(n)) => self.input = n.to_string(),
            Err(e) => return self.fail(e),
        }
        self.awaiting_operand = false;
        self.refresh();
    }

    pub fn press_constant(&mut self, constant: Constant) {
        self.input = constant.literal().to_string();
        self.awaiting_operand = false;
        self.refresh();
    }

    /// Parentheses are echoed into the buffer but never evaluated; an operand
    /// containing one fails to parse when it is used.
    pub fn press_paren(&mut self, paren: Paren) {
        self.input.push(paren.as_char());
        self.refresh();
    }

    pub fn toggle_angle_mode(&mut self) {
        self.set_angle_mode(self.angle_mode.toggled());
    }

    pub fn set_angle_mode(&mut self, mode: AngleMode) {
        tracing::debug!(mode = mode.label(), "angle mode");
        self.angle_mode = mode;
    }

    /// Reset everything except the angle mode.
    pub fn clear(&mut self) {
        self.input.clear();
        self.accumulator = None;
        self.pending = None;
        self.awaiting_operand = false;
        self.display = "0".to_string();
    }

    pub fn backspace(&mut self) {
        if self.input.is_empty() {
            return;
        }
        self.input.pop();
        if self.input.is_empty() {
            self.input.push('0');
        }
        self.refresh();
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn begin_operand(&mut self) {
        if self.awaiting_operand {
            self.input.clear();
            self.awaiting_operand = false;
        }
    }

    /// Apply the pending operator to the accumulator and the typed operand.
    /// Returns false if evaluation failed; the engine is then cleared and
    /// shows the error sentinel.
    fn evaluate(&mut self) -> bool {
        let (lhs, op) = match (self.accumulator, self.pending) {
            (Some(lhs), Some(op)) if !self.input.is_empty() => (lhs, op),
            _ => return true,
        };

        let result = math::parse_operand(&self.input)
            .and_then(|rhs| math::apply_binary(op, lhs, rhs));
        match result {
            Ok(value) => {
                self.input = format::number_to_buffer(format::normalize(value));
                self.accumulator = None;
                self.pending = None;
                self.awaiting_operand = false;
                self.refresh();
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "evaluation failed; clearing");
                self.clear();
                self.display = ERROR_SENTINEL.to_string();
                false
            }
        }
    }

    /// Unary and operand errors: drop the operand, keep the pending operator.
    fn fail(&mut self, err: CalcError) {
        tracing::debug!(error = %err, "operation failed");
        self.input.clear();
        self.display = ERROR_SENTINEL.to_string();
    }

    fn refresh(&mut self) {
        self.display = format::format_display(&self.input);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let calc = Calculator::new();
        assert_eq!(calc.display(), "0");
        assert_eq!(calc.input(), "");
        assert_eq!(calc.angle_mode(), AngleMode::Degrees);
        assert!(!calc.is_error());
    }

    #[test]
    fn test_leading_zero_replaced() {
        let mut calc = Calculator::new();
        calc.press_digit(0);
        assert_eq!(calc.display(), "0");
        calc.press_digit(7);
        assert_eq!(calc.display(), "7");
    }

    #[test]
    fn test_decimal_rules() {
        let mut calc = Calculator::new();
        calc.press_decimal();
        assert_eq!(calc.input(), "0.");
        calc.press_digit(5);
        calc.press_decimal();
        assert_eq!(calc.input(), "0.5");
    }

    #[test]
    fn test_operator_display_glyphs() {
        let mut calc = Calculator::new();
        calc.press_digit(6);
        calc.press_operator(BinaryOp::Mul);
        assert_eq!(calc.display(), "6 ×");
        calc.press_operator(BinaryOp::Div);
        assert_eq!(calc.display(), "6 ÷");
        assert_eq!(calc.pending_operator(), Some(BinaryOp::Div));
    }

    #[test]
    fn test_operator_on_empty_buffer_is_noop() {
        let mut calc = Calculator::new();
        calc.press_operator(BinaryOp::Add);
        assert_eq!(calc.pending_operator(), None);
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_digit_after_operator_starts_fresh_operand() {
        let mut calc = Calculator::new();
        calc.press_digit(1);
        calc.press_digit(2);
        calc.press_operator(BinaryOp::Sub);
        calc.press_digit(5);
        assert_eq!(calc.display(), "5");
        calc.calculate();
        assert_eq!(calc.display(), "7");
    }

    #[test]
    fn test_unary_error_keeps_pending_operator() {
        let mut calc = Calculator::new();
        calc.press_digit(4);
        calc.press_operator(BinaryOp::Add);
        calc.press_digit(1);
        calc.press_unary(UnaryFn::Ln);
        calc.press_operator(BinaryOp::Add);
        calc.press_digit(0);
        calc.press_unary(UnaryFn::Log10);
        assert_eq!(calc.display(), "Error");
        assert_eq!(calc.input(), "");
        assert_eq!(calc.pending_operator(), Some(BinaryOp::Add));
    }

    #[test]
    fn test_paren_makes_operand_unparseable() {
        let mut calc = Calculator::new();
        calc.press_paren(Paren::Open);
        calc.press_digit(2);
        assert_eq!(calc.display(), "(2");
        calc.press_unary(UnaryFn::Square);
        assert_eq!(calc.display(), "Error");
    }

    #[test]
    fn test_backspace_terminal_zero() {
        let mut calc = Calculator::new();
        calc.press_digit(4);
        calc.press_digit(2);
        calc.backspace();
        assert_eq!(calc.display(), "4");
        calc.backspace();
        assert_eq!(calc.input(), "0");
        calc.backspace();
        assert_eq!(calc.input(), "0");
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_backspace_on_empty_is_noop() {
        let mut calc = Calculator::new();
        calc.backspace();
        assert_eq!(calc.input(), "");
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_snapshot_reflects_pending() {
        let mut calc = Calculator::new();
        calc.press_digit(9);
        calc.press_operator(BinaryOp::Pow);
        let snap = calc.snapshot();
        assert_eq!(snap.accumulator, Some(9.0));
        assert_eq!(snap.pending_operator, Some(BinaryOp::Pow));
        assert!(snap.awaiting_operand);
        assert_eq!(snap.display, "9 ^");
        assert!(!snap.error);
    }
}
