//! Domain-checked arithmetic behind the calculator keys.

use crate::event::{AngleMode, BinaryOp, UnaryFn};
use num_bigint::BigUint;
use num_traits::One;

/// Largest argument for which `x!` is computed exactly. Beyond it the value
/// no longer fits a double.
pub const MAX_EXACT_FACTORIAL: u32 = 170;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("{function}: {value} is outside the domain")]
    Domain { function: &'static str, value: f64 },

    #[error("{function}: result out of range")]
    Overflow { function: &'static str },

    #[error("invalid number: {0:?}")]
    InvalidNumber(String),
}

pub type CalcResult<T> = Result<T, CalcError>;

/// Result of a unary key: factorials of whole numbers stay exact.
#[derive(Debug, Clone, PartialEq)]
pub enum UnaryValue {
    Float(f64),
    Exact(BigUint),
}

/// Parse operand text from the input buffer.
pub fn parse_operand(text: &str) -> CalcResult<f64> {
    text.parse::<f64>()
        .map_err(|_| CalcError::InvalidNumber(text.to_string()))
}

pub fn apply_binary(op: BinaryOp, lhs: f64, rhs: f64) -> CalcResult<f64> {
    let value = match op {
        BinaryOp::Add => lhs + rhs,
        BinaryOp::Sub => lhs - rhs,
        BinaryOp::Mul => lhs * rhs,
        BinaryOp::Div => {
            if rhs == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            lhs / rhs
        }
        // Truncated remainder: the sign follows the left operand.
        BinaryOp::Mod => {
            if rhs == 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            lhs % rhs
        }
        BinaryOp::Pow => {
            if lhs == 0.0 && rhs < 0.0 {
                return Err(CalcError::DivisionByZero);
            }
            let value = lhs.powf(rhs);
            if value.is_infinite() && lhs.is_finite() && rhs.is_finite() {
                return Err(CalcError::Overflow { function: "pow" });
            }
            // NaN (negative base, fractional exponent) is left for the
            // display to show.
            value
        }
    };
    Ok(value)
}

pub fn apply_unary(fun: UnaryFn, value: f64, mode: AngleMode) -> CalcResult<UnaryValue> {
    let domain = || CalcError::Domain {
        function: fun.name(),
        value,
    };

    let angle = if fun.is_trig() && mode == AngleMode::Degrees {
        value.to_radians()
    } else {
        value
    };

    let result = match fun {
        UnaryFn::Sin => angle.sin(),
        UnaryFn::Cos => angle.cos(),
        UnaryFn::Tan => angle.tan(),
        UnaryFn::Asin | UnaryFn::Acos => {
            if !(-1.0..=1.0).contains(&value) {
                return Err(domain());
            }
            let rad = if fun == UnaryFn::Asin {
                value.asin()
            } else {
                value.acos()
            };
            to_mode(rad, mode)
        }
        UnaryFn::Atan => to_mode(value.atan(), mode),
        UnaryFn::Log10 | UnaryFn::Ln => {
            if !(value > 0.0) {
                return Err(domain());
            }
            if fun == UnaryFn::Log10 {
                value.log10()
            } else {
                value.ln()
            }
        }
        UnaryFn::Sqrt => {
            if !(value >= 0.0) {
                return Err(domain());
            }
            value.sqrt()
        }
        UnaryFn::Square => value.powi(2),
        UnaryFn::Cube => value.powi(3),
        UnaryFn::Pow10 => 10f64.powf(value),
        UnaryFn::Reciprocal => {
            if value == 0.0 {
                return Err(domain());
            }
            1.0 / value
        }
        UnaryFn::Factorial => return factorial(value),
        UnaryFn::Abs => value.abs(),
    };

    if result.is_infinite() {
        return Err(CalcError::Overflow {
            function: fun.name(),
        });
    }
    if result.is_nan() {
        return Err(domain());
    }
    Ok(UnaryValue::Float(result))
}

fn to_mode(radians: f64, mode: AngleMode) -> f64 {
    match mode {
        AngleMode::Degrees => radians.to_degrees(),
        AngleMode::Radians => radians,
    }
}

/// `x!`: exact for whole numbers, `Γ(x + 1)` for everything else.
pub fn factorial(value: f64) -> CalcResult<UnaryValue> {
    if value >= 0.0 && value.fract() == 0.0 {
        if value > MAX_EXACT_FACTORIAL as f64 {
            return Err(CalcError::Overflow {
                function: "factorial",
            });
        }
        return Ok(UnaryValue::Exact(exact_factorial(value as u32)));
    }

    let arg = value + 1.0;
    // Γ has poles at 0, -1, -2, ...
    if arg.is_nan() || (arg <= 0.0 && arg.fract() == 0.0) {
        return Err(CalcError::Domain {
            function: "factorial",
            value,
        });
    }
    let result = libm::tgamma(arg);
    if result.is_infinite() {
        return Err(CalcError::Overflow {
            function: "factorial",
        });
    }
    if result.is_nan() {
        return Err(CalcError::Domain {
            function: "factorial",
            value,
        });
    }
    Ok(UnaryValue::Float(result))
}

pub fn exact_factorial(n: u32) -> BigUint {
    (2..=n).fold(BigUint::one(), |acc, k| acc * k)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(v: CalcResult<UnaryValue>) -> f64 {
        match v {
            Ok(UnaryValue::Float(f)) => f,
            other => panic!("expected float, got {:?}", other),
        }
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(
            apply_binary(BinaryOp::Div, 8.0, 0.0),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(
            apply_binary(BinaryOp::Mod, 8.0, 0.0),
            Err(CalcError::DivisionByZero)
        );
        assert_eq!(apply_binary(BinaryOp::Div, 9.0, 3.0), Ok(3.0));
    }

    #[test]
    fn test_mod_sign_follows_left_operand() {
        assert_eq!(apply_binary(BinaryOp::Mod, -7.0, 3.0), Ok(-1.0));
        assert_eq!(apply_binary(BinaryOp::Mod, 7.0, -3.0), Ok(1.0));
    }

    #[test]
    fn test_pow_nan_passes_through() {
        assert!(apply_binary(BinaryOp::Pow, -8.0, 0.5).unwrap().is_nan());
        assert_eq!(apply_binary(BinaryOp::Pow, 2.0, 10.0), Ok(1024.0));
        assert_eq!(
            apply_binary(BinaryOp::Pow, 10.0, 400.0),
            Err(CalcError::Overflow { function: "pow" })
        );
    }

    #[test]
    fn test_trig_degrees() {
        let s = float(apply_unary(UnaryFn::Sin, 90.0, AngleMode::Degrees));
        assert!((s - 1.0).abs() < 1e-12);
        let a = float(apply_unary(UnaryFn::Asin, 1.0, AngleMode::Degrees));
        assert!((a - 90.0).abs() < 1e-9);
        let r = float(apply_unary(UnaryFn::Asin, 1.0, AngleMode::Radians));
        assert!((r - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_domain_errors() {
        let deg = AngleMode::Degrees;
        assert!(matches!(
            apply_unary(UnaryFn::Asin, 2.0, deg),
            Err(CalcError::Domain { function: "asin", .. })
        ));
        assert!(matches!(
            apply_unary(UnaryFn::Acos, -1.5, deg),
            Err(CalcError::Domain { .. })
        ));
        assert!(matches!(
            apply_unary(UnaryFn::Log10, 0.0, deg),
            Err(CalcError::Domain { .. })
        ));
        assert!(matches!(
            apply_unary(UnaryFn::Ln, -1.0, deg),
            Err(CalcError::Domain { .. })
        ));
        assert!(matches!(
            apply_unary(UnaryFn::Sqrt, -4.0, deg),
            Err(CalcError::Domain { .. })
        ));
        assert!(matches!(
            apply_unary(UnaryFn::Reciprocal, 0.0, deg),
            Err(CalcError::Domain { .. })
        ));
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            apply_unary(UnaryFn::Pow10, 400.0, AngleMode::Radians),
            Err(CalcError::Overflow { function: "pow10" })
        );
        assert_eq!(
            apply_unary(UnaryFn::Square, 1e200, AngleMode::Radians),
            Err(CalcError::Overflow { function: "square" })
        );
    }

    #[test]
    fn test_factorial_exact() {
        assert_eq!(factorial(5.0), Ok(UnaryValue::Exact(BigUint::from(120u32))));
        assert_eq!(factorial(0.0), Ok(UnaryValue::Exact(BigUint::one())));
        assert_eq!(
            exact_factorial(25).to_string(),
            "15511210043330985984000000"
        );
        assert_eq!(
            factorial(171.0),
            Err(CalcError::Overflow {
                function: "factorial"
            })
        );
    }

    #[test]
    fn test_factorial_gamma_fallback() {
        // 0.5! = Γ(1.5) = √π / 2
        let half = float(factorial(0.5));
        assert!((half - std::f64::consts::PI.sqrt() / 2.0).abs() < 1e-12);
        // (-0.5)! = Γ(0.5) = √π
        let neg_half = float(factorial(-0.5));
        assert!((neg_half - std::f64::consts::PI.sqrt()).abs() < 1e-12);
        assert!(matches!(factorial(-1.0), Err(CalcError::Domain { .. })));
        assert!(matches!(factorial(-3.0), Err(CalcError::Domain { .. })));
    }

    #[test]
    fn test_parse_operand() {
        assert_eq!(parse_operand("3.5"), Ok(3.5));
        assert_eq!(
            parse_operand("(5"),
            Err(CalcError::InvalidNumber("(5".into()))
        );
    }
}
