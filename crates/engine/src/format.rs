//! Display formatting and numeric normalisation.
//!
//! The input buffer is shown verbatim while it fits the display; longer text
//! is re-rendered as a number. Exponents follow the printf convention
//! (`1.2346e+16`).

/// Longest buffer echoed verbatim.
pub const DISPLAY_WIDTH: usize = 15;

/// Shown in place of a number after a failed operation.
pub const ERROR_SENTINEL: &str = "Error";

const ELLIPSIS: &str = "...";
const SCI_PRECISION: usize = 4;
const GENERAL_SIGNIFICANT: usize = 8;
const SNAP_TOLERANCE: f64 = 1e-10;
const ROUND_DECIMALS: usize = 10;

/// Render an input buffer for the display.
pub fn format_display(buffer: &str) -> String {
    if buffer.is_empty() {
        return "0".to_string();
    }
    if buffer.chars().count() <= DISPLAY_WIDTH {
        return buffer.to_string();
    }

    match buffer.parse::<f64>() {
        Ok(num) => format_number(num),
        Err(_) => {
            let mut s: String = buffer.chars().take(DISPLAY_WIDTH).collect();
            s.push_str(ELLIPSIS);
            s
        }
    }
}

/// Render a value too long to echo: exponential for very large or very
/// small magnitudes, 8 significant digits otherwise.
pub fn format_number(num: f64) -> String {
    if !num.is_finite() {
        return non_finite(num);
    }
    let mag = num.abs();
    if mag > 1e12 || (mag > 0.0 && mag < 1e-4) {
        format_exponential(num, SCI_PRECISION)
    } else {
        format_general(num, GENERAL_SIGNIFICANT)
    }
}

/// `%.{precision}e`
pub fn format_exponential(num: f64, precision: usize) -> String {
    if !num.is_finite() {
        return non_finite(num);
    }
    let (mantissa, exp) = split_exponential(num, precision);
    with_exponent(&mantissa, exp)
}

/// `%.{significant}g`
pub fn format_general(num: f64, significant: usize) -> String {
    if !num.is_finite() {
        return non_finite(num);
    }
    let significant = significant.max(1);
    if num == 0.0 {
        return "0".to_string();
    }

    // The exponent is taken after rounding to the requested precision, so
    // 99999999.5 lands on 1e+08 rather than 99999999.
    let (mantissa, exp) = split_exponential(num, significant - 1);
    if exp < -4 || exp >= significant as i32 {
        with_exponent(strip_fraction_zeros(&mantissa), exp)
    } else {
        let decimals = (significant as i32 - 1 - exp) as usize;
        strip_fraction_zeros(&format!("{:.*}", decimals, num)).to_string()
    }
}

fn split_exponential(num: f64, precision: usize) -> (String, i32) {
    let s = format!("{:.*e}", precision, num);
    match s.split_once('e') {
        Some((mantissa, exp)) => (mantissa.to_string(), exp.parse().unwrap_or(0)),
        None => (s, 0),
    }
}

fn with_exponent(mantissa: &str, exp: i32) -> String {
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{}e{}{:02}", mantissa, sign, exp.abs())
}

fn strip_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

fn non_finite(num: f64) -> String {
    if num.is_nan() {
        "NaN".to_string()
    } else if num > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

/// Clean up a computed value before it is written back to the buffer:
/// tiny magnitudes become zero and float noise past ten decimals is removed.
pub fn normalize(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    if value.abs() < SNAP_TOLERANCE {
        return 0.0;
    }
    let rounded = round_decimals(value, ROUND_DECIMALS);
    if (value - rounded).abs() < SNAP_TOLERANCE {
        rounded
    } else {
        value
    }
}

fn round_decimals(value: f64, decimals: usize) -> f64 {
    // Decimal formatting rounds correctly; scaling by 1e10 would not for
    // large magnitudes.
    format!("{:.*}", decimals, value)
        .parse()
        .unwrap_or(value)
}

/// Text written into the input buffer for a computed value. Integral values
/// carry no fractional part.
pub fn number_to_buffer(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_buffers_echo() {
        assert_eq!(format_display(""), "0");
        assert_eq!(format_display("0."), "0.");
        assert_eq!(format_display("123456789012345"), "123456789012345");
        assert_eq!(format_display("(12"), "(12");
    }

    #[test]
    fn test_long_large_number_is_exponential() {
        assert_eq!(format_display("1234567890123456"), "1.2346e+15");
        assert_eq!(format_display("-9999999999999999"), "-1.0000e+16");
    }

    #[test]
    fn test_long_small_number_is_exponential() {
        assert_eq!(format_display("0.00001234567891"), "1.2346e-05");
    }

    #[test]
    fn test_long_moderate_number_is_general() {
        assert_eq!(format_display("3.141592653589793"), "3.1415927");
        assert_eq!(format_display("2.718281828459045"), "2.7182818");
        assert_eq!(format_display("123456789.1234567"), "1.2345679e+08");
        assert_eq!(format_display("0.3333333333333333"), "0.33333333");
    }

    #[test]
    fn test_long_unparseable_is_truncated() {
        assert_eq!(format_display("(((1234567890123"), "(((123456789012...");
    }

    #[test]
    fn test_general_strips_zeros() {
        assert_eq!(format_general(2.5, 8), "2.5");
        assert_eq!(format_general(100.0, 8), "100");
        assert_eq!(format_general(0.0001, 8), "0.0001");
        assert_eq!(format_general(99999999.5, 8), "1e+08");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(format_number(f64::INFINITY), "inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_number(f64::NAN), "NaN");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(1e-11), 0.0);
        assert_eq!(normalize(-3e-12), 0.0);
        assert_eq!(normalize(0.1 + 0.2), 0.3);
        assert_eq!(normalize(0.9999999999999999), 1.0);
        assert_eq!(normalize(1.5), 1.5);
        assert!(normalize(f64::NAN).is_nan());
        assert_eq!(normalize(1e300), 1e300);
    }

    #[test]
    fn test_number_to_buffer() {
        assert_eq!(number_to_buffer(4.0), "4");
        assert_eq!(number_to_buffer(-0.0), "0");
        assert_eq!(number_to_buffer(5.5), "5.5");
        assert_eq!(number_to_buffer(-12.25), "-12.25");
        assert_eq!(number_to_buffer(f64::NAN), "NaN");
    }
}
