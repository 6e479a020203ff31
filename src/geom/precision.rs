//! Fixed-precision truncation used when writing label files.

/// Number of decimal places kept in label files.
pub const DECIMALS: i32 = 6;

/// Added before truncating so values like `0.2` that land a hair under the
/// decimal boundary in binary do not lose their last digit.
const UNDERFLOW_EPSILON: f64 = 1e-7;

/// Truncates toward zero to [`DECIMALS`] decimal places.
///
/// `truncate(0.1234567) == 0.123456`; nothing is ever rounded up.
pub fn truncate(value: f64) -> f64 {
    let factor = 10f64.powi(DECIMALS);
    ((value + UNDERFLOW_EPSILON) * factor).trunc() / factor
}

/// Formats an already truncated value with exactly [`DECIMALS`] digits.
pub fn format_fixed(value: f64) -> String {
    format!("{:.*}", DECIMALS as usize, value)
}
