// the collection of small numeric helpers shared by the symbolic engine and the generators
use crate::errors::DomainError;

/// `num_values` evenly spaced points from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, num_values: usize) -> Vec<f64> {
    match num_values {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num_values - 1) as f64;
            (0..num_values)
                .map(|i| if i == num_values - 1 { end } else { start + i as f64 * step })
                .collect()
        }
    }
}

/// Central difference `(f(x + h) - f(x - h)) / 2h`.
pub fn central_difference<F>(f: F, x: f64, h: f64) -> Result<f64, DomainError>
where
    F: Fn(f64) -> Result<f64, DomainError>,
{
    let forward = f(x + h)?;
    let backward = f(x - h)?;
    Ok((forward - backward) / (2.0 * h))
}

/// Rounds to a fixed number of decimal places.
pub fn round_to_decimals(value: f64, decimals: i32) -> f64 {
    let rounded = if decimals >= 0 {
        let factor = 10f64.powi(decimals);
        (value * factor).round() / factor
    } else {
        // whole tens, hundreds, ...: keep the factor an exact integer
        let factor = 10f64.powi(-decimals);
        (value / factor).round() * factor
    };
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Rounds to `digits` significant digits.
pub fn round_to_significant(value: f64, digits: u32) -> f64 {
    if value == 0.0 || !value.is_finite() {
        return value;
    }
    let magnitude = value.abs().log10().floor() as i32;
    round_to_decimals(value, digits as i32 - 1 - magnitude)
}

/// Formats with `digits` significant digits, trailing zeros removed.
pub fn format_significant(value: f64, digits: u32) -> String {
    let rounded = round_to_significant(value, digits);
    if rounded == 0.0 {
        return "0".to_string();
    }
    let magnitude = rounded.abs().log10().floor() as i32;
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    trim_zeros(format!("{:.*}", decimals, rounded))
}

/// Formats with exactly `decimals` places, as the worksheets print probabilities and roots.
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let rounded = round_to_decimals(value, decimals as i32);
    format!("{:.*}", decimals, rounded)
}

fn trim_zeros(s: String) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace() {
        let xs = linspace(0.0, 1.0, 5);
        assert_eq!(xs, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(2.0, 3.0, 1), vec![2.0]);
    }

    #[test]
    fn test_central_difference() {
        let d = central_difference(|x| Ok(x * x * x), 2.0, 1e-5).unwrap();
        assert_relative_eq!(d, 12.0, epsilon = 1e-6);
    }

    #[test]
    fn test_significant_digits() {
        assert_eq!(format_significant(123.456789, 6), "123.457");
        assert_eq!(format_significant(0.000123456, 3), "0.000123");
        assert_eq!(format_significant(2.5, 6), "2.5");
        assert_eq!(format_significant(1234567.0, 3), "1230000");
        assert_eq!(format_significant(0.0, 6), "0");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(0.4, 2), "0.40");
        assert_eq!(format_decimal(-0.04, 1), "0.0");
        assert_eq!(format_decimal(1.25, 1), "1.3");
    }
}
