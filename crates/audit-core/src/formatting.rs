/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// A value that rounds to zero is printed without a sign.
///
/// # Examples
///
/// ```
/// use audit_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(-100.0, 2), "-100.00");
/// assert_eq!(format_number(-0.001, 1), "0.0");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let factor = 10_f64.powi(decimals as i32);
    let abs_value = value.abs();
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let grouped = group_thousands(&(rounded.trunc() as u64).to_string());

    let body = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", rounded.fract(), prec = decimals as usize);
        // "0.50" -> ".50"
        format!("{}{}", grouped, &frac_str[1..])
    };

    if value < 0.0 && rounded != 0.0 {
        format!("-{}", body)
    } else {
        body
    }
}

/// Format a whole vote count (or vote delta) with thousands separators.
///
/// ```
/// use audit_core::formatting::format_votes;
///
/// assert_eq!(format_votes(2_461_854), "2,461,854");
/// assert_eq!(format_votes(-19_958), "-19,958");
/// ```
pub fn format_votes(votes: i64) -> String {
    let grouped = group_thousands(&votes.unsigned_abs().to_string());
    if votes < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a `[0, 1]` share as a percentage with two decimals.
///
/// ```
/// use audit_core::formatting::format_share;
///
/// assert_eq!(format_share(0.493), "49.30%");
/// ```
pub fn format_share(share: f64) -> String {
    format!("{}%", format_number(share * 100.0, 2))
}

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && i % 3 == remainder {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_zero() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(0.0, 2), "0.00");
    }

    #[test]
    fn test_format_number_with_thousands() {
        assert_eq!(format_number(1_234_567.0, 0), "1,234,567");
    }

    #[test]
    fn test_format_number_negative_implied_drop() {
        assert_eq!(format_number(-12_345.678, 2), "-12,345.68");
    }

    #[test]
    fn test_format_number_negative_rounding_to_zero_has_no_sign() {
        assert_eq!(format_number(-0.004, 2), "0.00");
    }

    #[test]
    fn test_format_votes() {
        assert_eq!(format_votes(0), "0");
        assert_eq!(format_votes(999), "999");
        assert_eq!(format_votes(1_000), "1,000");
        assert_eq!(format_votes(-100), "-100");
        assert_eq!(format_votes(i64::MIN), "-9,223,372,036,854,775,808");
    }

    #[test]
    fn test_format_share() {
        assert_eq!(format_share(0.5), "50.00%");
        assert_eq!(format_share(0.0), "0.00%");
        assert_eq!(format_share(1.0), "100.00%");
    }
}
