//! Display formatting for prices and percentages (en-US grouping, EUR).

/// Insert `,` thousands separators into a string of ASCII digits.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a whole-euro amount, e.g. `€1,250,000` or `-€3,000`.
///
/// Fractions are rounded away; non-finite amounts format as `€0`.
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount.round() } else { 0.0 };
    let sign = if amount < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", amount.abs());
    format!("{sign}€{}", group_thousands(&digits))
}

/// Format a number with grouping and up to three fraction digits.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    if frac.is_empty() {
        format!("{sign}{}", group_thousands(int_part))
    } else {
        format!("{sign}{}.{frac}", group_thousands(int_part))
    }
}

/// Format a percentage with one decimal, e.g. `36.4%`. Non-finite values
/// format as `0.0%`.
pub fn format_percentage(value: f64) -> String {
    if !value.is_finite() {
        return "0.0%".to_string();
    }
    format!("{value:.1}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_grouping() {
        assert_eq!(format_currency(1_250_000.0), "€1,250,000");
        assert_eq!(format_currency(999.0), "€999");
        assert_eq!(format_currency(0.0), "€0");
        assert_eq!(format_currency(1000.4), "€1,000");
    }

    #[test]
    fn test_currency_negative_and_non_finite() {
        assert_eq!(format_currency(-3_000.0), "-€3,000");
        assert_eq!(format_currency(f64::NAN), "€0");
    }

    #[test]
    fn test_number() {
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(85.5), "85.5");
        assert_eq!(format_number(-1000.25), "-1,000.25");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(format_percentage(36.3636), "36.4%");
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage(f64::INFINITY), "0.0%");
        assert_eq!(format_percentage(f64::NAN), "0.0%");
    }
}
