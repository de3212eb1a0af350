/// Renders a transaction amount as the BR Code expects it: two decimal
/// places, dot separator, no grouping, no currency symbol.
///
/// Rounds half away from zero (`f64::round`), never truncates.
pub fn format_amount(amount: f64) -> String {
    let rounded = (amount * 100.0).round() / 100.0;
    format!("{:.2}", rounded)
}

/// The value for field 54, or `None` when the amount is absent or rounds
/// to zero or below (the field is optional and gets omitted).
pub fn amount_value(amount: Option<f64>) -> Option<String> {
    match amount {
        Some(v) if v.is_finite() && (v * 100.0).round() > 0.0 => Some(format_amount(v)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn always_two_fraction_digits() {
        assert_eq!(format_amount(100.5), "100.50");
        assert_eq!(format_amount(10.0), "10.00");
        assert_eq!(format_amount(0.1), "0.10");
    }

    #[test]
    fn rounds_instead_of_truncating() {
        assert_eq!(format_amount(1.999), "2.00");
        assert_eq!(format_amount(2.345_000_1), "2.35");
        assert_eq!(format_amount(0.125), "0.13");
    }

    #[test]
    fn large_amounts_have_no_grouping() {
        assert_eq!(format_amount(1234567.891), "1234567.89");
    }

    #[test]
    fn absent_or_non_positive_is_omitted() {
        assert_eq!(amount_value(None), None);
        assert_eq!(amount_value(Some(0.0)), None);
        assert_eq!(amount_value(Some(-3.0)), None);
        assert_eq!(amount_value(Some(f64::NAN)), None);
        assert_eq!(amount_value(Some(42.0)).as_deref(), Some("42.00"));
    }

    #[test]
    fn amount_rounding_to_zero_is_omitted() {
        assert_eq!(amount_value(Some(0.001)), None);
        assert_eq!(amount_value(Some(0.004_9)), None);
        assert_eq!(amount_value(Some(0.005)).as_deref(), Some("0.01"));
    }
}
