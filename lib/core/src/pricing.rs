//! Price arithmetic shared by the matcher, the fit decoder and the ledger

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Savings of buying at `target_price` instead of `source_price`:
/// `(amount, percent of source price)`
pub fn savings(source_price: f64, target_price: f64) -> (f64, f64) {
    let amount = source_price - target_price;
    let percent = if source_price > 0.0 { amount / source_price * 100.0 } else { 0.0 };
    (amount, percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings() {
        let (amount, percent) = savings(15.99, 11.99);
        assert!((amount - 4.0).abs() < 1e-9);
        assert_eq!(round_to(percent, 1), 25.0);
        assert_eq!(savings(0.0, 1.0).1, 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(4.000000000000002, 2), 4.0);
        assert_eq!(round_to(25.015634, 1), 25.0);
        assert_eq!(round_to(0.876, 2), 0.88);
        assert_eq!(round_to(-1.04, 1), -1.0);
    }
}
