//! Rounding rules for reported values

/// Rounds to two decimals, ties to even on the scaled value.
///
/// ```
/// use damcascade::core::round2;
///
/// assert_eq!(round2(3.535605072011715), 3.54);
/// assert_eq!(round2(0.125), 0.12);
/// ```
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Converts a volume to the integer unit used in reports, truncating
/// toward zero. Returns `None` for non-finite values.
pub fn whole_volume(value: f64) -> Option<i64> {
    if value.is_finite() {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(8.535605), 8.54);
        assert_eq!(round2(-1.005), -1.0);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn test_whole_volume_truncates() {
        assert_eq!(whole_volume(150.9), Some(150));
        assert_eq!(whole_volume(-0.5), Some(0));
        assert_eq!(whole_volume(f64::INFINITY), None);
    }
}
