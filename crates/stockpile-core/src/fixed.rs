use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Every stock quantity, rate, threshold and elapsed-time value in the
/// economy is a `Fixed64`, so repeated ticks are bit-for-bit reproducible.
pub type Fixed64 = I32F32;

/// Convert an f64 to Fixed64. Use only for configuration, never in the tick.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display and logging.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Checked division for Fixed64 that returns None on zero divisor.
#[inline]
pub fn checked_div_64(a: Fixed64, b: Fixed64) -> Option<Fixed64> {
    a.checked_div(b)
}

/// `numerator / denominator`, or zero when the denominator is zero.
#[inline]
pub fn ratio(numerator: Fixed64, denominator: Fixed64) -> Fixed64 {
    checked_div_64(numerator, denominator).unwrap_or(Fixed64::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed64_basic_arithmetic() {
        let a = f64_to_fixed64(1.5);
        let b = f64_to_fixed64(2.0);
        assert_eq!(fixed64_to_f64(a + b), 3.5);
    }

    #[test]
    fn fixed64_rate_composition_is_exact() {
        let base = f64_to_fixed64(10.0);
        let bonus = f64_to_fixed64(1.5);
        let efficiency = f64_to_fixed64(0.5);
        assert_eq!(base * bonus * efficiency, f64_to_fixed64(7.5));
    }

    #[test]
    fn fixed64_checked_div_by_zero() {
        let a = f64_to_fixed64(1.0);
        assert!(checked_div_64(a, Fixed64::ZERO).is_none());
    }

    #[test]
    fn ratio_of_zero_denominator_is_zero() {
        assert_eq!(ratio(f64_to_fixed64(5.0), Fixed64::ZERO), Fixed64::ZERO);
        assert_eq!(
            ratio(f64_to_fixed64(25.0), f64_to_fixed64(100.0)),
            f64_to_fixed64(0.25)
        );
    }

    #[test]
    fn fixed64_determinism() {
        let a = f64_to_fixed64(1.0 / 3.0);
        let b = f64_to_fixed64(1.0 / 3.0);
        assert_eq!(a, b);
        assert_eq!(a * f64_to_fixed64(3.0), b * f64_to_fixed64(3.0));
    }
}
