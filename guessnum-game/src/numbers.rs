//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Round a f64 and clamp it to the u32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(0.0, max).round();
    cast::<f64, u32>(clamped).unwrap_or(0)
}

/// Round to one decimal place, returning 0.0 for non-finite values.
#[must_use]
pub fn round_to_tenths(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round() / 10.0
}

/// Integer percentage of `part / whole`, rounded half away from zero.
#[must_use]
pub fn percent(part: u32, whole: u32) -> u32 {
    if whole == 0 {
        return 0;
    }
    round_f64_to_u32(f64::from(part) / f64::from(whole) * 100.0)
}

/// Mean of `total / count` rounded to tenths; zero when `count` is zero.
#[must_use]
pub fn mean_tenths(total: u32, count: u32) -> f64 {
    if count == 0 {
        return 0.0;
    }
    round_to_tenths(f64::from(total) / f64::from(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f64_to_u32(1.6), 2);
        assert_eq!(round_f64_to_u32(f64::NAN), 0);
        assert_eq!(round_f64_to_u32(-3.0), 0);
        assert_eq!(round_f64_to_u32(f64::from(u32::MAX) * 2.0), u32::MAX);
    }

    #[test]
    fn percent_rounds_and_handles_zero() {
        assert_eq!(percent(0, 0), 0);
        assert_eq!(percent(2, 3), 67);
        assert_eq!(percent(1, 8), 13);
        assert_eq!(percent(10, 10), 100);
    }

    #[test]
    fn mean_rounds_to_tenths() {
        assert!((mean_tenths(10, 3) - 3.3).abs() < f64::EPSILON);
        assert!((mean_tenths(20, 3) - 6.7).abs() < f64::EPSILON);
        assert!(mean_tenths(5, 0).abs() < f64::EPSILON);
        assert!(round_to_tenths(f64::INFINITY).abs() < f64::EPSILON);
    }
}
