//! Floored integer division and modulus.
//!
//! World coordinates are signed, so converting them into chunk and local coordinates
//! must round toward negative infinity. Truncating `/` and `%` would map world x = -1 to
//! local x = -1 in chunk 0 instead of local x = 15 in chunk -1.

/// Division rounded toward negative infinity.
///
/// # Examples
///
/// ```
/// use voxel_engine::core::floored::floor_div;
///
/// assert_eq!(floor_div(-1, 16), -1);
/// assert_eq!(floor_div(-17, 16), -2);
/// assert_eq!(floor_div(31, 16), 1);
/// ```
#[inline]
pub fn floor_div(value: i32, divisor: i32) -> i32 {
    value.div_euclid(divisor)
}

/// Modulus whose result is never negative for a positive divisor.
///
/// # Examples
///
/// ```
/// use voxel_engine::core::floored::floor_mod;
///
/// assert_eq!(floor_mod(-1, 16), 15);
/// assert_eq!(floor_mod(-17, 16), 15);
/// assert_eq!(floor_mod(16, 16), 0);
/// ```
#[inline]
pub fn floor_mod(value: i32, divisor: i32) -> i32 {
    value.rem_euclid(divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_values_round_down() {
        assert_eq!(floor_mod(-1, 16), 15);
        assert_eq!(floor_div(-1, 16), -1);
        assert_eq!(floor_mod(-17, 16), 15);
        assert_eq!(floor_div(-17, 16), -2);
        assert_eq!(floor_mod(-16, 16), 0);
        assert_eq!(floor_div(-16, 16), -1);
    }

    #[test]
    fn recomposes_original_value() {
        for value in -100..100 {
            assert_eq!(floor_div(value, 16) * 16 + floor_mod(value, 16), value);
            assert!((0..16).contains(&floor_mod(value, 16)));
        }
    }
}
