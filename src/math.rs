//! Small numeric helpers shared by the distribution adapters.

/// Clamps `value` into `[min, max]`.
///
/// # Examples
/// ```
/// use u_roll::math::clamp;
/// assert_eq!(clamp(1.5, 0.0, 1.0), 1.0);
/// assert_eq!(clamp(-0.5, 0.0, 1.0), 0.0);
/// ```
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value <= min {
        min
    } else if value >= max {
        max
    } else {
        value
    }
}

/// Maps `x` from `[lower, upper]` onto `[0, 1]`.
pub fn normalize(x: f64, lower: f64, upper: f64) -> f64 {
    (x - lower) / (upper - lower)
}

/// Maps a normalized `y ∈ [0, 1]` back onto `[lower, upper]`.
pub fn scale(y: f64, lower: f64, upper: f64) -> f64 {
    lower + y * (upper - lower)
}

/// Smallest representable `f64` strictly greater than `x`.
///
/// NaN and `+∞` are returned unchanged.
///
/// # Examples
/// ```
/// use u_roll::math::next_up;
/// assert!(next_up(1.0) > 1.0);
/// assert_eq!(next_up(1.0), 1.0 + f64::EPSILON);
/// ```
pub fn next_up(x: f64) -> f64 {
    if x.is_nan() || x == f64::INFINITY {
        return x;
    }
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Largest representable `f64` strictly less than `x`.
///
/// NaN and `-∞` are returned unchanged.
pub fn next_down(x: f64) -> f64 {
    -next_up(-x)
}
