//! Longitude periodicity helpers.

use num::Float;

fn lit<T: Float>(v: f64) -> T {
    T::from(v).unwrap_or_else(T::nan)
}

/// Wraps a longitude into `[-180, 180)`.
///
/// ```rust
/// use climops_core::longitude::wrap_lon;
///
/// assert_eq!(wrap_lon(190.0), -170.0);
/// assert_eq!(wrap_lon(180.0), -180.0);
/// assert_eq!(wrap_lon(-540.0), -180.0);
/// ```
pub fn wrap_lon<T: Float>(x: T) -> T {
    let half = lit::<T>(180.0);
    let full = lit::<T>(360.0);
    let mut r = (x + half) % full;
    if r < T::zero() {
        r = r + full;
    }
    // Adding the period to a tiny negative remainder can round up to a full period
    if r >= full {
        r = r - full;
    }
    r - half
}

/// Shortest distance between two longitudes on a 360 degree ring.
///
/// ```rust
/// use climops_core::longitude::lon_distance;
///
/// assert_eq!(lon_distance(-170.0, 170.0), 20.0);
/// ```
pub fn lon_distance<T: Float>(a: T, b: T) -> T {
    lon_distance_with_period(a, b, lit(360.0))
}

/// Shortest distance between `a` and `b` on a ring of circumference `period`.
///
/// The result lies in `[0, period / 2]` and is symmetric in its arguments.
pub fn lon_distance_with_period<T: Float>(a: T, b: T, period: T) -> T {
    let d = (a - b).abs() % period;
    d.min(period - d)
}
