use geo_types::Point;

/// Mean Earth radius used for all geodesic computations.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Computes the great-circle distance between two WGS84 coordinates.
///
/// # Parameters
/// - `a`: First coordinate, `x` = longitude and `y` = latitude in degrees.
/// - `b`: Second coordinate in the same convention.
///
/// # Returns
/// The distance in meters along a sphere of radius [`EARTH_RADIUS_M`],
/// computed with the spherical law of cosines.
pub fn great_circle_distance(a: Point<f64>, b: Point<f64>) -> f64 {
    let lat_a = a.y().to_radians();
    let lat_b = b.y().to_radians();
    let lon_delta = (a.x() - b.x()).to_radians();
    let central = lat_a.sin() * lat_b.sin() + lat_a.cos() * lat_b.cos() * lon_delta.cos();
    central.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_M
}
