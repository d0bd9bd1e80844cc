//! Great-circle distance between route coordinates.
//!
//! Road distance is approximated as a chain of haversine segments, which
//! ignores curvature of the road itself but is cheap enough to run once per
//! route point and once per point/catalog pair.

use crate::polyline::Coordinate;

/// Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometer to statute mile conversion factor.
pub const MILES_PER_KM: f64 = 0.621371;

/// Earth radius in miles, used for the latitude-band bound.
pub(crate) const EARTH_RADIUS_MILES: f64 = EARTH_RADIUS_KM * MILES_PER_KM;

/// Calculate haversine distance between two points in kilometers.
pub fn distance_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    // Clamp guards asin against round-off just above 1 for antipodal points.
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Calculate haversine distance between two points in miles.
pub fn distance_miles(from: Coordinate, to: Coordinate) -> f64 {
    distance_km(from, to) * MILES_PER_KM
}

/// Lower bound on the great-circle distance, in miles, from the latitude
/// difference alone.
pub(crate) fn meridian_gap_miles(from: Coordinate, to: Coordinate) -> f64 {
    (to.lat - from.lat).abs().to_radians() * EARTH_RADIUS_MILES
}
