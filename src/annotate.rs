//! Route annotation: cumulative distance and truck stop matching.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::haversine::distance_miles;
use crate::polyline::Coordinate;
use crate::waypoint::{MatchedStop, Waypoint};

/// Default proximity threshold for matching a route point to a truck stop.
pub const DEFAULT_PROXIMITY_THRESHOLD_MILES: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotateOptions {
    /// A route point within this many miles of a truck stop is a station.
    pub proximity_threshold_miles: f64,
}

impl Default for AnnotateOptions {
    fn default() -> Self {
        Self {
            proximity_threshold_miles: DEFAULT_PROXIMITY_THRESHOLD_MILES,
        }
    }
}

/// Annotate every route point with cumulative distance and, when a catalog
/// entry lies within the proximity threshold, the matched truck stop.
///
/// Matching is first-match in catalog order (see [`Catalog::first_within`]).
/// Distance accumulates between consecutive route points, not between
/// stations, and starts at 0 on the first point.
pub fn annotate(route: &[Coordinate], catalog: &Catalog, options: &AnnotateOptions) -> Vec<Waypoint> {
    let started = Instant::now();
    let mut waypoints = Vec::with_capacity(route.len());
    let mut cumulative = 0.0;
    let mut previous: Option<Coordinate> = None;

    for (index, &coordinate) in route.iter().enumerate() {
        if let Some(prev) = previous {
            cumulative += distance_miles(prev, coordinate);
        }
        previous = Some(coordinate);

        let waypoint = match catalog.first_within(coordinate, options.proximity_threshold_miles) {
            Some(record) => Waypoint::station(index, coordinate, cumulative, MatchedStop::from(record)),
            None => Waypoint::plain(index, coordinate, cumulative),
        };
        waypoints.push(waypoint);
    }

    debug!(
        points = route.len(),
        catalog = catalog.len(),
        stations = waypoints.iter().filter(|w| w.is_truck_stop()).count(),
        total_miles = cumulative,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "annotated route"
    );

    waypoints
}
