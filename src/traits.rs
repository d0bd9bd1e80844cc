//! Seams to the collaborators that own I/O.
//!
//! The planner core never fetches anything itself. Route geometry and the
//! truck stop catalog arrive through these traits as materialized, in-memory
//! values.

use std::convert::Infallible;
use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::polyline::{Coordinate, Polyline};

/// One candidate route returned by a directions service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteAlternative {
    /// Road distance as reported by the service.
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub geometry: Polyline,
}

/// Provides route alternatives between two points.
///
/// Alternatives are ordered by preference; the first one is the route the
/// planner uses. An empty list means no route exists.
pub trait DirectionsProvider {
    type Error: Error + Send + Sync + 'static;

    fn routes(
        &self,
        start: Coordinate,
        end: Coordinate,
        alternatives: u8,
    ) -> Result<Vec<RouteAlternative>, Self::Error>;
}

/// Provides the current truck stop catalog snapshot.
pub trait CatalogProvider {
    type Error: Error + Send + Sync + 'static;

    fn snapshot(&self) -> Result<Catalog, Self::Error>;
}

/// An already loaded catalog is its own provider.
impl CatalogProvider for Catalog {
    type Error = Infallible;

    fn snapshot(&self) -> Result<Catalog, Self::Error> {
        Ok(self.clone())
    }
}
