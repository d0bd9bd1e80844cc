//! fuel-planner
//!
//! Cheapest refueling plan for a truck along a route: annotate the route
//! polyline with nearby truck stops, then greedily decide how much fuel to
//! buy at each one without ever running the tank dry.

pub mod haversine;
pub mod polyline;
pub mod catalog;
pub mod waypoint;
pub mod annotate;
pub mod optimizer;
pub mod traits;
pub mod osrm;
pub mod config;
pub mod planner;

pub use annotate::{AnnotateOptions, annotate};
pub use catalog::{Catalog, CatalogError, TruckStopId, TruckStopRecord};
pub use optimizer::{FuelGap, FuelOptions, FuelPlan, OptimizeError, optimize};
pub use planner::{FuelPlanner, PlanError, RoutePlan};
pub use polyline::{Coordinate, Polyline};
pub use waypoint::{CheaperAhead, MatchedStop, Purchase, Waypoint};
