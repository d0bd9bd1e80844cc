//! Route fuel planning: directions, catalog, annotation and optimization
//! wired together for one origin/destination request.

use std::error::Error;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::annotate::annotate;
use crate::config::PlannerConfig;
use crate::optimizer::{FuelPlan, OptimizeError, optimize};
use crate::polyline::Coordinate;
use crate::traits::{CatalogProvider, DirectionsProvider};

type BoxError = Box<dyn Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum PlanError {
    /// The directions service found no route at all. Distinct from a route
    /// that exists but cannot be fueled, which is [`FuelPlan::Infeasible`].
    #[error("no route found between the requested points")]
    NoRoute,
    #[error("directions provider failed")]
    Directions(#[source] BoxError),
    #[error("catalog provider failed")]
    Catalog(#[source] BoxError),
    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub plan: FuelPlan,
}

pub struct FuelPlanner<D, C> {
    directions: D,
    catalog: C,
    config: PlannerConfig,
}

impl<D, C> FuelPlanner<D, C>
where
    D: DirectionsProvider,
    C: CatalogProvider,
{
    pub fn new(directions: D, catalog: C, config: PlannerConfig) -> Self {
        Self {
            directions,
            catalog,
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan refueling along the preferred route from `start` to `end`.
    pub fn plan(&self, start: Coordinate, end: Coordinate) -> Result<RoutePlan, PlanError> {
        let started = Instant::now();

        let routes = self
            .directions
            .routes(start, end, self.config.route_alternatives)
            .map_err(|err| {
                warn!(error = %err, "directions lookup failed");
                PlanError::Directions(Box::new(err))
            })?;
        debug!(alternatives = routes.len(), "directions received");
        let route = routes.into_iter().next().ok_or(PlanError::NoRoute)?;

        let catalog = self.catalog.snapshot().map_err(|err| {
            warn!(error = %err, "catalog snapshot failed");
            PlanError::Catalog(Box::new(err))
        })?;

        let waypoints = annotate(route.geometry.points(), &catalog, &self.config.annotate_options());
        let plan = optimize(waypoints, &self.config.fuel_options())?;

        info!(
            feasible = plan.is_feasible(),
            total_cost = plan.total_cost(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "route planned"
        );

        Ok(RoutePlan {
            distance_meters: route.distance_meters,
            duration_seconds: route.duration_seconds,
            plan,
        })
    }

    /// Plan independent requests in parallel, one task per request. Results
    /// keep the order of `requests`.
    pub fn plan_many(&self, requests: &[(Coordinate, Coordinate)]) -> Vec<Result<RoutePlan, PlanError>>
    where
        D: Sync,
        C: Sync,
    {
        requests
            .par_iter()
            .map(|&(start, end)| self.plan(start, end))
            .collect()
    }
}
