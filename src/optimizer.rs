//! Refueling optimizer (greedy, cheapest-price-ahead).
//!
//! Works on the stations of an annotated route in two passes:
//!
//! 1. A reverse pass with a monotonic stack finds, for every station, the
//!    nearest later station with a strictly lower price.
//! 2. A forward simulation starts with a full tank and, at each station,
//!    either buys just enough to reach the next cheaper station or, when none
//!    is reachable, fills the tank at the locally best price.
//!
//! For a single linear route with continuous purchases and a fixed
//! consumption rate this greedy plan is minimal in cost.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::TruckStopId;
use crate::waypoint::{CheaperAhead, Purchase, Waypoint};

pub const DEFAULT_TANK_CAPACITY_GALLONS: f64 = 50.0;
pub const DEFAULT_MILES_PER_GALLON: f64 = 10.0;

/// Float round-off allowance when comparing fuel levels.
const FUEL_TOLERANCE_GALLONS: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelOptions {
    pub tank_capacity_gallons: f64,
    pub miles_per_gallon: f64,
}

impl Default for FuelOptions {
    fn default() -> Self {
        Self {
            tank_capacity_gallons: DEFAULT_TANK_CAPACITY_GALLONS,
            miles_per_gallon: DEFAULT_MILES_PER_GALLON,
        }
    }
}

impl FuelOptions {
    pub fn new(tank_capacity_gallons: f64, miles_per_gallon: f64) -> Self {
        Self {
            tank_capacity_gallons,
            miles_per_gallon,
        }
    }

    /// Distance coverable on a full tank.
    pub fn range_miles(&self) -> f64 {
        self.tank_capacity_gallons * self.miles_per_gallon
    }

    fn validate(&self) -> Result<(), OptimizeError> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        if positive(self.tank_capacity_gallons) && positive(self.miles_per_gallon) {
            Ok(())
        } else {
            Err(OptimizeError::InvalidOptions {
                tank_capacity_gallons: self.tank_capacity_gallons,
                miles_per_gallon: self.miles_per_gallon,
            })
        }
    }
}

/// Data-integrity faults detected before optimization starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptimizeError {
    #[error("tank capacity {tank_capacity_gallons} gal and consumption {miles_per_gallon} mpg must be positive")]
    InvalidOptions {
        tank_capacity_gallons: f64,
        miles_per_gallon: f64,
    },
    #[error("waypoint at position {position} is malformed: {reason}")]
    MalformedSequence { position: usize, reason: &'static str },
    #[error("truck stop {stop} matched at waypoint {waypoint} has no price")]
    MissingPrice { waypoint: usize, stop: TruckStopId },
    #[error("truck stop {stop} matched at waypoint {waypoint} has invalid price {price}")]
    InvalidPrice {
        waypoint: usize,
        stop: TruckStopId,
        price: f64,
    },
}

/// First leg of the route that cannot be driven on one tank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelGap {
    /// Cumulative distance of the last fuel source (origin or station).
    pub from_miles: f64,
    pub to_miles: f64,
    /// Waypoint index of the station that cannot be reached, or `None` when
    /// the destination is the unreachable point.
    pub unreachable: Option<usize>,
    pub shortfall_gallons: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FuelPlan {
    Optimized {
        waypoints: Vec<Waypoint>,
        total_cost: f64,
    },
    /// No plan exists. Annotations are kept; purchases and cost are withheld.
    Infeasible { waypoints: Vec<Waypoint>, gap: FuelGap },
}

impl FuelPlan {
    pub fn waypoints(&self) -> &[Waypoint] {
        match self {
            Self::Optimized { waypoints, .. } | Self::Infeasible { waypoints, .. } => waypoints,
        }
    }

    pub fn into_waypoints(self) -> Vec<Waypoint> {
        match self {
            Self::Optimized { waypoints, .. } | Self::Infeasible { waypoints, .. } => waypoints,
        }
    }

    pub fn total_cost(&self) -> Option<f64> {
        match self {
            Self::Optimized { total_cost, .. } => Some(*total_cost),
            Self::Infeasible { .. } => None,
        }
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, Self::Optimized { .. })
    }
}

/// Price and position of one station, in station-list order.
#[derive(Debug, Clone, Copy)]
struct StationView {
    waypoint: usize,
    distance: f64,
    price: f64,
}

/// Decide fuel purchases along an annotated route.
///
/// Returns `Err` only for data-integrity faults. An infeasible route is a
/// normal outcome, reported as [`FuelPlan::Infeasible`].
pub fn optimize(mut waypoints: Vec<Waypoint>, options: &FuelOptions) -> Result<FuelPlan, OptimizeError> {
    let started = Instant::now();
    options.validate()?;
    validate_sequence(&waypoints)?;

    let stations = collect_stations(&waypoints)?;
    let prices: Vec<f64> = stations.iter().map(|station| station.price).collect();
    let cheaper = next_cheaper(&prices);

    for (station, next) in stations.iter().zip(&cheaper) {
        if let Some(point) = waypoints[station.waypoint].as_station_mut() {
            point.next_cheaper = match next {
                Some(slot) => CheaperAhead::Station(stations[*slot].waypoint),
                None => CheaperAhead::Absent,
            };
            point.purchase = None;
        }
    }

    let route_end = waypoints.last().map_or(0.0, Waypoint::cumulative_distance_miles);

    match simulate(&stations, &cheaper, route_end, options) {
        Ok((purchases, total_cost)) => {
            for (station, purchase) in stations.iter().zip(purchases) {
                if let Some(point) = waypoints[station.waypoint].as_station_mut() {
                    point.purchase = Some(purchase);
                }
            }
            info!(
                stations = stations.len(),
                total_cost,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "fuel plan optimized"
            );
            Ok(FuelPlan::Optimized { waypoints, total_cost })
        }
        Err(gap) => {
            warn!(
                stations = stations.len(),
                from_miles = gap.from_miles,
                to_miles = gap.to_miles,
                shortfall_gallons = gap.shortfall_gallons,
                "not enough truck stops on the route"
            );
            Ok(FuelPlan::Infeasible { waypoints, gap })
        }
    }
}

fn validate_sequence(waypoints: &[Waypoint]) -> Result<(), OptimizeError> {
    let mut previous = 0.0;
    for (position, waypoint) in waypoints.iter().enumerate() {
        if waypoint.index() != position {
            return Err(OptimizeError::MalformedSequence {
                position,
                reason: "index does not match position",
            });
        }
        let distance = waypoint.cumulative_distance_miles();
        if !distance.is_finite() || distance < previous || (position == 0 && distance != 0.0) {
            return Err(OptimizeError::MalformedSequence {
                position,
                reason: "cumulative distance must start at 0 and never decrease",
            });
        }
        previous = distance;
    }
    Ok(())
}

fn collect_stations(waypoints: &[Waypoint]) -> Result<Vec<StationView>, OptimizeError> {
    waypoints
        .iter()
        .filter_map(Waypoint::as_station)
        .map(|station| {
            let price = station.stop.price_per_gallon.ok_or_else(|| OptimizeError::MissingPrice {
                waypoint: station.index,
                stop: station.stop.id.clone(),
            })?;
            if !price.is_finite() || price < 0.0 {
                return Err(OptimizeError::InvalidPrice {
                    waypoint: station.index,
                    stop: station.stop.id.clone(),
                    price,
                });
            }
            Ok(StationView {
                waypoint: station.index,
                distance: station.cumulative_distance_miles,
                price,
            })
        })
        .collect()
}

/// For each slot, the nearest later slot with a strictly lower price.
fn next_cheaper(prices: &[f64]) -> Vec<Option<usize>> {
    let mut result = vec![None; prices.len()];
    let mut stack: Vec<usize> = Vec::new();

    for (slot, &price) in prices.iter().enumerate().rev() {
        while stack.last().is_some_and(|&top| prices[top] >= price) {
            stack.pop();
        }
        result[slot] = stack.last().copied();
        stack.push(slot);
    }

    result
}

fn simulate(
    stations: &[StationView],
    cheaper: &[Option<usize>],
    route_end: f64,
    options: &FuelOptions,
) -> Result<(Vec<Purchase>, f64), FuelGap> {
    let capacity = options.tank_capacity_gallons;
    let mpg = options.miles_per_gallon;
    let range = options.range_miles();

    let mut fuel = capacity;
    let mut last_refuel = 0.0;
    let mut total_cost = 0.0;
    let mut purchases = Vec::with_capacity(stations.len());

    for (slot, station) in stations.iter().enumerate() {
        fuel -= (station.distance - last_refuel) / mpg;
        if fuel < -FUEL_TOLERANCE_GALLONS {
            return Err(FuelGap {
                from_miles: last_refuel,
                to_miles: station.distance,
                unreachable: Some(station.waypoint),
                shortfall_gallons: -fuel,
            });
        }
        fuel = fuel.max(0.0);
        last_refuel = station.distance;
        let remaining = fuel;

        let to_buy = match cheaper[slot] {
            Some(next) => {
                let gap = stations[next].distance - station.distance;
                if gap > range {
                    capacity - fuel
                } else {
                    (gap / mpg - fuel).max(0.0)
                }
            }
            None if slot + 1 < stations.len() => capacity - fuel,
            None => {
                let needed = (route_end - station.distance) / mpg;
                if needed > capacity + FUEL_TOLERANCE_GALLONS {
                    return Err(FuelGap {
                        from_miles: station.distance,
                        to_miles: route_end,
                        unreachable: None,
                        shortfall_gallons: needed - capacity,
                    });
                }
                (needed - fuel).max(0.0)
            }
        };

        debug!(
            waypoint = station.waypoint,
            price = station.price,
            remaining,
            to_buy,
            "station decided"
        );

        total_cost += to_buy * station.price;
        fuel += to_buy;
        purchases.push(Purchase {
            remaining_fuel_gallons: remaining,
            fuel_to_buy_gallons: to_buy,
        });
    }

    if stations.is_empty() {
        let needed = route_end / mpg;
        if needed > capacity + FUEL_TOLERANCE_GALLONS {
            return Err(FuelGap {
                from_miles: 0.0,
                to_miles: route_end,
                unreachable: None,
                shortfall_gallons: needed - capacity,
            });
        }
    }

    Ok((purchases, total_cost))
}
