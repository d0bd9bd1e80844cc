//! Annotated route points.
//!
//! A waypoint is either a plain polyline point or a station matched to a
//! catalog truck stop. Only stations carry price, next-cheaper and purchase
//! data, so the optimizer fields cannot exist on an unmatched point.

use serde::{Deserialize, Serialize};

use crate::catalog::{TruckStopId, TruckStopRecord};
use crate::polyline::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Waypoint {
    Plain(PlainPoint),
    Station(StationPoint),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlainPoint {
    pub index: usize,
    pub coordinate: Coordinate,
    pub cumulative_distance_miles: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationPoint {
    pub index: usize,
    pub coordinate: Coordinate,
    pub cumulative_distance_miles: f64,
    pub stop: MatchedStop,
    /// Set by the optimizer; `Unresolved` until then.
    pub next_cheaper: CheaperAhead,
    /// Set by the optimizer on feasible routes only.
    pub purchase: Option<Purchase>,
}

/// Snapshot of the catalog record a station matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedStop {
    pub id: TruckStopId,
    pub name: String,
    pub address: String,
    pub price_per_gallon: Option<f64>,
}

impl From<&TruckStopRecord> for MatchedStop {
    fn from(record: &TruckStopRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            address: record.address.clone(),
            price_per_gallon: record.price_per_gallon,
        }
    }
}

/// Nearest later station with a strictly lower price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheaperAhead {
    Unresolved,
    /// Waypoint index of the cheaper station.
    Station(usize),
    Absent,
}

impl CheaperAhead {
    pub fn station(self) -> Option<usize> {
        match self {
            Self::Station(index) => Some(index),
            Self::Unresolved | Self::Absent => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    /// Fuel in the tank on arrival, before buying.
    pub remaining_fuel_gallons: f64,
    pub fuel_to_buy_gallons: f64,
}

impl Waypoint {
    pub fn plain(index: usize, coordinate: Coordinate, cumulative_distance_miles: f64) -> Self {
        Self::Plain(PlainPoint {
            index,
            coordinate,
            cumulative_distance_miles,
        })
    }

    pub fn station(
        index: usize,
        coordinate: Coordinate,
        cumulative_distance_miles: f64,
        stop: MatchedStop,
    ) -> Self {
        Self::Station(StationPoint {
            index,
            coordinate,
            cumulative_distance_miles,
            stop,
            next_cheaper: CheaperAhead::Unresolved,
            purchase: None,
        })
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Plain(point) => point.index,
            Self::Station(station) => station.index,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        match self {
            Self::Plain(point) => point.coordinate,
            Self::Station(station) => station.coordinate,
        }
    }

    pub fn cumulative_distance_miles(&self) -> f64 {
        match self {
            Self::Plain(point) => point.cumulative_distance_miles,
            Self::Station(station) => station.cumulative_distance_miles,
        }
    }

    pub fn is_truck_stop(&self) -> bool {
        matches!(self, Self::Station(_))
    }

    pub fn as_station(&self) -> Option<&StationPoint> {
        match self {
            Self::Station(station) => Some(station),
            Self::Plain(_) => None,
        }
    }

    pub fn as_station_mut(&mut self) -> Option<&mut StationPoint> {
        match self {
            Self::Station(station) => Some(station),
            Self::Plain(_) => None,
        }
    }
}
