//! I-40 corridor between Oklahoma City and Amarillo.
//!
//! The corridor is modelled as a straight line along one latitude so that
//! distances are easy to reason about; truck stops sit on or just off it at
//! roughly the longitudes of the real towns.

#![allow(dead_code)]

use fuel_planner::{Catalog, Coordinate, TruckStopRecord};

pub const CORRIDOR_LAT: f64 = 35.2;
pub const START_LNG: f64 = -97.5;
pub const END_LNG: f64 = -101.8;

/// Spacing between polyline points, in degrees of longitude (~0.57 mi).
pub const STEP_LNG: f64 = 0.01;

/// A named truck stop for the corridor catalog.
#[derive(Debug, Clone)]
pub struct StopFixture {
    pub id: &'static str,
    pub name: &'static str,
    pub city: &'static str,
    pub state: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub price: Option<f64>,
}

impl StopFixture {
    pub const fn new(
        id: &'static str,
        name: &'static str,
        city: &'static str,
        state: &'static str,
        lng: f64,
        price: f64,
    ) -> Self {
        Self {
            id,
            name,
            city,
            state,
            lat: CORRIDOR_LAT,
            lng,
            price: Some(price),
        }
    }

    pub fn record(&self) -> TruckStopRecord {
        TruckStopRecord::new(self.id, self.name, Coordinate::new(self.lat, self.lng), self.price)
            .with_address("I-40", self.city, self.state)
    }
}

pub const CORRIDOR_STOPS: &[StopFixture] = &[
    StopFixture::new("OK-101", "El Reno Travel Center", "El Reno", "OK", -97.95, 3.39),
    StopFixture::new("OK-102", "Weatherford Truck Plaza", "Weatherford", "OK", -98.70, 3.19),
    StopFixture::new("OK-103", "Elk City Fuel Stop", "Elk City", "OK", -99.40, 3.29),
    StopFixture::new("TX-201", "Shamrock Travel Stop", "Shamrock", "TX", -100.25, 3.09),
    StopFixture::new("TX-202", "Groom Truck Stop", "Groom", "TX", -101.10, 3.49),
];

/// A stop far from the corridor that must never match.
pub const OFF_ROUTE_STOP: StopFixture = StopFixture {
    id: "KS-900",
    name: "Wichita Fuel",
    city: "Wichita",
    state: "KS",
    lat: 37.69,
    lng: -97.34,
    price: Some(1.99),
};

pub fn corridor_route() -> Vec<Coordinate> {
    let steps = ((START_LNG - END_LNG) / STEP_LNG).round() as usize;
    (0..=steps)
        .map(|i| Coordinate::new(CORRIDOR_LAT, START_LNG - i as f64 * STEP_LNG))
        .collect()
}

pub fn corridor_catalog() -> Catalog {
    let mut records: Vec<TruckStopRecord> = CORRIDOR_STOPS.iter().map(StopFixture::record).collect();
    records.push(OFF_ROUTE_STOP.record());
    Catalog::new(records).expect("fixture ids are unique")
}
