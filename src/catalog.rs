//! Read-only truck stop catalog snapshot.
//!
//! The catalog is loaded by whatever store backs the surrounding system and
//! handed to the annotator as an immutable snapshot. Record order is kept as
//! given: it is the scan order of the first-match proximity search.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::haversine::{distance_miles, meridian_gap_miles};
use crate::polyline::Coordinate;

/// Round-off allowance for the latitude-band prefilter.
const BAND_SLACK_MILES: f64 = 1e-9;

/// Catalog-wide unique truck stop identifier (OPIS id upstream).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TruckStopId(pub String);

impl TruckStopId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TruckStopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TruckStopRecord {
    pub id: TruckStopId,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    /// Supply rack the stop's price is quoted against, when known.
    #[serde(default)]
    pub rack_id: Option<String>,
    pub coordinate: Coordinate,
    /// Retail price per gallon. Missing upstream prices stay `None`.
    pub price_per_gallon: Option<f64>,
}

impl TruckStopRecord {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        coordinate: Coordinate,
        price_per_gallon: Option<f64>,
    ) -> Self {
        Self {
            id: TruckStopId::new(id),
            name: name.into(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            rack_id: None,
            coordinate,
            price_per_gallon,
        }
    }

    pub fn with_address(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        self.address = address.into();
        self.city = city.into();
        self.state = state.into();
        self
    }

    pub fn with_rack_id(mut self, rack_id: impl Into<String>) -> Self {
        self.rack_id = Some(rack_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("truck stop id {0} appears more than once in the catalog")]
    DuplicateId(TruckStopId),
}

/// Immutable snapshot of the truck stop catalog. Cloning shares the records.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Arc<[TruckStopRecord]>,
}

impl Catalog {
    pub fn new(records: Vec<TruckStopRecord>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(&record.id) {
                return Err(CatalogError::DuplicateId(record.id.clone()));
            }
        }

        Ok(Self {
            records: records.into(),
        })
    }

    pub fn records(&self) -> &[TruckStopRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First record, in catalog order, strictly closer than `threshold_miles`.
    ///
    /// This is first-match, not nearest-match: when two stops are both within
    /// the threshold the earlier record wins even if the later one is closer.
    pub fn first_within(&self, point: Coordinate, threshold_miles: f64) -> Option<&TruckStopRecord> {
        self.records.iter().find(|record| {
            meridian_gap_miles(record.coordinate, point) <= threshold_miles + BAND_SLACK_MILES
                && distance_miles(record.coordinate, point) < threshold_miles
        })
    }
}
