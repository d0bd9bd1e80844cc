//! Polyline representation for route geometries.
//!
//! Routes are held as decoded coordinate sequences. The compact encoded
//! polyline format (precision 1e-5, as produced by OSRM and Google
//! directions) is only dealt with at the boundary via [`Polyline::decode`]
//! and [`Polyline::encode`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::haversine::distance_miles;

const PRECISION: f64 = 1e5;

/// Seven 5-bit chunks cover any coordinate delta at 1e-5 precision.
const MAX_SHIFT: u32 = 30;

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolylineError {
    #[error("encoded polyline ends mid-value at offset {offset}")]
    Truncated { offset: usize },
    #[error("byte {byte:#04x} at offset {offset} is outside the polyline alphabet")]
    InvalidByte { offset: usize, byte: u8 },
    #[error("encoded value starting before offset {offset} overflows")]
    Overflow { offset: usize },
}

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    /// Creates a new Polyline from decoded coordinate points.
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of the great-circle segments between consecutive points.
    pub fn length_miles(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| distance_miles(pair[0], pair[1]))
            .sum()
    }

    /// Decodes an encoded polyline string. An empty string is an empty route.
    pub fn decode(encoded: &str) -> Result<Self, PolylineError> {
        let bytes = encoded.as_bytes();
        let mut offset = 0;
        let mut lat: i64 = 0;
        let mut lng: i64 = 0;
        let mut points = Vec::new();

        while offset < bytes.len() {
            lat = lat
                .checked_add(next_value(bytes, &mut offset)?)
                .ok_or(PolylineError::Overflow { offset })?;
            lng = lng
                .checked_add(next_value(bytes, &mut offset)?)
                .ok_or(PolylineError::Overflow { offset })?;
            points.push(Coordinate::new(lat as f64 / PRECISION, lng as f64 / PRECISION));
        }

        Ok(Self { points })
    }

    /// Encodes the points with precision 1e-5.
    pub fn encode(&self) -> String {
        let mut out = String::with_capacity(self.points.len() * 8);
        let mut prev_lat: i64 = 0;
        let mut prev_lng: i64 = 0;

        for point in &self.points {
            let lat = (point.lat * PRECISION).round() as i64;
            let lng = (point.lng * PRECISION).round() as i64;
            push_value(lat - prev_lat, &mut out);
            push_value(lng - prev_lng, &mut out);
            prev_lat = lat;
            prev_lng = lng;
        }

        out
    }
}

impl From<Vec<Coordinate>> for Polyline {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}

fn next_value(bytes: &[u8], offset: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let byte = *bytes
            .get(*offset)
            .ok_or(PolylineError::Truncated { offset: *offset })?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidByte { offset: *offset, byte });
        }
        if shift > MAX_SHIFT {
            return Err(PolylineError::Overflow { offset: *offset });
        }

        let chunk = i64::from(byte - 63);
        *offset += 1;
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    // zigzag
    Ok(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}

fn push_value(value: i64, out: &mut String) {
    let mut rest = if value < 0 { !(value << 1) } else { value << 1 };
    while rest >= 0x20 {
        out.push(char::from(((0x20 | (rest & 0x1f)) + 63) as u8));
        rest >>= 5;
    }
    out.push(char::from((rest + 63) as u8));
}
