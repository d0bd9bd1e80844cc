//! Test fixtures for fuel-planner.
//!
//! Provides an I-40 corridor test setup:
//! - Approximate truck stop locations between Oklahoma City and Amarillo
//! - A densified route polyline and a matching catalog builder

pub mod i40_corridor;

pub use i40_corridor::*;
