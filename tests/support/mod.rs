//! Shared support for tests that need a live OSRM backend.

pub mod osrm_region;
