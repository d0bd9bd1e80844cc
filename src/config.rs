//! Planner configuration with environment overrides.

use std::env::{self, VarError};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::annotate::{AnnotateOptions, DEFAULT_PROXIMITY_THRESHOLD_MILES};
use crate::optimizer::{DEFAULT_MILES_PER_GALLON, DEFAULT_TANK_CAPACITY_GALLONS, FuelOptions};

pub const PROXIMITY_ENV: &str = "FUEL_PLANNER_PROXIMITY_MILES";
pub const TANK_ENV: &str = "FUEL_PLANNER_TANK_GALLONS";
pub const MPG_ENV: &str = "FUEL_PLANNER_MPG";
pub const ALTERNATIVES_ENV: &str = "FUEL_PLANNER_ROUTE_ALTERNATIVES";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} value {value:?} is not valid")]
    Invalid { name: &'static str, value: String },
    #[error("{name} value is not valid unicode")]
    NotUnicode { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub proximity_threshold_miles: f64,
    pub tank_capacity_gallons: f64,
    pub miles_per_gallon: f64,
    /// Alternatives requested from the directions service; the first is used.
    pub route_alternatives: u8,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            proximity_threshold_miles: DEFAULT_PROXIMITY_THRESHOLD_MILES,
            tank_capacity_gallons: DEFAULT_TANK_CAPACITY_GALLONS,
            miles_per_gallon: DEFAULT_MILES_PER_GALLON,
            route_alternatives: 2,
        }
    }
}

impl PlannerConfig {
    /// Defaults, overridden by any `FUEL_PLANNER_*` variables that are set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Result<String, VarError>,
    {
        let defaults = Self::default();
        Ok(Self {
            proximity_threshold_miles: positive_or(&lookup, PROXIMITY_ENV, defaults.proximity_threshold_miles)?,
            tank_capacity_gallons: positive_or(&lookup, TANK_ENV, defaults.tank_capacity_gallons)?,
            miles_per_gallon: positive_or(&lookup, MPG_ENV, defaults.miles_per_gallon)?,
            route_alternatives: parse_or(&lookup, ALTERNATIVES_ENV, defaults.route_alternatives)?,
        })
    }

    pub fn annotate_options(&self) -> AnnotateOptions {
        AnnotateOptions {
            proximity_threshold_miles: self.proximity_threshold_miles,
        }
    }

    pub fn fuel_options(&self) -> FuelOptions {
        FuelOptions::new(self.tank_capacity_gallons, self.miles_per_gallon)
    }
}

fn parse_or<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&'static str) -> Result<String, VarError>,
{
    match lookup(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::NotUnicode { name }),
    }
}

/// Like [`parse_or`], but only finite values greater than zero are accepted.
fn positive_or<F>(lookup: &F, name: &'static str, default: f64) -> Result<f64, ConfigError>
where
    F: Fn(&'static str) -> Result<String, VarError>,
{
    let value = parse_or(lookup, name, default)?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::Invalid {
            name,
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&'static str, &str)]) -> impl Fn(&'static str) -> Result<String, VarError> {
        let vars: HashMap<&'static str, String> = vars.iter().map(|(k, v)| (*k, v.to_string())).collect();
        move |name| vars.get(name).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.proximity_threshold_miles, 2.0);
        assert_eq!(config.fuel_options().range_miles(), 500.0);
        assert_eq!(config.route_alternatives, 2);
    }

    #[test]
    fn test_unset_variables_keep_defaults() {
        let config = PlannerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = PlannerConfig::from_lookup(lookup(&[
            (PROXIMITY_ENV, "1.5"),
            (TANK_ENV, " 120 "),
            (MPG_ENV, "6.5"),
            (ALTERNATIVES_ENV, "3"),
        ]))
        .unwrap();
        assert_eq!(config.annotate_options().proximity_threshold_miles, 1.5);
        assert_eq!(config.fuel_options(), FuelOptions::new(120.0, 6.5));
        assert_eq!(config.route_alternatives, 3);
    }

    #[test]
    fn test_invalid_value() {
        let err = PlannerConfig::from_lookup(lookup(&[(MPG_ENV, "ten")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                name: MPG_ENV,
                value: "ten".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_non_positive_and_non_finite() {
        for (name, raw) in [
            (PROXIMITY_ENV, "NaN"),
            (PROXIMITY_ENV, "-2"),
            (PROXIMITY_ENV, "0"),
            (TANK_ENV, "inf"),
            (MPG_ENV, "-10"),
        ] {
            let err = PlannerConfig::from_lookup(lookup(&[(name, raw)])).unwrap_err();
            assert!(
                matches!(err, ConfigError::Invalid { name: rejected, .. } if rejected == name),
                "{name}={raw} accepted: {err:?}"
            );
        }
    }

    #[test]
    fn test_not_unicode_value() {
        let err = PlannerConfig::from_lookup(|name| {
            if name == TANK_ENV {
                Err(VarError::NotUnicode(std::ffi::OsString::from("fifty")))
            } else {
                Err(VarError::NotPresent)
            }
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::NotUnicode { name: TANK_ENV });
    }

    #[test]
    fn test_partial_deserialize_fills_defaults() {
        let config: PlannerConfig = serde_json::from_str(r#"{"miles_per_gallon": 7.0}"#).unwrap();
        assert_eq!(config.miles_per_gallon, 7.0);
        assert_eq!(config.tank_capacity_gallons, 50.0);
    }
}
