//! OSRM HTTP adapter for route geometry.

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::polyline::{Coordinate, Polyline, PolylineError};
use crate::traits::{DirectionsProvider, RouteAlternative};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "driving".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("OSRM request failed")]
    Http(#[from] reqwest::Error),
    #[error("OSRM returned {code}: {message}")]
    Service { code: String, message: String },
    #[error("OSRM route geometry is not a valid polyline")]
    Geometry(#[from] PolylineError),
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, start: Coordinate, end: Coordinate, alternatives: u8) -> String {
        let alternatives = if alternatives > 1 {
            alternatives.to_string()
        } else {
            "false".to_string()
        };

        // OSRM takes lng,lat pairs.
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}?overview=full&geometries=polyline&alternatives={}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            start.lng,
            start.lat,
            end.lng,
            end.lat,
            alternatives
        )
    }
}

impl DirectionsProvider for OsrmClient {
    type Error = OsrmError;

    fn routes(
        &self,
        start: Coordinate,
        end: Coordinate,
        alternatives: u8,
    ) -> Result<Vec<RouteAlternative>, Self::Error> {
        let url = self.route_url(start, end, alternatives);
        debug!(%url, "requesting OSRM route");

        // OSRM answers NoRoute with a 400, so the body is read regardless of status.
        let body = self.client.get(url).send()?.json::<OsrmRouteResponse>()?;
        parse_routes(body)
    }
}

fn parse_routes(body: OsrmRouteResponse) -> Result<Vec<RouteAlternative>, OsrmError> {
    match body.code.as_str() {
        "Ok" => body
            .routes
            .into_iter()
            .map(|route| {
                Ok(RouteAlternative {
                    distance_meters: route.distance,
                    duration_seconds: route.duration,
                    geometry: Polyline::decode(&route.geometry)?,
                })
            })
            .collect(),
        "NoRoute" => Ok(Vec::new()),
        _ => {
            warn!(code = %body.code, "OSRM route request rejected");
            Err(OsrmError::Service {
                code: body.code,
                message: body.message.unwrap_or_default(),
            })
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    geometry: String,
}
