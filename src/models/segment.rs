use serde::{Deserialize, Serialize};

use crate::geometry::LngLat;

/// Toll gate crossed by a route leg. Read-only, surfaced inside the leg's
/// popup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TollDetail {
    pub name: String,
    pub address: String,
    pub amount: f64,
}

/// One leg of a multi-leg planned route, as delivered by the routing
/// backend. `segment_order` establishes leg sequence: 0 = carrier to
/// pickup, 1 = pickup to delivery, 2 and above = delivery back to carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSegment {
    pub segment_order: u32,
    pub start_name: String,
    pub end_name: String,
    pub path: Vec<LngLat>,
    #[serde(default)]
    pub tolls: Vec<TollDetail>,
    /// Leg length in kilometres
    pub distance: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_dasharray: Option<Vec<f64>>,
}

impl RouteSegment {
    /// A leg needs at least two path points to produce a line. Shorter
    /// paths are skipped by the layer manager, never errored.
    #[must_use]
    pub fn is_drawable(&self) -> bool {
        self.path.len() >= 2
    }
}
