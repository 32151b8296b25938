use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::LngLat;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverInfo {
    pub name: String,
    #[serde(default)]
    pub phone_number: String,
}

/// One vehicle position as produced by the live-tracking feed. Coordinates
/// may be absent while a device has no fix; such messages are kept in the
/// snapshot but never rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePositionMessage {
    pub vehicle_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub license_plate_number: String,
    pub order_detail_status: String,
    pub tracking_code: String,
    #[serde(default)]
    pub driver1: Option<DriverInfo>,
    #[serde(default)]
    pub driver2: Option<DriverInfo>,
    pub last_updated: DateTime<Utc>,
}

impl VehiclePositionMessage {
    /// `Some` iff both coordinates are present, finite and not NaN.
    #[must_use]
    pub fn position(&self) -> Option<LngLat> {
        let (Some(latitude), Some(longitude)) = (self.latitude, self.longitude) else {
            return None;
        };
        let point = LngLat::new(longitude, latitude);
        point.is_valid().then_some(point)
    }
}

/// What the socket-backed tracking source currently reports. The engine
/// renders this; it does not own the connection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackingSnapshot {
    pub vehicles: Vec<VehiclePositionMessage>,
    pub is_connected: bool,
    pub is_connecting: bool,
}
