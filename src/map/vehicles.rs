use indexmap::IndexMap;

#[allow(unused_imports)]
use crate::logging::log;

use crate::constants::VEHICLE_FOCUS_ZOOM;
use crate::geometry::{bearing_degrees, planar_distance, LngLat, LngLatBounds};
use crate::map::surface::MapSurface;
use crate::models::TrackingSnapshot;

const VEHICLE_MARKER_ICON: &str = "truck";
const VEHICLE_MARKER_COLOR: &str = "#1d4ed8";

/// Movement below this is jitter; the previous heading is kept.
const MIN_BEARING_MOVE: f64 = 1e-7;

#[derive(Debug, Clone, Copy)]
struct VehicleMarker {
    position: LngLat,
    rotation_deg: f64,
}

fn vehicle_marker_id(vehicle_id: &str) -> String {
    format!("vehicle-marker-{vehicle_id}")
}

/// Overlays one marker per live vehicle on the map, independent of the
/// static route layers.
///
/// Marker identity is keyed by vehicle id: a marker is created once and
/// thereafter only moved, rotated and restyled in place, so there is no
/// flicker and CSS transitions survive position updates. Vehicles absent
/// from the latest snapshot are removed.
#[derive(Debug, Default)]
pub struct VehicleOverlayReconciler {
    markers: IndexMap<String, VehicleMarker>,
    selected: Option<String>,
    fitted_once: bool,
}

impl VehicleOverlayReconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the overlay against the latest snapshot.
    pub fn sync(&mut self, map: &mut impl MapSurface, snapshot: &TrackingSnapshot) {
        let mut incoming: IndexMap<&str, LngLat> = IndexMap::new();
        for vehicle in &snapshot.vehicles {
            let Some(position) = vehicle.position() else {
                log!(
                    "Skipping vehicle {} without a valid position",
                    vehicle.vehicle_id
                );
                continue;
            };
            incoming.insert(vehicle.vehicle_id.as_str(), position);
        }

        // Drop markers for vehicles that left the snapshot
        let stale: Vec<String> = self
            .markers
            .keys()
            .filter(|id| !incoming.contains_key(id.as_str()))
            .cloned()
            .collect();
        for id in stale {
            map.remove_marker(&vehicle_marker_id(&id));
            self.markers.shift_remove(&id);
            if self.selected.as_deref() == Some(id.as_str()) {
                self.selected = None;
            }
        }

        for (vehicle_id, position) in incoming {
            let marker_id = vehicle_marker_id(vehicle_id);
            if let Some(marker) = self.markers.get_mut(vehicle_id) {
                if planar_distance(marker.position, position) > MIN_BEARING_MOVE {
                    marker.rotation_deg = bearing_degrees(marker.position, position);
                }
                marker.position = position;
                map.move_marker(&marker_id, position, marker.rotation_deg);
            } else {
                map.add_marker(&marker_id, position, VEHICLE_MARKER_ICON, VEHICLE_MARKER_COLOR);
                self.markers.insert(
                    vehicle_id.to_string(),
                    VehicleMarker {
                        position,
                        rotation_deg: 0.0,
                    },
                );
            }
        }

        // Auto-fit runs once, when the overlay first becomes non-empty
        if !self.fitted_once && !self.markers.is_empty() {
            self.fitted_once = true;
            self.fit_all(map);
        }
    }

    /// Select a vehicle: one-time camera ease to its position. Later
    /// position updates move only the marker, never the camera.
    pub fn select(&mut self, map: &mut impl MapSurface, vehicle_id: &str) {
        let Some(marker) = self.markers.get(vehicle_id) else {
            return;
        };
        if let Some(previous) = self.selected.take() {
            map.set_marker_selected(&vehicle_marker_id(&previous), false);
        }
        map.set_marker_selected(&vehicle_marker_id(vehicle_id), true);
        map.ease_to(marker.position, VEHICLE_FOCUS_ZOOM);
        self.selected = Some(vehicle_id.to_string());
    }

    /// Explicit "show all" request: fit the camera to every live vehicle.
    pub fn show_all(&mut self, map: &mut impl MapSurface) {
        self.fit_all(map);
    }

    pub fn clear(&mut self, map: &mut impl MapSurface) {
        for id in self.markers.keys() {
            map.remove_marker(&vehicle_marker_id(id));
        }
        self.markers.clear();
        self.selected = None;
        self.fitted_once = false;
    }

    fn fit_all(&self, map: &mut impl MapSurface) {
        let positions: Vec<LngLat> = self.markers.values().map(|m| m.position).collect();
        match positions.as_slice() {
            [] => {}
            [only] => map.ease_to(*only, VEHICLE_FOCUS_ZOOM),
            _ => {
                if let Some(bounds) = LngLatBounds::from_points(&positions) {
                    map.fit_bounds(
                        bounds,
                        crate::constants::MARKER_FIT_PADDING_PX,
                        crate::constants::MARKER_FIT_MAX_ZOOM,
                    );
                }
            }
        }
    }
}
