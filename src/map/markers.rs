#[allow(unused_imports)]
use crate::logging::log;

use crate::constants::{MARKER_FIT_MAX_ZOOM, MARKER_FIT_PADDING_PX, SINGLE_MARKER_ZOOM};
use crate::geometry::LngLatBounds;
use crate::map::registry::HandleRegistry;
use crate::map::surface::MapSurface;
use crate::models::MapLocation;

/// Replaces the point-of-interest marker set each time the location list
/// changes, then points the camera at the result.
#[derive(Debug, Default)]
pub struct MarkerReconciler {
    registry: HandleRegistry,
}

fn poi_marker_id(index: usize) -> String {
    format!("poi-marker-{index}")
}

impl MarkerReconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the previous marker set with one marker per valid location.
    ///
    /// Locations with missing or non-finite coordinates are logged and
    /// skipped. Camera policy: no valid markers leaves the camera alone,
    /// one centers on it, two or more fit the camera to their bounding box
    /// (falling back to centering on the first marker if the box is
    /// degenerate).
    pub fn set_markers(&mut self, map: &mut impl MapSurface, locations: &[MapLocation]) {
        self.registry.remove_all(map);
        if locations.is_empty() {
            return;
        }

        let valid: Vec<&MapLocation> = locations
            .iter()
            .filter(|location| {
                if location.has_valid_position() {
                    true
                } else {
                    log!("Skipping location without valid coordinates: {}", location.name);
                    false
                }
            })
            .collect();

        for (index, location) in valid.iter().enumerate() {
            let appearance = location.marker_appearance();
            let id = poi_marker_id(index);
            map.add_marker(&id, location.position(), appearance.icon, appearance.color);
            self.registry.track_marker(id);
        }

        match valid.as_slice() {
            [] => {}
            [only] => map.jump_to(only.position(), SINGLE_MARKER_ZOOM),
            [first, ..] => {
                let positions: Vec<_> = valid.iter().map(|l| l.position()).collect();
                match LngLatBounds::from_points(&positions) {
                    Some(bounds) if bounds.is_valid() => {
                        map.fit_bounds(bounds, MARKER_FIT_PADDING_PX, MARKER_FIT_MAX_ZOOM);
                    }
                    _ => map.jump_to(first.position(), SINGLE_MARKER_ZOOM),
                }
            }
        }
    }

    pub fn clear(&mut self, map: &mut impl MapSurface) {
        self.registry.remove_all(map);
    }
}
