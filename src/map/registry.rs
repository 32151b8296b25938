use crate::map::surface::MapSurface;

/// Identifiers of everything one engine component created on the surface.
///
/// Cleanup is a deterministic iteration over owned handles, never a
/// selector scan, so a sibling map on the same page is never touched.
/// Removal order inside a registry is layers, then sources, then popups,
/// then markers; later steps assume earlier ones already released their
/// handles.
#[derive(Debug, Default)]
pub struct HandleRegistry {
    layers: Vec<String>,
    sources: Vec<String>,
    popups: Vec<String>,
    markers: Vec<String>,
}

#[must_use]
pub fn route_layer_id(index: usize) -> String {
    format!("route-layer-{index}")
}

#[must_use]
pub fn route_source_id(index: usize) -> String {
    format!("route-source-{index}")
}

#[must_use]
pub fn route_popup_id(index: usize) -> String {
    format!("route-popup-{index}")
}

/// Index of the segment a layer id belongs to, if it is one of ours.
#[must_use]
pub fn route_layer_index(layer_id: &str) -> Option<usize> {
    layer_id.strip_prefix("route-layer-")?.parse().ok()
}

impl HandleRegistry {
    pub fn track_layer(&mut self, id: impl Into<String>) {
        self.layers.push(id.into());
    }

    pub fn track_source(&mut self, id: impl Into<String>) {
        self.sources.push(id.into());
    }

    pub fn track_popup(&mut self, id: impl Into<String>) {
        self.popups.push(id.into());
    }

    pub fn track_marker(&mut self, id: impl Into<String>) {
        self.markers.push(id.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
            && self.sources.is_empty()
            && self.popups.is_empty()
            && self.markers.is_empty()
    }

    /// Remove every tracked handle from the surface and forget it.
    pub fn remove_all(&mut self, map: &mut impl MapSurface) {
        for id in self.layers.drain(..) {
            map.remove_layer(&id);
        }
        for id in self.sources.drain(..) {
            map.remove_source(&id);
        }
        for id in self.popups.drain(..) {
            map.remove_popup(&id);
        }
        for id in self.markers.drain(..) {
            map.remove_marker(&id);
        }
    }
}
