//! Recording [`MapSurface`] double shared by the engine unit tests.

use indexmap::IndexMap;

use crate::geometry::{LngLat, LngLatBounds};
use crate::map::surface::{Cursor, LineStyle, MapSurface};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedLayer {
    pub source_id: String,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedMarker {
    pub position: LngLat,
    pub icon: String,
    pub color: String,
    pub rotation_deg: f64,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPopup {
    pub anchor: LngLat,
    pub offset: (f64, f64),
    pub html: String,
    pub open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CameraCall {
    JumpTo {
        center: LngLat,
        zoom: f64,
    },
    EaseTo {
        center: LngLat,
        zoom: f64,
    },
    FitBounds {
        bounds: LngLatBounds,
        padding_px: f64,
        max_zoom: f64,
    },
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub sources: IndexMap<String, Vec<LngLat>>,
    pub layers: IndexMap<String, RecordedLayer>,
    pub markers: IndexMap<String, RecordedMarker>,
    pub popups: IndexMap<String, RecordedPopup>,
    pub camera: Vec<CameraCall>,
    pub cursor: Cursor,
    pub destroyed: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.keys().map(String::as_str).collect()
    }

    pub fn open_popup_ids(&self) -> Vec<&str> {
        self.popups
            .iter()
            .filter(|(_, popup)| popup.open)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

impl MapSurface for RecordingSurface {
    fn add_line_source(&mut self, id: &str, path: &[LngLat]) {
        self.sources.insert(id.to_string(), path.to_vec());
    }

    fn set_line_source(&mut self, id: &str, path: &[LngLat]) {
        self.sources.insert(id.to_string(), path.to_vec());
    }

    fn add_line_layer(&mut self, id: &str, source_id: &str, style: &LineStyle) {
        self.layers.insert(
            id.to_string(),
            RecordedLayer {
                source_id: source_id.to_string(),
                style: style.clone(),
            },
        );
    }

    fn remove_layer(&mut self, id: &str) {
        self.layers.shift_remove(id);
    }

    fn remove_source(&mut self, id: &str) {
        self.sources.shift_remove(id);
    }

    fn add_marker(&mut self, id: &str, position: LngLat, icon: &str, color: &str) {
        self.markers.insert(
            id.to_string(),
            RecordedMarker {
                position,
                icon: icon.to_string(),
                color: color.to_string(),
                rotation_deg: 0.0,
                selected: false,
            },
        );
    }

    fn move_marker(&mut self, id: &str, position: LngLat, rotation_deg: f64) {
        if let Some(marker) = self.markers.get_mut(id) {
            marker.position = position;
            marker.rotation_deg = rotation_deg;
        }
    }

    fn set_marker_selected(&mut self, id: &str, selected: bool) {
        if let Some(marker) = self.markers.get_mut(id) {
            marker.selected = selected;
        }
    }

    fn remove_marker(&mut self, id: &str) {
        self.markers.shift_remove(id);
    }

    fn add_popup(&mut self, id: &str, anchor: LngLat, offset: (f64, f64), html: &str) {
        self.popups.insert(
            id.to_string(),
            RecordedPopup {
                anchor,
                offset,
                html: html.to_string(),
                open: false,
            },
        );
    }

    fn set_popup_open(&mut self, id: &str, open: bool) {
        if let Some(popup) = self.popups.get_mut(id) {
            popup.open = open;
        }
    }

    fn remove_popup(&mut self, id: &str) {
        self.popups.shift_remove(id);
    }

    fn jump_to(&mut self, center: LngLat, zoom: f64) {
        self.camera.push(CameraCall::JumpTo { center, zoom });
    }

    fn ease_to(&mut self, center: LngLat, zoom: f64) {
        self.camera.push(CameraCall::EaseTo { center, zoom });
    }

    fn fit_bounds(&mut self, bounds: LngLatBounds, padding_px: f64, max_zoom: f64) {
        self.camera.push(CameraCall::FitBounds {
            bounds,
            padding_px,
            max_zoom,
        });
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn destroy(&mut self) {
        self.destroyed = true;
    }
}
