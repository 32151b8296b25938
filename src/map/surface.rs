use crate::geometry::{LngLat, LngLatBounds};

/// Paint properties of a line layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
    pub dasharray: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

/// Capability object over the externally owned map instance.
///
/// The lifecycle controller owns the concrete surface; every other engine
/// component receives it as a borrowed `&mut impl MapSurface` and may only
/// call it between the map's `load` event and teardown. Identifiers are
/// chosen by the caller and tracked in a [`HandleRegistry`] so cleanup
/// removes exactly what this engine created.
///
/// [`HandleRegistry`]: crate::map::registry::HandleRegistry
pub trait MapSurface {
    fn add_line_source(&mut self, id: &str, path: &[LngLat]);
    /// Replace the geometry of an existing line source.
    fn set_line_source(&mut self, id: &str, path: &[LngLat]);
    fn add_line_layer(&mut self, id: &str, source_id: &str, style: &LineStyle);
    fn remove_layer(&mut self, id: &str);
    fn remove_source(&mut self, id: &str);

    fn add_marker(&mut self, id: &str, position: LngLat, icon: &str, color: &str);
    fn move_marker(&mut self, id: &str, position: LngLat, rotation_deg: f64);
    fn set_marker_selected(&mut self, id: &str, selected: bool);
    fn remove_marker(&mut self, id: &str);

    fn add_popup(&mut self, id: &str, anchor: LngLat, offset: (f64, f64), html: &str);
    fn set_popup_open(&mut self, id: &str, open: bool);
    fn remove_popup(&mut self, id: &str);

    fn jump_to(&mut self, center: LngLat, zoom: f64);
    fn ease_to(&mut self, center: LngLat, zoom: f64);
    fn fit_bounds(&mut self, bounds: LngLatBounds, padding_px: f64, max_zoom: f64);
    fn set_cursor(&mut self, cursor: Cursor);

    /// Release the underlying map instance. Called exactly once, as the
    /// last step of teardown.
    fn destroy(&mut self);
}
