use crate::constants::{DEVIATION_FIT_MAX_ZOOM, DEVIATION_FIT_PADDING_PX};
use crate::geometry::{planar_distance, LngLat, LngLatBounds};
use crate::map::surface::{LineStyle, MapSurface};
use crate::models::RouteSegment;

pub const DEVIATION_LAYER_ID: &str = "deviation-layer";
pub const DEVIATION_SOURCE_ID: &str = "deviation-source";

fn deviation_style() -> LineStyle {
    LineStyle {
        color: "#dc2626".to_string(),
        width: 3.0,
        opacity: 0.9,
        dasharray: Some(vec![2.0, 2.0]),
    }
}

/// Nearest route vertex to `position` across every segment's path.
///
/// A brute-force scan over all path points using planar distance; route
/// polylines in this domain are short (low hundreds of points), so no
/// spatial index is warranted.
#[must_use]
pub fn nearest_route_point(position: LngLat, segments: &[RouteSegment]) -> Option<LngLat> {
    let mut best: Option<(f64, LngLat)> = None;
    for segment in segments {
        for &point in &segment.path {
            let distance = planar_distance(position, point);
            if best.map_or(true, |(best_distance, _)| distance < best_distance) {
                best = Some((distance, point));
            }
        }
    }
    best.map(|(_, point)| point)
}

/// Draws a dashed line from a live vehicle position to the nearest point on
/// the planned route, updated on every position message.
#[derive(Debug, Default)]
pub struct DeviationCalculator {
    line_exists: bool,
}

impl DeviationCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the deviation line for a new vehicle position.
    ///
    /// Creates the dedicated source/layer pair on first use and only
    /// updates the geometry afterwards. An empty route is not an error;
    /// nothing is drawn and `None` is returned.
    pub fn recompute(
        &mut self,
        map: &mut impl MapSurface,
        vehicle: LngLat,
        segments: &[RouteSegment],
    ) -> Option<LngLat> {
        let nearest = nearest_route_point(vehicle, segments)?;
        let line = [vehicle, nearest];
        if self.line_exists {
            map.set_line_source(DEVIATION_SOURCE_ID, &line);
        } else {
            map.add_line_source(DEVIATION_SOURCE_ID, &line);
            map.add_line_layer(DEVIATION_LAYER_ID, DEVIATION_SOURCE_ID, &deviation_style());
            self.line_exists = true;
        }
        Some(nearest)
    }

    /// Fit the camera to the vehicle and its nearest route point. Intended
    /// to run once, after both the route and the first live position are
    /// available.
    pub fn focus(&self, map: &mut impl MapSurface, vehicle: LngLat, nearest: LngLat) {
        if let Some(bounds) = LngLatBounds::from_points([vehicle, nearest].iter()) {
            map.fit_bounds(bounds, DEVIATION_FIT_PADDING_PX, DEVIATION_FIT_MAX_ZOOM);
        }
    }

    pub fn clear(&mut self, map: &mut impl MapSurface) {
        if self.line_exists {
            map.remove_layer(DEVIATION_LAYER_ID);
            map.remove_source(DEVIATION_SOURCE_ID);
            self.line_exists = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::testing::{CameraCall, RecordingSurface};

    fn segment_with_path(path: Vec<LngLat>) -> RouteSegment {
        RouteSegment {
            segment_order: 0,
            start_name: "A".to_string(),
            end_name: "B".to_string(),
            path,
            tolls: Vec::new(),
            distance: 1.0,
            segment_color: None,
            line_width: None,
            line_opacity: None,
            line_dasharray: None,
        }
    }

    #[test]
    fn test_draws_line_to_nearest_route_vertex() {
        let mut map = RecordingSurface::new();
        let mut calculator = DeviationCalculator::new();
        let segments = vec![segment_with_path(vec![
            LngLat::new(106.01, 10.0),
            LngLat::new(106.001, 10.0),
            LngLat::new(106.005, 10.0),
        ])];

        let vehicle = LngLat::new(106.0, 10.0);
        let nearest = calculator
            .recompute(&mut map, vehicle, &segments)
            .expect("nearest point");

        assert_eq!(nearest, LngLat::new(106.001, 10.0));
        assert_eq!(
            map.sources[DEVIATION_SOURCE_ID],
            vec![LngLat::new(106.0, 10.0), LngLat::new(106.001, 10.0)]
        );
        assert!(map.layers.contains_key(DEVIATION_LAYER_ID));
        assert_eq!(
            map.layers[DEVIATION_LAYER_ID].style.dasharray,
            Some(vec![2.0, 2.0])
        );
    }

    #[test]
    fn test_subsequent_updates_reuse_the_layer() {
        let mut map = RecordingSurface::new();
        let mut calculator = DeviationCalculator::new();
        let segments = vec![segment_with_path(vec![
            LngLat::new(106.0, 10.0),
            LngLat::new(106.01, 10.0),
        ])];

        calculator.recompute(&mut map, LngLat::new(106.001, 10.0), &segments);
        calculator.recompute(&mut map, LngLat::new(106.009, 10.0), &segments);

        assert_eq!(map.layers.len(), 1);
        assert_eq!(
            map.sources[DEVIATION_SOURCE_ID],
            vec![LngLat::new(106.009, 10.0), LngLat::new(106.01, 10.0)]
        );
    }

    #[test]
    fn test_empty_route_is_a_no_op() {
        let mut map = RecordingSurface::new();
        let mut calculator = DeviationCalculator::new();

        assert!(calculator
            .recompute(&mut map, LngLat::new(106.0, 10.0), &[])
            .is_none());
        assert!(calculator
            .recompute(&mut map, LngLat::new(106.0, 10.0), &[segment_with_path(Vec::new())])
            .is_none());
        assert!(map.layers.is_empty());
        assert!(map.sources.is_empty());
    }

    #[test]
    fn test_focus_fits_vehicle_and_nearest_point() {
        let mut map = RecordingSurface::new();
        let calculator = DeviationCalculator::new();
        calculator.focus(
            &mut map,
            LngLat::new(106.0, 10.0),
            LngLat::new(106.001, 10.0),
        );

        let Some(CameraCall::FitBounds {
            bounds,
            padding_px,
            max_zoom,
        }) = map.camera.last()
        else {
            panic!("expected a bounds fit");
        };
        assert_eq!(bounds.min_lng, 106.0);
        assert_eq!(bounds.max_lng, 106.001);
        assert_eq!(*padding_px, DEVIATION_FIT_PADDING_PX);
        assert_eq!(*max_zoom, DEVIATION_FIT_MAX_ZOOM);
    }

    #[test]
    fn test_clear_removes_the_dedicated_pair() {
        let mut map = RecordingSurface::new();
        let mut calculator = DeviationCalculator::new();
        let segments = vec![segment_with_path(vec![
            LngLat::new(106.0, 10.0),
            LngLat::new(106.01, 10.0),
        ])];
        calculator.recompute(&mut map, LngLat::new(106.001, 10.0), &segments);
        calculator.clear(&mut map);

        assert!(map.layers.is_empty());
        assert!(map.sources.is_empty());

        // Clearing twice is harmless
        calculator.clear(&mut map);
    }
}
