use crate::constants::{
    DEFAULT_LINE_OPACITY, DEFAULT_LINE_WIDTH, REVEAL_POINTS_PER_FRAME, REVEAL_SEGMENT_PAUSE_MS,
};
use crate::geometry::LngLat;
use crate::map::popups;
use crate::map::registry::{self, HandleRegistry};
use crate::map::route_color;
use crate::map::surface::{Cursor, LineStyle, MapSurface};
use crate::models::RouteSegment;

/// Progress of an animated reveal: which leg is being drawn and how many of
/// its path points are visible.
#[derive(Debug, Clone, Copy)]
struct RevealState {
    segment_index: usize,
    point_step: usize,
}

/// Proof that a scheduled continuation belongs to the segment set that
/// started it. A superseding `set_segments` call invalidates every
/// previously issued ticket, so a stale frame callback becomes a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTicket {
    generation: u64,
}

/// What the animation driver should do after a reveal step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStep {
    /// Schedule the next step on the following animation frame
    Frame,
    /// A leg finished; wait this many milliseconds, then continue
    Pause(u32),
    /// The last leg finished, animation state is idle again
    Done,
    /// The ticket was superseded; nothing was drawn
    Cancelled,
}

/// Owns one drawable layer per route leg, colored by the leg classification,
/// and replaces the full layer set whenever the segment list changes.
///
/// Supports a static mode (all legs drawn at once) and an animated mode
/// (legs revealed progressively, in `segment_order`, a fixed number of path
/// points per frame).
#[derive(Debug, Default)]
pub struct RouteLayerManager {
    registry: HandleRegistry,
    segments: Vec<RouteSegment>,
    open_popup: Option<usize>,
    reveal: Option<RevealState>,
    generation: u64,
}

fn line_style(segment: &RouteSegment) -> LineStyle {
    LineStyle {
        color: route_color::color_for(segment),
        width: segment.line_width.unwrap_or(DEFAULT_LINE_WIDTH),
        opacity: segment.line_opacity.unwrap_or(DEFAULT_LINE_OPACITY),
        dasharray: segment.line_dasharray.clone(),
    }
}

fn popup_anchor(segment: &RouteSegment) -> LngLat {
    segment.path[segment.path.len() / 2]
}

impl RouteLayerManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    /// Replace the layer set for a new segment list.
    ///
    /// Every layer, source and popup this manager created is removed first,
    /// and any in-flight reveal is cancelled before new work is scheduled.
    /// In static mode all drawable legs are created immediately and `None`
    /// is returned; in animated mode nothing is drawn yet and the returned
    /// ticket must be fed to [`Self::advance_reveal`] once per frame.
    pub fn set_segments(
        &mut self,
        map: &mut impl MapSurface,
        segments: Vec<RouteSegment>,
        animated: bool,
    ) -> Option<RevealTicket> {
        self.generation += 1;
        self.reveal = None;
        self.open_popup = None;
        self.registry.remove_all(map);
        self.segments = segments;

        if self.segments.is_empty() {
            return None;
        }

        if animated {
            self.reveal = Some(RevealState {
                segment_index: 0,
                point_step: 0,
            });
            return Some(RevealTicket {
                generation: self.generation,
            });
        }

        for index in 0..self.segments.len() {
            if self.segments[index].is_drawable() {
                self.create_leg(map, index, false);
            }
        }
        None
    }

    /// Advance an animated reveal by one step.
    ///
    /// Checked against the current generation first: a stale ticket means a
    /// newer segment set took over, and the step mutates nothing.
    pub fn advance_reveal(
        &mut self,
        map: &mut impl MapSurface,
        ticket: RevealTicket,
    ) -> RevealStep {
        if ticket.generation != self.generation {
            return RevealStep::Cancelled;
        }
        let Some(state) = self.reveal else {
            return RevealStep::Cancelled;
        };
        let mut segment_index = state.segment_index;
        let mut point_step = state.point_step;

        // Legs too short to draw are skipped, not errored
        while segment_index < self.segments.len() && !self.segments[segment_index].is_drawable() {
            segment_index += 1;
            point_step = 0;
        }
        if segment_index >= self.segments.len() {
            self.reveal = None;
            return RevealStep::Done;
        }

        if point_step == 0 {
            self.create_leg(map, segment_index, true);
        }

        let path_len = self.segments[segment_index].path.len();
        point_step = (point_step + REVEAL_POINTS_PER_FRAME).min(path_len);
        let source_id = registry::route_source_id(segment_index);
        map.set_line_source(&source_id, &self.segments[segment_index].path[..point_step]);

        if point_step < path_len {
            self.reveal = Some(RevealState {
                segment_index,
                point_step,
            });
            return RevealStep::Frame;
        }

        // Leg fully revealed; move to the next drawable one after the pause
        segment_index += 1;
        let has_more = self.segments[segment_index..]
            .iter()
            .any(RouteSegment::is_drawable);
        if has_more {
            self.reveal = Some(RevealState {
                segment_index,
                point_step: 0,
            });
            RevealStep::Pause(REVEAL_SEGMENT_PAUSE_MS)
        } else {
            self.reveal = None;
            RevealStep::Done
        }
    }

    /// Click on a leg's layer: close every other open popup, then toggle
    /// this leg's popup.
    pub fn handle_layer_click(&mut self, map: &mut impl MapSurface, index: usize) {
        if index >= self.segments.len() {
            return;
        }
        for other in 0..self.segments.len() {
            if other != index {
                map.set_popup_open(&registry::route_popup_id(other), false);
            }
        }
        let popup_id = registry::route_popup_id(index);
        if self.open_popup == Some(index) {
            map.set_popup_open(&popup_id, false);
            self.open_popup = None;
        } else {
            map.set_popup_open(&popup_id, true);
            self.open_popup = Some(index);
        }
    }

    /// Hovering a leg swaps the cursor to a pointer.
    pub fn handle_layer_hover(&mut self, map: &mut impl MapSurface, hovering: bool) {
        map.set_cursor(if hovering {
            Cursor::Pointer
        } else {
            Cursor::Default
        });
    }

    pub fn clear(&mut self, map: &mut impl MapSurface) {
        self.generation += 1;
        self.reveal = None;
        self.open_popup = None;
        self.segments.clear();
        self.registry.remove_all(map);
    }

    fn create_leg(&mut self, map: &mut impl MapSurface, index: usize, empty_geometry: bool) {
        let segment = &self.segments[index];
        let source_id = registry::route_source_id(index);
        let layer_id = registry::route_layer_id(index);
        let popup_id = registry::route_popup_id(index);

        let path: &[LngLat] = if empty_geometry { &[] } else { &segment.path };
        map.add_line_source(&source_id, path);
        map.add_line_layer(&layer_id, &source_id, &line_style(segment));
        map.add_popup(
            &popup_id,
            popup_anchor(segment),
            popups::offset_for(index, self.segments.len()),
            &popups::popup_html(segment),
        );

        self.registry.track_layer(layer_id);
        self.registry.track_source(source_id);
        self.registry.track_popup(popup_id);
    }
}
