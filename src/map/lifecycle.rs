use crate::api::geocoding::GeocodedLocation;
use crate::map::deviation::DeviationCalculator;
use crate::map::markers::MarkerReconciler;
use crate::map::route_layers::RouteLayerManager;
use crate::map::style_cache::{KeyValueStore, StyleCache};
use crate::map::surface::MapSurface;
use crate::map::vehicles::VehicleOverlayReconciler;

/// Where the map instance is in its life. Dependents may touch the surface
/// only between `Loaded` and `Destroyed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapPhase {
    Idle,
    FetchingStyle,
    Constructing,
    Loaded,
    Failed,
    Destroyed,
}

/// A style document ready for construction, with its provenance. Knowing
/// whether it came from cache decides the recovery path when construction
/// fails.
#[derive(Debug, Clone)]
pub struct StyleLoad {
    pub style: serde_json::Value,
    pub from_cache: bool,
}

/// What to do after the map library failed to construct an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructionOutcome {
    /// The failing style came from cache; it has been invalidated and one
    /// retry with a freshly fetched style is allowed.
    RetryWithFreshStyle,
    /// Initialization failed for good; surface the error, stop retrying.
    Terminal,
}

/// Owns creation, load-completion and teardown of the map instance, and the
/// style cache feeding it.
pub struct MapLifecycleController<S: KeyValueStore> {
    phase: MapPhase,
    cache: StyleCache<S>,
    style_from_cache: bool,
    retried: bool,
    cancelled: bool,
}

impl<S: KeyValueStore> MapLifecycleController<S> {
    pub fn new(cache: StyleCache<S>) -> Self {
        Self {
            phase: MapPhase::Idle,
            cache,
            style_from_cache: false,
            retried: false,
            cancelled: false,
        }
    }

    #[must_use]
    pub fn phase(&self) -> MapPhase {
        self.phase
    }

    #[must_use]
    pub fn cache(&self) -> &StyleCache<S> {
        &self.cache
    }

    /// Mount, or the retry edge after a cache-poisoned construction failure.
    pub fn begin_style_fetch(&mut self) {
        self.phase = MapPhase::FetchingStyle;
    }

    /// A style is available; construction of the instance may start.
    pub fn style_ready(&mut self, load: &StyleLoad) {
        self.style_from_cache = load.from_cache;
        self.phase = MapPhase::Constructing;
    }

    /// The map library failed to produce an instance.
    ///
    /// If the style that caused the failure came from cache, the cache is
    /// invalidated and exactly one retry with a fresh fetch is granted;
    /// otherwise (or on the second failure) the error is terminal.
    pub fn construction_failed(&mut self) -> ConstructionOutcome {
        if self.style_from_cache && !self.retried {
            self.retried = true;
            self.cache.invalidate();
            self.phase = MapPhase::FetchingStyle;
            ConstructionOutcome::RetryWithFreshStyle
        } else {
            self.phase = MapPhase::Failed;
            ConstructionOutcome::Terminal
        }
    }

    /// The instance reported its one-time `load` event. Only now may the
    /// surface be published to dependents.
    pub fn loaded(&mut self) -> bool {
        if self.phase == MapPhase::Constructing {
            self.phase = MapPhase::Loaded;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.phase == MapPhase::Loaded
    }

    /// Flag checked by async continuations (style fetch, geocoding, frame
    /// callbacks) so work that completes after teardown mutates nothing.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Unmount before a surface ever existed; in-flight async work must
    /// observe the flag and stop.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Release everything this engine created, then the instance itself.
    ///
    /// Ordering is mandatory: layers and sources (route set and deviation
    /// pair), popups, marker elements, pending animation work, and only
    /// then the instance. Later steps assume earlier ones already released
    /// their handles.
    pub fn teardown(
        &mut self,
        map: &mut impl MapSurface,
        routes: &mut RouteLayerManager,
        markers: &mut MarkerReconciler,
        deviation: &mut DeviationCalculator,
        vehicles: &mut VehicleOverlayReconciler,
    ) {
        self.cancelled = true;
        routes.clear(map);
        deviation.clear(map);
        markers.clear(map);
        vehicles.clear(map);
        map.destroy();
        self.phase = MapPhase::Destroyed;
    }
}

/// Base-surface click outcome: exactly one of the two caller-supplied
/// callbacks fires, preferring `on_location_change`, never both.
pub fn dispatch_map_click<L, M>(
    location: GeocodedLocation,
    on_location_change: Option<L>,
    on_map_click: Option<M>,
) where
    L: FnOnce(GeocodedLocation),
    M: FnOnce(GeocodedLocation),
{
    if let Some(callback) = on_location_change {
        callback(location);
    } else if let Some(callback) = on_map_click {
        callback(location);
    }
}
