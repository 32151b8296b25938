use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::{
    component, create_effect, create_node_ref, create_signal, html, on_cleanup, store_value, view,
    Callable, Callback, IntoView, MaybeSignal, Show, Signal, SignalGet, SignalSet, WriteSignal,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[allow(unused_imports)]
use crate::logging::{log, warn};

use crate::api::geocoding;
use crate::api::style as style_api;
use crate::map::deviation::DeviationCalculator;
use crate::map::lifecycle::{
    dispatch_map_click, ConstructionOutcome, MapLifecycleController, StyleLoad,
};
use crate::map::maplibre::{LayerEvent, MapLibreSurface};
use crate::map::markers::MarkerReconciler;
use crate::map::registry;
use crate::map::route_layers::{RevealStep, RevealTicket, RouteLayerManager};
use crate::map::style_cache::{LocalStorageStore, StyleCache};
use crate::map::vehicles::VehicleOverlayReconciler;
use crate::models::{MapLocation, RouteSegment, TrackingSnapshot, VehiclePositionMessage};

/// Everything the map owns, bundled so event handlers and effects can
/// split-borrow the surface next to the component that needs it.
struct MapEngine {
    controller: MapLifecycleController<LocalStorageStore>,
    surface: Option<MapLibreSurface>,
    routes: RouteLayerManager,
    markers: MarkerReconciler,
    deviation: DeviationCalculator,
    vehicles: VehicleOverlayReconciler,
    /// The deviation focus fit runs once, after the route and the first
    /// live position are both available.
    deviation_focused: bool,
}

impl MapEngine {
    fn new() -> Self {
        Self {
            controller: MapLifecycleController::new(StyleCache::new(LocalStorageStore)),
            surface: None,
            routes: RouteLayerManager::new(),
            markers: MarkerReconciler::new(),
            deviation: DeviationCalculator::new(),
            vehicles: VehicleOverlayReconciler::new(),
            deviation_focused: false,
        }
    }
}

/// Interactive route map with live vehicle tracking.
///
/// Renders the planned route (optionally with an animated reveal), the
/// point-of-interest markers, per-leg popups, the live vehicle overlay and
/// the off-route deviation line, all on one MapLibre instance whose
/// lifecycle this component owns.
#[component]
pub fn RouteMap(
    #[prop(into)] locations: Signal<Vec<MapLocation>>,
    #[prop(into)] segments: Signal<Vec<RouteSegment>>,
    #[prop(into, default = MaybeSignal::Static(false))] animated: MaybeSignal<bool>,
    #[prop(optional, strip_option)] tracking: Option<Signal<TrackingSnapshot>>,
    #[prop(optional, strip_option)] on_location_change: Option<Callback<geocoding::GeocodedLocation>>,
    #[prop(optional, strip_option)] on_map_click: Option<Callback<geocoding::GeocodedLocation>>,
    #[prop(optional, strip_option)] get_map_instance: Option<Callback<JsValue>>,
) -> impl IntoView {
    let container_id = format!("route-map-{}", uuid::Uuid::new_v4());
    let container_ref = create_node_ref::<html::Div>();
    let engine = Rc::new(RefCell::new(MapEngine::new()));
    let (loaded, set_loaded) = create_signal(false);
    let (failed, set_failed) = create_signal(false);

    // Construct the map once the container div is in the DOM
    let started = store_value(false);
    {
        let engine = Rc::clone(&engine);
        let container_id = container_id.clone();
        create_effect(move |_| {
            if container_ref.get().is_none() || started.get_value() {
                return;
            }
            started.set_value(true);
            let engine = Rc::clone(&engine);
            let container_id = container_id.clone();
            wasm_bindgen_futures::spawn_local(async move {
                initialize_map(
                    &engine,
                    &container_id,
                    set_loaded,
                    set_failed,
                    get_map_instance,
                    on_location_change,
                    on_map_click,
                )
                .await;
            });
        });
    }

    // Point-of-interest markers follow the location list
    {
        let engine = Rc::clone(&engine);
        create_effect(move |_| {
            let current = locations.get();
            if !loaded.get() {
                return;
            }
            let mut engine_ref = engine.borrow_mut();
            let MapEngine {
                surface, markers, ..
            } = &mut *engine_ref;
            if let Some(surface) = surface.as_mut() {
                markers.set_markers(surface, &current);
            }
        });
    }

    // Route layers follow the segment list and the drawing mode
    {
        let engine = Rc::clone(&engine);
        create_effect(move |_| {
            let current = segments.get();
            let animate = animated.get();
            if !loaded.get() {
                return;
            }
            let ticket = {
                let mut engine_ref = engine.borrow_mut();
                let MapEngine {
                    surface, routes, ..
                } = &mut *engine_ref;
                let Some(surface) = surface.as_mut() else {
                    return;
                };
                routes.set_segments(surface, current, animate)
            };
            if let Some(ticket) = ticket {
                schedule_reveal_frame(&engine, ticket);
            }
        });
    }

    // Live vehicle overlay and deviation line follow the tracking feed
    if let Some(tracking) = tracking {
        let engine = Rc::clone(&engine);
        create_effect(move |_| {
            let snapshot = tracking.get();
            if !loaded.get() {
                return;
            }
            let mut engine_ref = engine.borrow_mut();
            let MapEngine {
                surface,
                routes,
                deviation,
                vehicles,
                deviation_focused,
                ..
            } = &mut *engine_ref;
            let Some(surface) = surface.as_mut() else {
                return;
            };
            vehicles.sync(surface, &snapshot);

            let position = snapshot
                .vehicles
                .iter()
                .find_map(VehiclePositionMessage::position);
            if let Some(position) = position {
                if let Some(nearest) = deviation.recompute(surface, position, routes.segments()) {
                    if !*deviation_focused {
                        *deviation_focused = true;
                        deviation.focus(surface, position, nearest);
                    }
                }
            }
        });
    }

    {
        let engine = Rc::clone(&engine);
        on_cleanup(move || {
            let mut engine_ref = engine.borrow_mut();
            let MapEngine {
                controller,
                surface,
                routes,
                markers,
                deviation,
                vehicles,
                ..
            } = &mut *engine_ref;
            controller.cancel();
            if let Some(mut surface) = surface.take() {
                controller.teardown(&mut surface, routes, markers, deviation, vehicles);
            }
        });
    }

    view! {
        <div class="route-map" id=container_id node_ref=container_ref>
            <Show when=move || !loaded.get() && !failed.get()>
                <div class="route-map-loading">
                    <div class="route-map-spinner"></div>
                </div>
            </Show>
            <Show when=move || failed.get()>
                <div class="route-map-error">"Không thể tải bản đồ"</div>
            </Show>
        </div>
    }
}

/// Style resolution and map construction, with the one-shot retry when a
/// cached style turns out to be the reason construction failed.
async fn initialize_map(
    engine: &Rc<RefCell<MapEngine>>,
    container_id: &str,
    set_loaded: WriteSignal<bool>,
    set_failed: WriteSignal<bool>,
    get_map_instance: Option<Callback<JsValue>>,
    on_location_change: Option<Callback<geocoding::GeocodedLocation>>,
    on_map_click: Option<Callback<geocoding::GeocodedLocation>>,
) {
    let mut force_fresh = false;
    loop {
        engine.borrow_mut().controller.begin_style_fetch();

        let cached = if force_fresh {
            None
        } else {
            engine.borrow().controller.cache().load()
        };
        let load = match cached {
            Some(style) => StyleLoad {
                style,
                from_cache: true,
            },
            None => match style_api::fetch_map_style().await {
                Ok(style) => {
                    engine.borrow().controller.cache().save(&style);
                    StyleLoad {
                        style,
                        from_cache: false,
                    }
                }
                Err(err) => {
                    warn!("Map style fetch failed: {err}");
                    set_failed.set(true);
                    return;
                }
            },
        };
        if engine.borrow().controller.is_cancelled() {
            return;
        }
        engine.borrow_mut().controller.style_ready(&load);

        match MapLibreSurface::create(container_id, &load.style) {
            Ok(surface) => {
                wire_surface(
                    engine,
                    &surface,
                    set_loaded,
                    get_map_instance,
                    on_location_change,
                    on_map_click,
                );
                engine.borrow_mut().surface = Some(surface);
                return;
            }
            Err(_) => {
                let outcome = engine.borrow_mut().controller.construction_failed();
                match outcome {
                    ConstructionOutcome::RetryWithFreshStyle => {
                        log!("Map construction failed on a cached style, retrying fresh");
                        force_fresh = true;
                    }
                    ConstructionOutcome::Terminal => {
                        warn!("Map construction failed");
                        set_failed.set(true);
                        return;
                    }
                }
            }
        }
    }
}

fn wire_surface(
    engine: &Rc<RefCell<MapEngine>>,
    surface: &MapLibreSurface,
    set_loaded: WriteSignal<bool>,
    get_map_instance: Option<Callback<JsValue>>,
    on_location_change: Option<Callback<geocoding::GeocodedLocation>>,
    on_map_click: Option<Callback<geocoding::GeocodedLocation>>,
) {
    // Route-layer clicks toggle popups; hovering swaps the cursor
    let sink_engine = Rc::clone(engine);
    surface.set_layer_event_sink(Rc::new(move |event| {
        let mut engine_ref = sink_engine.borrow_mut();
        let MapEngine {
            controller,
            surface,
            routes,
            ..
        } = &mut *engine_ref;
        if !controller.is_loaded() {
            return;
        }
        let Some(surface) = surface.as_mut() else {
            return;
        };
        match event {
            LayerEvent::Click(layer_id) => {
                if let Some(index) = registry::route_layer_index(&layer_id) {
                    routes.handle_layer_click(surface, index);
                }
            }
            LayerEvent::Enter(_) => routes.handle_layer_hover(surface, true),
            LayerEvent::Leave(_) => routes.handle_layer_hover(surface, false),
        }
    }));

    // Base-surface clicks reverse-geocode and fire exactly one callback
    let click_engine = Rc::clone(engine);
    surface.on_base_click(move |point| {
        if !click_engine.borrow().controller.is_loaded() {
            return;
        }
        let engine = Rc::clone(&click_engine);
        wasm_bindgen_futures::spawn_local(async move {
            let location = geocoding::reverse_geocode(point.lat, point.lng).await;
            if engine.borrow().controller.is_cancelled() {
                return;
            }
            dispatch_map_click(
                location,
                on_location_change.map(|callback| move |loc| callback.call(loc)),
                on_map_click.map(|callback| move |loc| callback.call(loc)),
            );
        });
    });

    // The load handshake publishes the instance to dependents
    let load_engine = Rc::clone(engine);
    surface.on_load(move || {
        let became_loaded = load_engine.borrow_mut().controller.loaded();
        if !became_loaded {
            return;
        }
        set_loaded.set(true);
        if let Some(callback) = get_map_instance {
            let handle = load_engine
                .borrow()
                .surface
                .as_ref()
                .map(MapLibreSurface::map_handle);
            if let Some(handle) = handle {
                callback.call(handle);
            }
        }
    });
}

fn schedule_reveal_frame(engine: &Rc<RefCell<MapEngine>>, ticket: RevealTicket) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let engine = Rc::clone(engine);
    let callback = Closure::once(move || advance_reveal(&engine, ticket));
    let _ = window.request_animation_frame(callback.as_ref().unchecked_ref());
    callback.forget();
}

fn advance_reveal(engine: &Rc<RefCell<MapEngine>>, ticket: RevealTicket) {
    let step = {
        let mut engine_ref = engine.borrow_mut();
        let MapEngine {
            controller,
            surface,
            routes,
            ..
        } = &mut *engine_ref;
        if controller.is_cancelled() {
            return;
        }
        let Some(surface) = surface.as_mut() else {
            return;
        };
        routes.advance_reveal(surface, ticket)
    };
    match step {
        RevealStep::Frame => schedule_reveal_frame(engine, ticket),
        RevealStep::Pause(ms) => {
            let engine = Rc::clone(engine);
            Timeout::new(ms, move || advance_reveal(&engine, ticket)).forget();
        }
        RevealStep::Done | RevealStep::Cancelled => {}
    }
}
