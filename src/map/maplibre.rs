//! MapLibre GL JS bindings and the browser [`MapSurface`] implementation.
//!
//! The JS library is loaded globally (`window.maplibregl`) by the host
//! page. Everything here is glue; engine behavior lives in the
//! target-independent modules.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::constants::MARKER_FIT_DELAY_MS;
use crate::geometry::{LngLat, LngLatBounds};
use crate::map::surface::{Cursor, LineStyle, MapSurface};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = maplibregl)]
    pub type Map;

    #[wasm_bindgen(catch, constructor, js_namespace = maplibregl, js_class = "Map")]
    pub fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_name = on)]
    pub fn on_layer(this: &Map, event: &str, layer_id: &str, listener: &js_sys::Function);

    #[wasm_bindgen(method, js_name = addSource)]
    fn add_source(this: &Map, id: &str, source: &JsValue);

    #[wasm_bindgen(method, js_name = getSource)]
    fn get_source(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = removeSource)]
    fn remove_source(this: &Map, id: &str);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &Map, layer: &JsValue);

    #[wasm_bindgen(method, js_name = getLayer)]
    fn get_layer(this: &Map, id: &str) -> JsValue;

    #[wasm_bindgen(method, js_name = removeLayer)]
    fn remove_layer(this: &Map, id: &str);

    #[wasm_bindgen(method, js_name = jumpTo)]
    fn jump_to(this: &Map, options: &JsValue);

    #[wasm_bindgen(method, js_name = easeTo)]
    fn ease_to(this: &Map, options: &JsValue);

    #[wasm_bindgen(method, js_name = fitBounds)]
    fn fit_bounds(this: &Map, bounds: &JsValue, options: &JsValue);

    #[wasm_bindgen(method, js_name = getCanvas)]
    fn get_canvas(this: &Map) -> web_sys::HtmlElement;

    #[wasm_bindgen(method)]
    fn remove(this: &Map);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = maplibregl)]
    type GeoJsonSource;

    #[wasm_bindgen(method, js_name = setData)]
    fn set_data(this: &GeoJsonSource, data: &JsValue);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = maplibregl)]
    type Marker;

    #[wasm_bindgen(constructor, js_namespace = maplibregl, js_class = "Marker")]
    fn new_with_options(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Marker, lng_lat: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setRotation)]
    fn set_rotation(this: &Marker, rotation: f64) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method, js_name = getElement)]
    fn get_element(this: &Marker) -> web_sys::HtmlElement;

    #[wasm_bindgen(method)]
    fn remove(this: &Marker);
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = maplibregl)]
    type Popup;

    #[wasm_bindgen(constructor, js_namespace = maplibregl, js_class = "Popup")]
    fn new_with_options(options: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setLngLat)]
    fn set_lng_lat(this: &Popup, lng_lat: &JsValue) -> Popup;

    #[wasm_bindgen(method, js_name = setHTML)]
    fn set_html(this: &Popup, html: &str) -> Popup;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &Popup, map: &Map) -> Popup;

    #[wasm_bindgen(method)]
    fn remove(this: &Popup);
}

/// Event forwarded from a route layer to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerEvent {
    Click(String),
    Enter(String),
    Leave(String),
}

fn parse_js(json: &serde_json::Value) -> JsValue {
    js_sys::JSON::parse(&json.to_string()).unwrap_or(JsValue::NULL)
}

fn lng_lat_js(point: LngLat) -> JsValue {
    js_sys::Array::of2(&point.lng.into(), &point.lat.into()).into()
}

fn bounds_js(bounds: LngLatBounds) -> JsValue {
    parse_js(&serde_json::json!([
        [bounds.min_lng, bounds.min_lat],
        [bounds.max_lng, bounds.max_lat],
    ]))
}

fn line_feature(path: &[LngLat]) -> serde_json::Value {
    let coordinates: Vec<[f64; 2]> = path.iter().map(|p| [p.lng, p.lat]).collect();
    serde_json::json!({
        "type": "Feature",
        "properties": {},
        "geometry": {
            "type": "LineString",
            "coordinates": coordinates,
        },
    })
}

/// The browser surface: one MapLibre map plus the JS objects (markers,
/// popups) the engine asked it to create, keyed by the engine's ids.
pub struct MapLibreSurface {
    map: Map,
    /// CSS class scoping marker elements to this instance's container, so
    /// cleanup can never touch markers of a sibling map on the same page.
    scope_class: String,
    markers: HashMap<String, Marker>,
    popups: HashMap<String, Popup>,
    layer_sink: Rc<RefCell<Option<Rc<dyn Fn(LayerEvent)>>>>,
    /// Set by a route-layer click so the following base-map click is not
    /// mistaken for "add waypoint here".
    suppress_base_click: Rc<Cell<bool>>,
}

impl MapLibreSurface {
    /// Construct a map against the given container element.
    ///
    /// # Errors
    ///
    /// Returns the JS exception if the map library is missing or rejects
    /// the style document.
    pub fn create(container_id: &str, style: &serde_json::Value) -> Result<Self, JsValue> {
        let options = parse_js(&serde_json::json!({
            "container": container_id,
            "style": style,
            "center": crate::constants::DEFAULT_MAP_CENTER,
            "zoom": crate::constants::DEFAULT_MAP_ZOOM,
            "attributionControl": false,
        }));
        let map = Map::new(&options)?;
        Ok(Self {
            map,
            scope_class: format!("fleet-map-{container_id}"),
            markers: HashMap::new(),
            popups: HashMap::new(),
            layer_sink: Rc::new(RefCell::new(None)),
            suppress_base_click: Rc::new(Cell::new(false)),
        })
    }

    /// One-time `load` handshake. The engine publishes the surface to
    /// dependents only after this fires.
    pub fn on_load(&self, callback: impl FnOnce() + 'static) {
        let closure = Closure::once(callback);
        self.map.on("load", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Clicks on the base surface (not on a route layer).
    pub fn on_base_click(&self, callback: impl Fn(LngLat) + 'static) {
        let suppress = Rc::clone(&self.suppress_base_click);
        let closure = Closure::wrap(Box::new(move |event: JsValue| {
            if suppress.replace(false) {
                return;
            }
            let Ok(lng_lat) = js_sys::Reflect::get(&event, &"lngLat".into()) else {
                return;
            };
            let lng = js_sys::Reflect::get(&lng_lat, &"lng".into())
                .ok()
                .and_then(|v| v.as_f64());
            let lat = js_sys::Reflect::get(&lng_lat, &"lat".into())
                .ok()
                .and_then(|v| v.as_f64());
            if let (Some(lng), Some(lat)) = (lng, lat) {
                callback(LngLat::new(lng, lat));
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.map.on("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Register the engine-side receiver for route-layer events. Layers
    /// created afterwards forward their click/hover events to it.
    pub fn set_layer_event_sink(&self, sink: Rc<dyn Fn(LayerEvent)>) {
        *self.layer_sink.borrow_mut() = Some(sink);
    }

    pub fn map_handle(&self) -> JsValue {
        self.map.clone().into()
    }

    fn attach_layer_events(&self, layer_id: &str) {
        let sink = Rc::clone(&self.layer_sink);
        let suppress = Rc::clone(&self.suppress_base_click);
        let id = layer_id.to_string();
        let click = Closure::wrap(Box::new(move |_event: JsValue| {
            suppress.set(true);
            if let Some(sink) = sink.borrow().as_ref() {
                sink(LayerEvent::Click(id.clone()));
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.map
            .on_layer("click", layer_id, click.as_ref().unchecked_ref());
        click.forget();

        let sink = Rc::clone(&self.layer_sink);
        let id = layer_id.to_string();
        let enter = Closure::wrap(Box::new(move |_event: JsValue| {
            if let Some(sink) = sink.borrow().as_ref() {
                sink(LayerEvent::Enter(id.clone()));
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.map
            .on_layer("mouseenter", layer_id, enter.as_ref().unchecked_ref());
        enter.forget();

        let sink = Rc::clone(&self.layer_sink);
        let id = layer_id.to_string();
        let leave = Closure::wrap(Box::new(move |_event: JsValue| {
            if let Some(sink) = sink.borrow().as_ref() {
                sink(LayerEvent::Leave(id.clone()));
            }
        }) as Box<dyn FnMut(JsValue)>);
        self.map
            .on_layer("mouseleave", layer_id, leave.as_ref().unchecked_ref());
        leave.forget();
    }

    fn marker_element(&self, icon: &str, color: &str) -> Option<web_sys::HtmlElement> {
        let document = web_sys::window()?.document()?;
        let element = document.create_element("div").ok()?;
        element.set_class_name(&format!(
            "fleet-map-marker fleet-map-marker--{icon} {}",
            self.scope_class
        ));
        let element: web_sys::HtmlElement = element.dyn_into().ok()?;
        let _ = element.style().set_property("background-color", color);
        Some(element)
    }
}

impl MapSurface for MapLibreSurface {
    fn add_line_source(&mut self, id: &str, path: &[LngLat]) {
        let source = serde_json::json!({
            "type": "geojson",
            "data": line_feature(path),
        });
        self.map.add_source(id, &parse_js(&source));
    }

    fn set_line_source(&mut self, id: &str, path: &[LngLat]) {
        let source = self.map.get_source(id);
        if source.is_undefined() || source.is_null() {
            return;
        }
        let source: GeoJsonSource = source.unchecked_into();
        source.set_data(&parse_js(&line_feature(path)));
    }

    fn add_line_layer(&mut self, id: &str, source_id: &str, style: &LineStyle) {
        let mut paint = serde_json::json!({
            "line-color": style.color,
            "line-width": style.width,
            "line-opacity": style.opacity,
        });
        if let Some(dasharray) = &style.dasharray {
            paint["line-dasharray"] = serde_json::json!(dasharray);
        }
        let layer = serde_json::json!({
            "id": id,
            "type": "line",
            "source": source_id,
            "layout": {"line-join": "round", "line-cap": "round"},
            "paint": paint,
        });
        self.map.add_layer(&parse_js(&layer));
        self.attach_layer_events(id);
    }

    fn remove_layer(&mut self, id: &str) {
        if !self.map.get_layer(id).is_undefined() {
            self.map.remove_layer(id);
        }
    }

    fn remove_source(&mut self, id: &str) {
        if !self.map.get_source(id).is_undefined() {
            self.map.remove_source(id);
        }
    }

    fn add_marker(&mut self, id: &str, position: LngLat, icon: &str, color: &str) {
        let options = match self.marker_element(icon, color) {
            Some(element) => {
                let options = js_sys::Object::new();
                let _ = js_sys::Reflect::set(&options, &"element".into(), &element.into());
                let _ = js_sys::Reflect::set(
                    &options,
                    &"rotationAlignment".into(),
                    &"map".into(),
                );
                options.into()
            }
            None => JsValue::UNDEFINED,
        };
        let marker = Marker::new_with_options(&options);
        marker.set_lng_lat(&lng_lat_js(position)).add_to(&self.map);
        self.markers.insert(id.to_string(), marker);
    }

    fn move_marker(&mut self, id: &str, position: LngLat, rotation_deg: f64) {
        if let Some(marker) = self.markers.get(id) {
            marker.set_lng_lat(&lng_lat_js(position));
            marker.set_rotation(rotation_deg);
        }
    }

    fn set_marker_selected(&mut self, id: &str, selected: bool) {
        if let Some(marker) = self.markers.get(id) {
            let class_list = marker.get_element().class_list();
            let result = if selected {
                class_list.add_1("fleet-map-marker--selected")
            } else {
                class_list.remove_1("fleet-map-marker--selected")
            };
            let _ = result;
        }
    }

    fn remove_marker(&mut self, id: &str) {
        if let Some(marker) = self.markers.remove(id) {
            marker.remove();
        }
    }

    fn add_popup(&mut self, id: &str, anchor: LngLat, offset: (f64, f64), html: &str) {
        let options = parse_js(&serde_json::json!({
            "offset": [offset.0, offset.1],
            "closeButton": true,
            "closeOnClick": false,
        }));
        let popup = Popup::new_with_options(&options);
        popup.set_lng_lat(&lng_lat_js(anchor)).set_html(html);
        self.popups.insert(id.to_string(), popup);
    }

    fn set_popup_open(&mut self, id: &str, open: bool) {
        if let Some(popup) = self.popups.get(id) {
            if open {
                popup.add_to(&self.map);
            } else {
                popup.remove();
            }
        }
    }

    fn remove_popup(&mut self, id: &str) {
        if let Some(popup) = self.popups.remove(id) {
            popup.remove();
        }
    }

    fn jump_to(&mut self, center: LngLat, zoom: f64) {
        self.map.jump_to(&parse_js(&serde_json::json!({
            "center": [center.lng, center.lat],
            "zoom": zoom,
        })));
    }

    fn ease_to(&mut self, center: LngLat, zoom: f64) {
        self.map.ease_to(&parse_js(&serde_json::json!({
            "center": [center.lng, center.lat],
            "zoom": zoom,
        })));
    }

    fn fit_bounds(&mut self, bounds: LngLatBounds, padding_px: f64, max_zoom: f64) {
        // Deferred a beat so freshly inserted marker DOM can settle
        let map = self.map.clone();
        let bounds = bounds_js(bounds);
        let options = parse_js(&serde_json::json!({
            "padding": padding_px,
            "maxZoom": max_zoom,
        }));
        Timeout::new(MARKER_FIT_DELAY_MS, move || {
            map.fit_bounds(&bounds, &options);
        })
        .forget();
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        let value = match cursor {
            Cursor::Default => "",
            Cursor::Pointer => "pointer",
        };
        let _ = self.map.get_canvas().style().set_property("cursor", value);
    }

    fn destroy(&mut self) {
        for (_, marker) in self.markers.drain() {
            marker.remove();
        }
        for (_, popup) in self.popups.drain() {
            popup.remove();
        }
        self.map.remove();
    }
}
