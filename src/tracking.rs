//! Socket-backed live-tracking source.
//!
//! Connects to the tracking feed for one order and exposes whatever the
//! socket reports as a [`TrackingSnapshot`] signal. The map engine only
//! renders this output; reconnection policy belongs to the backend.

use leptos::{create_signal, on_cleanup, ReadSignal, SignalUpdate};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{MessageEvent, WebSocket};

#[allow(unused_imports)]
use crate::logging::{log, warn};

use crate::models::{TrackingSnapshot, VehiclePositionMessage};

fn tracking_url(order_code: &str) -> Option<String> {
    let location = web_sys::window()?.location();
    let protocol = location.protocol().ok()?;
    let host = location.host().ok()?;
    let scheme = if protocol == "https:" { "wss" } else { "ws" };
    Some(format!("{scheme}://{host}/ws/tracking/{order_code}"))
}

/// Subscribe to the live vehicle feed for an order.
///
/// Each socket message carries the full `VehiclePositionMessage[]`
/// snapshot; vehicles absent from the latest message are treated as gone.
/// The socket is closed when the owning scope is disposed.
#[must_use]
pub fn use_order_tracking(order_code: &str) -> ReadSignal<TrackingSnapshot> {
    let (snapshot, set_snapshot) = create_signal(TrackingSnapshot {
        vehicles: Vec::new(),
        is_connected: false,
        is_connecting: true,
    });

    let Some(url) = tracking_url(order_code) else {
        let _ = set_snapshot.try_update(|s| s.is_connecting = false);
        return snapshot;
    };

    let socket = match WebSocket::new(&url) {
        Ok(socket) => socket,
        Err(_) => {
            warn!("Failed to open tracking socket for {order_code}");
            let _ = set_snapshot.try_update(|s| s.is_connecting = false);
            return snapshot;
        }
    };

    let onopen = Closure::wrap(Box::new(move |_: JsValue| {
        let _ = set_snapshot.try_update(|s| {
            s.is_connected = true;
            s.is_connecting = false;
        });
    }) as Box<dyn FnMut(JsValue)>);
    socket.set_onopen(Some(onopen.as_ref().unchecked_ref()));
    onopen.forget();

    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        let Some(text) = event.data().as_string() else {
            return;
        };
        match serde_json::from_str::<Vec<VehiclePositionMessage>>(&text) {
            Ok(vehicles) => {
                let _ = set_snapshot.try_update(|s| s.vehicles = vehicles);
            }
            Err(err) => {
                warn!("Ignoring malformed tracking message: {err}");
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    socket.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    onmessage.forget();

    let onclose = Closure::wrap(Box::new(move |_: JsValue| {
        let _ = set_snapshot.try_update(|s| {
            s.is_connected = false;
            s.is_connecting = false;
        });
    }) as Box<dyn FnMut(JsValue)>);
    socket.set_onclose(Some(onclose.as_ref().unchecked_ref()));
    socket.set_onerror(Some(onclose.as_ref().unchecked_ref()));
    onclose.forget();

    on_cleanup(move || {
        let _ = socket.close();
    });

    snapshot
}
