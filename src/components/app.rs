use leptos::{component, view, Callback, IntoView, Signal};

#[allow(unused_imports)]
use crate::logging::log;

use crate::components::route_map::RouteMap;
use crate::geometry::LngLat;
use crate::models::{LocationKind, MapLocation, RouteSegment};
use crate::tracking::use_order_tracking;

fn sample_locations() -> Vec<MapLocation> {
    vec![
        MapLocation {
            lat: 10.8231,
            lng: 106.6297,
            address: "Quận Tân Bình, TP.HCM".to_string(),
            name: "Nhà xe Thành Công".to_string(),
            kind: LocationKind::Carrier,
            issue_category: None,
        },
        MapLocation {
            lat: 10.7769,
            lng: 106.7009,
            address: "Quận 1, TP.HCM".to_string(),
            name: "Điểm lấy hàng".to_string(),
            kind: LocationKind::Pickup,
            issue_category: None,
        },
        MapLocation {
            lat: 10.8506,
            lng: 106.7719,
            address: "TP. Thủ Đức".to_string(),
            name: "Điểm giao hàng".to_string(),
            kind: LocationKind::Delivery,
            issue_category: None,
        },
    ]
}

fn leg(order: u32, start: &str, end: &str, from: LngLat, to: LngLat) -> RouteSegment {
    // Straight interpolation stands in for the routed polyline
    let path = (0..=20)
        .map(|i| {
            let t = f64::from(i) / 20.0;
            LngLat::new(
                from.lng + (to.lng - from.lng) * t,
                from.lat + (to.lat - from.lat) * t,
            )
        })
        .collect();
    RouteSegment {
        segment_order: order,
        start_name: start.to_string(),
        end_name: end.to_string(),
        path,
        tolls: Vec::new(),
        distance: 9.0,
        segment_color: None,
        line_width: None,
        line_opacity: None,
        line_dasharray: None,
    }
}

fn sample_segments() -> Vec<RouteSegment> {
    let carrier = LngLat::new(106.6297, 10.8231);
    let pickup = LngLat::new(106.7009, 10.7769);
    let delivery = LngLat::new(106.7719, 10.8506);
    vec![
        leg(0, "Nhà xe", "Điểm lấy hàng", carrier, pickup),
        leg(1, "Điểm lấy hàng", "Điểm giao hàng", pickup, delivery),
        leg(2, "Điểm giao hàng", "Nhà xe", delivery, carrier),
    ]
}

/// Standalone shell around [`RouteMap`] with a sample order, used by the
/// demo bundle the static server ships.
#[component]
pub fn App() -> impl IntoView {
    let locations = Signal::derive(sample_locations);
    let segments = Signal::derive(sample_segments);
    let tracking = use_order_tracking("DEMO-0001");

    let on_map_click = Callback::new(|location: crate::api::geocoding::GeocodedLocation| {
        log!(
            "Map clicked at ({}, {}): {}",
            location.lat,
            location.lng,
            location.address
        );
    });

    view! {
        <div class="app">
            <RouteMap
                locations=locations
                segments=segments
                animated=true
                tracking=Signal::from(tracking)
                on_map_click=on_map_click
            />
        </div>
    }
}
