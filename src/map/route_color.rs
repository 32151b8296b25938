use crate::constants::{ROUTE_COLOR_BLUE, ROUTE_COLOR_GREEN, ROUTE_COLOR_PURPLE};
use crate::models::RouteSegment;

/// What a leg endpoint's display name says the endpoint is. Names arrive
/// either in English or already translated to Vietnamese, so both forms are
/// recognized, case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndpointKind {
    Carrier,
    Pickup,
    Delivery,
    Stopover,
}

fn classify_endpoint(name: &str) -> Option<EndpointKind> {
    let name = name.to_lowercase();
    if name.contains("carrier") || name.contains("nhà xe") {
        Some(EndpointKind::Carrier)
    } else if name.contains("pickup") || name.contains("lấy hàng") {
        Some(EndpointKind::Pickup)
    } else if name.contains("delivery") || name.contains("giao hàng") {
        Some(EndpointKind::Delivery)
    } else if name.contains("stopover") || name.contains("điểm dừng") {
        Some(EndpointKind::Stopover)
    } else {
        None
    }
}

/// Line color for a route leg, in priority order: an explicit per-segment
/// override wins outright, then the endpoint-name pattern, then the
/// `segment_order` fallback.
#[must_use]
pub fn color_for(segment: &RouteSegment) -> String {
    if let Some(color) = &segment.segment_color {
        return color.clone();
    }
    if let Some(color) = endpoint_pattern_color(segment) {
        return color.to_string();
    }
    order_fallback_color(segment.segment_order).to_string()
}

/// Leg color by the semantic names of its endpoints.
///
/// Pickup-to-delivery legs (including via a stopover) are green,
/// delivery-back-to-carrier legs are purple, carrier-to-pickup legs are
/// blue. A stopover-to-stopover leg is placed by `segment_order`: before
/// the pickup (order 0) it is blue, after the delivery (order above 1)
/// purple; anything else is left to the fallback.
fn endpoint_pattern_color(segment: &RouteSegment) -> Option<&'static str> {
    use EndpointKind::{Carrier, Delivery, Pickup, Stopover};

    let start = classify_endpoint(&segment.start_name)?;
    let end = classify_endpoint(&segment.end_name)?;
    match (start, end) {
        (Carrier, Pickup | Stopover) | (Stopover, Pickup) => Some(ROUTE_COLOR_BLUE),
        (Pickup, Delivery | Stopover) | (Stopover, Delivery) => Some(ROUTE_COLOR_GREEN),
        (Delivery, Carrier | Stopover) | (Stopover, Carrier) => Some(ROUTE_COLOR_PURPLE),
        (Stopover, Stopover) => match segment.segment_order {
            0 => Some(ROUTE_COLOR_BLUE),
            order if order > 1 => Some(ROUTE_COLOR_PURPLE),
            _ => None,
        },
        _ => None,
    }
}

fn order_fallback_color(segment_order: u32) -> &'static str {
    match segment_order {
        0 => ROUTE_COLOR_BLUE,
        1 => ROUTE_COLOR_GREEN,
        _ => ROUTE_COLOR_PURPLE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LngLat;

    fn segment(order: u32, start: &str, end: &str) -> RouteSegment {
        RouteSegment {
            segment_order: order,
            start_name: start.to_string(),
            end_name: end.to_string(),
            path: vec![LngLat::new(106.7, 10.78), LngLat::new(106.71, 10.79)],
            tolls: Vec::new(),
            distance: 1.0,
            segment_color: None,
            line_width: None,
            line_opacity: None,
            line_dasharray: None,
        }
    }

    #[test]
    fn test_explicit_override_wins() {
        let mut seg = segment(1, "Pickup", "Delivery");
        seg.segment_color = Some("#ff00ff".to_string());
        assert_eq!(color_for(&seg), "#ff00ff");
    }

    #[test]
    fn test_pickup_to_delivery_is_green_regardless_of_order() {
        for order in [0, 1, 5] {
            assert_eq!(
                color_for(&segment(order, "Pickup", "Delivery")),
                ROUTE_COLOR_GREEN
            );
        }
    }

    #[test]
    fn test_vietnamese_names_match_case_insensitively() {
        assert_eq!(
            color_for(&segment(7, "Điểm Lấy Hàng", "ĐIỂM GIAO HÀNG")),
            ROUTE_COLOR_GREEN
        );
        assert_eq!(
            color_for(&segment(7, "Nhà xe Thành Công", "Điểm lấy hàng")),
            ROUTE_COLOR_BLUE
        );
        assert_eq!(
            color_for(&segment(7, "điểm giao hàng", "nhà xe")),
            ROUTE_COLOR_PURPLE
        );
    }

    #[test]
    fn test_legs_via_stopover_inherit_leg_color() {
        assert_eq!(
            color_for(&segment(0, "Carrier", "Stopover")),
            ROUTE_COLOR_BLUE
        );
        assert_eq!(
            color_for(&segment(1, "Stopover", "Delivery")),
            ROUTE_COLOR_GREEN
        );
        assert_eq!(
            color_for(&segment(2, "Delivery", "Điểm dừng")),
            ROUTE_COLOR_PURPLE
        );
    }

    #[test]
    fn test_stopover_to_stopover_is_placed_by_order() {
        assert_eq!(
            color_for(&segment(0, "Stopover", "Điểm dừng 2")),
            ROUTE_COLOR_BLUE
        );
        assert_eq!(
            color_for(&segment(3, "Stopover 1", "Stopover 2")),
            ROUTE_COLOR_PURPLE
        );
        // Order 1 has no pattern answer, the order fallback decides
        assert_eq!(
            color_for(&segment(1, "Stopover 1", "Stopover 2")),
            ROUTE_COLOR_GREEN
        );
    }

    #[test]
    fn test_unrecognized_names_fall_back_on_order() {
        assert_eq!(color_for(&segment(0, "A", "B")), ROUTE_COLOR_BLUE);
        assert_eq!(color_for(&segment(1, "A", "B")), ROUTE_COLOR_GREEN);
        assert_eq!(color_for(&segment(2, "A", "B")), ROUTE_COLOR_PURPLE);
        assert_eq!(color_for(&segment(9, "A", "B")), ROUTE_COLOR_PURPLE);
    }
}
