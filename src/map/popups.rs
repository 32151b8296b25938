use crate::constants::{POPUP_BASE_OFFSET_Y, POPUP_SPREAD_X};
use crate::models::RouteSegment;

/// Anchor offset for the popup of segment `index` out of `total`, chosen so
/// consecutive segment popups do not visually collide.
///
/// With two or fewer popups there is not enough crowding to warrant
/// spreading; with more, the first is pushed left, the last right, and
/// interior popups are spread linearly between those extremes.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn offset_for(index: usize, total: usize) -> (f64, f64) {
    if total <= 2 {
        return (0.0, POPUP_BASE_OFFSET_Y);
    }
    let fraction = index as f64 / (total - 1) as f64;
    let dx = -POPUP_SPREAD_X + fraction * 2.0 * POPUP_SPREAD_X;
    (dx, POPUP_BASE_OFFSET_Y)
}

/// Popup body for a route leg: translated endpoint names, leg distance with
/// one decimal, and the toll gates crossed, if any.
#[must_use]
pub fn popup_html(segment: &RouteSegment) -> String {
    let mut html = format!(
        "<div class=\"route-popup\">\
         <div class=\"route-popup-title\">{} → {}</div>\
         <div class=\"route-popup-distance\">{:.1} km</div>",
        escape_html(&segment.start_name),
        escape_html(&segment.end_name),
        segment.distance,
    );
    if !segment.tolls.is_empty() {
        html.push_str("<ul class=\"route-popup-tolls\">");
        for toll in &segment.tolls {
            html.push_str(&format!(
                "<li><span class=\"toll-name\">{}</span>\
                 <span class=\"toll-address\">{}</span>\
                 <span class=\"toll-amount\">{}</span></li>",
                escape_html(&toll.name),
                escape_html(&toll.address),
                format_vnd(toll.amount),
            ));
        }
        html.push_str("</ul>");
    }
    html.push_str("</div>");
    html
}

/// Vietnamese currency formatting: thousands grouped with dots, đồng sign
/// appended, no decimals.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn format_vnd(amount: f64) -> String {
    let value = amount.round() as i64;
    let digits = value.abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 2);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{grouped} ₫")
}

fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LngLat;
    use crate::models::TollDetail;

    #[test]
    fn test_two_or_fewer_popups_share_the_base_offset() {
        assert_eq!(offset_for(0, 1), (0.0, -15.0));
        assert_eq!(offset_for(0, 2), (0.0, -15.0));
        assert_eq!(offset_for(1, 2), (0.0, -15.0));
    }

    #[test]
    fn test_three_popups_spread_to_extremes_and_middle() {
        assert_eq!(offset_for(0, 3), (-50.0, -15.0));
        assert_eq!(offset_for(1, 3), (0.0, -15.0));
        assert_eq!(offset_for(2, 3), (50.0, -15.0));
    }

    #[test]
    fn test_five_popups_are_strictly_increasing_in_dx() {
        assert_eq!(offset_for(0, 5), (-50.0, -15.0));
        assert_eq!(offset_for(4, 5), (50.0, -15.0));
        let mut previous = f64::NEG_INFINITY;
        for index in 0..5 {
            let (dx, dy) = offset_for(index, 5);
            assert!(dx > previous, "dx not increasing at index {index}");
            assert_eq!(dy, -15.0);
            previous = dx;
        }
    }

    #[test]
    fn test_vnd_grouping() {
        assert_eq!(format_vnd(0.0), "0 ₫");
        assert_eq!(format_vnd(900.0), "900 ₫");
        assert_eq!(format_vnd(35_000.0), "35.000 ₫");
        assert_eq!(format_vnd(1_234_567.4), "1.234.567 ₫");
    }

    #[test]
    fn test_popup_html_contents() {
        let segment = RouteSegment {
            segment_order: 1,
            start_name: "Điểm lấy hàng".to_string(),
            end_name: "Điểm giao hàng".to_string(),
            path: vec![LngLat::new(106.7, 10.78), LngLat::new(106.71, 10.79)],
            tolls: vec![TollDetail {
                name: "BOT Xa lộ Hà Nội".to_string(),
                address: "TP. Thủ Đức".to_string(),
                amount: 35_000.0,
            }],
            distance: 12.345,
            segment_color: None,
            line_width: None,
            line_opacity: None,
            line_dasharray: None,
        };
        let html = popup_html(&segment);
        assert!(html.contains("Điểm lấy hàng → Điểm giao hàng"));
        assert!(html.contains("12.3 km"));
        assert!(html.contains("35.000 ₫"));
    }

    #[test]
    fn test_popup_html_escapes_markup_in_names() {
        let mut segment = RouteSegment {
            segment_order: 0,
            start_name: "<script>x</script>".to_string(),
            end_name: "B".to_string(),
            path: Vec::new(),
            tolls: Vec::new(),
            distance: 0.0,
            segment_color: None,
            line_width: None,
            line_opacity: None,
            line_dasharray: None,
        };
        segment.distance = 1.0;
        let html = popup_html(&segment);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
