use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A longitude/latitude pair in the order the map library and the routing
/// backend use on the wire: `[lng, lat]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    #[must_use]
    pub fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }

    /// Both coordinates present, finite and not NaN
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.lng.is_finite() && self.lat.is_finite()
    }
}

impl Serialize for LngLat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.lng, self.lat).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LngLat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (lng, lat) = <(f64, f64)>::deserialize(deserializer)?;
        Ok(Self { lng, lat })
    }
}

/// Axis-aligned bounding box over longitude/latitude.
///
/// Coordinates are treated as planar; routes in this domain span a single
/// metro area, far away from the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LngLatBounds {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl LngLatBounds {
    /// Bounding box of all valid points, or `None` when no valid point exists.
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a LngLat>,
    {
        let mut bounds: Option<Self> = None;
        for point in points {
            if !point.is_valid() {
                continue;
            }
            match &mut bounds {
                Some(b) => b.extend(*point),
                None => {
                    bounds = Some(Self {
                        min_lng: point.lng,
                        min_lat: point.lat,
                        max_lng: point.lng,
                        max_lat: point.lat,
                    });
                }
            }
        }
        bounds
    }

    pub fn extend(&mut self, point: LngLat) {
        self.min_lng = self.min_lng.min(point.lng);
        self.min_lat = self.min_lat.min(point.lat);
        self.max_lng = self.max_lng.max(point.lng);
        self.max_lat = self.max_lat.max(point.lat);
    }

    /// A box is usable for a camera fit only if every edge is finite and the
    /// minima do not exceed the maxima.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min_lng.is_finite()
            && self.min_lat.is_finite()
            && self.max_lng.is_finite()
            && self.max_lat.is_finite()
            && self.min_lng <= self.max_lng
            && self.min_lat <= self.max_lat
    }

    #[must_use]
    pub fn center(&self) -> LngLat {
        LngLat::new(
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }
}

/// Planar distance between two coordinates.
///
/// Latitude/longitude differences are treated as Euclidean axes with no
/// geodesic correction. Adequate at city scale; changing this would alter
/// which route vertex is selected as "closest" in edge cases near segment
/// endpoints, so it stays planar on purpose.
#[must_use]
pub fn planar_distance(a: LngLat, b: LngLat) -> f64 {
    let dx = a.lng - b.lng;
    let dy = a.lat - b.lat;
    (dx * dx + dy * dy).sqrt()
}

/// Bearing from `from` to `to` in degrees, clockwise from north.
///
/// Used to rotate vehicle markers along their direction of travel.
#[must_use]
pub fn bearing_degrees(from: LngLat, to: LngLat) -> f64 {
    let dx = to.lng - from.lng;
    let dy = to.lat - from.lat;
    let degrees = dx.atan2(dy).to_degrees();
    if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lnglat_serializes_as_pair() {
        let point = LngLat::new(106.7, 10.78);
        let json = serde_json::to_string(&point).expect("serialize");
        assert_eq!(json, "[106.7,10.78]");

        let back: LngLat = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, point);
    }

    #[test]
    fn test_nan_coordinates_are_invalid() {
        assert!(!LngLat::new(f64::NAN, 10.0).is_valid());
        assert!(!LngLat::new(106.0, f64::INFINITY).is_valid());
        assert!(LngLat::new(106.0, 10.0).is_valid());
    }

    #[test]
    fn test_bounds_skip_invalid_points() {
        let points = [
            LngLat::new(106.0, 10.0),
            LngLat::new(f64::NAN, 11.0),
            LngLat::new(107.0, 10.5),
        ];
        let bounds = LngLatBounds::from_points(points.iter()).expect("bounds");
        assert_eq!(bounds.min_lng, 106.0);
        assert_eq!(bounds.max_lng, 107.0);
        assert_eq!(bounds.min_lat, 10.0);
        assert_eq!(bounds.max_lat, 10.5);
    }

    #[test]
    fn test_bounds_of_no_valid_points_is_none() {
        let points = [LngLat::new(f64::NAN, 10.0)];
        assert!(LngLatBounds::from_points(points.iter()).is_none());
    }

    #[test]
    fn test_planar_distance_axis_aligned() {
        let a = LngLat::new(106.0, 10.0);
        let b = LngLat::new(106.003, 10.0);
        assert!((planar_distance(a, b) - 0.003).abs() < 1e-12);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = LngLat::new(106.0, 10.0);
        assert!((bearing_degrees(origin, LngLat::new(106.0, 11.0)) - 0.0).abs() < 1e-9);
        assert!((bearing_degrees(origin, LngLat::new(107.0, 10.0)) - 90.0).abs() < 1e-9);
        assert!((bearing_degrees(origin, LngLat::new(106.0, 9.0)) - 180.0).abs() < 1e-9);
        assert!((bearing_degrees(origin, LngLat::new(105.0, 10.0)) - 270.0).abs() < 1e-9);
    }
}
