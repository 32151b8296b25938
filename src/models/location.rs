use serde::{Deserialize, Serialize};

use crate::geometry::LngLat;

/// Semantic role of a point of interest on the route map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocationKind {
    Carrier,
    Pickup,
    Delivery,
    Stopover,
}

/// Why a stopover exists. Unknown categories reported by the backend
/// deserialize to `General`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum IssueCategory {
    Traffic,
    Breakdown,
    Weather,
    Accident,
    Cargo,
    General,
}

impl<'de> serde::Deserialize<'de> for IssueCategory {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "traffic" => Self::Traffic,
            "breakdown" => Self::Breakdown,
            "weather" => Self::Weather,
            "accident" => Self::Accident,
            "cargo" => Self::Cargo,
            _ => Self::General,
        })
    }
}

/// Icon name plus fill color used for a point-of-interest marker element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerAppearance {
    pub icon: &'static str,
    pub color: &'static str,
}

/// A point of interest supplied by upstream pages (order addresses, issue
/// reports). Immutable once constructed; the marker set is replaced
/// wholesale when the list changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_category: Option<IssueCategory>,
}

impl MapLocation {
    #[must_use]
    pub fn position(&self) -> LngLat {
        LngLat::new(self.lng, self.lat)
    }

    #[must_use]
    pub fn has_valid_position(&self) -> bool {
        self.position().is_valid()
    }

    /// Icon and color for this location's marker. Stopovers are refined by
    /// their issue category; every category maps to a distinct pair.
    #[must_use]
    pub fn marker_appearance(&self) -> MarkerAppearance {
        match self.kind {
            LocationKind::Carrier => MarkerAppearance {
                icon: "garage",
                color: "#2563eb",
            },
            LocationKind::Pickup => MarkerAppearance {
                icon: "package-up",
                color: "#16a34a",
            },
            LocationKind::Delivery => MarkerAppearance {
                icon: "package-down",
                color: "#9333ea",
            },
            LocationKind::Stopover => {
                issue_appearance(self.issue_category.unwrap_or(IssueCategory::General))
            }
        }
    }
}

fn issue_appearance(category: IssueCategory) -> MarkerAppearance {
    match category {
        IssueCategory::Traffic => MarkerAppearance {
            icon: "traffic-cone",
            color: "#f97316",
        },
        IssueCategory::Breakdown => MarkerAppearance {
            icon: "wrench",
            color: "#dc2626",
        },
        IssueCategory::Weather => MarkerAppearance {
            icon: "cloud-rain",
            color: "#0ea5e9",
        },
        IssueCategory::Accident => MarkerAppearance {
            icon: "alert-triangle",
            color: "#b91c1c",
        },
        IssueCategory::Cargo => MarkerAppearance {
            icon: "package-x",
            color: "#ca8a04",
        },
        IssueCategory::General => MarkerAppearance {
            icon: "alert-circle",
            color: "#6b7280",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(kind: LocationKind, issue: Option<IssueCategory>) -> MapLocation {
        MapLocation {
            lat: 10.78,
            lng: 106.7,
            address: "Q1, TP.HCM".to_string(),
            name: "Test".to_string(),
            kind,
            issue_category: issue,
        }
    }

    #[test]
    fn test_nan_latitude_is_invalid() {
        let mut loc = location(LocationKind::Pickup, None);
        loc.lat = f64::NAN;
        assert!(!loc.has_valid_position());
    }

    #[test]
    fn test_stopover_categories_map_to_distinct_pairs() {
        let categories = [
            IssueCategory::Traffic,
            IssueCategory::Breakdown,
            IssueCategory::Weather,
            IssueCategory::Accident,
            IssueCategory::Cargo,
            IssueCategory::General,
        ];
        let mut seen = Vec::new();
        for category in categories {
            let appearance = location(LocationKind::Stopover, Some(category)).marker_appearance();
            assert!(
                !seen.contains(&appearance),
                "duplicate appearance for {category:?}"
            );
            seen.push(appearance);
        }
    }

    #[test]
    fn test_stopover_without_category_uses_general_pair() {
        let bare = location(LocationKind::Stopover, None).marker_appearance();
        let general =
            location(LocationKind::Stopover, Some(IssueCategory::General)).marker_appearance();
        assert_eq!(bare, general);
    }

    #[test]
    fn test_unknown_issue_category_deserializes_to_general() {
        let json = r#"{
            "lat": 10.78,
            "lng": 106.7,
            "address": "",
            "name": "Sự cố",
            "type": "stopover",
            "issueCategory": "somethingNew"
        }"#;
        let loc: MapLocation = serde_json::from_str(json).expect("deserialize");
        assert_eq!(loc.issue_category, Some(IssueCategory::General));
    }
}
