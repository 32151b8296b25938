mod location;
mod segment;
mod vehicle;

pub use location::{IssueCategory, LocationKind, MapLocation, MarkerAppearance};
pub use segment::{RouteSegment, TollDetail};
pub use vehicle::{DriverInfo, TrackingSnapshot, VehiclePositionMessage};
