pub mod deviation;
pub mod lifecycle;
pub mod markers;
pub mod popups;
pub mod registry;
pub mod route_color;
pub mod route_layers;
pub mod style_cache;
pub mod surface;
pub mod vehicles;

#[cfg(target_arch = "wasm32")]
pub mod maplibre;

#[cfg(test)]
pub mod testing;

pub use lifecycle::{ConstructionOutcome, MapLifecycleController, MapPhase, StyleLoad};
pub use registry::HandleRegistry;
pub use surface::{Cursor, LineStyle, MapSurface};
