pub mod api;
pub mod constants;
pub mod geometry;
pub mod logging;
pub mod map;
pub mod models;

#[cfg(target_arch = "wasm32")]
pub mod tracking;

#[cfg(target_arch = "wasm32")]
pub mod components;

#[cfg(target_arch = "wasm32")]
pub use components::app::App;
#[cfg(target_arch = "wasm32")]
pub use components::route_map::RouteMap;
