pub mod geocoding;
pub mod style;
