/// localStorage key holding the cached map style document
pub const STYLE_CACHE_KEY: &str = "fleet_map_style_cache";

/// Cached styles older than this are discarded and re-fetched (7 days)
pub const STYLE_CACHE_TTL_MS: i64 = 7 * 24 * 60 * 60 * 1000;

// Route leg palette. Legs are colored by their position in the trip:
// carrier -> pickup, pickup -> delivery, delivery -> carrier.
pub const ROUTE_COLOR_BLUE: &str = "#2563eb";
pub const ROUTE_COLOR_GREEN: &str = "#16a34a";
pub const ROUTE_COLOR_PURPLE: &str = "#9333ea";

pub const DEFAULT_LINE_WIDTH: f64 = 6.0;
pub const DEFAULT_LINE_OPACITY: f64 = 0.8;

/// Points revealed per animation frame
pub const REVEAL_POINTS_PER_FRAME: usize = 2;
/// Pause between two revealed segments
pub const REVEAL_SEGMENT_PAUSE_MS: u32 = 200;

/// Zoom used when centering on a single point of interest
pub const SINGLE_MARKER_ZOOM: f64 = 14.0;
pub const MARKER_FIT_PADDING_PX: f64 = 60.0;
pub const MARKER_FIT_MAX_ZOOM: f64 = 15.0;
/// Camera fit waits this long so freshly inserted marker DOM can settle
pub const MARKER_FIT_DELAY_MS: u32 = 150;

pub const DEVIATION_FIT_PADDING_PX: f64 = 80.0;
pub const DEVIATION_FIT_MAX_ZOOM: f64 = 16.0;

/// Zoom used when easing to a selected vehicle
pub const VEHICLE_FOCUS_ZOOM: f64 = 15.0;

/// Where the map opens before any data arrives (central Hồ Chí Minh City)
pub const DEFAULT_MAP_CENTER: [f64; 2] = [106.660172, 10.762622];
pub const DEFAULT_MAP_ZOOM: f64 = 9.5;

pub const POPUP_BASE_OFFSET_Y: f64 = -15.0;
/// Horizontal half-range over which crowded popups are spread
pub const POPUP_SPREAD_X: f64 = 50.0;
