/// Conditional logging module for development builds
///
/// The `log!` macro provides informational console logging that is compiled out
/// in production (release) builds by default. It falls back to stderr when the
/// crate is compiled for a native target (unit tests, benches).
///
/// Logging is enabled when either:
/// - Building in debug mode (`cfg(debug_assertions)`)
/// - The `console_logging` feature is explicitly enabled
///
/// # Examples
///
/// ```ignore
/// use crate::logging::log;
///
/// log!("Skipping location without coordinates: {}", name);
/// ```
#[macro_export]
macro_rules! log {
    ($($arg:expr),+ $(,)?) => {
        #[cfg(any(debug_assertions, feature = "console_logging"))]
        {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&format!($($arg),+).into());
            #[cfg(not(target_arch = "wasm32"))]
            eprintln!($($arg),+);
        }
    };
}

/// Unconditional warning, kept in release builds. Goes to the browser console
/// on wasm and to stderr on native targets.
#[macro_export]
macro_rules! warn {
    ($($arg:expr),+ $(,)?) => {{
        #[cfg(target_arch = "wasm32")]
        web_sys::console::warn_1(&format!($($arg),+).into());
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!($($arg),+);
    }};
}

pub use log;
pub use crate::warn;
