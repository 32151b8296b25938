#![warn(clippy::complexity)]
#![warn(clippy::perf)]
#![warn(clippy::style)]
#![warn(clippy::suspicious)]

#[cfg(target_arch = "wasm32")]
fn main() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(fleet_map::App);
}

// The app only runs in the browser; the native build exists for unit tests
// and benches on the library crate.
#[cfg(not(target_arch = "wasm32"))]
fn main() {}
