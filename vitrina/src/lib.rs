//! Umbrella crate for the storefront's soft-navigation layer.
//!
//! Re-exports the navigation controller ([`vitrina_nav`]) and the shared
//! browser glue, plus a [`Vitrina`] bootstrap that wires everything into
//! the current document from a wasm entry point:
//!
//! ```rust,ignore
//! use vitrina::Vitrina;
//!
//! #[wasm_bindgen(start)]
//! fn start() -> Result<(), wasm_bindgen::JsValue> {
//!     Vitrina::new().install()
//! }
//! ```

pub mod prelude;

pub use js_sys;
pub use wasm_bindgen;
pub use web_sys;

pub use vitrina_nav as nav;
pub use vitrina_utils as utils;

/// Bootstrap for the page: installs the navigation controller against
/// the current document. Pages without a results region get no wiring.
#[derive(Debug, Default)]
pub struct Vitrina {}

impl Vitrina {
    /// Create a new bootstrap.
    pub fn new() -> Self {
        Self {}
    }

    /// Install the navigation controller into the current document.
    pub fn install(self) -> Result<(), wasm_bindgen::JsValue> {
        #[cfg(all(
            target_arch = "wasm32",
            any(feature = "wasm", feature = "console_error_panic_hook")
        ))]
        console_error_panic_hook::set_once();

        vitrina_nav::install()
    }
}
