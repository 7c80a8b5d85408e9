//! The usual imports for a page entry point.

pub use crate::Vitrina;
pub use vitrina_nav::{
    HistoryUpdate, NavOutcome, TriggerProvider, dispatch_navigate, install, last_applied_url,
    navigate_to,
};
pub use wasm_bindgen::JsCast;
