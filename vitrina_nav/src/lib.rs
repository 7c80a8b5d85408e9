//! Partial-page navigation for the storefront catalog.
//!
//! Catalog browsing (sorting, filtering, category links) runs as "soft
//! navigation": instead of a full page load, the controller fetches the
//! target URL, extracts the results region from the server-rendered
//! response, swaps it into the live document, and keeps the address bar
//! in sync through the history API. On any failure it degrades to the
//! full navigation the user's click would have caused anyway.
//!
//! The crate splits into a pure, host-testable core — [`query`] for
//! target-URL computation, [`fragment`] for results-region extraction,
//! [`controller::resolve_response`] for the apply-or-fallback decision —
//! and the browser glue in [`controller`] and [`triggers`] that wires the
//! core to fetch, the DOM, and the history stack.

pub mod controller;
pub mod fragment;
pub mod query;
pub mod triggers;

pub use controller::{
    FETCH_MARKER_HEADER, HIDDEN_CLASS, HistoryState, HistoryUpdate, NAVIGATE_EVENT, NavOutcome,
    RESULTS_REGION_ID, SCROLL_SECTION_ID, SKELETON_ID, install, last_applied_url,
    may_redirect_on_failure, navigate_to, recover_entry_url, resolve_response,
};
pub use fragment::extract_region;
pub use query::{PAGE_PARAM, SORT_DEFAULT, SORT_PARAM, filter_target, sort_target, strip_anchor};
pub use triggers::{
    CATEGORY_LINK_CLASS, CategoryLinks, FILTER_FORM_IDS, FilterForms, SORT_SELECT_ID, SortSelect,
    TriggerProvider, bind_all, dispatch_navigate,
};
