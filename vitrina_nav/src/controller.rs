#![allow(missing_docs)]

//! The navigation controller: fetch, extract, swap, history, scroll,
//! loading state, and back/forward synchronization.
//!
//! One flow serves every trigger class. A trigger dispatches a
//! [`NAVIGATE_EVENT`] CustomEvent carrying the target URL; the controller
//! fetches the URL with the fragment-capable marker header, extracts the
//! results region from the response, swaps it into the live document,
//! pushes a history entry, scrolls, and re-binds triggers inside the new
//! content. Any failure falls back to a real browser navigation so the
//! user ends up exactly where a normal click would have taken them.

use std::cell::RefCell;

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;

use crate::{fragment, query, triggers};

/// Id of the swappable results region. Same id in the full page and in
/// every fragment response; the backend templates honor it.
pub const RESULTS_REGION_ID: &str = "product-list";

/// Id of the section wrapping the region, used as the scroll target.
pub const SCROLL_SECTION_ID: &str = "product-list-section";

/// Id of the skeleton placeholder shown while a navigation is pending.
pub const SKELETON_ID: &str = "list-skeleton";

/// Presentation class toggled on the skeleton and the region.
pub const HIDDEN_CLASS: &str = "hidden";

/// CustomEvent name bridging trigger providers and the controller. The
/// detail is the target URL string; page code may dispatch it directly to
/// request a soft navigation.
pub const NAVIGATE_EVENT: &str = "vitrina:navigate";

/// Marker header identifying this client as fragment-capable. The backend
/// may special-case it but must not require it.
pub const FETCH_MARKER_HEADER: (&str, &str) = ("X-Requested-With", "fetch");

thread_local! {
    static LAST_APPLIED_URL: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// How a completed navigation should treat the history stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryUpdate {
    /// Push a new entry with the target URL (forward navigation).
    Push,
    /// Leave history alone; the browser already moved the pointer
    /// (back/forward navigation).
    Skip,
}

/// What to do with a fetched response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Swap this content into the live results region.
    Swap(String),
    /// The response is unusable; perform a real navigation instead.
    FullNavigation,
}

/// State stored in each pushed history entry, JSON-encoded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryState {
    /// The URL this entry's results region was rendered from.
    pub url: String,
    /// Sequence number of the navigation that created the entry.
    pub seq: u64,
}

/// Decide the outcome of a settled fetch. `ok` is the transport-level
/// success flag (2xx status); the body is inspected for the results
/// region. Pure, so fallback behavior is testable without a browser.
pub fn resolve_response(ok: bool, body: &str) -> NavOutcome {
    if !ok {
        return NavOutcome::FullNavigation;
    }
    match fragment::extract_region(body, RESULTS_REGION_ID) {
        Some(content) => NavOutcome::Swap(content),
        None => NavOutcome::FullNavigation,
    }
}

/// Recover the applied URL from a popped history entry's JSON state
/// payload. `None` when the entry carries no payload or one this
/// controller did not write (the initial page entry, another script's
/// state). Pure, so back/forward URL recovery is testable without a
/// browser.
pub fn recover_entry_url(payload: Option<String>) -> Option<String> {
    let payload = payload?;
    let state: HistoryState = serde_json::from_str(&payload).ok()?;
    Some(state.url)
}

/// The URL whose content the results region currently shows, once any
/// soft navigation has been applied.
pub fn last_applied_url() -> Option<String> {
    LAST_APPLIED_URL.with(|slot| slot.borrow().clone())
}

fn record_applied_url(url: &str) {
    LAST_APPLIED_URL.with(|slot| {
        *slot.borrow_mut() = Some(url.to_owned());
    });
}

/// Wire the controller into the current document: bind trigger providers,
/// listen for [`NAVIGATE_EVENT`], and synchronize on popstate. A page
/// without a results region gets no wiring; the scripts load everywhere
/// but only catalog pages participate.
pub fn install() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("window not found")?;
    let document = window.document().ok_or("document not found")?;

    if document.get_element_by_id(RESULTS_REGION_ID).is_none() {
        return Ok(());
    }

    if let Some(root) = document.document_element() {
        triggers::bind_all(&root);
    }

    let navigate_callback = Closure::wrap(Box::new(move |event: web_sys::CustomEvent| {
        if let Some(url) = event.detail().as_string() {
            navigate_to(&url, HistoryUpdate::Push);
        }
    }) as Box<dyn FnMut(_)>);
    document.add_event_listener_with_callback(
        NAVIGATE_EVENT,
        navigate_callback.as_ref().unchecked_ref(),
    )?;
    navigate_callback.forget();

    let popstate_callback = Closure::wrap(Box::new(move |event: web_sys::PopStateEvent| {
        // Entries pushed by the controller carry their applied URL in
        // the state payload; anything else (the initial page entry)
        // falls back to the address bar.
        let url = recover_entry_url(event.state().as_string()).or_else(|| {
            let href = web_sys::window()?.location().href().ok()?;
            Some(query::strip_anchor(&href).to_owned())
        });
        let Some(url) = url else {
            return;
        };
        // The browser already moved the history pointer; re-fetch the
        // now-current address without pushing a new entry.
        navigate_to(&url, HistoryUpdate::Skip);
    }) as Box<dyn FnMut(_)>);
    window
        .add_event_listener_with_callback("popstate", popstate_callback.as_ref().unchecked_ref())?;
    popstate_callback.forget();

    Ok(())
}

/// Run one soft navigation to `url`. Overlapping calls are safe: each
/// navigation gets a monotonic sequence number and only the newest one
/// may mutate the DOM and history when its response arrives.
pub fn navigate_to(url: &str, history: HistoryUpdate) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let seq = vitrina_utils::next_navigation_seq();
    begin_loading();

    let request = match build_fragment_request(url) {
        Ok(request) => request,
        Err(_) => {
            fail_navigation(url, seq);
            return;
        },
    };

    let target = url.to_owned();
    let response_callback = Closure::wrap(Box::new(move |value: JsValue| {
        let target = target.clone();

        let Ok(response) = value.dyn_into::<web_sys::Response>() else {
            fail_navigation(&target, seq);
            return;
        };
        if !response.ok() {
            fail_navigation(&target, seq);
            return;
        }

        let Ok(text_promise) = response.text() else {
            fail_navigation(&target, seq);
            return;
        };

        let text_target = target.clone();
        let text_callback = Closure::wrap(Box::new(move |text: JsValue| {
            let body = text.as_string().unwrap_or_default();
            finish_navigation(&text_target, seq, &body, history);
        }) as Box<dyn FnMut(JsValue)>);
        let text_catch_callback = Closure::wrap(Box::new(move |_error: JsValue| {
            // The body read rejected; settle and fall back like any
            // other transport failure.
            fail_navigation(&target, seq);
        }) as Box<dyn FnMut(JsValue)>);
        let _ = text_promise.then(&text_callback).catch(&text_catch_callback);
        text_callback.forget();
        text_catch_callback.forget();
    }) as Box<dyn FnMut(JsValue)>);

    let catch_target = url.to_owned();
    let catch_callback = Closure::wrap(Box::new(move |_error: JsValue| {
        fail_navigation(&catch_target, seq);
    }) as Box<dyn FnMut(JsValue)>);

    let _ = window
        .fetch_with_request(&request)
        .then(&response_callback)
        .catch(&catch_callback);
    response_callback.forget();
    catch_callback.forget();
}

/// Response body is in hand; apply it or fall back.
fn finish_navigation(url: &str, seq: u64, body: &str, history: HistoryUpdate) {
    if !vitrina_utils::is_current_navigation(seq) {
        // A newer navigation owns the page; discard this response.
        settle_loading();
        return;
    }

    match resolve_response(true, body) {
        NavOutcome::Swap(content) => {
            apply_fragment(url, seq, &content, history);
            settle_loading();
        },
        NavOutcome::FullNavigation => {
            settle_loading();
            full_navigation(url);
        },
    }
}

/// Swap the region content, then update history, then scroll, then
/// re-bind triggers inside the new content. The order is visible: the
/// scroll must target the post-swap layout.
fn apply_fragment(url: &str, seq: u64, content: &str, history: HistoryUpdate) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(region) = document.get_element_by_id(RESULTS_REGION_ID) else {
        // The live page lost its region somehow; a full load recovers.
        full_navigation(url);
        return;
    };

    region.set_inner_html(content);

    let clean_url = query::strip_anchor(url);
    if history == HistoryUpdate::Push {
        push_history_entry(clean_url, seq);
    }
    record_applied_url(clean_url);

    scroll_region_into_view(&document, &region);
    triggers::bind_all(&region);
}

fn push_history_entry(url: &str, seq: u64) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(history) = window.history() else {
        return;
    };

    let state = HistoryState {
        url: url.to_owned(),
        seq,
    };
    let payload = serde_json::to_string(&state).unwrap_or_default();
    let _ = history.push_state_with_url(&JsValue::from_str(&payload), "", Some(url));
}

fn scroll_region_into_view(document: &web_sys::Document, region: &web_sys::Element) {
    let target = document
        .get_element_by_id(SCROLL_SECTION_ID)
        .unwrap_or_else(|| region.clone());

    let options = web_sys::ScrollIntoViewOptions::new();
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    options.set_block(web_sys::ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&options);
}

fn build_fragment_request(url: &str) -> Result<web_sys::Request, JsValue> {
    let init = web_sys::RequestInit::new();
    init.set_method("GET");

    let headers = web_sys::Headers::new()?;
    headers.set(FETCH_MARKER_HEADER.0, FETCH_MARKER_HEADER.1)?;
    init.set_headers(headers.as_ref());

    web_sys::Request::new_with_str_and_init(url, &init)
}

/// Settle one fetch and, when the navigation still owns the page, fall
/// back to a real load of `url`. A superseded navigation's failure only
/// settles the loading depth; the newer navigation owns what the page
/// does next.
fn fail_navigation(url: &str, seq: u64) {
    settle_loading();
    if may_redirect_on_failure(seq) {
        full_navigation(url);
    }
}

/// Whether a failed navigation may still redirect the page: only while
/// its sequence number is the latest issued.
pub fn may_redirect_on_failure(seq: u64) -> bool {
    vitrina_utils::is_current_navigation(seq)
}

/// The recovery path for every failure: do what a normal click would
/// have done.
fn full_navigation(url: &str) {
    web_sys::console::log_1(&format!("vitrina: full navigation fallback to {url}").into());

    let Some(window) = web_sys::window() else {
        return;
    };
    let _ = window.location().set_href(url);
}

fn begin_loading() {
    if vitrina_utils::begin_pending_fetch() == 0 {
        set_skeleton_visible(true);
    }
}

fn settle_loading() {
    if vitrina_utils::settle_pending_fetch() == 0 {
        set_skeleton_visible(false);
    }
}

/// Show or hide the skeleton placeholder, dimming the region while a
/// navigation is pending. No-op on pages missing either element.
fn set_skeleton_visible(on: bool) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Some(skeleton) = document.get_element_by_id(SKELETON_ID) else {
        return;
    };
    let Some(region) = document.get_element_by_id(RESULTS_REGION_ID) else {
        return;
    };

    if on {
        let _ = skeleton.class_list().remove_1(HIDDEN_CLASS);
        let _ = region.class_list().add_1(HIDDEN_CLASS);
    } else {
        let _ = skeleton.class_list().add_1(HIDDEN_CLASS);
        let _ = region.class_list().remove_1(HIDDEN_CLASS);
    }
}
