//! Trigger providers: the interactive elements that start a soft
//! navigation.
//!
//! Each provider knows one trigger class (category links, the sort
//! select, the filter forms), computes a target URL from the interaction,
//! and dispatches it on the [`NAVIGATE_EVENT`] bus; the controller owns
//! the fetch from there. Binding is an explicit mount operation scoped to
//! a root element so the controller can re-run it against freshly swapped
//! region content, where every trigger element is new.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::Closure;

use crate::controller::NAVIGATE_EVENT;
use crate::query;

/// CSS class marking links that navigate inside the catalog.
pub const CATEGORY_LINK_CLASS: &str = "js-category-link";

/// Id of the sort select control.
pub const SORT_SELECT_ID: &str = "sort-by";

/// Ids of the filter forms.
pub const FILTER_FORM_IDS: [&str; 2] = ["price-form", "color-form"];

/// A class of trigger elements. `bind` attaches handlers to every
/// matching element under `root`; it runs once at page load against the
/// document and again after every swap against the new region content.
pub trait TriggerProvider {
    /// Attach handlers to every matching trigger element under `root`.
    fn bind(&self, root: &web_sys::Element);
}

/// Links carrying [`CATEGORY_LINK_CLASS`]; the target is the href,
/// stripped of any scroll anchor.
#[derive(Debug, Default)]
pub struct CategoryLinks;

/// The sort select; the target is the current address with the sort
/// parameter rewritten and pagination reset.
#[derive(Debug, Default)]
pub struct SortSelect;

/// The filter forms; the target is the current address with each field
/// written into the query string and pagination reset.
#[derive(Debug, Default)]
pub struct FilterForms;

/// The full provider set, in binding order.
pub fn providers() -> Vec<Box<dyn TriggerProvider>> {
    vec![
        Box::new(CategoryLinks),
        Box::new(SortSelect),
        Box::new(FilterForms),
    ]
}

/// Bind every provider under `root`.
pub fn bind_all(root: &web_sys::Element) {
    for provider in providers() {
        provider.bind(root);
    }
}

/// Request a soft navigation by dispatching the navigate event with the
/// target URL as detail.
pub fn dispatch_navigate(url: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };

    let event_init = web_sys::CustomEventInit::new();
    event_init.set_detail(&JsValue::from_str(url));

    let Ok(event) = web_sys::CustomEvent::new_with_event_init_dict(NAVIGATE_EVENT, &event_init)
    else {
        return;
    };
    let _ = document.dispatch_event(&event);
}

impl TriggerProvider for CategoryLinks {
    fn bind(&self, root: &web_sys::Element) {
        let selector = format!("a.{CATEGORY_LINK_CLASS}");
        let Ok(links) = root.query_selector_all(&selector) else {
            return;
        };

        for i in 0..links.length() {
            let Some(node) = links.item(i) else {
                continue;
            };
            let Ok(link) = node.dyn_into::<web_sys::Element>() else {
                continue;
            };
            let Some(href) = link.get_attribute("href") else {
                continue;
            };

            let target = query::strip_anchor(&href).to_owned();
            let click_callback = Closure::wrap(Box::new(move |event: web_sys::MouseEvent| {
                event.prevent_default();
                dispatch_navigate(&target);
            }) as Box<dyn FnMut(_)>);
            let _ = link.add_event_listener_with_callback(
                "click",
                click_callback.as_ref().unchecked_ref(),
            );
            click_callback.forget();
        }
    }
}

impl TriggerProvider for SortSelect {
    fn bind(&self, root: &web_sys::Element) {
        let selector = format!("select#{SORT_SELECT_ID}");
        let Ok(Some(element)) = root.query_selector(&selector) else {
            return;
        };
        let Ok(select) = element.dyn_into::<web_sys::HtmlSelectElement>() else {
            return;
        };

        let select_handle = select.clone();
        let change_callback = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let Some(href) = current_href() else {
                return;
            };
            let target = query::sort_target(&href, &select_handle.value());
            dispatch_navigate(&target);
        }) as Box<dyn FnMut(_)>);
        let _ = select
            .add_event_listener_with_callback("change", change_callback.as_ref().unchecked_ref());
        change_callback.forget();
    }
}

impl TriggerProvider for FilterForms {
    fn bind(&self, root: &web_sys::Element) {
        for form_id in FILTER_FORM_IDS {
            let Ok(Some(element)) = root.query_selector(&format!("form#{form_id}")) else {
                continue;
            };
            let Ok(form) = element.dyn_into::<web_sys::HtmlFormElement>() else {
                continue;
            };

            let form_handle = form.clone();
            let submit_callback = Closure::wrap(Box::new(move |event: web_sys::Event| {
                event.prevent_default();
                let Some(href) = current_href() else {
                    return;
                };
                let fields = form_field_pairs(&form_handle);
                let target = query::filter_target(&href, &fields);
                dispatch_navigate(&target);
            }) as Box<dyn FnMut(_)>);
            let _ = form
                .add_event_listener_with_callback("submit", submit_callback.as_ref().unchecked_ref());
            submit_callback.forget();
        }
    }
}

fn current_href() -> Option<String> {
    web_sys::window()?.location().href().ok()
}

/// Read a form's fields as name/value pairs via `FormData`, in document
/// order. Non-string entries (file inputs) are skipped.
fn form_field_pairs(form: &web_sys::HtmlFormElement) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    let Ok(data) = web_sys::FormData::new_with_form(form) else {
        return pairs;
    };

    let entries = data.entries();
    loop {
        let Ok(next) = entries.next() else {
            break;
        };
        if next.done() {
            break;
        }
        let Ok(entry) = next.value().dyn_into::<js_sys::Array>() else {
            continue;
        };
        let Some(name) = entry.get(0).as_string() else {
            continue;
        };
        let Some(value) = entry.get(1).as_string() else {
            continue;
        };
        pairs.push((name, value));
    }

    pairs
}
