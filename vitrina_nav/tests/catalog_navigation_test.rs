#![allow(missing_docs)]

//! End-to-end scenarios for the pure navigation pipeline: target-URL
//! computation, fragment extraction, and the apply-or-fallback decision.

use vitrina_nav::{
    HistoryState, NavOutcome, RESULTS_REGION_ID, SORT_DEFAULT, extract_region, filter_target,
    may_redirect_on_failure, recover_entry_url, resolve_response, sort_target, strip_anchor,
};

#[test]
fn sort_change_rewrites_current_address() {
    // On /catalogo?orden=precio_asc the user selects "precio_desc".
    let target = sort_target("/catalogo?orden=precio_asc", "precio_desc");
    assert_eq!(target, "/catalogo?orden=precio_desc");

    // Pagination never survives a sort change.
    let target = sort_target("/catalogo?orden=precio_asc&page=3", "precio_desc");
    assert_eq!(target, "/catalogo?orden=precio_desc");
}

#[test]
fn sort_default_sentinel_is_idempotent() {
    let once = sort_target("/catalogo?orden=precio_asc", SORT_DEFAULT);
    assert!(!once.contains("orden"));

    let twice = sort_target(&once, SORT_DEFAULT);
    assert!(!twice.contains("orden"));
    assert_eq!(once, twice);
}

#[test]
fn sort_and_filter_targets_never_contain_page() {
    for current in [
        "/catalogo",
        "/catalogo?page=1",
        "/catalogo?orden=precio_asc&page=12",
        "/catalogo?min=100&page=2&max=500",
    ] {
        let sorted = sort_target(current, "precio_desc");
        assert!(!sorted.contains("page="), "sort left page in {sorted}");

        let fields = vec![("color".to_owned(), "azul".to_owned())];
        let filtered = filter_target(current, &fields);
        assert!(!filtered.contains("page="), "filter left page in {filtered}");
    }
}

#[test]
fn price_filter_with_empty_max_drops_the_parameter() {
    // Fields min=100, max= (present but empty).
    let fields = vec![
        ("min".to_owned(), "100".to_owned()),
        ("max".to_owned(), String::new()),
    ];
    let target = filter_target("/catalogo", &fields);
    assert!(target.contains("min=100"));
    assert!(!target.contains("max"));

    // A previously applied max is removed, not left stale.
    let target = filter_target("/catalogo?max=500", &fields);
    assert_eq!(target, "/catalogo?min=100");
}

#[test]
fn fragment_round_trip_preserves_region_content() {
    let content = r#"<article class="producto">Camisa <b>azul</b></article>"#;
    let page = format!(
        r#"<!DOCTYPE html><html><body>
<header>tienda</header>
<section id="product-list-section">
  <div id="{RESULTS_REGION_ID}">{content}</div>
</section>
</body></html>"#
    );

    let extracted = extract_region(&page, RESULTS_REGION_ID);
    assert_eq!(extracted.as_deref(), Some(content));

    // The address the history entry carries is the target stripped of
    // its scroll anchor.
    let target = "/catalogo?orden=precio_desc#product-list-section";
    assert_eq!(strip_anchor(target), "/catalogo?orden=precio_desc");
}

#[test]
fn fragment_only_response_is_as_good_as_a_full_page() {
    let fragment_body = format!(r#"<div id="{RESULTS_REGION_ID}"><p>solo</p></div>"#);
    assert_eq!(
        resolve_response(true, &fragment_body),
        NavOutcome::Swap("<p>solo</p>".to_owned()),
    );
}

#[test]
fn response_without_region_means_full_navigation() {
    // A 200 response with unrelated markup: the route is not
    // fragment-capable, so the controller must do what a normal click
    // would have done.
    let body = "<html><body><h1>Quienes somos</h1><p>una pagina normal</p></body></html>";
    assert_eq!(resolve_response(true, body), NavOutcome::FullNavigation);
}

#[test]
fn failed_status_means_full_navigation() {
    let body = format!(r#"<div id="{RESULTS_REGION_ID}">error page that looks right</div>"#);
    assert_eq!(resolve_response(false, &body), NavOutcome::FullNavigation);
}

#[test]
fn category_link_flow_sort_then_filter() {
    // A category link lands on a URL; sorting and filtering then refine
    // it without ever resurrecting pagination.
    let after_link = strip_anchor("/catalogo/camisas#product-list-section");
    assert_eq!(after_link, "/catalogo/camisas");

    let sorted = sort_target(after_link, "precio_asc");
    assert_eq!(sorted, "/catalogo/camisas?orden=precio_asc");

    let fields = vec![
        ("min".to_owned(), "100".to_owned()),
        ("color".to_owned(), "rojo".to_owned()),
    ];
    let filtered = filter_target(&sorted, &fields);
    assert_eq!(
        filtered,
        "/catalogo/camisas?orden=precio_asc&min=100&color=rojo",
    );

    let natural = sort_target(&filtered, SORT_DEFAULT);
    assert_eq!(natural, "/catalogo/camisas?min=100&color=rojo");
}

#[test]
fn stale_responses_lose_to_the_newest_navigation() {
    // Two navigations race; only the later sequence number may apply.
    let older = vitrina_utils::next_navigation_seq();
    let newer = vitrina_utils::next_navigation_seq();
    assert!(!vitrina_utils::is_current_navigation(older));
    assert!(vitrina_utils::is_current_navigation(newer));

    // The same holds for failures: a superseded fetch that errors out
    // must not drag the page into a full load either.
    assert!(!may_redirect_on_failure(older));
    assert!(may_redirect_on_failure(newer));
}

#[test]
fn back_forward_recovers_the_url_from_the_entry_state() {
    // Forward navigation stores the applied URL in the pushed entry;
    // popping that entry recovers it without re-deriving anything.
    let state = HistoryState {
        url: "/catalogo?orden=precio_desc&min=100".to_owned(),
        seq: 5,
    };
    let payload = serde_json::to_string(&state).unwrap();
    assert_eq!(
        recover_entry_url(Some(payload)),
        Some("/catalogo?orden=precio_desc&min=100".to_owned()),
    );

    // The initial page entry carries no state; the handler falls back
    // to the address bar.
    assert_eq!(recover_entry_url(None), None);
}
