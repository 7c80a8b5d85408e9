//! Target-URL computation for catalog navigations.
//!
//! Sort and filter triggers rewrite the query string of the current
//! address rather than navigating to a link of their own. The rewrite
//! rules are small but load-bearing: the `default` sort sentinel removes
//! the sort parameter instead of writing it, a present-but-empty filter
//! value removes its parameter, and any sort/filter navigation clears
//! `page` so stale pagination never survives a re-query.

/// Query parameter carrying the sort key.
pub const SORT_PARAM: &str = "orden";

/// Query parameter carrying the page number. Cleared by every sort or
/// filter navigation.
pub const PAGE_PARAM: &str = "page";

/// Sort selection meaning "natural order": the sort parameter is removed
/// rather than set to this value.
pub const SORT_DEFAULT: &str = "default";

/// A URL split into base, query pairs, and scroll anchor, with
/// `URLSearchParams`-style mutation semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetUrl {
    base: String,
    params: Vec<(String, String)>,
    anchor: Option<String>,
}

impl TargetUrl {
    /// Split a URL (absolute or path-relative) into its parts. Query
    /// pairs are kept in document order and in their original encoding.
    pub fn parse(url: &str) -> Self {
        let (without_anchor, anchor) = match url.split_once('#') {
            Some((head, frag)) => (head, Some(frag.to_owned())),
            None => (url, None),
        };

        let (base, query) = match without_anchor.split_once('?') {
            Some((base, query)) => (base, query),
            None => (without_anchor, ""),
        };

        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((name, value)) => (name.to_owned(), value.to_owned()),
                None => (pair.to_owned(), String::new()),
            })
            .collect();

        Self {
            base: base.to_owned(),
            params,
            anchor,
        }
    }

    /// Set a parameter, replacing the value at the first occurrence and
    /// dropping any duplicates, like `URLSearchParams.set`. The value is
    /// form-urlencoded on the way in.
    pub fn set_param(&mut self, name: &str, value: &str) {
        let encoded = encode_component(value);
        let mut replaced = false;

        self.params.retain_mut(|(existing, existing_value)| {
            if existing != name {
                return true;
            }
            if replaced {
                return false;
            }
            *existing_value = encoded.clone();
            replaced = true;
            true
        });

        if !replaced {
            self.params.push((name.to_owned(), encoded));
        }
    }

    /// Remove every occurrence of a parameter.
    pub fn remove_param(&mut self, name: &str) {
        self.params.retain(|(existing, _)| existing != name);
    }

    /// The value at the first occurrence of a parameter, as stored
    /// (still encoded).
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether the parameter occurs at all.
    pub fn has_param(&self, name: &str) -> bool {
        self.param(name).is_some()
    }

    /// Drop the in-page anchor. History entries never carry the scroll
    /// anchor; scrolling is the controller's job.
    pub fn without_anchor(mut self) -> Self {
        self.anchor = None;
        self
    }
}

impl std::fmt::Display for TargetUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base)?;
        for (i, (name, value)) in self.params.iter().enumerate() {
            let sep = if i == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        if let Some(anchor) = &self.anchor {
            write!(f, "#{anchor}")?;
        }
        Ok(())
    }
}

/// Target URL for a sort-control change on the current address.
pub fn sort_target(current_url: &str, selection: &str) -> String {
    let mut url = TargetUrl::parse(current_url);

    if selection == SORT_DEFAULT {
        url.remove_param(SORT_PARAM);
    } else {
        url.set_param(SORT_PARAM, selection);
    }
    url.remove_param(PAGE_PARAM);

    url.without_anchor().to_string()
}

/// Target URL for a filter-form submission on the current address.
/// Field order is preserved; a later field with the same name overwrites
/// an earlier one.
pub fn filter_target(current_url: &str, fields: &[(String, String)]) -> String {
    let mut url = TargetUrl::parse(current_url);

    for (name, value) in fields {
        if value.is_empty() {
            url.remove_param(name);
        } else {
            url.set_param(name, value);
        }
    }
    url.remove_param(PAGE_PARAM);

    url.without_anchor().to_string()
}

/// Strip an in-page anchor suffix from a URL.
pub fn strip_anchor(url: &str) -> &str {
    match url.split_once('#') {
        Some((head, _)) => head,
        None => url,
    }
}

/// Form-urlencode a component: unreserved bytes pass through, space
/// becomes `+`, everything else is percent-encoded.
fn encode_component(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'*' | b'-' | b'.' | b'_' => {
                out.push(byte as char);
            },
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
