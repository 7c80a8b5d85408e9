//! Results-region extraction from an HTML response body.
//!
//! The backend answers a fragment-capable request with either a bare
//! fragment or a full page; in both cases the usable part is the element
//! carrying the results-region id. The extractor scans the raw markup for
//! that element and returns its inner HTML, tracking nesting of the same
//! tag name so a region containing its own tag (a `div` full of `div`s)
//! closes at the right place. Comments, doctypes, quoted attribute values,
//! and void/self-closing elements are handled; anything genuinely
//! malformed yields `None`, which the controller treats like a missing
//! region.

/// An opening tag scanned out of the raw markup.
struct RawTag<'a> {
    name: &'a str,
    attributes: &'a str,
    /// Byte offset just past the closing `>`.
    after: usize,
    self_closing: bool,
}

/// Find the element with the given id and return its inner HTML, exactly
/// as written in the source. Returns `None` when no such element exists
/// or the markup around it cannot be understood.
pub fn extract_region(html: &str, region_id: &str) -> Option<String> {
    let mut pos = 0;

    while let Some(offset) = html[pos..].find('<') {
        let start = pos + offset;
        let rest = &html[start..];

        if rest.starts_with("<!--") {
            pos = start + rest.find("-->")? + 3;
            continue;
        }
        if rest.starts_with("</") || rest.starts_with("<!") || rest.starts_with("<?") {
            pos = start + rest.find('>')? + 1;
            continue;
        }

        let Some(tag) = read_tag(html, start) else {
            // Stray `<` in text content; skip past it.
            pos = start + 1;
            continue;
        };

        if tag_id(tag.attributes) == Some(region_id) {
            if tag.self_closing || is_void_element(tag.name) {
                return Some(String::new());
            }
            return region_content(html, tag.name, tag.after).map(ToOwned::to_owned);
        }

        pos = tag.after;
    }

    None
}

/// Walk forward from the region's content start until its closing tag,
/// counting nested openings of the same tag name.
fn region_content<'a>(html: &'a str, name: &str, content_start: usize) -> Option<&'a str> {
    let mut depth = 1usize;
    let mut pos = content_start;

    loop {
        let offset = html[pos..].find('<')?;
        let start = pos + offset;
        let rest = &html[start..];

        if rest.starts_with("<!--") {
            pos = start + rest.find("-->")? + 3;
            continue;
        }

        if rest.starts_with("</") {
            let (closing, after) = read_closing_tag(html, start)?;
            if closing.eq_ignore_ascii_case(name) {
                depth -= 1;
                if depth == 0 {
                    return Some(&html[content_start..start]);
                }
            }
            pos = after;
            continue;
        }

        if rest.starts_with("<!") || rest.starts_with("<?") {
            pos = start + rest.find('>')? + 1;
            continue;
        }

        let Some(tag) = read_tag(html, start) else {
            pos = start + 1;
            continue;
        };
        if tag.name.eq_ignore_ascii_case(name) && !tag.self_closing && !is_void_element(tag.name) {
            depth += 1;
        }
        pos = tag.after;
    }
}

/// Scan an opening tag starting at `start` (which must point at `<`).
fn read_tag(html: &str, start: usize) -> Option<RawTag<'_>> {
    let bytes = html.as_bytes();
    let name_start = start + 1;
    let mut name_end = name_start;

    while name_end < bytes.len() {
        let b = bytes[name_end];
        if b.is_ascii_whitespace() || b == b'>' || b == b'/' {
            break;
        }
        name_end += 1;
    }
    if name_end == name_start {
        return None;
    }

    // Find the tag's `>`, honoring quoted attribute values.
    let mut i = name_end;
    let mut quote: Option<u8> = None;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            },
            None => {
                if b == b'"' || b == b'\'' {
                    quote = Some(b);
                } else if b == b'>' {
                    break;
                }
            },
        }
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }

    let raw_attributes = html[name_end..i].trim_end();
    let self_closing = raw_attributes.ends_with('/');

    Some(RawTag {
        name: &html[name_start..name_end],
        attributes: raw_attributes.trim_end_matches('/'),
        after: i + 1,
        self_closing,
    })
}

/// Scan a closing tag starting at `start` (which must point at `</`).
/// Returns the tag name and the offset just past the `>`.
fn read_closing_tag(html: &str, start: usize) -> Option<(&str, usize)> {
    let bytes = html.as_bytes();
    let name_start = start + 2;
    let mut name_end = name_start;

    while name_end < bytes.len() {
        let b = bytes[name_end];
        if b.is_ascii_whitespace() || b == b'>' {
            break;
        }
        name_end += 1;
    }

    let gt = start + html[start..].find('>')?;
    Some((&html[name_start..name_end], gt + 1))
}

/// The value of the `id` attribute inside an attribute string, if any.
fn tag_id(attributes: &str) -> Option<&str> {
    let bytes = attributes.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let name_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'=' {
            i += 1;
        }
        let name = &attributes[name_start..i];
        if name.is_empty() {
            break;
        }

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = "";
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let q = bytes[i];
                i += 1;
                let value_start = i;
                while i < bytes.len() && bytes[i] != q {
                    i += 1;
                }
                value = &attributes[value_start..i];
                if i < bytes.len() {
                    i += 1;
                }
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = &attributes[value_start..i];
            }
        }

        if name.eq_ignore_ascii_case("id") {
            return Some(value);
        }
    }

    None
}

/// Elements that never have a closing tag.
fn is_void_element(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
