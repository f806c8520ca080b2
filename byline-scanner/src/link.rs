// Link classification for feed hrefs
//
// Paths look like `/@<handle>`, optionally followed by `/post/<id>/...`,
// with an optional query string and fragment.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use url::Url;

const HANDLE_PREFIX: &str = "/@";
const POST_SEGMENT: &str = "/post/";

/// What a hyperlink target says about a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "handle", rename_all = "snake_case")]
pub enum LinkClassification {
    /// Points at a user and nothing else
    Profile(String),
    /// Points at one of a user's posts. Never trusted for authorship.
    Permalink(String),
    Unrelated,
}

impl LinkClassification {
    /// Handle carried by a profile link, if this is one
    pub fn profile_handle(&self) -> Option<&str> {
        match self {
            LinkClassification::Profile(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn is_profile(&self) -> bool {
        matches!(self, LinkClassification::Profile(_))
    }
}

/// Classify a target path.
pub fn classify(path: &str) -> LinkClassification {
    let path = strip_query_and_fragment(path);

    let Some(rest) = path.strip_prefix(HANDLE_PREFIX) else {
        return LinkClassification::Unrelated;
    };

    let (handle, tail) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    if handle.is_empty() {
        return LinkClassification::Unrelated;
    }

    if tail.is_empty() {
        LinkClassification::Profile(handle.to_string())
    } else if tail.starts_with(POST_SEGMENT) {
        LinkClassification::Permalink(handle.to_string())
    } else {
        LinkClassification::Unrelated
    }
}

/// Drop everything from the first `?` or `#` onward
pub fn strip_query_and_fragment(path: &str) -> &str {
    match path.find(['?', '#']) {
        Some(idx) => &path[..idx],
        None => path,
    }
}

/// Reduce an href to the path form `classify` expects.
///
/// Relative hrefs are returned as-is. Absolute `http`/`https` hrefs are
/// reduced to their path, query and fragment, but only when their host is
/// one of `allowed_hosts` or a subdomain of one. Anything else yields `None`.
pub fn normalize_href<'a>(href: &'a str, allowed_hosts: &[String]) -> Option<Cow<'a, str>> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if href.starts_with('/') && !href.starts_with("//") {
        return Some(Cow::Borrowed(href));
    }

    if allowed_hosts.is_empty() {
        return None;
    }

    // Protocol-relative hrefs get a scheme so the URL parser accepts them
    let parsed = if href.starts_with("//") {
        Url::parse(&format!("https:{}", href)).ok()?
    } else {
        Url::parse(href).ok()?
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return None;
    }

    let host = parsed.host_str()?;
    if !is_allowed_host(host, allowed_hosts) {
        return None;
    }

    // Url percent-encodes non-ASCII, so go back to the raw text for the path
    let after_scheme = href.split_once("//").map(|(_, rest)| rest)?;
    let path = match after_scheme.find(['/', '?', '#']) {
        Some(idx) => &after_scheme[idx..],
        None => "/",
    };

    Some(Cow::Owned(path.to_string()))
}

fn is_allowed_host(host: &str, allowed_hosts: &[String]) -> bool {
    allowed_hosts
        .iter()
        .any(|allowed| host == allowed || host.ends_with(&format!(".{}", allowed)))
}

/// Classify a raw href attribute value
pub fn classify_href(href: &str, allowed_hosts: &[String]) -> LinkClassification {
    match normalize_href(href, allowed_hosts) {
        Some(path) => classify(&path),
        None => LinkClassification::Unrelated,
    }
}
