use crate::boundary::PostBoundary;
use crate::error::{ResolveError, Result};
use crate::link::classify_href;
use crate::result::{MatchSource, Resolution};
use scraper::ElementRef;
use tracing::{debug, trace};

/// Finds the author of the post a timestamp element belongs to.
///
/// Holds only configuration, so one resolver can serve any number of
/// independent calls.
#[derive(Debug, Clone, Default)]
pub struct AuthorResolver {
    boundary: PostBoundary,
    allowed_hosts: Vec<String>,
}

impl AuthorResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_boundary(mut self, boundary: PostBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Hosts whose absolute hrefs are treated like relative paths
    pub fn with_allowed_hosts(mut self, hosts: Vec<String>) -> Self {
        self.allowed_hosts = hosts;
        self
    }

    pub fn boundary(&self) -> &PostBoundary {
        &self.boundary
    }

    /// Resolve the author of the post containing `timestamp`.
    ///
    /// Fails with [`ResolveError::DetachedNode`] when the element is not
    /// reachable from a document or fragment root.
    pub fn resolve_author(&self, timestamp: ElementRef<'_>) -> Result<Resolution> {
        ensure_attached(&timestamp)?;
        Ok(self.search(timestamp))
    }

    /// Climb from `start` toward the root, returning the first profile link
    /// found at the innermost ancestor level.
    pub fn search(&self, start: ElementRef<'_>) -> Resolution {
        if let Some(found) = self.enclosing_profile(start) {
            return found;
        }

        let mut level = start;
        let mut depth = 0;
        // The child we climbed out of has already been searched completely
        let mut searched_child: Option<ElementRef<'_>> = None;

        loop {
            trace!("Searching ancestor level {} <{}>", depth, level.value().name());

            if let Some(handle) = self.profile_handle(&level) {
                debug!("Level {} is a profile link for {}", depth, handle);
                return Resolution::found(handle, href_of(&level), depth, MatchSource::SelfLink);
            }

            if let Some((link, handle)) = self.scan_subtree(level, searched_child) {
                debug!("Found profile link for {} under level {}", handle, depth);
                return Resolution::found(handle, href_of(&link), depth, MatchSource::Subtree);
            }

            if self.boundary.is_boundary(&level) {
                debug!("Reached post boundary at level {} without a profile link", depth);
                return Resolution::not_found();
            }

            match level.parent().and_then(ElementRef::wrap) {
                Some(parent) => {
                    searched_child = Some(level);
                    level = parent;
                    depth += 1;
                }
                None => {
                    debug!("Reached document root at level {} without a profile link", depth);
                    return Resolution::not_found();
                }
            }
        }
    }

    /// Checks the nearest `<a href>` enclosing `start` (itself included).
    fn enclosing_profile(&self, start: ElementRef<'_>) -> Option<Resolution> {
        let mut current = start;
        let mut depth = 0;

        loop {
            if is_link(&current) {
                let handle = self.profile_handle(&current)?;
                debug!("Timestamp is enclosed by the profile link for {}", handle);
                return Some(Resolution::found(
                    handle,
                    href_of(&current),
                    depth,
                    MatchSource::EnclosingLink,
                ));
            }

            if self.boundary.is_boundary(&current) {
                return None;
            }

            current = current.parent().and_then(ElementRef::wrap)?;
            depth += 1;
        }
    }

    /// Pre-order walk of the descendants of `root` with an explicit stack.
    fn scan_subtree<'a>(
        &self,
        root: ElementRef<'a>,
        skip: Option<ElementRef<'a>>,
    ) -> Option<(ElementRef<'a>, String)> {
        let mut stack: Vec<ElementRef<'a>> = Vec::new();
        push_children(&mut stack, root);

        while let Some(element) = stack.pop() {
            if skip.is_some_and(|s| s.id() == element.id()) {
                continue;
            }

            if let Some(handle) = self.profile_handle(&element) {
                return Some((element, handle));
            }

            push_children(&mut stack, element);
        }

        None
    }

    fn profile_handle(&self, element: &ElementRef<'_>) -> Option<String> {
        let href = element_href(element)?;
        let classification = classify_href(href, &self.allowed_hosts);
        trace!("Classified {} as {:?}", href, classification);
        classification.profile_handle().map(str::to_string)
    }
}

/// Resolve with no post boundary and no absolute-href hosts
pub fn resolve_author(timestamp: ElementRef<'_>) -> Result<Resolution> {
    AuthorResolver::new().resolve_author(timestamp)
}

fn ensure_attached(element: &ElementRef<'_>) -> Result<()> {
    match element.ancestors().last() {
        Some(root) if root.value().is_document() || root.value().is_fragment() => Ok(()),
        _ => Err(ResolveError::DetachedNode),
    }
}

fn is_link(element: &ElementRef<'_>) -> bool {
    element_href(element).is_some()
}

/// `href` of an `<a>` element, if it has one
fn element_href<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    let value = element.value();
    if value.name() != "a" {
        return None;
    }
    value.attr("href")
}

fn href_of(element: &ElementRef<'_>) -> String {
    element_href(element).unwrap_or_default().to_string()
}

fn push_children<'a>(stack: &mut Vec<ElementRef<'a>>, parent: ElementRef<'a>) {
    let children: Vec<ElementRef<'a>> = parent.children().filter_map(ElementRef::wrap).collect();
    stack.extend(children.into_iter().rev());
}
