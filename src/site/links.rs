use crate::crawler::DiscoveredLink;
use crate::site::{selector, SiteSetupError};
use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Class carried by pagination anchors
const PAGINATION_CLASS: &str = "page-link";

/// Exact class attribute of a property card's title anchor
const DETAIL_LINK_CLASS: &str = "d-block text-ellipsis clp-big-value";

/// Classifies anchors on a listing page into pagination and detail links
#[derive(Debug)]
pub struct LinkClassifier {
    anchors: Selector,
}

impl LinkClassifier {
    pub fn new() -> Result<Self, SiteSetupError> {
        Ok(Self {
            anchors: selector("a[href]")?,
        })
    }

    /// Returns classified, absolute, normalized links in document order
    ///
    /// Anchors that are neither pagination nor property links are ignored.
    pub fn classify(&self, document: &Html, base: &Url) -> Vec<DiscoveredLink> {
        let mut links = Vec::new();

        for anchor in document.select(&self.anchors) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };

            let make: fn(Url) -> DiscoveredLink = if is_pagination(&anchor) {
                DiscoveredLink::listing
            } else if is_detail(&anchor) {
                DiscoveredLink::detail
            } else {
                continue;
            };

            match resolve_link(href, base) {
                Some(url) => links.push(make(url)),
                None => tracing::debug!("Ignoring unresolvable link '{}' on {}", href, base),
            }
        }

        links
    }
}

fn is_pagination(anchor: &ElementRef<'_>) -> bool {
    anchor.value().classes().any(|class| class == PAGINATION_CLASS)
}

fn is_detail(anchor: &ElementRef<'_>) -> bool {
    anchor.value().attr("class") == Some(DETAIL_LINK_CLASS)
}
