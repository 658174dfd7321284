//! Page parser interface
//!
//! The scheduler never looks at markup. It hands each fetched page to a
//! [`PageParser`], which returns an optional record plus the links it found,
//! each already classified as a listing or detail link.

use crate::crawler::FrontierKind;
use crate::property::PropertyRecord;
use thiserror::Error;
use url::Url;

/// A link found on a page, tagged with the frontier it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    pub url: Url,
    pub kind: FrontierKind,
}

impl DiscoveredLink {
    pub fn listing(url: Url) -> Self {
        Self {
            url,
            kind: FrontierKind::Listing,
        }
    }

    pub fn detail(url: Url) -> Self {
        Self {
            url,
            kind: FrontierKind::Detail,
        }
    }
}

/// What a parser extracted from one page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    pub record: Option<PropertyRecord>,
    pub links: Vec<DiscoveredLink>,
}

impl ParsedPage {
    /// Links of one kind, in document order
    pub fn links_of(&self, kind: FrontierKind) -> impl Iterator<Item = &Url> {
        self.links
            .iter()
            .filter(move |link| link.kind == kind)
            .map(|link| &link.url)
    }
}

/// The document could not be traversed at all
#[derive(Debug, Clone, Error)]
#[error("Could not parse {url}: {message}")]
pub struct ParseError {
    pub url: String,
    pub message: String,
}

impl ParseError {
    pub fn new(url: &Url, message: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            message: message.into(),
        }
    }
}

/// Turns fetched content into a record and classified links
///
/// Implementations must be pure functions of their inputs. A missing or
/// unparsable field is never an error; only content that cannot be traversed
/// is, and the scheduler treats it as "no record, no links".
pub trait PageParser: Send + Sync {
    fn parse(&self, url: &Url, kind: FrontierKind, content: &str)
        -> Result<ParsedPage, ParseError>;
}
