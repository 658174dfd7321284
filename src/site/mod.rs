//! Page parser for the listing site's markup
//!
//! Listing pages contribute links only: pagination anchors become listing
//! links and property cards become detail links. Detail pages contribute one
//! record each and no links.

mod detail;
mod links;

pub use detail::DetailExtractor;
pub use links::LinkClassifier;

use crate::crawler::{FrontierKind, PageParser, ParseError, ParsedPage};
use scraper::{Html, Selector};
use thiserror::Error;
use url::Url;

/// The parser's fixed selectors or patterns failed to compile
#[derive(Debug, Error)]
pub enum SiteSetupError {
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("Invalid pattern: {0}")]
    Regex(#[from] regex::Error),
}

pub(crate) fn selector(css: &str) -> Result<Selector, SiteSetupError> {
    Selector::parse(css).map_err(|e| SiteSetupError::Selector {
        selector: css.to_string(),
        message: e.to_string(),
    })
}

/// [`PageParser`] for chilepropiedades.cl style pages
#[derive(Debug)]
pub struct ListingSiteParser {
    links: LinkClassifier,
    detail: DetailExtractor,
}

impl ListingSiteParser {
    pub fn new() -> Result<Self, SiteSetupError> {
        Ok(Self {
            links: LinkClassifier::new()?,
            detail: DetailExtractor::new()?,
        })
    }
}

impl PageParser for ListingSiteParser {
    fn parse(
        &self,
        url: &Url,
        kind: FrontierKind,
        content: &str,
    ) -> Result<ParsedPage, ParseError> {
        if content.trim().is_empty() {
            return Err(ParseError::new(url, "empty document"));
        }

        let document = Html::parse_document(content);

        Ok(match kind {
            FrontierKind::Listing => ParsedPage {
                record: None,
                links: self.links.classify(&document, url),
            },
            FrontierKind::Detail => ParsedPage {
                record: Some(self.detail.extract(&document, url)),
                links: Vec::new(),
            },
        })
    }
}
