use crate::constants::*;
use crate::error::{Result, ScraperError};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

/// A compiled CSS selector that remembers its source text for error messages.
#[derive(Debug)]
pub struct Lookup {
    pub css: &'static str,
    pub selector: Selector,
}

impl Lookup {
    pub fn parse(css: &'static str) -> Result<Self> {
        Ok(Self {
            css,
            selector: parse_selector(css)?,
        })
    }

    fn constant(css: &'static str) -> Self {
        Self::parse(css).expect("constant selector must parse")
    }
}

pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ScraperError::Selector(format!("{}: {:?}", css, e)))
}

pub static ITEM: Lazy<Lookup> = Lazy::new(|| Lookup::constant(ITEM_SELECTOR));
pub static HEADER: Lazy<Lookup> = Lazy::new(|| Lookup::constant(HEADER_SELECTOR));
pub static METADATA: Lazy<Lookup> = Lazy::new(|| Lookup::constant(METADATA_SELECTOR));
pub static RATING: Lazy<Lookup> = Lazy::new(|| Lookup::constant(RATING_SELECTOR));
pub static VOTE_COUNT: Lazy<Lookup> = Lazy::new(|| Lookup::constant(VOTE_COUNT_SELECTOR));
pub static POSTER: Lazy<Lookup> = Lazy::new(|| Lookup::constant(POSTER_SELECTOR));
pub static DESCRIPTION: Lazy<Lookup> = Lazy::new(|| Lookup::constant(DESCRIPTION_SELECTOR));
pub static CREDIT: Lazy<Lookup> = Lazy::new(|| Lookup::constant(CREDIT_SELECTOR));

/// Per-node lookups over one catalog entry.
///
/// Single lookups fail with `MissingField` when nothing matches instead of
/// returning an empty value; list lookups return an empty vector.
pub trait CatalogNode {
    fn find_text(&self, lookup: &Lookup) -> Result<String>;
    fn find_all_text(&self, lookup: &Lookup) -> Vec<String>;
    fn find_attribute(&self, lookup: &Lookup, name: &str) -> Result<String>;
}

impl CatalogNode for ElementRef<'_> {
    fn find_text(&self, lookup: &Lookup) -> Result<String> {
        self.select(&lookup.selector)
            .next()
            .map(element_text)
            .ok_or_else(|| ScraperError::MissingField(lookup.css.to_string()))
    }

    fn find_all_text(&self, lookup: &Lookup) -> Vec<String> {
        self.select(&lookup.selector).map(element_text).collect()
    }

    fn find_attribute(&self, lookup: &Lookup, name: &str) -> Result<String> {
        self.select(&lookup.selector)
            .next()
            .and_then(|el| el.value().attr(name))
            .map(|v| v.to_string())
            .ok_or_else(|| ScraperError::MissingField(format!("{}[{}]", lookup.css, name)))
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&el.text().collect::<String>())
}

/// Collapses runs of ASCII whitespace; non-breaking spaces are left for callers.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_ascii_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}
