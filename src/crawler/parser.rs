//! HTML document parser
//!
//! Wraps `scraper` behind the small surface the extractors need: select
//! nodes in document order with a cap, read their text or an attribute,
//! and step down to a descendant. Empty selections are ordinary results.
//!
//! All site-specific class names live in `SelectorSet`, compiled once from
//! the `[selectors]` configuration.

use crate::config::{ClassRule, SelectorConfig};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses an HTML document (never fails; broken markup is repaired)
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Returns at most `limit` nodes matching `selector`, in document order
    pub fn select<'a>(&'a self, selector: &Selector, limit: usize) -> Vec<ElementRef<'a>> {
        let nodes: Vec<ElementRef<'a>> = self.html.select(selector).take(limit).collect();
        tracing::trace!("Selector matched {} node(s) (limit {})", nodes.len(), limit);
        nodes
    }

    /// Returns the first node matching `selector`, if any
    pub fn select_first<'a>(&'a self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.html.select(selector).next()
    }
}

/// Concatenated text of a node and its descendants, untrimmed
pub fn node_text(node: &ElementRef<'_>) -> String {
    node.text().collect()
}

/// Value of an attribute on a node
pub fn node_attr<'a>(node: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    node.value().attr(name)
}

/// First descendant of `node` matching `selector`
pub fn first_descendant<'a>(node: &ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    node.select(selector).next()
}

/// Compiled selectors for every page the pipeline reads
#[derive(Debug, Clone)]
pub struct SelectorSet {
    pub restaurant_name: Selector,
    pub rating: Selector,
    pub area_genre: Selector,
    pub review_summary: Selector,
    pub review_comment: Selector,
    pub comment_text: Selector,
    pub detail_url_attribute: String,
}

impl SelectorSet {
    /// Compiles the configured rules
    ///
    /// # Returns
    ///
    /// * `Ok(SelectorSet)` - Every rule compiled
    /// * `Err(ConfigError::InvalidSelector)` - A rule is not valid CSS
    pub fn compile(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            restaurant_name: compile_rule(&config.restaurant_name)?,
            rating: compile_rule(&config.rating)?,
            area_genre: compile_rule(&config.area_genre)?,
            review_summary: compile_rule(&config.review_summary)?,
            review_comment: compile_rule(&config.review_comment)?,
            comment_text: compile_css(&config.comment_text)?,
            detail_url_attribute: config.detail_url_attribute.trim().to_string(),
        })
    }
}

fn compile_rule(rule: &ClassRule) -> Result<Selector, ConfigError> {
    compile_css(&rule.css())
}

fn compile_css(css: &str) -> Result<Selector, ConfigError> {
    Selector::parse(css).map_err(|e| ConfigError::InvalidSelector(format!("'{}': {:?}", css, e)))
}
