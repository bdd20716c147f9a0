//! Review resolver
//!
//! Finds the newest review of one restaurant with two dependent fetches:
//! the review-list page yields the detail path of its first review, and the
//! review-detail page yields the text. A restaurant without reviews
//! resolves to `Review::NotAvailable`; every other problem is an error for
//! that restaurant only.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::{first_descendant, node_attr, node_text, Document, SelectorSet};
use crate::record::Review;
use crate::url::{review_detail_url, review_list_url};
use crate::ScrapeError;
use url::Url;

/// Resolves the newest review of a restaurant
#[derive(Debug, Clone)]
pub struct ReviewResolver {
    site_origin: Url,
    review_list_suffix: String,
    selectors: SelectorSet,
}

impl ReviewResolver {
    pub fn new(site_origin: Url, review_list_suffix: &str, selectors: SelectorSet) -> Self {
        Self {
            site_origin,
            review_list_suffix: review_list_suffix.to_string(),
            selectors,
        }
    }

    /// Fetches the review list, then the newest review's detail page
    ///
    /// # Returns
    ///
    /// * `Ok(Review::Latest(text))` - Trimmed text of the newest review
    /// * `Ok(Review::NotAvailable)` - The review list is empty (one fetch made)
    /// * `Err(ScrapeError)` - Either fetch failed or a page lacked expected markup
    pub async fn resolve(&self, fetcher: &mut Fetcher, detail_url: &str) -> Result<Review, ScrapeError> {
        let list_url = review_list_url(detail_url, &self.review_list_suffix)?;
        let list_page = fetcher.fetch(&list_url).await?;

        let detail_path = match self.latest_review_path(&list_page.body, &list_url)? {
            Some(path) => path,
            None => {
                tracing::debug!("No reviews listed at {}", list_url);
                return Ok(Review::NotAvailable);
            }
        };

        let review_url = review_detail_url(&self.site_origin, &detail_path)?;
        let review_page = fetcher.fetch(&review_url).await?;

        self.review_text(&review_page.body, &review_url)
            .map(Review::Latest)
    }

    /// Reads the detail path of the first review entry on a review-list page
    ///
    /// `Ok(None)` means the page lists no reviews.
    pub fn latest_review_path(&self, body: &str, page_url: &str) -> Result<Option<String>, ScrapeError> {
        let document = Document::parse(body);
        let entries = document.select(&self.selectors.review_summary, 1);

        let Some(entry) = entries.first() else {
            return Ok(None);
        };

        let attribute = &self.selectors.detail_url_attribute;
        match node_attr(entry, attribute).map(str::trim) {
            Some(path) if !path.is_empty() => Ok(Some(path.to_string())),
            _ => Err(ScrapeError::malformed(
                page_url,
                format!("review entry without {}", attribute),
            )),
        }
    }

    /// Reads the trimmed body text of the review on a review-detail page
    pub fn review_text(&self, body: &str, page_url: &str) -> Result<String, ScrapeError> {
        let document = Document::parse(body);
        let comments = document.select(&self.selectors.review_comment, 1);

        let comment = comments
            .first()
            .ok_or_else(|| ScrapeError::malformed(page_url, "review comment not found"))?;

        let block = first_descendant(comment, &self.selectors.comment_text)
            .ok_or_else(|| ScrapeError::malformed(page_url, "review comment has no text block"))?;

        Ok(node_text(&block).trim().to_string())
    }
}
