//! URL handling module for Gourmet-Scout
//!
//! Builds the listing URL from the target configuration and derives the
//! per-restaurant review URLs from scraped attributes.

use crate::config::TargetConfig;
use crate::{Result, ScrapeError};
use url::Url;

/// Parses a URL, attaching the offending text to the error
pub fn parse_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|source| ScrapeError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}

/// Builds the listing page URL: site origin + listing path + query string
///
/// # Examples
///
/// ```
/// use gourmet_scout::config::TargetConfig;
/// use gourmet_scout::url::listing_url;
///
/// let url = listing_url(&TargetConfig::default()).unwrap();
/// assert!(url.as_str().starts_with("https://tabelog.com/tokyo/rstLst/cond52-00-00/?"));
/// assert!(url.as_str().contains("ChkCoupleSeat=1"));
/// ```
pub fn listing_url(target: &TargetConfig) -> Result<Url> {
    let origin = parse_url(&target.site_origin)?;
    let mut url = join(&origin, &target.listing_path)?;

    if !target.query.is_empty() {
        url.query_pairs_mut().extend_pairs(target.query.iter());
    }

    Ok(url)
}

/// Resolves a restaurant href scraped from the listing page
///
/// Absolute hrefs pass through; site-relative ones are resolved against
/// the listing page.
pub fn resolve_detail_url(listing_url: &Url, href: &str) -> Result<String> {
    Ok(join(listing_url, href.trim())?.to_string())
}

/// Appends the review-list suffix to a restaurant URL with exactly one `/`
/// between them
///
/// # Examples
///
/// ```
/// use gourmet_scout::url::review_list_url;
///
/// let a = review_list_url("https://tabelog.com/tokyo/A1301/13000001/", "dtlrvwlst/").unwrap();
/// let b = review_list_url("https://tabelog.com/tokyo/A1301/13000001", "/dtlrvwlst/").unwrap();
/// assert_eq!(a, "https://tabelog.com/tokyo/A1301/13000001/dtlrvwlst/");
/// assert_eq!(a, b);
/// ```
pub fn review_list_url(detail_url: &str, suffix: &str) -> Result<String> {
    let combined = format!(
        "{}/{}",
        detail_url.trim_end_matches('/'),
        suffix.trim_start_matches('/')
    );
    Ok(parse_url(&combined)?.to_string())
}

/// Joins a scraped review detail path onto the site origin
pub fn review_detail_url(site_origin: &Url, detail_path: &str) -> Result<String> {
    Ok(join(site_origin, detail_path.trim())?.to_string())
}

fn join(base: &Url, reference: &str) -> Result<Url> {
    base.join(reference).map_err(|source| ScrapeError::InvalidUrl {
        url: reference.to_string(),
        source,
    })
}
