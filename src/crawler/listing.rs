//! Listing extractor
//!
//! Reads the ranked search-results page into `PartialRecord`s. Names, URLs,
//! ratings and area/genre lines are selected independently and aligned by
//! position, so their lengths must agree before they are zipped.

use crate::config::LengthMismatchPolicy;
use crate::crawler::parser::{node_attr, node_text, Document, SelectorSet};
use crate::record::PartialRecord;
use crate::url::resolve_detail_url;
use crate::ScrapeError;
use url::Url;

/// Extracts up to `limit` ranked listings from the search-results page
///
/// # Arguments
///
/// * `page_url` - URL the document was fetched from (base for relative hrefs)
/// * `document` - The parsed listing page
/// * `selectors` - Compiled markup selectors
/// * `limit` - Maximum number of listings to take
/// * `policy` - What to do when the field lists differ in length
///
/// # Returns
///
/// * `Ok(Vec<PartialRecord>)` - Listings in rank order, ranks 1..=n
/// * `Err(ScrapeError::PartialPage)` - Field lists diverge under `Error` policy
/// * `Err(ScrapeError::MalformedPage)` - A name has no href or a rating is unreadable
pub fn extract_listings(
    page_url: &Url,
    document: &Document,
    selectors: &SelectorSet,
    limit: usize,
    policy: LengthMismatchPolicy,
) -> Result<Vec<PartialRecord>, ScrapeError> {
    let name_nodes = document.select(&selectors.restaurant_name, limit);

    let names: Vec<String> = name_nodes
        .iter()
        .map(|node| node_text(node).trim().to_string())
        .collect();

    let urls = name_nodes
        .iter()
        .map(|node| {
            let href = node_attr(node, "href").ok_or_else(|| {
                ScrapeError::malformed(page_url.as_str(), "restaurant link without href")
            })?;
            resolve_detail_url(page_url, href)
        })
        .collect::<Result<Vec<String>, ScrapeError>>()?;

    let ratings = document
        .select(&selectors.rating, limit)
        .iter()
        .map(|node| {
            let text = node_text(node);
            parse_rating(&text).ok_or_else(|| {
                ScrapeError::malformed(
                    page_url.as_str(),
                    format!("unreadable rating '{}'", text.trim()),
                )
            })
        })
        .collect::<Result<Vec<f64>, ScrapeError>>()?;

    let genres: Vec<String> = document
        .select(&selectors.area_genre, limit)
        .iter()
        .map(|node| node_text(node).trim_end().to_string())
        .collect();

    let count = aligned_length(
        [names.len(), ratings.len(), genres.len(), urls.len()],
        policy,
    )?;

    tracing::debug!("Extracted {} listing(s) from {}", count, page_url);

    Ok(names
        .into_iter()
        .zip(ratings)
        .zip(genres)
        .zip(urls)
        .take(count)
        .enumerate()
        .map(|(index, (((name, rating), area_genre), detail_url))| PartialRecord {
            rank: index + 1,
            name,
            rating,
            area_genre,
            detail_url,
        })
        .collect())
}

/// Parses rating text such as `"3.58"`
///
/// Returns `None` for anything that is not a finite, non-negative number.
pub fn parse_rating(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|rating| rating.is_finite() && *rating >= 0.0)
}

/// Checks that the four field lists line up
///
/// Lengths are `[names, ratings, genres, urls]`.
fn aligned_length(lengths: [usize; 4], policy: LengthMismatchPolicy) -> Result<usize, ScrapeError> {
    let shortest = lengths.iter().copied().min().unwrap_or(0);
    let longest = lengths.iter().copied().max().unwrap_or(0);

    if shortest == longest {
        return Ok(shortest);
    }

    let [names, ratings, genres, urls] = lengths;
    match policy {
        LengthMismatchPolicy::Error => Err(ScrapeError::PartialPage {
            names,
            ratings,
            genres,
            urls,
        }),
        LengthMismatchPolicy::Truncate => {
            tracing::warn!(
                "Listing fields misaligned (names {}, ratings {}, genres {}, urls {}); keeping first {}",
                names,
                ratings,
                genres,
                urls,
                shortest
            );
            Ok(shortest)
        }
    }
}
