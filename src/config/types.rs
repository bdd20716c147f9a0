use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Main configuration structure for Gourmet-Scout
///
/// Every section is optional. A missing section (or a missing file) yields
/// the built-in target: Tokyo date-night restaurants, ranking order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub target: TargetConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to scrape
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Scheme and host of the site; review detail paths are joined onto it
    #[serde(rename = "site-origin")]
    pub site_origin: String,

    /// Path of the ranked search-results page
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Appended to a restaurant URL to reach its review list
    #[serde(rename = "review-list-suffix")]
    pub review_list_suffix: String,

    /// Number of ranked listings to take from the first results page
    #[serde(rename = "result-limit")]
    pub result_limit: usize,

    /// Query string of the listing page
    ///
    /// - `SrtT=rt`: sort by ranking
    /// - `LstSmoking=0`: no smoking filter
    /// - `ChkCoupleSeat=1`: only places with couple seating
    /// - `svd` / `svt` / `svps`: reservation date, time and party size
    /// - `Srt=D`, `sort_mode=1`: descending ranking sort
    pub query: BTreeMap<String, String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        let query = [
            ("SrtT", "rt"),
            ("LstSmoking", "0"),
            ("ChkCoupleSeat", "1"),
            ("svd", "20201204"),
            ("svt", "1900"),
            ("svps", "2"),
            ("Srt", "D"),
            ("sort_mode", "1"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            site_origin: "https://tabelog.com".to_string(),
            listing_path: "/tokyo/rstLst/cond52-00-00/".to_string(),
            review_list_suffix: "dtlrvwlst/".to_string(),
            result_limit: 10,
            query,
        }
    }
}

/// HTTP behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Bound on connection establishment and on the response wait (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Pause after every completed request (milliseconds)
    #[serde(rename = "politeness-delay-ms")]
    pub politeness_delay_ms: u64,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            politeness_delay_ms: 2000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the scraper
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: Option<String>,

    /// Email address for scraper-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        let contact: Vec<String> = self
            .contact_url
            .iter()
            .map(|u| format!("+{}", u))
            .chain(self.contact_email.iter().cloned())
            .collect();

        if contact.is_empty() {
            format!("{}/{}", self.crawler_name, self.crawler_version)
        } else {
            format!(
                "{}/{} ({})",
                self.crawler_name,
                self.crawler_version,
                contact.join("; ")
            )
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "GourmetScout".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
            contact_email: None,
        }
    }
}

/// An element name plus class tokens that must all be present
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClassRule {
    pub element: String,

    /// Space-separated class tokens
    pub class: String,
}

impl ClassRule {
    pub fn new(element: &str, class: &str) -> Self {
        Self {
            element: element.to_string(),
            class: class.to_string(),
        }
    }

    /// Renders the rule as a CSS selector, e.g. `div.a.b`
    pub fn css(&self) -> String {
        let mut css = self.element.trim().to_string();
        for token in self.class.split_whitespace() {
            css.push('.');
            css.push_str(token);
        }
        css
    }
}

/// Markup contract with the target site
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Anchor carrying the restaurant name and its URL
    #[serde(rename = "restaurant-name")]
    pub restaurant_name: ClassRule,

    #[serde(rename = "rating")]
    pub rating: ClassRule,

    #[serde(rename = "area-genre")]
    pub area_genre: ClassRule,

    /// First review entry on a review-list page
    #[serde(rename = "review-summary")]
    pub review_summary: ClassRule,

    /// Attribute of the review entry holding the review detail path
    #[serde(rename = "detail-url-attribute")]
    pub detail_url_attribute: String,

    /// Review body container on a review-detail page
    #[serde(rename = "review-comment")]
    pub review_comment: ClassRule,

    /// CSS selector for the text block inside the review body
    #[serde(rename = "comment-text")]
    pub comment_text: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            restaurant_name: ClassRule::new(
                "a",
                "list-rst__rst-name-target cpy-rst-name js-ranking-num",
            ),
            rating: ClassRule::new(
                "span",
                "c-rating__val c-rating__val--strong list-rst__rating-val",
            ),
            area_genre: ClassRule::new("div", "list-rst__area-genre cpy-area-genre"),
            review_summary: ClassRule::new("div", "rvw-item js-rvw-item-clickable-area"),
            detail_url_attribute: "data-detail-url".to_string(),
            review_comment: ClassRule::new("div", "rvw-item__rvw-comment"),
            comment_text: "p".to_string(),
        }
    }
}

/// What to do when the listing field lists differ in length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthMismatchPolicy {
    /// Fail the listing stage with `PartialPageError`
    #[default]
    Error,
    /// Keep the first `min(len)` entries of every list
    ///
    /// Lists are cut at the end, not where a node went missing. A list
    /// that lost an entry in the middle pairs its later values with the
    /// wrong ranks: with rank 6's area/genre missing, rank 6 shows rank 7's
    /// area/genre and so on down the list.
    Truncate,
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    #[serde(rename = "on-length-mismatch")]
    pub on_length_mismatch: LengthMismatchPolicy,

    /// Also write the report as markdown to this path
    #[serde(rename = "markdown-path")]
    pub markdown_path: Option<String>,
}
