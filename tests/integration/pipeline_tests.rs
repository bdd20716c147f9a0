//! Integration tests for the scrape pipeline
//!
//! These tests use wiremock to serve a listing page and per-restaurant
//! review chains, and run the full pipeline against it.

use gourmet_scout::config::{Config, LengthMismatchPolicy};
use gourmet_scout::crawler::{Fetcher, Pipeline};
use gourmet_scout::output::format_text_report;
use gourmet_scout::{RecordOutcome, Review, ScrapeError};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/tokyo/rstLst/cond52-00-00/";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.target.site_origin = base_url.to_string();
    config.target.listing_path = LISTING_PATH.to_string();
    config.fetcher.timeout_secs = 5;
    config.fetcher.politeness_delay_ms = 5; // Very short for testing
    config
}

fn restaurant_id(rank: usize) -> usize {
    13_000_000 + rank
}

fn restaurant_path(rank: usize) -> String {
    format!("/tokyo/A1301/A130101/{}/", restaurant_id(rank))
}

fn review_detail_path(rank: usize) -> String {
    format!("{}dtlrvwlst/B{}/", restaurant_path(rank), 400 + rank)
}

fn expected_name(rank: usize) -> String {
    format!("Restaurant {}", rank)
}

const RATING_TEXTS: [&str; 10] = [
    "4.0", "3.95", "3.9", "3.85", "3.8", "3.75", "3.7", "3.65", "3.6", "3.5",
];

const RATINGS: [f64; 10] = [4.0, 3.95, 3.9, 3.85, 3.8, 3.75, 3.7, 3.65, 3.6, 3.5];

fn expected_rating(rank: usize) -> f64 {
    RATINGS[rank - 1]
}

fn expected_genre(rank: usize) -> String {
    format!("Ginza Sta. 250m / French, Wine Bar {}", rank)
}

fn expected_review(rank: usize) -> String {
    format!("Latest review of restaurant {}: lovely evening.", rank)
}

/// Builds a listing page; `skip_genre` drops one area/genre node
fn listing_html(base_url: &str, count: usize, skip_genre: Option<usize>) -> String {
    let entries: String = (1..=count)
        .map(|rank| {
            let genre = if Some(rank) == skip_genre {
                String::new()
            } else {
                format!(
                    "<div class=\"list-rst__area-genre cpy-area-genre\">{}   \n</div>",
                    expected_genre(rank)
                )
            };
            format!(
                r#"<div class="list-rst">
                    <a class="list-rst__rst-name-target cpy-rst-name js-ranking-num" href="{base}{path}">{name}</a>
                    {genre}
                    <span class="c-rating__val c-rating__val--strong list-rst__rating-val">{rating}</span>
                </div>"#,
                base = base_url,
                path = restaurant_path(rank),
                name = expected_name(rank),
                genre = genre,
                rating = RATING_TEXTS[rank - 1],
            )
        })
        .collect();

    format!("<html><body>{}</body></html>", entries)
}

fn review_list_html(rank: usize) -> String {
    format!(
        r#"<html><body>
            <div class="rvw-item js-rvw-item-clickable-area" data-detail-url="{}"></div>
            <div class="rvw-item js-rvw-item-clickable-area" data-detail-url="/older/review/"></div>
        </body></html>"#,
        review_detail_path(rank)
    )
}

fn review_detail_html(rank: usize) -> String {
    format!(
        r#"<html><body><div class="rvw-item__rvw-comment">
            <p>
                {}
            </p>
        </div></body></html>"#,
        expected_review(rank)
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

async fn mount_listing(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(html(body))
        .mount(server)
        .await;
}

async fn mount_review_chain(server: &MockServer, rank: usize) {
    Mock::given(method("GET"))
        .and(path(format!("{}dtlrvwlst/", restaurant_path(rank))))
        .respond_with(html(review_list_html(rank)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(review_detail_path(rank)))
        .respond_with(html(review_detail_html(rank)))
        .mount(server)
        .await;
}

/// Asserts ranks are 1..=n with no gaps or duplicates
fn assert_rank_order(outcomes: &[RecordOutcome]) {
    let ranks: Vec<usize> = outcomes.iter().map(RecordOutcome::rank).collect();
    let expected: Vec<usize> = (1..=outcomes.len()).collect();
    assert_eq!(ranks, expected);
}

#[tokio::test]
async fn test_ten_listings_round_trip() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, listing_html(&base_url, 10, None)).await;
    for rank in 1..=10 {
        mount_review_chain(&mock_server, rank).await;
    }

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    assert!(report.fatal.is_none(), "unexpected fatal: {:?}", report.fatal);
    assert_eq!(report.outcomes.len(), 10);
    assert_rank_order(&report.outcomes);

    for (index, outcome) in report.outcomes.iter().enumerate() {
        let rank = index + 1;
        let record = outcome.as_complete().expect("record should be complete");
        assert_eq!(record.listing.name, expected_name(rank));
        assert_eq!(record.listing.rating, expected_rating(rank));
        assert_eq!(record.listing.area_genre, expected_genre(rank));
        assert_eq!(
            record.listing.detail_url,
            format!("{}{}", base_url, restaurant_path(rank))
        );
        assert_eq!(record.review, Review::Latest(expected_review(rank)));
    }

    // One listing fetch plus two per restaurant, each followed by one pause
    assert_eq!(report.requests, 21);
    assert_eq!(report.pauses, 21);
}

#[tokio::test]
async fn test_length_mismatch_raises_partial_page_error() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, listing_html(&base_url, 10, Some(6))).await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    assert!(report.outcomes.is_empty());
    match report.fatal {
        Some(ScrapeError::PartialPage {
            names,
            ratings,
            genres,
            urls,
        }) => assert_eq!((names, ratings, genres, urls), (10, 10, 9, 10)),
        other => panic!("expected PartialPage, got {:?}", other),
    }
    assert_eq!(report.requests, 1);
}

#[tokio::test]
async fn test_length_mismatch_truncates_when_configured() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, listing_html(&base_url, 10, Some(6))).await;
    for rank in 1..=10 {
        mount_review_chain(&mock_server, rank).await;
    }

    let mut config = create_test_config(&base_url);
    config.output.on_length_mismatch = LengthMismatchPolicy::Truncate;

    let mut first_run = Pipeline::new(&config).expect("Failed to create pipeline");
    let first = first_run.run().await;
    let mut second_run = Pipeline::new(&config).expect("Failed to create pipeline");
    let second = second_run.run().await;

    assert!(first.fatal.is_none());
    assert_eq!(first.outcomes.len(), 9);
    assert_rank_order(&first.outcomes);

    let names = |outcomes: &[RecordOutcome]| -> Vec<String> {
        outcomes.iter().map(|o| o.listing().name.clone()).collect()
    };
    assert_eq!(names(&first.outcomes), names(&second.outcomes));
    assert_eq!(first.outcomes[8].listing().name, expected_name(9));

    // Genres after the missing node shift up by one rank
    assert_eq!(first.outcomes[4].listing().area_genre, expected_genre(5).trim_end());
    assert_eq!(first.outcomes[5].listing().name, expected_name(6));
    assert_eq!(first.outcomes[5].listing().area_genre, expected_genre(7).trim_end());
    assert_eq!(first.outcomes[8].listing().area_genre, expected_genre(10).trim_end());
}

#[tokio::test]
async fn test_missing_reviews_yield_sentinel() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, listing_html(&base_url, 4, None)).await;
    for rank in [1, 2, 4] {
        mount_review_chain(&mock_server, rank).await;
    }
    Mock::given(method("GET"))
        .and(path(format!("{}dtlrvwlst/", restaurant_path(3))))
        .respond_with(html("<html><body><p>No reviews yet</p></body></html>".to_string()))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    assert_eq!(report.outcomes.len(), 4);
    assert!(report.outcomes.iter().all(RecordOutcome::is_complete));
    assert_eq!(
        report.outcomes[2].as_complete().map(|r| r.review.clone()),
        Some(Review::NotAvailable)
    );
    assert_eq!(
        report.outcomes[3].as_complete().map(|r| r.review.clone()),
        Some(Review::Latest(expected_review(4)))
    );

    // Rank 3 stops after its review list
    assert_eq!(report.requests, 1 + 2 * 3 + 1);
    assert_eq!(report.pauses, report.requests);
}

#[tokio::test]
async fn test_record_failure_does_not_abort_run() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, listing_html(&base_url, 5, None)).await;
    for rank in [1, 2, 4, 5] {
        mount_review_chain(&mock_server, rank).await;
    }
    Mock::given(method("GET"))
        .and(path(format!("{}dtlrvwlst/", restaurant_path(3))))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    assert!(report.fatal.is_none());
    assert_eq!(report.outcomes.len(), 5);
    assert_rank_order(&report.outcomes);

    let failure = report.outcomes[2].as_failure().expect("rank 3 should fail");
    assert!(matches!(failure.error, ScrapeError::Http { status: 503, .. }));
    assert_eq!(failure.listing.name, expected_name(3));

    for index in [0, 1, 3, 4] {
        assert!(report.outcomes[index].is_complete());
    }

    // The 503 response is still followed by a pause
    assert_eq!(report.requests, 1 + 2 * 4 + 1);
    assert_eq!(report.pauses, report.requests);

    let text = format_text_report(&report);
    assert!(text.contains("FAILED [HTTPError]"));
    assert!(text.contains("(ranks 3)"));
}

#[tokio::test]
async fn test_review_detail_failure_only_fails_that_record() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, listing_html(&base_url, 3, None)).await;
    for rank in [1, 3] {
        mount_review_chain(&mock_server, rank).await;
    }
    Mock::given(method("GET"))
        .and(path(format!("{}dtlrvwlst/", restaurant_path(2))))
        .respond_with(html(review_list_html(2)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(review_detail_path(2)))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    assert!(report.fatal.is_none());
    assert_eq!(report.outcomes.len(), 3);
    assert_rank_order(&report.outcomes);

    let failure = report.outcomes[1].as_failure().expect("rank 2 should fail");
    assert_eq!(failure.error.kind(), "HTTPError");
    match &failure.error {
        ScrapeError::Http { url, status } => {
            assert_eq!(*status, 404);
            assert!(url.ends_with(&review_detail_path(2)));
        }
        other => panic!("expected Http, got {:?}", other),
    }

    assert!(report.outcomes[0].is_complete());
    assert_eq!(
        report.outcomes[2].as_complete().map(|r| r.review.clone()),
        Some(Review::Latest(expected_review(3)))
    );

    assert_eq!(report.requests, 1 + 2 * 3);
    assert_eq!(report.pauses, report.requests);
}

#[tokio::test]
async fn test_missing_detail_attribute_is_malformed_record() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_listing(&mock_server, listing_html(&base_url, 2, None)).await;
    mount_review_chain(&mock_server, 1).await;
    Mock::given(method("GET"))
        .and(path(format!("{}dtlrvwlst/", restaurant_path(2))))
        .respond_with(html(
            r#"<div class="rvw-item js-rvw-item-clickable-area"></div>"#.to_string(),
        ))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    assert!(report.outcomes[0].is_complete());
    let failure = report.outcomes[1].as_failure().expect("rank 2 should fail");
    assert_eq!(failure.error.kind(), "MalformedPageError");
}

#[tokio::test]
async fn test_listing_http_error_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    assert!(report.outcomes.is_empty());
    assert!(matches!(
        report.fatal,
        Some(ScrapeError::Http { status: 500, .. })
    ));
    assert_eq!(report.pauses, 1);

    let text = format_text_report(&report);
    assert!(text.contains("Listing stage failed [HTTPError]"));
    assert!(text.contains("Finished in "));
}

#[tokio::test]
async fn test_listing_timeout_is_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(
            html(listing_html(&base_url, 1, None)).set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url);
    let fetcher = Fetcher::with_settings(
        &config.user_agent,
        Duration::from_millis(300),
        Duration::from_millis(5),
    )
    .expect("Failed to create fetcher");
    let mut pipeline = Pipeline::with_fetcher(&config, fetcher).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    assert!(report.outcomes.is_empty());
    let fatal = report.fatal.as_ref().expect("run should be fatal");
    assert_eq!(fatal.kind(), "ConnectTimeout");
    assert_eq!(report.pauses, 0);
    assert!(format_text_report(&report).contains("Finished in "));
}

#[tokio::test]
async fn test_unreachable_listing_is_network_error() {
    // Port 1 on localhost is not expected to accept connections
    let config = create_test_config("http://127.0.0.1:1");
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    assert!(report.outcomes.is_empty());
    let fatal = report.fatal.as_ref().expect("run should be fatal");
    assert_eq!(fatal.kind(), "NetworkError");
    assert_eq!(report.pauses, 0);
}

#[tokio::test]
async fn test_relative_hrefs_resolve_against_listing_page() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Same page with site-relative links
    let relative = listing_html("", 1, None);
    mount_listing(&mock_server, relative).await;
    mount_review_chain(&mock_server, 1).await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    let record = report.outcomes[0].as_complete().expect("record should be complete");
    assert_eq!(
        record.listing.detail_url,
        format!("{}{}", base_url, restaurant_path(1))
    );
    assert_eq!(record.review, Review::Latest(expected_review(1)));
}

#[tokio::test]
async fn test_shift_jis_listing_without_declared_charset() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let page = format!(
        r#"<html><head><title>東京 デート ランキング</title></head><body>
            <p>東京都内でデートに使えるお店をランキング形式でご紹介します。カップルシートのあるお店だけを集めました。</p>
            <div class="list-rst">
                <a class="list-rst__rst-name-target cpy-rst-name js-ranking-num" href="{base}{path}">銀座 フレンチ レストラン</a>
                <div class="list-rst__area-genre cpy-area-genre">銀座駅 徒歩3分 / フレンチ、ワインバー  </div>
                <span class="c-rating__val c-rating__val--strong list-rst__rating-val">3.5</span>
            </div>
        </body></html>"#,
        base = base_url,
        path = restaurant_path(1),
    );
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode(&page);

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(bytes.into_owned())
                .insert_header("content-type", "text/html"),
        )
        .mount(&mock_server)
        .await;
    mount_review_chain(&mock_server, 1).await;

    let config = create_test_config(&base_url);
    let mut pipeline = Pipeline::new(&config).expect("Failed to create pipeline");
    let report = pipeline.run().await;

    let record = report.outcomes[0].as_complete().expect("record should be complete");
    assert_eq!(record.listing.name, "銀座 フレンチ レストラン");
    assert_eq!(record.listing.area_genre, "銀座駅 徒歩3分 / フレンチ、ワインバー");
    assert_eq!(record.listing.rating, 3.5);
}
