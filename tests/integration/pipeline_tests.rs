//! Integration tests for the pipeline
//!
//! These tests use wiremock to stand in for the search service and for the
//! candidate pages, and run the pipeline end-to-end against a temporary
//! output file.

use contact_harvest::config::Config;
use contact_harvest::output::{read_records, CSV_HEADER};
use contact_harvest::pipeline::{run_pipeline, Pipeline};
use contact_harvest::postal::{PostalCodeDirectory, PostalCodeEntry};
use serde_json::json;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock search service
fn create_test_config(search_server: &MockServer, csv_path: &Path) -> Config {
    let mut config = Config::default();
    config.search.endpoint = format!("{}/search", search_server.uri());
    config.search.api_key = "test-key".to_string();
    config.retry.delay_ms = 10; // Very short for testing
    config.fetcher.timeout_secs = 2;
    config.output.csv_path = csv_path.to_string_lossy().into_owned();
    config
}

fn entry(postal_code: &str, commune_name: &str) -> PostalCodeEntry {
    PostalCodeEntry {
        postal_code: postal_code.to_string(),
        commune_name: commune_name.to_string(),
    }
}

fn organic(links: &[String]) -> ResponseTemplate {
    let results: Vec<_> = links.iter().map(|link| json!({ "link": link })).collect();
    ResponseTemplate::new(200).set_body_json(json!({ "organic": results }))
}

fn contact_page(text: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body><p>{}</p></body></html>", text))
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn requests_to(server: &MockServer, paths: &[&str]) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| paths.contains(&request.url.path()))
        .count()
}

fn header_lines(path: &Path) -> usize {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|line| *line == CSV_HEADER.join(","))
        .count()
}

#[tokio::test]
async fn test_same_domain_results_fetched_once() {
    let search_server = MockServer::start().await;
    let page_server = MockServer::start().await;
    let base_url = page_server.uri();

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(organic(&[
            format!("{}/contact", base_url),
            format!("{}/about", base_url),
        ]))
        .expect(1)
        .mount(&search_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(contact_page("Contactez-nous au 01 23 45 67 89"))
        .mount(&page_server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("contacts.csv");
    let config = create_test_config(&search_server, &csv_path);
    let pipeline = Pipeline::from_config(&config).unwrap();

    let records = pipeline
        .dispatcher
        .dispatch(&entry("75001", "Paris"))
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].phone_numbers, vec!["01 23 45 67 89"]);
    assert_eq!(records[0].commune, "Paris");
    assert_eq!(records[0].postal_code, "75001");
    assert_eq!(requests_to(&page_server, &["/contact", "/about"]).await, 1);
    assert_eq!(pipeline.registry.len(), 1);
    assert_eq!(read_records(&csv_path).unwrap(), records);
}

#[tokio::test]
async fn test_search_server_error_exhausts_retries() {
    let search_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&search_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&search_server, &dir.path().join("contacts.csv"));
    let pipeline = Pipeline::from_config(&config).unwrap();

    let records = pipeline
        .dispatcher
        .dispatch(&entry("75001", "Paris 1er"))
        .await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_search_failure_does_not_stop_other_postal_codes() {
    let search_server = MockServer::start().await;
    let page_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_string_contains("75001"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&search_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_string_contains("75002"))
        .respond_with(organic(&[format!("{}/contact", page_server.uri())]))
        .expect(1)
        .mount(&search_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(contact_page("Écrivez-nous : contact[a]example.fr"))
        .expect(1)
        .mount(&page_server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("contacts.csv");
    let config = create_test_config(&search_server, &csv_path);

    let postal_codes: PostalCodeDirectory = vec![
        ("75001".to_string(), "Paris 1er".to_string()),
        ("75002".to_string(), "Paris 2e".to_string()),
    ]
    .into_iter()
    .collect();

    run_pipeline(&config, postal_codes).await.unwrap();

    let records = read_records(&csv_path).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].postal_code, "75002");
    assert_eq!(records[0].commune, "Paris 2e");
    assert_eq!(records[0].email_addresses, vec!["contact[a]example.fr"]);
}

#[tokio::test]
async fn test_pdf_results_never_fetched() {
    let search_server = MockServer::start().await;
    let page_server = MockServer::start().await;
    let base_url = page_server.uri();

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(organic(&[format!("{}/brochure.pdf", base_url)]))
        .mount(&search_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(contact_page("01 23 45 67 89"))
        .expect(0)
        .mount(&page_server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("contacts.csv");
    let config = create_test_config(&search_server, &csv_path);
    let pipeline = Pipeline::from_config(&config).unwrap();

    let records = pipeline
        .dispatcher
        .dispatch(&entry("13001", "Marseille"))
        .await;

    assert!(records.is_empty());
    assert!(pipeline.registry.is_empty());
    assert!(!csv_path.exists());
}

#[tokio::test]
async fn test_results_without_links_are_skipped() {
    let search_server = MockServer::start().await;
    let page_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic": [
                { "title": "Sans lien" },
                { "title": "Avec lien", "link": format!("{}/", page_server.uri()) }
            ]
        })))
        .mount(&search_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(contact_page("Tél. 04 91 00 11 22 - devis@artisan.fr"))
        .expect(1)
        .mount(&page_server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("contacts.csv");
    let config = create_test_config(&search_server, &csv_path);
    let pipeline = Pipeline::from_config(&config).unwrap();

    let records = pipeline
        .dispatcher
        .dispatch(&entry("13001", "Marseille"))
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].phone_numbers, vec!["04 91 00 11 22"]);
    assert_eq!(records[0].email_addresses, vec!["devis@artisan.fr"]);
}

#[tokio::test]
async fn test_malformed_search_response_yields_nothing() {
    let search_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .expect(1)
        .mount(&search_server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&search_server, &dir.path().join("contacts.csv"));
    let pipeline = Pipeline::from_config(&config).unwrap();

    let records = pipeline
        .dispatcher
        .dispatch(&entry("69001", "Lyon"))
        .await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_unreachable_link_does_not_affect_siblings() {
    let search_server = MockServer::start().await;
    let good_server = MockServer::start().await;

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let dead_port = listener.local_addr().unwrap().port();
    drop(listener);

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(organic(&[
            format!("http://127.0.0.1:{}/contact", dead_port),
            format!("{}/contact", good_server.uri()),
        ]))
        .mount(&search_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(contact_page("05 56 00 00 00"))
        .expect(1)
        .mount(&good_server)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("contacts.csv");
    let mut config = create_test_config(&search_server, &csv_path);
    config.retry.fetch_attempts = 1;
    config.retry.link_attempts = 2;
    let pipeline = Pipeline::from_config(&config).unwrap();

    let records = pipeline
        .dispatcher
        .dispatch(&entry("33000", "Bordeaux"))
        .await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].phone_numbers, vec!["05 56 00 00 00"]);
    assert_eq!(pipeline.registry.len(), 2);
}

#[tokio::test]
async fn test_rerun_appends_without_second_header() {
    let search_server = MockServer::start().await;
    let first_site = MockServer::start().await;
    let second_site = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_string_contains("59000"))
        .respond_with(organic(&[format!("{}/", first_site.uri())]))
        .mount(&search_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_string_contains("67000"))
        .respond_with(organic(&[format!("{}/", second_site.uri())]))
        .mount(&search_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(contact_page("03 20 00 00 00"))
        .mount(&first_site)
        .await;
    Mock::given(method("GET"))
        .respond_with(contact_page("03 88 00 00 00"))
        .mount(&second_site)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("contacts.csv");
    let config = create_test_config(&search_server, &csv_path);

    let first_run: PostalCodeDirectory = vec![("59000".to_string(), "Lille".to_string())]
        .into_iter()
        .collect();
    run_pipeline(&config, first_run).await.unwrap();

    let second_run: PostalCodeDirectory =
        vec![("67000".to_string(), "Strasbourg".to_string())]
            .into_iter()
            .collect();
    run_pipeline(&config, second_run).await.unwrap();

    assert_eq!(header_lines(&csv_path), 1);

    let records = read_records(&csv_path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].commune, "Lille");
    assert_eq!(records[1].commune, "Strasbourg");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_postal_codes_share_domain_registry() {
    let search_server = MockServer::start().await;
    let shared_site = MockServer::start().await;

    // Every postal code finds the same site
    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(organic(&[
            format!("{}/agence", shared_site.uri()),
            format!("{}/contact", shared_site.uri()),
        ]))
        .mount(&search_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(contact_page("02 99 00 00 00 - agence@immo.fr"))
        .mount(&shared_site)
        .await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("contacts.csv");
    let mut config = create_test_config(&search_server, &csv_path);
    config.pipeline.postal_code_workers = 4;

    let postal_codes: PostalCodeDirectory = (0..8)
        .map(|i| (format!("3500{}", i), format!("Rennes {}", i)))
        .collect();
    run_pipeline(&config, postal_codes).await.unwrap();

    assert_eq!(requests_to(&shared_site, &["/agence", "/contact"]).await, 1);
    assert_eq!(header_lines(&csv_path), 1);
    assert_eq!(read_records(&csv_path).unwrap().len(), 1);
}
