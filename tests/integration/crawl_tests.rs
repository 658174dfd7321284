use casa_ripple::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use casa_ripple::crawler::{crawl_with_parser, run_crawl};
use casa_ripple::output::CSV_HEADERS;
use casa_ripple::site::ListingSiteParser;
use casa_ripple::CrawlError;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay
fn create_test_config(start_url: String, csv_path: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            start_url,
            parallelism: 3,
            random_delay_ms: 0,
            request_timeout_secs: 5,
            ..Default::default()
        },
        user_agent: UserAgentConfig {
            name: "TestBot".to_string(),
            version: "1.0.0".to_string(),
            contact_url: None,
        },
        output: OutputConfig {
            csv_path: csv_path.display().to_string(),
        },
    }
}

fn listing_page(pagination: &[&str], details: &[&str]) -> String {
    let mut body = String::from("<html><body><div class=\"results\">");
    for href in details {
        body.push_str(&format!(
            r#"<div class="clp-publication-element"><a class="d-block text-ellipsis clp-big-value" href="{}">Casa</a></div>"#,
            href
        ));
    }
    body.push_str("</div><ul class=\"pagination\">");
    for href in pagination {
        body.push_str(&format!(
            r#"<li class="page-item"><a class="page-link" href="{}">&gt;</a></li>"#,
            href
        ));
    }
    body.push_str("</ul></body></html>");
    body
}

const DETAIL_PAGE: &str = r#"<html><body>
    <div class="clp-details-table">
        <div class="clp-description-label">Tipo de propiedad:</div>
        <div class="clp-description-value">Casa</div>
        <div class="clp-description-label">Valor:</div>
        <div class="clp-description-value">UF 12.500,50</div>
        <div class="clp-description-label">Valor (CLP aprox.)*:</div>
        <div class="clp-description-value">$ 477.500.000</div>
        <div class="clp-description-label">Habitaciones:</div>
        <div class="clp-description-value">5</div>
        <div class="clp-description-label">Baños:</div>
        <div class="clp-description-value">4</div>
        <div class="clp-description-label">Estacionamientos:</div>
        <div class="clp-description-value">3</div>
        <div class="clp-description-label">Superficie Total:</div>
        <div class="clp-description-value">850,25 m²</div>
        <div class="clp-description-label">Superficie Construida:</div>
        <div class="clp-description-value">320 m²</div>
        <div class="clp-description-label">Año Construcción:</div>
        <div class="clp-description-value">2005</div>
        <div class="clp-description-label">Dirección:</div>
        <div class="clp-description-value">Las Condes, Camino El Alba 11800</div>
    </div>
    <div class="clp-publication-contact-box">
        <h2 class="subtitle">Información de contacto</h2>
        <table><tr><td>Andrea Soto</td></tr></table>
    </div>
    <div class="clp-description-box">Casa mediterránea con vista a la cordillera.</div>
    <script>var publicationLocation = [-33.401234, -70.512345];</script>
</body></html>"#;

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn read_csv(path: &Path) -> (Vec<String>, Vec<csv::StringRecord>) {
    let mut reader = csv::Reader::from_path(path).expect("Failed to open CSV");
    let headers = reader
        .headers()
        .expect("Failed to read header")
        .iter()
        .map(String::from)
        .collect();
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .expect("Failed to read rows");
    (headers, rows)
}

async fn request_count(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .expect("Request recording disabled")
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

#[tokio::test]
async fn test_full_crawl_writes_one_row_per_detail_page() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/propiedades/0",
        listing_page(&["/propiedades/1"], &["/ver-publicacion/casa/1"]),
    )
    .await;
    mount_html(&server, "/propiedades/1", listing_page(&[], &[])).await;
    mount_html(&server, "/ver-publicacion/casa/1", DETAIL_PAGE.to_string()).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("propiedades.csv");
    let config = create_test_config(format!("{}/propiedades/0", server.uri()), &csv_path);

    let summary = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(summary.records, 1);
    assert_eq!(summary.listing_pages_fetched, 2);
    assert_eq!(summary.detail_pages_fetched, 1);

    // The pagination link was fetched but contributes no row
    assert_eq!(request_count(&server, "/propiedades/1").await, 1);

    let (headers, rows) = read_csv(&csv_path);
    assert_eq!(headers, CSV_HEADERS);
    assert_eq!(rows.len(), 1);

    let row = &rows[0];
    assert_eq!(&row[0], "Las Condes");
    assert_eq!(&row[1], format!("{}/ver-publicacion/casa/1", server.uri()));
    assert_eq!(&row[2], "Casa");
    assert_eq!(&row[3], "5");
    assert_eq!(&row[4], "4");
    assert_eq!(&row[5], "3");
    assert_eq!(&row[6], "850.25");
    assert_eq!(&row[7], "320.00");
    assert_eq!(&row[8], "12500.50");
    assert_eq!(&row[9], "477500000");
    assert_eq!(&row[10], "Camino El Alba 11800");
    assert_eq!(&row[11], "Andrea Soto");
    assert_eq!(&row[12], "Dueño Directo");
    assert_eq!(&row[13], "-33.401234");
    assert_eq!(&row[14], "-70.512345");
    assert_eq!(&row[15], "Casa mediterránea con vista a la cordillera.");
}

#[tokio::test]
async fn test_shared_detail_links_fetched_once() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/propiedades/0",
        listing_page(
            &["/propiedades/1", "/propiedades/2"],
            &["/ver/1", "/ver/2"],
        ),
    )
    .await;
    mount_html(
        &server,
        "/propiedades/1",
        listing_page(&["/propiedades/0", "/propiedades/2"], &["/ver/2", "/ver/3"]),
    )
    .await;
    mount_html(
        &server,
        "/propiedades/2",
        listing_page(&["/propiedades/0", "/propiedades/1"], &["/ver/1", "/ver/3"]),
    )
    .await;
    for id in 1..=3 {
        mount_html(&server, &format!("/ver/{}", id), DETAIL_PAGE.to_string()).await;
    }

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let config = create_test_config(format!("{}/propiedades/0", server.uri()), &csv_path);

    let summary = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(summary.records, 3);

    for id in 1..=3 {
        assert_eq!(request_count(&server, &format!("/ver/{}", id)).await, 1);
    }

    let (_, rows) = read_csv(&csv_path);
    let mut links: Vec<String> = rows.iter().map(|r| r[1].to_string()).collect();
    links.sort();
    links.dedup();
    assert_eq!(links.len(), 3);
}

#[tokio::test]
async fn test_revisited_listing_pages_do_not_duplicate_rows() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/propiedades/0",
        listing_page(&["/propiedades/1", "/propiedades/1"], &["/ver/1"]),
    )
    .await;
    mount_html(&server, "/propiedades/1", listing_page(&[], &["/ver/1"])).await;
    mount_html(&server, "/ver/1", DETAIL_PAGE.to_string()).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let mut config = create_test_config(format!("{}/propiedades/0", server.uri()), &csv_path);
    config.crawler.revisit_listing_pages = true;

    let summary = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(request_count(&server, "/propiedades/1").await, 2);
    assert_eq!(request_count(&server, "/ver/1").await, 1);
    assert_eq!(summary.records, 1);

    let (_, rows) = read_csv(&csv_path);
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_transport_errors_drop_entries_without_aborting() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/propiedades/0",
        listing_page(&["/propiedades/1"], &["/ver/ok", "/ver/caido", "/ver/borrado"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/propiedades/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ver/caido"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ver/borrado"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    mount_html(&server, "/ver/ok", DETAIL_PAGE.to_string()).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("out.csv");
    let config = create_test_config(format!("{}/propiedades/0", server.uri()), &csv_path);

    let summary = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(summary.records, 1);
    assert_eq!(summary.transport_errors, 3);

    // No retry policy configured: each failing page requested once
    assert_eq!(request_count(&server, "/ver/caido").await, 1);

    let (_, rows) = read_csv(&csv_path);
    assert_eq!(rows.len(), 1);
    assert!(rows[0][1].ends_with("/ver/ok"));
}

#[tokio::test]
async fn test_wait_does_not_return_before_slow_fetch_completes() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/propiedades/0",
        listing_page(&[], &["/ver/rapida", "/ver/lenta"]),
    )
    .await;
    mount_html(&server, "/ver/rapida", DETAIL_PAGE.to_string()).await;
    Mock::given(method("GET"))
        .and(path("/ver/lenta"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(DETAIL_PAGE)
                .set_delay(Duration::from_millis(1500)),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(
        format!("{}/propiedades/0", server.uri()),
        &dir.path().join("unused.csv"),
    );

    let started = Instant::now();
    let outcome = crawl_with_parser(&config, Arc::new(ListingSiteParser::new().unwrap()))
        .await
        .expect("Crawl failed");

    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert_eq!(outcome.records.len(), 2);
    assert!(outcome
        .records
        .iter()
        .any(|r| r.url.ends_with("/ver/lenta")));
    assert_eq!(outcome.summary.abandoned, 0);
}

#[tokio::test]
async fn test_unwritable_output_is_fatal() {
    let server = MockServer::start().await;
    mount_html(&server, "/propiedades/0", listing_page(&[], &["/ver/1"])).await;
    mount_html(&server, "/ver/1", DETAIL_PAGE.to_string()).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("missing-dir").join("out.csv");
    let config = create_test_config(format!("{}/propiedades/0", server.uri()), &csv_path);

    let result = run_crawl(config).await;
    assert!(matches!(result, Err(CrawlError::Output(_))));
}

#[tokio::test]
async fn test_existing_output_is_overwritten() {
    let server = MockServer::start().await;
    mount_html(&server, "/propiedades/0", listing_page(&[], &[])).await;

    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("propiedades.csv");
    std::fs::write(&csv_path, "old,data\n1,2\n3,4\n").unwrap();

    let config = create_test_config(format!("{}/propiedades/0", server.uri()), &csv_path);
    let summary = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(summary.records, 0);

    let (headers, rows) = read_csv(&csv_path);
    assert_eq!(headers, CSV_HEADERS);
    assert!(rows.is_empty());
}
