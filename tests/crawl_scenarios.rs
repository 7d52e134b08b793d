// tests/crawl_scenarios.rs
// =============================================================================
// End-to-end runs against a local mock of the rescue site.
//
// Every test mounts page-specific fixtures first and a catch-all "no more
// results" page last, so pages requested in parallel past the end of the
// listing behave like the real site.
// =============================================================================

use pet_spotlight::crawl::CrawlState;
use pet_spotlight::{run_dog_downloads, run_get_fosters, Config, Error};
use std::path::Path;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/organization/80925/widget/dogs";
const END_OF_RESULTS: &str = r#"<html><body><div class="error">No pets found.</div></body></html>"#;

struct Pet<'a> {
    name: &'a str,
    slug: &'a str,
    description: &'a str,
    action: &'a str,
}

fn listing_page(pets: &[Pet<'_>], end_of_results: bool) -> String {
    let mut html = String::from("<html><body>");
    for pet in pets {
        html.push_str(&format!(
            r#"<div class="pet-container">
                 <a class="pet-link" href="/pets/{}">
                   <h3>{}</h3>
                   <div class="pet-description-full">{}</div>
                 </a>
                 <div class="actions"><a class="button">{}</a></div>
               </div>"#,
            pet.slug, pet.name, pet.description, pet.action
        ));
    }
    if end_of_results {
        html.push_str(r#"<div class="error">No more pets.</div>"#);
    }
    html.push_str("</body></html>");
    html
}

async fn mount_listing(server: &MockServer, page: usize, body: String) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("page", page.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_end_of_results(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(END_OF_RESULTS))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer) -> Config {
    Config {
        base_url: server.uri(),
        video_info_url: format!("{}/get_video_info", server.uri()),
        ..Config::default()
    }
}

async fn drain<T>(mut rx: UnboundedReceiver<T>) -> Vec<T> {
    let mut items = Vec::new();
    while let Some(item) = rx.recv().await {
        items.push(item);
    }
    items
}

async fn listing_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == LISTING_PATH)
        .count()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_substring_match_and_missing_summary() {
    let server = MockServer::start().await;
    let page = listing_page(
        &[Pet {
            name: "Fido Jr",
            slug: "fido-jr",
            description: "Fido Jr loves belly rubs. Adoption fee includes the following: vaccines",
            action: "Adopt",
        }],
        true,
    );
    mount_listing(&server, 1, page).await;
    mount_page(&server, "/pets/fido-jr", "<html><body></body></html>".to_string()).await;
    mount_end_of_results(&server).await;

    let output = tempfile::tempdir().unwrap();
    let (progress_tx, progress_rx) = unbounded_channel();
    let (errors_tx, errors_rx) = unbounded_channel();

    let config = config_for(&server);
    let summary = run_dog_downloads("Fido, Rex", output.path(), &config, progress_tx, errors_tx)
        .await
        .unwrap();

    assert_eq!(summary.missing, vec!["rex"]);
    assert_eq!(summary.state, CrawlState::StoppedByMarker);

    let progress = drain(progress_rx).await;
    assert_eq!(progress.first().map(String::as_str), Some("Found Fido Jr"));
    assert!(progress.contains(&"Downloading fido jr...".to_string()));
    assert_eq!(progress.last().map(String::as_str), Some("\nFailed to find:\nrex"));
    assert!(drain(errors_rx).await.is_empty());

    let description = read(&output.path().join("fido jr").join("description.txt"));
    assert!(description.starts_with("Fido Jr loves belly rubs.\n"));
    assert!(description.contains("SUBMIT AN APPLICATION HERE"));
    assert!(!output.path().join("rex").exists());

    // At most one round of parallel pages goes out past the marker
    let requests = listing_requests(&server).await;
    assert!(requests <= config.page_concurrency + 1, "{} listing requests", requests);
}

#[tokio::test]
async fn test_empty_name_list_stops_after_first_page() {
    let server = MockServer::start().await;
    let page = listing_page(
        &[Pet {
            name: "Bella",
            slug: "bella",
            description: "Bella naps.",
            action: "Adopt",
        }],
        false,
    );
    mount_listing(&server, 1, page).await;
    mount_end_of_results(&server).await;

    let output = tempfile::tempdir().unwrap();
    let (progress_tx, progress_rx) = unbounded_channel();
    let (errors_tx, errors_rx) = unbounded_channel();

    let summary = run_dog_downloads("", output.path(), &config_for(&server), progress_tx, errors_tx)
        .await
        .unwrap();

    assert!(summary.missing.is_empty());
    assert_eq!(summary.state, CrawlState::StoppedByCompletion);
    assert_eq!(listing_requests(&server).await, 1);

    assert_eq!(drain(progress_rx).await, vec!["\nFound all dogs".to_string()]);
    assert!(drain(errors_rx).await.is_empty());
    assert!(!output.path().join("bella").exists());
}

#[tokio::test]
async fn test_all_names_found_on_first_page_stops_by_completion() {
    let server = MockServer::start().await;
    let page = listing_page(
        &[
            Pet {
                name: "Fido",
                slug: "fido",
                description: "Fido sits.",
                action: "Adopt",
            },
            Pet {
                name: "Rex",
                slug: "rex",
                description: "Rex rolls over.",
                action: "Adopt",
            },
        ],
        false,
    );
    mount_listing(&server, 1, page).await;
    mount_page(&server, "/pets/fido", "<html><body></body></html>".to_string()).await;
    mount_page(&server, "/pets/rex", "<html><body></body></html>".to_string()).await;

    // Every later page has more dogs and never says "no more results"
    let filler = listing_page(
        &[Pet {
            name: "Bella",
            slug: "bella",
            description: "Bella naps.",
            action: "Adopt",
        }],
        false,
    );
    mount_page(&server, LISTING_PATH, filler).await;

    let output = tempfile::tempdir().unwrap();
    let (progress_tx, progress_rx) = unbounded_channel();
    let (errors_tx, errors_rx) = unbounded_channel();

    // One page at a time, so page 1 is fully handled before page 2 is considered
    let config = Config {
        max_pages: 100,
        page_concurrency: 1,
        ..config_for(&server)
    };
    let summary = run_dog_downloads("Fido, Rex", output.path(), &config, progress_tx, errors_tx)
        .await
        .unwrap();

    assert!(summary.missing.is_empty());
    assert_eq!(summary.state, CrawlState::StoppedByCompletion);
    assert_eq!(listing_requests(&server).await, 1);

    assert!(output.path().join("fido").join("description.txt").exists());
    assert!(output.path().join("rex").join("description.txt").exists());
    assert!(!output.path().join("bella").exists());

    let progress = drain(progress_rx).await;
    assert_eq!(progress.last().map(String::as_str), Some("\nFound all dogs"));
    assert!(drain(errors_rx).await.is_empty());
}

#[tokio::test]
async fn test_failed_image_is_isolated_from_siblings() {
    let server = MockServer::start().await;
    let uri = server.uri();

    let page = listing_page(
        &[Pet {
            name: "Rex",
            slug: "rex",
            description: "Rex fetches. show less",
            action: "Adopt",
        }],
        false,
    );
    mount_listing(&server, 1, page).await;

    let detail = format!(
        r#"<html><body><div id="oc-clients">
             <a class="thumb-img" data-pet-gallery-url="{uri}/media/missing.png"></a>
             <a class="thumb-img" data-pet-gallery-url="{uri}/media/ok.png"></a>
             <a class="thumb-img" href="https://www.youtube.com/watch?v=abcdefghijk"></a>
           </div></body></html>"#
    );
    mount_page(&server, "/pets/rex", detail).await;

    Mock::given(method("GET"))
        .and(path("/media/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/ok.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89u8, b'P', b'N', b'G']))
        .mount(&server)
        .await;

    let player_response = format!(
        r#"{{"streamingData":{{"formats":[{{"itag":18,"url":"{uri}/media/low.mp4"}},{{"itag":22,"url":"{uri}/media/high.mp4"}}]}}}}"#
    );
    Mock::given(method("GET"))
        .and(path("/get_video_info"))
        .and(query_param("video_id", "abcdefghijk"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "status=ok&player_response={}",
            urlencoding::encode(&player_response)
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/media/high.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 64]))
        .mount(&server)
        .await;
    mount_end_of_results(&server).await;

    let output = tempfile::tempdir().unwrap();
    let (progress_tx, progress_rx) = unbounded_channel();
    let (errors_tx, errors_rx) = unbounded_channel();

    let summary = run_dog_downloads("rex", output.path(), &config_for(&server), progress_tx, errors_tx)
        .await
        .unwrap();
    assert!(summary.missing.is_empty());

    let dog = output.path().join("rex");
    assert!(!dog.join("image-0.png").exists());
    assert_eq!(std::fs::read(dog.join("image-1.png")).unwrap(), vec![0x89u8, b'P', b'N', b'G']);
    assert_eq!(std::fs::read(dog.join("video-0.mp4")).unwrap().len(), 64);
    assert!(read(&dog.join("description.txt")).starts_with("Rex fetches.\n"));

    let errors = drain(errors_rx).await;
    assert_eq!(errors.len(), 1, "{:?}", errors);
    assert!(matches!(errors[0], Error::Network { status: 404, .. }));
    assert_eq!(errors[0].url(), Some(format!("{}/media/missing.png", uri).as_str()));

    let progress = drain(progress_rx).await;
    assert_eq!(progress.last().map(String::as_str), Some("\nFound all dogs"));
}

#[tokio::test]
async fn test_foster_enumeration() {
    let server = MockServer::start().await;
    let page = listing_page(
        &[
            Pet {
                name: "Fido",
                slug: "fido",
                description: "Fido needs a couch.",
                action: "Foster Me",
            },
            Pet {
                name: "Rex",
                slug: "rex",
                description: "Rex has a family waiting.",
                action: "Adopt",
            },
        ],
        false,
    );
    mount_listing(&server, 1, page).await;
    mount_end_of_results(&server).await;

    let (errors_tx, errors_rx) = unbounded_channel();
    let fosters = run_get_fosters(&config_for(&server), errors_tx).await.unwrap();

    assert_eq!(fosters, vec!["Fido"]);
    assert!(drain(errors_rx).await.is_empty());
}

#[tokio::test]
async fn test_setup_error_makes_no_requests() {
    let server = MockServer::start().await;
    let config = Config {
        page_concurrency: 0,
        ..config_for(&server)
    };

    let (progress_tx, progress_rx) = unbounded_channel();
    let (errors_tx, _errors_rx) = unbounded_channel();
    let result = run_dog_downloads("Fido", "/tmp", &config, progress_tx, errors_tx).await;

    assert!(matches!(result, Err(Error::Setup(_))));
    assert!(drain(progress_rx).await.is_empty());
    assert_eq!(server.received_requests().await.unwrap().len(), 0);
}
