//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the image board and tempfile
//! for the home directory, and drive whole sweeps end-to-end.

use chan_sweeper::config::{config_for_section, Config};
use chan_sweeper::crawler::Board;
use chan_sweeper::state::ImageState;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock board
fn create_test_config(server: &MockServer, home: &TempDir) -> Config {
    let mut config = config_for_section(Some("s"), home.path()).expect("valid config");
    config.board.base_url = url::Url::parse(&server.uri()).expect("Failed to parse base URL");
    config.http.request_timeout = Duration::from_secs(5);
    config.http.retry_backoff = Duration::ZERO;
    config.schedule.sweep_interval = Duration::ZERO;
    config
}

/// Board index markup with two annotated images and one reply link
fn board_page(base_url: &str) -> String {
    format!(
        r#"<html><head><title>/s/</title></head><body>
        <form name="delform">
            <span class="filesize">File :<a href="{base}/src/a.jpg" target="_blank">a.jpg</a>-(12 KB, 300x400)</span>
            <blockquote>hello</blockquote>
            [<a href="res/123">Reply</a>]
            <hr>
            <span class="filesize">File :<a href="{base}/src/b.png" target="_blank">b.png</a>-(34 KB, 800x600)</span>
            <blockquote>world</blockquote>
        </form>
        </body></html>"#,
        base = base_url
    )
}

/// Mounts the board page, an empty reply thread, and both images
async fn mount_board(server: &MockServer, image_hits: u64, thread_hits: u64) {
    Mock::given(method("GET"))
        .and(path("/s/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(board_page(&server.uri())))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/s/res/123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html><body>no images</body></html>"),
        )
        .expect(thread_hits)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/src/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"image-a".to_vec()))
        .expect(image_hits)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/src/b.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"image-b".to_vec()))
        .expect(image_hits)
        .mount(server)
        .await;
}

fn ledger_lines(config: &Config) -> Vec<String> {
    std::fs::read_to_string(config.ledger_path())
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_single_sweep_downloads_new_images() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_board(&mock_server, 1, 1).await;

    let home = TempDir::new().expect("temp home");
    let config = create_test_config(&mock_server, &home);
    let section_dir = config.section_dir();

    let mut board = Board::from_config(config.clone()).expect("Failed to create board");
    let sweeps = board.run_sweeps(1).await.expect("Sweep failed");
    let stats = &sweeps[0];

    // Two files written under the section directory
    assert_eq!(
        std::fs::read(section_dir.join("a.jpg")).expect("a.jpg written"),
        b"image-a"
    );
    assert_eq!(
        std::fs::read(section_dir.join("b.png")).expect("b.png written"),
        b"image-b"
    );

    // Two lines appended to the ledger
    let mut lines = ledger_lines(&config);
    lines.sort();
    assert_eq!(
        lines,
        vec![format!("{}/src/a.jpg", base_url), format!("{}/src/b.png", base_url)]
    );

    // Page 1 fetched, pages 2..=10 are 404 and skipped, one thread visited
    assert_eq!(stats.pages_fetched, 1);
    assert_eq!(stats.pages_missing, 9);
    assert_eq!(stats.threads_fetched, 1);
    assert_eq!(stats.images(ImageState::Fetched), 2);

    // Wiremock verifies the single hit on /s/res/123 when the server drops
}

#[tokio::test]
async fn test_repeated_sweeps_fetch_each_image_once() {
    let mock_server = MockServer::start().await;
    mount_board(&mock_server, 1, 3).await;

    let home = TempDir::new().expect("temp home");
    let config = create_test_config(&mock_server, &home);

    let mut board = Board::from_config(config.clone()).expect("Failed to create board");
    let sweeps = board.run_sweeps(2).await.expect("Sweeps failed");

    assert_eq!(sweeps[0].images(ImageState::Fetched), 2);
    assert_eq!(sweeps[1].images(ImageState::Fetched), 0);
    assert_eq!(sweeps[1].images(ImageState::AlreadyFetched), 2);

    // A restarted crawler recovers the ledger and still fetches nothing new
    let mut restarted = Board::from_config(config.clone()).expect("Failed to create board");
    let sweeps = restarted.run_sweeps(1).await.expect("Sweep failed");
    assert_eq!(restarted.ledger().count(), 2);
    assert_eq!(sweeps[0].images(ImageState::AlreadyFetched), 2);
    assert_eq!(ledger_lines(&config).len(), 2);
}

#[tokio::test]
async fn test_existing_file_is_not_downloaded_again() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/s/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(board_page(&base_url)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/src/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"image-a".to_vec()))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/src/b.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"image-b".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let home = TempDir::new().expect("temp home");
    let config = create_test_config(&mock_server, &home);

    // a.jpg is on disk but the ledger file is gone
    std::fs::create_dir_all(config.section_dir()).unwrap();
    std::fs::write(config.section_dir().join("a.jpg"), b"kept").unwrap();

    let mut board = Board::from_config(config.clone()).expect("Failed to create board");
    let sweeps = board.run_sweeps(1).await.expect("Sweep failed");

    assert_eq!(sweeps[0].images(ImageState::FileExists), 1);
    assert_eq!(sweeps[0].images(ImageState::Fetched), 1);
    assert!(board.ledger().contains(&format!("{}/src/a.jpg", base_url)));
    assert_eq!(
        std::fs::read(config.section_dir().join("a.jpg")).unwrap(),
        b"kept"
    );
    assert_eq!(
        ledger_lines(&config),
        vec![format!("{}/src/b.png", base_url)]
    );
}

#[tokio::test]
async fn test_slow_image_is_abandoned_and_sweep_continues() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/s/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(board_page(&base_url)))
        .mount(&mock_server)
        .await;

    // a.jpg never answers in time: five attempts, then given up
    Mock::given(method("GET"))
        .and(path("/src/a.jpg"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .expect(5)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/src/b.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"image-b".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let home = TempDir::new().expect("temp home");
    let mut config = create_test_config(&mock_server, &home);
    config.http.request_timeout = Duration::from_millis(300);
    config.board.max_pages = 1;

    let mut board = Board::from_config(config.clone()).expect("Failed to create board");
    let sweeps = board.run_sweeps(1).await.expect("Sweep failed");

    assert_eq!(sweeps[0].images(ImageState::Abandoned), 1);
    assert_eq!(sweeps[0].images(ImageState::Fetched), 1);
    assert!(!config.section_dir().join("a.jpg").exists());
    assert_eq!(
        ledger_lines(&config),
        vec![format!("{}/src/b.png", base_url)]
    );
}

#[tokio::test]
async fn test_vanished_thread_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/s/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(board_page(&base_url)))
        .mount(&mock_server)
        .await;

    // The thread is gone: asked once, never retried
    Mock::given(method("GET"))
        .and(path("/s/res/123"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
        .mount(&mock_server)
        .await;

    let home = TempDir::new().expect("temp home");
    let mut config = create_test_config(&mock_server, &home);
    config.board.max_pages = 1;

    let mut board = Board::from_config(config).expect("Failed to create board");
    let sweeps = board.run_sweeps(1).await.expect("Sweep failed");

    assert_eq!(sweeps[0].threads_missing, 1);
    assert_eq!(sweeps[0].images(ImageState::Fetched), 2);
}

#[tokio::test]
async fn test_overlong_link_text_does_not_stop_the_sweep() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let long_name = format!("{}.jpg", "x".repeat(300));

    Mock::given(method("GET"))
        .and(path("/s/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"<html><body>
            <span class="filesize">File :<a href="{base}/src/long.jpg">{long}</a></span>
            <span class="filesize">File :<a href="{base}/src/ok.jpg">ok.jpg</a></span>
            </body></html>"#,
            base = base_url,
            long = long_name
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/src/long.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"long".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/src/ok.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let home = TempDir::new().expect("temp home");
    let mut config = create_test_config(&mock_server, &home);
    config.board.max_pages = 1;

    let mut board = Board::from_config(config.clone()).expect("Failed to create board");
    let sweeps = board.run_sweeps(1).await.expect("Sweep failed");

    assert_eq!(sweeps[0].images(ImageState::Fetched), 2);
    assert_eq!(
        std::fs::read(config.section_dir().join("ok.jpg")).expect("ok.jpg written"),
        b"ok"
    );

    let shortened = format!("{}.jpg", "x".repeat(251));
    assert_eq!(
        std::fs::read(config.section_dir().join(shortened)).expect("long name shortened"),
        b"long"
    );
    assert_eq!(ledger_lines(&config).len(), 2);
}
