use std::net::SocketAddr;
use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tempfile::TempDir;
use tokio::net::TcpListener;

use gif_fetch::utils::http::DEFAULT_USER_AGENT;
use gif_fetch::{resolve, HttpSource, Item, Outcome, ResolveOptions};

fn gif_body(len: usize) -> Vec<u8> {
    let mut body = b"GIF89a".to_vec();
    body.extend((0..len - 6).map(|i| (i % 256) as u8));
    body
}

async fn serve_good() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "image/gif")],
        gif_body(5000),
    )
}

async fn serve_tiny() -> impl IntoResponse {
    (StatusCode::OK, [(header::CONTENT_TYPE, "image/gif")], gif_body(300))
}

async fn serve_missing() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "<html><body>Not Found</body></html>")
}

async fn serve_slow() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(3)).await;
    (StatusCode::OK, gif_body(5000))
}

// Mimics hosts that turn away non-browser clients.
async fn serve_browsers_only(headers: HeaderMap) -> impl IntoResponse {
    let agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if agent.starts_with("Mozilla/5.0") {
        (StatusCode::OK, gif_body(2048)).into_response()
    } else {
        (StatusCode::FORBIDDEN, "bots not welcome").into_response()
    }
}

async fn start_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let app = Router::new()
        .route("/good.gif", get(serve_good))
        .route("/tiny.gif", get(serve_tiny))
        .route("/missing.gif", get(serve_missing))
        .route("/slow.gif", get(serve_slow))
        .route("/browsers-only.gif", get(serve_browsers_only));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

fn source() -> HttpSource {
    HttpSource::new(DEFAULT_USER_AGENT, Duration::from_millis(500)).unwrap()
}

#[tokio::test]
async fn test_falls_back_past_404_and_placeholder() {
    let (addr, _handle) = start_server().await;
    let tmp = TempDir::new().unwrap();
    let item = Item::new(
        "Dumbbell Shoulder Press",
        vec![
            format!("http://{}/missing.gif", addr),
            format!("http://{}/tiny.gif", addr),
            format!("http://{}/good.gif", addr),
        ],
    );

    let outcome = resolve(&source(), &item, tmp.path(), &ResolveOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Downloaded(5000));
    let saved = std::fs::read(tmp.path().join("dumbbell-shoulder-press.gif")).unwrap();
    assert_eq!(saved, gif_body(5000));
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_sends_browser_user_agent() {
    let (addr, _handle) = start_server().await;
    let tmp = TempDir::new().unwrap();
    let item = Item::new(
        "Push-ups",
        vec![format!("http://{}/browsers-only.gif", addr)],
    );

    let outcome = resolve(&source(), &item, tmp.path(), &ResolveOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Downloaded(2048));
    assert!(tmp.path().join("push-ups.gif").is_file());

    let bot = HttpSource::new("gif-fetch-test", Duration::from_millis(500)).unwrap();
    let other = Item::new("Pull-ups", vec![format!("http://{}/browsers-only.gif", addr)]);
    let outcome = resolve(&bot, &other, tmp.path(), &ResolveOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome, Outcome::Failed);
    assert!(!tmp.path().join("pull-ups.gif").exists());
}

#[tokio::test]
async fn test_timeout_moves_to_next_source() {
    let (addr, _handle) = start_server().await;
    let tmp = TempDir::new().unwrap();
    let item = Item::new(
        "Squat",
        vec![
            format!("http://{}/slow.gif", addr),
            format!("http://{}/good.gif", addr),
        ],
    );

    let outcome = resolve(&source(), &item, tmp.path(), &ResolveOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Downloaded(5000));
    assert!(!tmp.path().join("squat.gif.part").exists());
}

#[tokio::test]
async fn test_unreachable_host_fails_without_files() {
    // Grab a free port, then close it so connections are refused.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let tmp = TempDir::new().unwrap();
    let item = Item::new("Deadlift", vec![format!("http://{}/deadlift.gif", addr)]);

    let outcome = resolve(&source(), &item, tmp.path(), &ResolveOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Failed);
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_second_run_skips() {
    let (addr, _handle) = start_server().await;
    let tmp = TempDir::new().unwrap();
    let item = Item::new("Plank", vec![format!("http://{}/good.gif", addr)]);
    let options = ResolveOptions::default();

    let first = resolve(&source(), &item, tmp.path(), &options).await.unwrap();
    let before = std::fs::read(tmp.path().join("plank.gif")).unwrap();
    let second = resolve(&source(), &item, tmp.path(), &options).await.unwrap();
    let after = std::fs::read(tmp.path().join("plank.gif")).unwrap();

    assert_eq!(first, Outcome::Downloaded(5000));
    assert_eq!(second, Outcome::Skipped);
    assert_eq!(before, after);
}
