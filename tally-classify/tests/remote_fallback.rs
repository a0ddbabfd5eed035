//! Drives `RemoteClassifier` against a local fake completion endpoint.

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tally_classify::{RemoteClassifier, RemoteConfig};
use tally_core::{keywords, Category, Classifier};
use tokio::io::AsyncReadExt;

#[derive(Clone)]
struct Fake {
    status: StatusCode,
    body: Value,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<Value>>>,
    last_auth: Arc<Mutex<Option<String>>>,
}

impl Fake {
    fn new(status: StatusCode, body: Value) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
            hits: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
            last_auth: Arc::new(Mutex::new(None)),
        }
    }

    fn reply(content: &str) -> Self {
        Self::new(
            StatusCode::OK,
            json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] }),
        )
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn complete(
    State(fake): State<Fake>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    fake.hits.fetch_add(1, Ordering::SeqCst);
    *fake.last_request.lock().unwrap() = Some(body);
    *fake.last_auth.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    if !fake.delay.is_zero() {
        tokio::time::sleep(fake.delay).await;
    }
    (fake.status, Json(fake.body.clone()))
}

/// Serve `fake` on an ephemeral port; returns the endpoint URL.
async fn serve(fake: Fake) -> String {
    let app = Router::new()
        .route("/v1/chat/completions", post(complete))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1/chat/completions")
}

fn classifier(endpoint: String) -> RemoteClassifier {
    RemoteClassifier::new(RemoteConfig {
        endpoint,
        timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_remote_answer_wins_over_keywords() {
    let fake = Fake::reply("Transport");
    let c = classifier(serve(fake.clone()).await);

    // keywords alone would say Food
    assert_eq!(keywords::classify("Zakupy w Biedronce"), Category::Food);
    assert_eq!(c.classify_async("Zakupy w Biedronce").await, Category::Transport);
    assert_eq!(fake.hits(), 1);
}

#[tokio::test]
async fn test_request_shape() {
    let fake = Fake::reply("Food");
    let c = classifier(serve(fake.clone()).await);
    c.classify_async("Lidl").await;

    let req = fake.last_request.lock().unwrap().clone().unwrap();
    assert_eq!(req["model"], "llama-3.3-70b-versatile");
    assert_eq!(req["max_tokens"], 10);
    assert!((req["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);

    let messages = req["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[1]["role"], "user");
    let system = messages[0]["content"].as_str().unwrap();
    for category in Category::ALL {
        assert!(system.contains(category.name()));
    }
    assert!(messages[1]["content"].as_str().unwrap().contains("Lidl"));

    // no key configured, no header
    assert_eq!(*fake.last_auth.lock().unwrap(), None);
}

#[tokio::test]
async fn test_bearer_token_sent_when_configured() {
    let fake = Fake::reply("Food");
    let endpoint = serve(fake.clone()).await;
    let c = RemoteClassifier::new(RemoteConfig {
        endpoint,
        api_key: Some("gsk_test".to_string()),
        ..Default::default()
    })
    .unwrap();
    c.classify_async("Lidl").await;
    assert_eq!(fake.last_auth.lock().unwrap().as_deref(), Some("Bearer gsk_test"));
}

#[tokio::test]
async fn test_non_2xx_falls_back_without_retry() {
    let fake = Fake::new(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "boom" }));
    let c = classifier(serve(fake.clone()).await);

    for desc in ["Orlen paliwo", "Kino Helios", "xyz"] {
        assert_eq!(c.classify_async(desc).await, keywords::classify(desc));
    }
    assert_eq!(fake.hits(), 3);
}

#[tokio::test]
async fn test_unauthorized_falls_back() {
    let fake = Fake::new(StatusCode::UNAUTHORIZED, json!({ "error": "no key" }));
    let c = classifier(serve(fake.clone()).await);
    assert_eq!(c.classify_async("Apteka Gemini").await, Category::Health);
    assert_eq!(fake.hits(), 1);
}

#[tokio::test]
async fn test_unrecognized_reply_falls_back() {
    let fake = Fake::reply("jakas losowa odpowiedz");
    let c = classifier(serve(fake.clone()).await);
    assert_eq!(c.classify_async("Orlen paliwo").await, Category::Transport);
    assert_eq!(c.classify_async("xyz").await, Category::Other);
    assert_eq!(fake.hits(), 2);
}

#[tokio::test]
async fn test_ambiguous_reply_falls_back() {
    let fake = Fake::reply("Food or Home");
    let c = classifier(serve(fake.clone()).await);
    assert_eq!(c.classify_async("Bilet MPK").await, Category::Transport);
}

#[tokio::test]
async fn test_body_without_choices_falls_back() {
    let fake = Fake::new(StatusCode::OK, json!({ "id": "x", "object": "chat.completion" }));
    let c = classifier(serve(fake.clone()).await);
    assert_eq!(c.classify_async("xyz").await, Category::Other);
    assert_eq!(fake.hits(), 1);
}

#[tokio::test]
async fn test_empty_choices_falls_back() {
    let fake = Fake::new(StatusCode::OK, json!({ "choices": [] }));
    let c = classifier(serve(fake.clone()).await);
    assert_eq!(c.classify_async("Netflix").await, Category::Entertainment);
}

#[tokio::test]
async fn test_non_json_body_falls_back() {
    let fake = Fake::new(StatusCode::OK, json!("Food"));
    let c = classifier(serve(fake.clone()).await);
    assert_eq!(c.classify_async("Orlen").await, Category::Transport);
}

#[tokio::test]
async fn test_timeout_falls_back() {
    let mut fake = Fake::reply("Food");
    fake.delay = Duration::from_secs(3);
    let endpoint = serve(fake.clone()).await;
    let c = RemoteClassifier::new(RemoteConfig {
        endpoint,
        timeout: Duration::from_millis(200),
        ..Default::default()
    })
    .unwrap();

    let started = std::time::Instant::now();
    assert_eq!(c.classify_async("Orlen paliwo").await, Category::Transport);
    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(fake.hits(), 1);
}

#[tokio::test]
async fn test_dropped_connection_falls_back_after_one_attempt() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = accepted.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            drop(socket);
        }
    });

    let c = classifier(format!("http://{addr}/v1/chat/completions"));
    assert_eq!(c.classify_async("Zakupy w Biedronce").await, Category::Food);
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_connection_refused_falls_back() {
    // grab a free port, then close it
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = classifier(format!("http://{addr}/v1/chat/completions"));
    assert_eq!(c.classify_async("Kino").await, Category::Entertainment);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_blocking_classify_inside_runtime() {
    let fake = Fake::reply("Health");
    let c = classifier(serve(fake.clone()).await);
    let as_trait: &dyn Classifier = &c;
    assert_eq!(as_trait.classify("anything"), Category::Health);
    assert_eq!(fake.hits(), 1);
}

/// Serve `fake` from a runtime on its own thread, so the caller's runtime can block.
fn serve_detached(fake: Fake) -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            tx.send(serve(fake).await).unwrap();
            std::future::pending::<()>().await;
        });
    });
    rx.recv().unwrap()
}

#[tokio::test]
async fn test_blocking_classify_on_current_thread_runtime() {
    let fake = Fake::reply("Health");
    let c = classifier(serve_detached(fake.clone()));
    let as_trait: &dyn Classifier = &c;
    assert_eq!(as_trait.classify("Orlen paliwo"), Category::Health);
    assert_eq!(fake.hits(), 1);
}

#[tokio::test]
async fn test_blocking_fallback_on_current_thread_runtime() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let c = classifier(format!("http://{addr}/v1/chat/completions"));
    let as_trait: &dyn Classifier = &c;
    assert_eq!(as_trait.classify("Orlen paliwo"), Category::Transport);
}

#[test]
fn test_blocking_classify_without_runtime() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let fake = Fake::reply("Home");
    let endpoint = rt.block_on(serve(fake.clone()));

    let c = classifier(endpoint);
    assert_eq!(c.classify("Lidl"), Category::Home);
    assert_eq!(fake.hits(), 1);
}
