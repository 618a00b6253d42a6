//! Shared fixtures: configuration and an in-process mock of the platform API.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use url::Url;

use sponsorship_notify::{Config, Credentials};

pub const WEBHOOK_SECRET: &str = "It's a Secret to Everybody";

pub const UPLOAD_PATH: &str = "/1.1/media/upload.json";
pub const POST_PATH: &str = "/2/tweets";

/// Configuration pointing both endpoints at `base`.
pub fn test_config(base: &str) -> Config {
    Config {
        credentials: Credentials {
            client_token: "client-token".to_string(),
            client_secret: "client-secret".to_string(),
            access_token: "access-token".to_string(),
            access_secret: "access-secret".to_string(),
        },
        webhook_secret: WEBHOOK_SECRET.to_string(),
        port: 0,
        upload_url: Url::parse(&format!("{base}{UPLOAD_PATH}")).unwrap(),
        post_url: Url::parse(&format!("{base}{POST_PATH}")).unwrap(),
        image_path: None,
        request_timeout: Some(Duration::from_secs(5)),
        publish_timeout: Some(Duration::from_secs(10)),
    }
}

/// One request seen by the mock platform.
#[derive(Debug, Clone)]
pub struct Captured {
    pub path: &'static str,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

#[derive(Clone)]
struct MockState {
    captured: Arc<Mutex<Vec<Captured>>>,
    upload_status: StatusCode,
    upload_body: String,
}

/// Mock media upload and post creation endpoints.
pub struct MockPlatform {
    pub base_url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
}

impl MockPlatform {
    /// Start a server whose upload endpoint answers with `status` and `body`.
    pub async fn start(upload_status: StatusCode, upload_body: &str) -> Self {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            captured: captured.clone(),
            upload_status,
            upload_body: upload_body.to_string(),
        };

        let app = Router::new()
            .route(UPLOAD_PATH, post(upload))
            .route(POST_PATH, post(create_post))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            captured,
        }
    }

    /// Start a server that hands out media id `12345`.
    pub async fn healthy() -> Self {
        Self::start(StatusCode::OK, r#"{"media_id":12345,"media_id_string":"12345"}"#).await
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

/// A base URL on which nothing is listening.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn capture(path: &'static str, headers: &HeaderMap, body: Bytes) -> Captured {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    Captured {
        path,
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.to_vec(),
    }
}

async fn upload(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    state
        .captured
        .lock()
        .unwrap()
        .push(capture(UPLOAD_PATH, &headers, body));
    (state.upload_status, state.upload_body.clone())
}

async fn create_post(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    state
        .captured
        .lock()
        .unwrap()
        .push(capture(POST_PATH, &headers, body));
    (
        StatusCode::CREATED,
        r#"{"data":{"id":"1445880548472328192","text":"ありがとうございます 🤗 #GitHubSponsors"}}"#,
    )
}

/// Whether `needle` occurs in `haystack`.
pub fn contains_bytes(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}
