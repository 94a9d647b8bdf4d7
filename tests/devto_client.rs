//! DevtoClient against a wiremock server.
//!
//! wiremock serves from its own thread, so the blocking client is driven from
//! the test thread and the runtime is only used to mount mocks and read back
//! received requests.

use std::sync::Mutex;

use devto_sync::{ApiError, Article, ArticleApi, DevtoClient};
use log::{Log, Metadata, Record};
use serde_json::{json, Value};
use tokio::runtime::Runtime;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const API_KEY: &str = "test-api-key";

fn start_server() -> (Runtime, MockServer) {
    let runtime = Runtime::new().expect("tokio runtime");
    let server = runtime.block_on(MockServer::start());
    (runtime, server)
}

fn mount(runtime: &Runtime, server: &MockServer, mock: Mock) {
    runtime.block_on(mock.mount(server));
}

fn received(runtime: &Runtime, server: &MockServer) -> Vec<Request> {
    runtime
        .block_on(server.received_requests())
        .expect("request recording is enabled")
}

fn body_json(request: &Request) -> Value {
    serde_json::from_slice(&request.body).expect("request body is json")
}

fn article_json(id: i64, body: &str) -> Value {
    json!({
        "type_of": "article",
        "id": id,
        "title": "Hello",
        "description": null,
        "published": false,
        "body_markdown": body,
        "url": format!("https://dev.to/someone/hello-{id}")
    })
}

#[test]
fn create_posts_without_id() {
    let (runtime, server) = start_server();
    mount(
        &runtime,
        &server,
        Mock::given(method("POST"))
            .and(path("/articles"))
            .and(header("api-key", API_KEY))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(201).set_body_json(article_json(314, "# Hello"))),
    );
    let client = DevtoClient::new(&server.uri(), API_KEY).expect("client");

    let created = client
        .upsert_article(&Article::from_body(0, "# Hello".to_string()))
        .expect("create should succeed");

    assert_eq!(created.id, 314);
    assert_eq!(created.title, "Hello");
    assert_eq!(created.description, "");

    let requests = received(&runtime, &server);
    assert_eq!(requests.len(), 1);
    let sent = body_json(&requests[0]);
    assert!(sent.get("id").is_none());
    assert_eq!(sent["body_markdown"], "# Hello");
}

#[test]
fn update_puts_to_article_id() {
    let (runtime, server) = start_server();
    mount(
        &runtime,
        &server,
        Mock::given(method("PUT"))
            .and(path("/articles/77"))
            .and(header("api-key", API_KEY))
            .respond_with(ResponseTemplate::new(200).set_body_json(article_json(77, "v2"))),
    );
    let client = DevtoClient::new(&format!("{}/", server.uri()), API_KEY).expect("client");

    let updated = client
        .upsert_article(&Article::from_body(77, "v2".to_string()))
        .expect("update should succeed");

    assert_eq!(updated.id, 77);
    let requests = received(&runtime, &server);
    assert_eq!(requests.len(), 1);
    assert_eq!(body_json(&requests[0])["id"], 77);
}

#[test]
fn rejected_article_keeps_status_and_body() {
    let (runtime, server) = start_server();
    mount(
        &runtime,
        &server,
        Mock::given(method("POST"))
            .and(path("/articles"))
            .respond_with(
                ResponseTemplate::new(422)
                    .set_body_json(json!({"error": "Title can't be blank", "status": 422})),
            ),
    );
    let client = DevtoClient::new(&server.uri(), API_KEY).expect("client");

    let err = client
        .upsert_article(&Article::from_body(0, "no title".to_string()))
        .expect_err("422 should fail");

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status.as_u16(), 422);
            assert!(body.contains("Title can't be blank"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn success_with_invalid_json_is_decode_error() {
    let (runtime, server) = start_server();
    mount(
        &runtime,
        &server,
        Mock::given(method("POST"))
            .and(path("/articles"))
            .respond_with(ResponseTemplate::new(201).set_body_string("<html>oops</html>")),
    );
    let client = DevtoClient::new(&server.uri(), API_KEY).expect("client");

    let err = client
        .upsert_article(&Article::from_body(0, "body".to_string()))
        .expect_err("html is not an article");
    assert!(matches!(err, ApiError::Decode(_)));
}

struct DumpLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for DumpLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.lines
            .lock()
            .expect("lock")
            .push(record.args().to_string());
    }

    fn flush(&self) {}
}

static DUMP: DumpLogger = DumpLogger {
    lines: Mutex::new(Vec::new()),
};

#[test]
fn debug_logger_receives_request_and_response() {
    let (runtime, server) = start_server();
    mount(
        &runtime,
        &server,
        Mock::given(method("PUT"))
            .and(path("/articles/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(article_json(5, "dumped body"))),
    );
    let mut client = DevtoClient::new(&server.uri(), API_KEY).expect("client");
    client.set_debug_logger(&DUMP);

    client
        .upsert_article(&Article::from_body(5, "dumped body".to_string()))
        .expect("update should succeed");

    let lines = DUMP.lines.lock().expect("lock").clone();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("PUT "));
    assert!(lines[0].contains("/articles/5"));
    assert!(lines[0].contains("dumped body"));
    assert!(lines[1].starts_with("200"));
}
