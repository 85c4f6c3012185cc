#![allow(dead_code)]

use httpmock::prelude::HttpMockRequest;
use method::managers::auth::ResultPrinter;
use method::managers::method::MethodRunner;
use method::models::RequestResult;
use method::services::environment::EnvironmentSink;
use method::services::logger::Logger;
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("method-{}-{}", prefix, uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write file");
    path
}

#[derive(Default)]
pub struct RecordingPrinter {
    printed: AtomicUsize,
}

impl RecordingPrinter {
    pub fn printed(&self) -> usize {
        self.printed.load(Ordering::SeqCst)
    }
}

impl ResultPrinter for RecordingPrinter {
    fn print_request_result(&self, _result: &RequestResult) {
        self.printed.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn runner(env: Arc<dyn EnvironmentSink>, printer: Arc<RecordingPrinter>) -> MethodRunner {
    MethodRunner::new(Logger::new("test"), env, printer).expect("build runner")
}

pub fn closed_port_url(path: &str) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}{}", port, path)
}

fn lacks_header(req: &HttpMockRequest, name: &str) -> bool {
    req.headers
        .as_ref()
        .map(|headers| !headers.iter().any(|(key, _)| key.eq_ignore_ascii_case(name)))
        .unwrap_or(true)
}

pub fn without_authorization(req: &HttpMockRequest) -> bool {
    lacks_header(req, "authorization")
}

pub fn without_api_key(req: &HttpMockRequest) -> bool {
    lacks_header(req, "x-api-key")
}

pub fn without_session(req: &HttpMockRequest) -> bool {
    lacks_header(req, "x-session")
}
