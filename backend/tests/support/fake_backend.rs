//! A scripted stand-in for the downstream processing backend.
//!
//! The server listens on an ephemeral local port, records every request body
//! it receives, and answers with a fixed status and raw body after an
//! optional delay.

use std::net::TcpListener;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::dev::ServerHandle;
use actix_web::http::{StatusCode, header};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::Value;
use url::Url;

/// Canned answer returned for every request.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    /// Respond with `status` and the JSON rendering of `body`.
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    /// Respond with `status` and a raw body.
    pub fn raw(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
            delay: Duration::ZERO,
        }
    }

    /// Wait before answering.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request observed by the fake backend.
#[derive(Debug, Clone)]
pub struct Received {
    pub body: Value,
    pub accept: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Clone)]
struct BackendState {
    reply: Reply,
    calls: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<Received>>>,
}

fn header_value(req: &HttpRequest, name: header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

async fn handle(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<BackendState>,
) -> HttpResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);
    state
        .received
        .lock()
        .expect("received lock")
        .push(Received {
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
            accept: header_value(&req, header::ACCEPT),
            user_agent: header_value(&req, header::USER_AGENT),
        });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }
    HttpResponse::build(state.reply.status)
        .content_type("application/json")
        .body(state.reply.body.clone())
}

/// Running fake backend.
pub struct FakeBackend {
    base_url: Url,
    calls: Arc<AtomicUsize>,
    received: Arc<Mutex<Vec<Received>>>,
    handle: ServerHandle,
}

impl FakeBackend {
    /// Start a backend answering `POST /points` with `reply`.
    pub fn spawn(reply: Reply) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let calls = Arc::new(AtomicUsize::new(0));
        let received = Arc::new(Mutex::new(Vec::new()));
        let state = web::Data::new(BackendState {
            reply,
            calls: Arc::clone(&calls),
            received: Arc::clone(&received),
        });

        let server = HttpServer::new(move || {
            App::new()
                .app_data(state.clone())
                .route("/points", web::post().to(handle))
        })
        .listen(listener)?
        .disable_signals()
        .workers(1)
        .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let base_url = Url::parse(&format!("http://{addr}"))
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        Ok(Self {
            base_url,
            calls,
            received,
            handle,
        })
    }

    /// Full URL of the points endpoint.
    pub fn endpoint(&self) -> Url {
        let mut url = self.base_url.clone();
        url.set_path("/points");
        url
    }

    /// Number of requests received so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Requests received so far, in arrival order.
    pub fn received(&self) -> Vec<Received> {
        self.received.lock().expect("received lock").clone()
    }

    /// Stop the server without waiting for in-flight requests.
    pub async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// URL of a local port nothing is listening on.
pub fn unreachable_endpoint() -> std::io::Result<Url> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Url::parse(&format!("http://{addr}/points"))
        .map_err(|err| std::io::Error::other(err.to_string()))
}
