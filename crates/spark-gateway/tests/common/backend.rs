//! In-process HTTP backend standing in for llama-server or vLLM.
//!
//! Bound to `127.0.0.1:0`; every request is recorded so tests can assert on
//! the exact payload the gateway sent (or that nothing was sent at all).

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tokio::net::TcpListener;

/// Canned answer for one route.
#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    content_type: &'static str,
    body: String,
    location: Option<String>,
    delay: Duration,
}

impl Reply {
    pub fn json(body: &Value) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            body: body.to_string(),
            location: None,
            delay: Duration::ZERO,
        }
    }

    /// 200 with a body that claims to be JSON but may not be.
    pub fn raw_json(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "application/json",
            body: body.to_string(),
            location: None,
            delay: Duration::ZERO,
        }
    }

    pub fn text(body: &str) -> Self {
        Self {
            status: StatusCode::OK,
            content_type: "text/plain",
            body: body.to_string(),
            location: None,
            delay: Duration::ZERO,
        }
    }

    pub fn status(code: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(code).unwrap(),
            content_type: "text/plain",
            body: body.to_string(),
            location: None,
            delay: Duration::ZERO,
        }
    }

    /// 307 pointing at `location`.
    pub fn redirect(location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            ..Self::status(307, "")
        }
    }

    #[must_use]
    pub const fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request the backend received.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Clone, Default)]
struct Shared {
    routes: Arc<Mutex<HashMap<(Method, String), Reply>>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

/// Running mock backend. The server task lives as long as the test runtime.
pub struct MockBackend {
    addr: SocketAddr,
    routes: Arc<Mutex<HashMap<(Method, String), Reply>>>,
    recorded: Arc<Mutex<Vec<Recorded>>>,
}

impl MockBackend {
    pub fn builder() -> MockBackendBuilder {
        MockBackendBuilder::default()
    }

    pub const fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Replace the reply for `GET path` on the running backend.
    pub fn set_get(&self, path: &str, reply: Reply) {
        self.routes
            .lock()
            .unwrap()
            .insert((Method::GET, path.to_string()), reply);
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.recorded.lock().unwrap().clone()
    }

    pub fn hits(&self) -> usize {
        self.recorded.lock().unwrap().len()
    }

    pub fn hits_on(&self, path: &str) -> usize {
        self.requests().iter().filter(|r| r.path == path).count()
    }

    /// Body of the last request to `path`.
    pub fn last_body(&self, path: &str) -> Value {
        self.requests()
            .into_iter()
            .rev()
            .find(|r| r.path == path)
            .and_then(|r| r.body)
            .expect("no JSON request recorded for path")
    }
}

#[derive(Default)]
pub struct MockBackendBuilder {
    routes: HashMap<(Method, String), Reply>,
}

impl MockBackendBuilder {
    #[must_use]
    pub fn get(mut self, path: &str, reply: Reply) -> Self {
        self.routes.insert((Method::GET, path.to_string()), reply);
        self
    }

    #[must_use]
    pub fn post(mut self, path: &str, reply: Reply) -> Self {
        self.routes.insert((Method::POST, path.to_string()), reply);
        self
    }

    pub async fn spawn(self) -> MockBackend {
        let shared = Shared {
            routes: Arc::new(Mutex::new(self.routes)),
            recorded: Arc::default(),
        };
        let routes = Arc::clone(&shared.routes);
        let recorded = Arc::clone(&shared.recorded);

        let app = Router::new().fallback(handle).with_state(shared);
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        MockBackend {
            addr,
            routes,
            recorded,
        }
    }
}

async fn handle(State(shared): State<Shared>, method: Method, uri: Uri, body: Bytes) -> Response {
    let path = uri.path().to_string();
    shared.recorded.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        body: serde_json::from_slice(&body).ok(),
    });

    let reply = shared.routes.lock().unwrap().get(&(method, path)).cloned();
    let Some(reply) = reply else {
        return (StatusCode::NOT_FOUND, "no route").into_response();
    };

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let mut response = (
        reply.status,
        [(header::CONTENT_TYPE, reply.content_type)],
        reply.body,
    )
        .into_response();
    if let Some(location) = reply.location {
        response
            .headers_mut()
            .insert(header::LOCATION, location.parse().unwrap());
    }
    response
}

/// A loopback port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}
