//! A scripted stand-in for the external catalogue/movie API.
//!
//! [`FakeApi`] serves the same routes as the real backend from in-memory
//! records, records every request it receives, and answers writes with
//! whatever status and body the test scripted.
//!
//! ```rust,no_run
//! use catalogue_test::fake_api::FakeApi;
//! use serde_json::json;
//!
//! async fn example() {
//!     let api = FakeApi::new().with_movies(vec![json!({"id": 7, "name": "Dune"})]);
//!     let server = api.serve().await;
//!     // point the client at server.url() ...
//!     assert_eq!(api.booking_count(), 0);
//!     server.stop().await;
//! }
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::{Path, State};
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// A scripted HTTP reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Status code.
    pub status: u16,
    /// Raw body text.
    pub body: String,
}

impl Reply {
    /// A reply with the given status and body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// A 200 reply with a JSON body.
    pub fn json(value: &Value) -> Self {
        Self::new(200, value.to_string())
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

/// A request the fake API received.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: String,
    /// Request path.
    pub path: String,
    /// JSON body, when the request carried one.
    pub body: Option<Value>,
}

#[derive(Debug)]
struct FakeApiState {
    genres: Vec<Value>,
    movies: Vec<Value>,
    catalogue: Vec<Value>,
    listing_reply: Option<Reply>,
    booking_reply: Reply,
    write_reply: Reply,
    requests: Vec<RecordedRequest>,
}

impl Default for FakeApiState {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            movies: Vec::new(),
            catalogue: Vec::new(),
            listing_reply: None,
            booking_reply: Reply::new(201, r#"{"id":1,"status":"confirmed"}"#),
            write_reply: Reply::new(201, r#"{"id":1}"#),
            requests: Vec::new(),
        }
    }
}

/// An in-memory catalogue API. Cloning shares the same state.
#[derive(Debug, Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeApiState>>,
}

impl FakeApi {
    /// Creates an API with no records. Bookings and writes succeed.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, FakeApiState> {
        self.state.lock().expect("fake api lock poisoned")
    }

    /// Serves these genres from `GET /genres`.
    #[must_use]
    pub fn with_genres(self, genres: Vec<Value>) -> Self {
        self.lock().genres = genres;
        self
    }

    /// Serves these records from `GET /movies` and `GET /movies/{id}`.
    #[must_use]
    pub fn with_movies(self, movies: Vec<Value>) -> Self {
        self.lock().movies = movies;
        self
    }

    /// Serves these records from `GET /catalogue`.
    #[must_use]
    pub fn with_catalogue(self, items: Vec<Value>) -> Self {
        self.lock().catalogue = items;
        self
    }

    /// Answers every listing (`GET`) request with `reply` instead of data.
    #[must_use]
    pub fn fail_listings(self, reply: Reply) -> Self {
        self.lock().listing_reply = Some(reply);
        self
    }

    /// Answers `POST /booking` with `reply`.
    pub fn reply_to_bookings(&self, reply: Reply) {
        self.lock().booking_reply = reply;
    }

    /// Answers record writes (`POST /movies`, `POST /catalogue`,
    /// `PUT /movies/{id}`) with `reply`.
    pub fn reply_to_writes(&self, reply: Reply) {
        self.lock().write_reply = reply;
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    /// Returns the bodies of every `POST /booking` received so far.
    pub fn bookings(&self) -> Vec<Value> {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == "POST" && r.path == "/booking")
            .filter_map(|r| r.body.clone())
            .collect()
    }

    /// Returns how many `POST /booking` requests were received.
    pub fn booking_count(&self) -> usize {
        self.lock()
            .requests
            .iter()
            .filter(|r| r.method == "POST" && r.path == "/booking")
            .count()
    }

    /// Builds the Axum router for this API.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/genres", get(list_genres))
            .route("/movies", get(list_movies).post(write_record))
            .route("/movies/{id}", get(get_movie).put(write_record))
            .route("/catalogue", get(list_catalogue).post(write_record))
            .route("/booking", post(create_booking))
            .with_state(self.clone())
    }

    /// Binds this API to a random port on `127.0.0.1` and serves it in the
    /// background until the returned [`FakeServer`] is stopped or dropped.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn serve(&self) -> FakeServer {
        let listener = match TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => listener,
            Err(e) => panic!("fake api could not bind a local port: {e}"),
        };
        let addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(e) => panic!("fake api listener has no address: {e}"),
        };

        let shutdown = Arc::new(Notify::new());
        let signal = Arc::clone(&shutdown);
        let app = self.router();
        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { signal.notified().await })
                .await
        });

        FakeServer {
            api: self.clone(),
            addr,
            shutdown,
            task,
        }
    }

    fn record(&self, method: &Method, uri: &Uri, body: &str) {
        let body = serde_json::from_str(body).ok();
        self.lock().requests.push(RecordedRequest {
            method: method.to_string(),
            path: uri.path().to_string(),
            body,
        });
    }

    fn listing(&self, method: &Method, uri: &Uri, pick: fn(&FakeApiState) -> Value) -> Reply {
        self.record(method, uri, "");
        let state = self.lock();
        state
            .listing_reply
            .clone()
            .unwrap_or_else(|| Reply::json(&pick(&state)))
    }
}

/// A [`FakeApi`] being served on a local port.
///
/// Dropping the handle aborts the server; [`stop`](Self::stop) lets
/// in-flight requests finish first.
#[derive(Debug)]
pub struct FakeServer {
    api: FakeApi,
    addr: SocketAddr,
    shutdown: Arc<Notify>,
    task: JoinHandle<std::io::Result<()>>,
}

impl FakeServer {
    /// The base URL to point an API client at, e.g. `http://127.0.0.1:43210`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// The server's bound address.
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// The API being served. Shares recorded requests and scripted replies
    /// with the [`FakeApi`] that started the server.
    pub const fn api(&self) -> &FakeApi {
        &self.api
    }

    /// Shuts the server down gracefully. Returns whether it exited cleanly.
    pub async fn stop(mut self) -> bool {
        self.shutdown.notify_one();
        matches!((&mut self.task).await, Ok(Ok(())))
    }
}

impl Drop for FakeServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn list_genres(State(api): State<FakeApi>, method: Method, uri: Uri) -> Reply {
    api.listing(&method, &uri, |s| Value::Array(s.genres.clone()))
}

async fn list_movies(State(api): State<FakeApi>, method: Method, uri: Uri) -> Reply {
    api.listing(&method, &uri, |s| Value::Array(s.movies.clone()))
}

async fn list_catalogue(State(api): State<FakeApi>, method: Method, uri: Uri) -> Reply {
    api.listing(&method, &uri, |s| Value::Array(s.catalogue.clone()))
}

async fn get_movie(
    State(api): State<FakeApi>,
    Path(id): Path<i64>,
    method: Method,
    uri: Uri,
) -> Reply {
    api.record(&method, &uri, "");
    let state = api.lock();
    if let Some(reply) = state.listing_reply.clone() {
        return reply;
    }
    state
        .movies
        .iter()
        .find(|m| m.get("id").and_then(Value::as_i64) == Some(id))
        .map_or_else(
            || Reply::new(404, r#"{"error":"not found"}"#),
            Reply::json,
        )
}

async fn write_record(State(api): State<FakeApi>, method: Method, uri: Uri, body: String) -> Reply {
    api.record(&method, &uri, &body);
    api.lock().write_reply.clone()
}

async fn create_booking(
    State(api): State<FakeApi>,
    method: Method,
    uri: Uri,
    body: String,
) -> Reply {
    api.record(&method, &uri, &body);
    api.lock().booking_reply.clone()
}
