//! Mock admin backend served over real HTTP with axum
//!
//! Mirrors the contract the REST client relies on:
//!
//! - songs are listed in a `{ data, total }` envelope, every other kind as a bare array
//! - created records get an integer id and a `createdAt` timestamp
//! - events resolve `{part}_song` ids into `{part}Song` objects
//! - deletes answer 204, unknown ids 404 with a `message`
//! - `POST /api/auth/login` accepts `admin` / `secret`

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use choir::storage::RestClient;

pub const TEST_TOKEN: &str = "test-token";
pub const CREATED_AT: &str = "2025-01-01T00:00:00.000Z";

const RESOURCES: [&str; 7] = [
    "songs",
    "events",
    "news",
    "committee",
    "documents",
    "albums",
    "photos",
];

/// One request as the backend saw it
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Default)]
struct BackendState {
    tables: HashMap<String, Vec<Value>>,
    next_id: i64,
    require_token: bool,
    malformed: HashSet<String>,
    failing: HashSet<String>,
    requests: Vec<RecordedRequest>,
}

type Shared = Arc<Mutex<BackendState>>;

/// Handle to a running mock backend
#[derive(Clone)]
pub struct MockBackend {
    state: Shared,
    pub addr: SocketAddr,
}

impl MockBackend {
    /// Start a backend that accepts anonymous requests
    pub async fn start() -> Self {
        Self::spawn(false).await
    }

    /// Start a backend that answers 401 without `Bearer test-token`
    pub async fn start_secured() -> Self {
        Self::spawn(true).await
    }

    async fn spawn(require_token: bool) -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            next_id: 1,
            require_token,
            ..Default::default()
        }));

        let mut app = Router::new()
            .route("/api/auth/login", post(login))
            .route(
                "/api/albums/{id}/photos",
                get(list_album_photos).post(add_album_photo),
            );
        for name in RESOURCES {
            app = app.merge(resource_routes(name));
        }
        let app = app.with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self { state, addr }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Anonymous client pointed at this backend
    pub fn client(&self) -> RestClient {
        RestClient::new(self.base_url())
    }

    /// Insert records verbatim; missing ids are assigned
    pub fn seed(&self, resource: &str, records: Vec<Value>) {
        let mut state = self.state.lock().unwrap();
        for record in records {
            let record = state.assign_id(record);
            state.tables.entry(resource.to_string()).or_default().push(record);
        }
    }

    /// Make `GET /api/{resource}` answer 200 with an unrecognized body
    pub fn set_malformed(&self, resource: &str) {
        self.state.lock().unwrap().malformed.insert(resource.to_string());
    }

    /// Make every call on `resource` answer 500 with a non-JSON body
    pub fn set_failing(&self, resource: &str) {
        self.state.lock().unwrap().failing.insert(resource.to_string());
    }

    pub fn records(&self, resource: &str) -> Vec<Value> {
        self.state
            .lock()
            .unwrap()
            .tables
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.state.lock().unwrap().requests.last().cloned()
    }
}

impl BackendState {
    fn assign_id(&mut self, record: Value) -> Value {
        let mut object = match record {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        match object.get("id") {
            Some(Value::Number(n)) => {
                if let Some(id) = n.as_i64() {
                    self.next_id = self.next_id.max(id + 1);
                }
            }
            Some(_) => {}
            None => {
                object.insert("id".into(), json!(self.next_id));
                self.next_id += 1;
            }
        }
        Value::Object(object)
    }

    /// Record the request and check the bearer token
    fn admit(&mut self, method: &str, path: &str, query: Option<String>, headers: &HeaderMap) -> Option<Response> {
        let authorization = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let authorized = authorization.as_deref() == Some(&format!("Bearer {}", TEST_TOKEN)[..]);
        self.requests.push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            query,
            authorization,
        });

        if self.require_token && !authorized {
            return Some(reject(StatusCode::UNAUTHORIZED, json!("Unauthorized")));
        }
        let resource = path.trim_start_matches("/api/").split('/').next().unwrap_or_default();
        if self.failing.contains(resource) {
            return Some((StatusCode::INTERNAL_SERVER_ERROR, "<html>Internal Server Error</html>").into_response());
        }
        None
    }

    fn position(&self, resource: &str, id: &str) -> Option<usize> {
        self.tables
            .get(resource)?
            .iter()
            .position(|r| r.get("id").map(id_string).as_deref() == Some(id))
    }

    /// Replace `{part}_song` ids with the referenced song object
    fn resolve_program(&self, object: &mut Map<String, Value>) {
        let keys: Vec<String> = object.keys().filter(|k| k.ends_with("_song")).cloned().collect();
        for key in keys {
            let Some(id) = object.remove(&key) else { continue };
            let part = key.trim_end_matches("_song");
            let song = self
                .tables
                .get("songs")
                .and_then(|songs| songs.iter().find(|s| s.get("id").map(id_string) == Some(id_string(&id))))
                .cloned()
                .unwrap_or(Value::Null);
            object.insert(format!("{}Song", part), song);
        }
    }
}

fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn reject(status: StatusCode, message: Value) -> Response {
    (
        status,
        Json(json!({ "statusCode": status.as_u16(), "message": message })),
    )
        .into_response()
}

fn resource_routes(name: &'static str) -> Router<Shared> {
    Router::new()
        .route(
            &format!("/api/{}", name),
            get(
                move |State(state): State<Shared>, RawQuery(query): RawQuery, headers: HeaderMap| async move {
                    list(&state, name, query, &headers)
                },
            )
            .post(
                move |State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>| async move {
                    create(&state, name, &headers, body)
                },
            ),
        )
        .route(
            &format!("/api/{}/{{id}}", name),
            put(
                move |State(state): State<Shared>,
                      Path(id): Path<String>,
                      headers: HeaderMap,
                      Json(body): Json<Value>| async move { update(&state, name, &id, &headers, body) },
            )
            .delete(
                move |State(state): State<Shared>, Path(id): Path<String>, headers: HeaderMap| async move {
                    remove(&state, name, &id, &headers)
                },
            ),
        )
}

fn list(state: &Shared, resource: &str, query: Option<String>, headers: &HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    let path = format!("/api/{}", resource);
    if let Some(denied) = state.admit("GET", &path, query, headers) {
        return denied;
    }
    if state.malformed.contains(resource) {
        return Json(json!({ "items": [] })).into_response();
    }

    let records = state.tables.get(resource).cloned().unwrap_or_default();
    if resource == "songs" {
        let total = records.len();
        Json(json!({ "data": records, "total": total })).into_response()
    } else {
        Json(Value::Array(records)).into_response()
    }
}

fn create(state: &Shared, resource: &str, headers: &HeaderMap, body: Value) -> Response {
    let mut state = state.lock().unwrap();
    let path = format!("/api/{}", resource);
    if let Some(denied) = state.admit("POST", &path, None, headers) {
        return denied;
    }

    let Value::Object(mut object) = body else {
        return reject(StatusCode::BAD_REQUEST, json!("body must be an object"));
    };
    if resource == "songs" && object.get("title").and_then(Value::as_str).is_none_or(str::is_empty) {
        return reject(StatusCode::BAD_REQUEST, json!(["title should not be empty"]));
    }

    object.remove("id");
    object.insert("createdAt".into(), json!(CREATED_AT));
    if resource == "events" {
        state.resolve_program(&mut object);
    }
    let record = state.assign_id(Value::Object(object));
    state.tables.entry(resource.to_string()).or_default().push(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}

fn update(state: &Shared, resource: &str, id: &str, headers: &HeaderMap, body: Value) -> Response {
    let mut state = state.lock().unwrap();
    let path = format!("/api/{}/{}", resource, id);
    if let Some(denied) = state.admit("PUT", &path, None, headers) {
        return denied;
    }

    let Some(index) = state.position(resource, id) else {
        return reject(StatusCode::NOT_FOUND, json!(format!("{} {} not found", resource, id)));
    };
    let Value::Object(mut changes) = body else {
        return reject(StatusCode::BAD_REQUEST, json!("body must be an object"));
    };
    changes.remove("id");
    if resource == "events" {
        state.resolve_program(&mut changes);
    }

    let table = state.tables.get_mut(resource).unwrap();
    if let Some(existing) = table[index].as_object_mut() {
        existing.extend(changes);
    }
    Json(table[index].clone()).into_response()
}

fn remove(state: &Shared, resource: &str, id: &str, headers: &HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    let path = format!("/api/{}/{}", resource, id);
    if let Some(denied) = state.admit("DELETE", &path, None, headers) {
        return denied;
    }

    let Some(index) = state.position(resource, id) else {
        return reject(StatusCode::NOT_FOUND, json!(format!("{} {} not found", resource, id)));
    };
    state.tables.get_mut(resource).unwrap().remove(index);
    StatusCode::NO_CONTENT.into_response()
}

async fn login(State(state): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.requests.push(RecordedRequest {
        method: "POST".into(),
        path: "/api/auth/login".into(),
        query: None,
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let username = body.get("username").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);
    if username == Some("admin") && password == Some("secret") {
        Json(json!({ "access_token": TEST_TOKEN })).into_response()
    } else {
        reject(StatusCode::UNAUTHORIZED, json!("Sai tên đăng nhập hoặc mật khẩu"))
    }
}

async fn list_album_photos(State(state): State<Shared>, Path(album_id): Path<String>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    let path = format!("/api/albums/{}/photos", album_id);
    if let Some(denied) = state.admit("GET", &path, None, &headers) {
        return denied;
    }
    let photos: Vec<Value> = state
        .tables
        .get("photos")
        .map(|photos| {
            photos
                .iter()
                .filter(|p| p.get("albumId").map(id_string).as_deref() == Some(album_id.as_str()))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(Value::Array(photos)).into_response()
}

async fn add_album_photo(
    State(state): State<Shared>,
    Path(album_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    let path = format!("/api/albums/{}/photos", album_id);
    if let Some(denied) = state.admit("POST", &path, None, &headers) {
        return denied;
    }
    let Value::Object(mut object) = body else {
        return reject(StatusCode::BAD_REQUEST, json!("body must be an object"));
    };
    object.remove("id");
    let album = album_id.parse::<i64>().map(Value::from).unwrap_or(Value::String(album_id));
    object.insert("albumId".into(), album);
    let record = state.assign_id(Value::Object(object));
    state.tables.entry("photos".to_string()).or_default().push(record.clone());
    (StatusCode::CREATED, Json(record)).into_response()
}
