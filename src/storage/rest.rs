//! REST implementation of ResourceService over the admin backend
//!
//! Wire contract, relative to the configured base URL:
//!
//! - `GET /{collection}` returns a bare array or a `{ "data": [...] }` envelope
//! - `POST /{collection}` creates and returns the record
//! - `PUT /{item}/{id}` applies a partial update and returns the record
//! - `DELETE /{item}/{id}` answers 204 with no body
//! - error bodies carry an optional `message` (a string, or a list of strings)
//!
//! Every request carries `Authorization: Bearer <token>` when the client was
//! built with a [`Credential`].

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AdminConfig;
use crate::core::auth::{Credential, LoginRequest, LoginResponse};
use crate::core::error::{DEFAULT_FALLBACK_MESSAGE, Result, StoreError};
use crate::core::resource::{RecordId, Resource, ResourceKind};
use crate::core::service::{Fields, ResourceService};
use crate::entities::Photo;

/// Endpoint paths of one remote collection
///
/// Paths are kept as segments; identifiers are percent-encoded when the
/// request URL is built, so an id containing `/` or `?` stays one segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePath {
    /// Segments listed and posted to (e.g. `[songs]`, `[albums, 5, photos]`)
    pub collection: Vec<String>,
    /// Segment prefixing `PUT`/`DELETE` by id (e.g. `songs`, `photos`)
    pub item: String,
    /// Query parameters sent with every listing
    pub list_params: Vec<(String, String)>,
}

impl ResourcePath {
    /// Default paths of a kind
    ///
    /// Songs are listed with `limit=0` so the backend returns every song
    /// instead of its first page.
    pub fn for_kind(kind: ResourceKind) -> Self {
        let name = kind.collection_name().to_string();
        let list_params = match kind {
            ResourceKind::Song => vec![("limit".to_string(), "0".to_string())],
            _ => Vec::new(),
        };
        Self {
            collection: vec![name.clone()],
            item: name,
            list_params,
        }
    }

    /// Photos of one album: listed and added under the album, updated and
    /// deleted under `photos`
    pub fn album_photos(album_id: &RecordId) -> Self {
        Self {
            collection: vec![
                ResourceKind::Album.collection_name().to_string(),
                album_id.to_string(),
                "photos".to_string(),
            ],
            item: ResourceKind::Photo.collection_name().to_string(),
            list_params: Vec::new(),
        }
    }

    /// Collection path for display, e.g. `albums/5/photos`
    pub fn collection_path(&self) -> String {
        self.collection.join("/")
    }

    /// Item path for display, e.g. `songs/3`
    pub fn item_path(&self, id: &RecordId) -> String {
        format!("{}/{}", self.item, id)
    }

    fn collection_segments(&self) -> Vec<&str> {
        self.collection.iter().map(String::as_str).collect()
    }
}

/// HTTP client for the admin backend
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    credential: Option<Credential>,
    fallback_message: String,
}

impl RestClient {
    /// Anonymous client for `base_url` (e.g. `https://choir.example.org/api`)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential: None,
            fallback_message: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Client configured from an [`AdminConfig`], including its token if any
    pub fn from_config(config: &AdminConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().map_err(StoreError::from)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credential: config.credential(),
            fallback_message: config.fallback_message.clone(),
        })
    }

    /// The same client, authenticated with `credential`
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// The same client, using `message` for rejections without a message
    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Service for the default paths of `T`'s kind
    pub fn service<T: Resource>(&self) -> RestResourceService<T> {
        self.service_at(ResourcePath::for_kind(T::kind()))
    }

    /// Service for the photos of one album
    pub fn album_photos(&self, album_id: &RecordId) -> RestResourceService<Photo> {
        self.service_at(ResourcePath::album_photos(album_id))
    }

    /// Service for explicit paths
    pub fn service_at<T: Resource>(&self, path: ResourcePath) -> RestResourceService<T> {
        RestResourceService {
            client: self.clone(),
            path,
            _marker: PhantomData,
        }
    }

    /// Exchange username and password for a bearer credential
    ///
    /// `POST /auth/login`; the token is read from `access_token` or `token`.
    pub async fn login(&self, username: &str, password: &str) -> Result<Credential> {
        let body = LoginRequest { username, password };
        let request = self.request(Method::POST, &["auth", "login"])?.json(&body);
        let payload = self.execute(request).await?.ok_or_else(|| {
            StoreError::MalformedResponse("login response has no body".into())
        })?;

        let response: LoginResponse = serde_json::from_value(payload)
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))?;
        let credential = response.into_credential().ok_or_else(|| {
            StoreError::MalformedResponse("login response carries no token".into())
        })?;

        info!(username, "Logged in");
        Ok(credential)
    }

    /// Base URL extended by `segments`, each percent-encoded as one segment
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            StoreError::InvalidInput(format!("invalid base URL {:?}: {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                StoreError::InvalidInput(format!("base URL {:?} cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let builder = self.http.request(method, self.url(segments)?);
        Ok(match &self.credential {
            Some(credential) => builder.bearer_auth(credential.token()),
            None => builder,
        })
    }

    /// Send a request; `None` for 204 or an empty success body
    async fn execute(&self, request: RequestBuilder) -> Result<Option<Value>> {
        let response = request.send().await.map_err(StoreError::from)?;
        let status = response.status();
        let body = response.bytes().await.map_err(StoreError::from)?;

        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), message = ?message, "Backend rejected request");
            return Err(StoreError::rejection(
                Some(status.as_u16()),
                message,
                &self.fallback_message,
            ));
        }

        if status == StatusCode::NO_CONTENT || body.is_empty() {
            return Ok(None);
        }

        serde_json::from_slice(&body)
            .map(Some)
            .map_err(|e| StoreError::MalformedResponse(e.to_string()))
    }
}

/// Extract the backend's `message` from an error body
///
/// Validation failures send a list of messages; they are joined with `, `.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("message")? {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        _ => None,
    }
}

/// Decode a listing: a bare array or a `{ "data": [...] }` envelope
pub fn parse_collection<T: DeserializeOwned>(body: Option<Value>) -> Result<Vec<T>> {
    let items = match body {
        Some(Value::Array(items)) => items,
        Some(Value::Object(mut envelope)) => match envelope.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(StoreError::MalformedResponse(
                    "expected an array or a {data: [...]} envelope".into(),
                ));
            }
        },
        Some(other) => {
            return Err(StoreError::MalformedResponse(format!(
                "expected an array, got {}",
                json_type(&other)
            )));
        }
        None => {
            return Err(StoreError::MalformedResponse(
                "empty body where a collection was expected".into(),
            ));
        }
    };

    serde_json::from_value(Value::Array(items))
        .map_err(|e| StoreError::MalformedResponse(e.to_string()))
}

/// Decode a single record; a missing or null body is `None`
pub fn parse_record<T: DeserializeOwned>(body: Option<Value>) -> Result<Option<T>> {
    match body {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::MalformedResponse(e.to_string())),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// [`ResourceService`] backed by one REST collection
#[derive(Debug, Clone)]
pub struct RestResourceService<T> {
    client: RestClient,
    path: ResourcePath,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RestResourceService<T> {
    pub fn path(&self) -> &ResourcePath {
        &self.path
    }
}

#[async_trait]
impl<T: Resource> ResourceService<T> for RestResourceService<T> {
    async fn list(&self) -> Result<Vec<T>> {
        let request = self
            .client
            .request(Method::GET, &self.path.collection_segments())?
            .query(&self.path.list_params);
        let body = self.client.execute(request).await?;
        let records = parse_collection(body)?;
        debug!(path = %self.path.collection_path(), count = records.len(), "Listed collection");
        Ok(records)
    }

    async fn create(&self, mut fields: Fields) -> Result<Option<T>> {
        fields.remove("id");
        let request = self
            .client
            .request(Method::POST, &self.path.collection_segments())?
            .json(&fields);
        let body = self.client.execute(request).await?;
        debug!(path = %self.path.collection_path(), "Created record");
        parse_record(body)
    }

    async fn update(&self, id: &RecordId, mut fields: Fields) -> Result<Option<T>> {
        fields.remove("id");
        let id_segment = id.to_string();
        let request = self
            .client
            .request(Method::PUT, &[self.path.item.as_str(), id_segment.as_str()])?
            .json(&fields);
        let body = self.client.execute(request).await?;
        debug!(path = %self.path.item_path(id), "Updated record");
        parse_record(body)
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let id_segment = id.to_string();
        let request = self
            .client
            .request(Method::DELETE, &[self.path.item.as_str(), id_segment.as_str()])?;
        self.client.execute(request).await?;
        debug!(path = %self.path.item_path(id), "Deleted record");
        Ok(())
    }
}
