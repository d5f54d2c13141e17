//! Stateless HTTP request builder and response parser for the scheduling API.
//!
//! # Design
//! `SchedulingClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Resource operations are generic over `Resource`, so the
//! three entities share one request/translation policy.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resource::Resource;
use crate::types::{RecordId, Slot, SlotList};

/// Endpoint of the slot calendar, relative to the base URL.
pub const SLOTS_PATH: &str = "/scripts/agenda/slots";

#[derive(Debug, Clone)]
pub struct SchedulingClient {
    base_url: String,
}

impl SchedulingClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    fn record_url<R: Resource>(&self, id: &RecordId) -> String {
        let segment: String = form_urlencoded::byte_serialize(id.to_string().as_bytes()).collect();
        self.url(&format!("{}/{segment}", R::PATH))
    }

    fn without_body(method: HttpMethod, path: String) -> HttpRequest {
        HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    fn with_json<B: Serialize>(method: HttpMethod, path: String, payload: &B) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_list<R: Resource>(&self) -> HttpRequest {
        Self::without_body(HttpMethod::Get, self.url(R::PATH))
    }

    pub fn build_get<R: Resource>(&self, id: &RecordId) -> HttpRequest {
        Self::without_body(HttpMethod::Get, self.record_url::<R>(id))
    }

    pub fn build_create<R: Resource>(&self, draft: &R::Draft) -> Result<HttpRequest, ApiError> {
        Self::with_json(HttpMethod::Post, self.url(R::PATH), draft)
    }

    pub fn build_update<R: Resource>(&self, id: &RecordId, draft: &R::Draft) -> Result<HttpRequest, ApiError> {
        Self::with_json(HttpMethod::Put, self.record_url::<R>(id), draft)
    }

    pub fn build_delete<R: Resource>(&self, id: &RecordId) -> HttpRequest {
        Self::without_body(HttpMethod::Delete, self.record_url::<R>(id))
    }

    /// Slots computed by the backend for one professional on one date.
    pub fn build_list_slots(&self, professional_id: &RecordId, date: &str) -> HttpRequest {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("profissional_id", &professional_id.to_string())
            .append_pair("data", date)
            .finish();
        Self::without_body(HttpMethod::Get, format!("{}?{query}", self.url(SLOTS_PATH)))
    }

    /// Reserved backend capability: the payload is forwarded as-is, no
    /// semantics are assumed.
    pub fn build_create_slots(&self, payload: &serde_json::Value) -> Result<HttpRequest, ApiError> {
        Self::with_json(HttpMethod::Post, self.url(SLOTS_PATH), payload)
    }

    /// Generic response translation: non-2xx becomes `ApiError::Http`, an
    /// empty success body becomes `None`, anything else is decoded as JSON.
    pub fn parse<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<Option<T>, ApiError> {
        check_status(&response)?;
        if response.is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_list<R: Resource>(&self, response: HttpResponse) -> Result<Vec<R::Record>, ApiError> {
        self.parse(response)?.ok_or_else(empty_body)
    }

    pub fn parse_get<R: Resource>(&self, response: HttpResponse) -> Result<R::Record, ApiError> {
        self.parse(response)?.ok_or_else(empty_body)
    }

    /// Create/update responses are informational only. A body that is not a
    /// record (or no body at all) still counts as success.
    pub fn parse_saved<R: Resource>(&self, response: HttpResponse) -> Result<Option<R::Record>, ApiError> {
        let Some(value) = self.parse::<serde_json::Value>(response)? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                debug!(error = %e, "save response is not a {}", R::LABELS.singular);
                Ok(None)
            }
        }
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_list_slots(&self, response: HttpResponse) -> Result<Vec<Slot>, ApiError> {
        Ok(self.parse::<SlotList>(response)?.unwrap_or_default().slots)
    }

    pub fn parse_create_slots(&self, response: HttpResponse) -> Result<Option<serde_json::Value>, ApiError> {
        self.parse(response)
    }
}

/// Map a non-success status to `ApiError::Http`, keeping the raw body text.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}

fn empty_body() -> ApiError {
    ApiError::Deserialization("empty response body".to_string())
}
