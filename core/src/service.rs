//! `ApiService` pairs the request builder with a transport and exposes one
//! call per backend operation. Every call is exactly one round trip: no
//! retry, no caching.

use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::client::SchedulingClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::resource::Resource;
use crate::transport::Transport;
use crate::types::{RecordId, Slot};

#[derive(Debug, Clone)]
pub struct ApiService<T> {
    client: SchedulingClient,
    transport: T,
}

impl<T: Transport> ApiService<T> {
    pub fn new(client: SchedulingClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn from_config(config: &ClientConfig, transport: T) -> Self {
        Self::new(SchedulingClient::new(&config.api_url), transport)
    }

    pub fn client(&self) -> &SchedulingClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, path = %request.path, "sending request");
        self.transport.execute(request)
    }

    /// Run `parse` over the response of `request`, logging any failure once.
    fn call<U>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&SchedulingClient, HttpResponse) -> Result<U, ApiError>,
    ) -> Result<U, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        self.round_trip(request)
            .and_then(|response| parse(&self.client, response))
            .inspect_err(|e| error!(%method, %path, error = %e, "API error"))
    }

    /// Generic request: any prepared request, decoded into `U`; `None` for an
    /// empty success body.
    pub fn request<U: DeserializeOwned>(&self, request: HttpRequest) -> Result<Option<U>, ApiError> {
        self.call(request, |c, r| c.parse(r))
    }

    pub fn list<R: Resource>(&self) -> Result<Vec<R::Record>, ApiError> {
        self.call(self.client.build_list::<R>(), |c, r| c.parse_list::<R>(r))
    }

    pub fn get<R: Resource>(&self, id: &RecordId) -> Result<R::Record, ApiError> {
        self.call(self.client.build_get::<R>(id), |c, r| c.parse_get::<R>(r))
    }

    pub fn create<R: Resource>(&self, draft: &R::Draft) -> Result<Option<R::Record>, ApiError> {
        let request = self.client.build_create::<R>(draft)?;
        self.call(request, |c, r| c.parse_saved::<R>(r))
    }

    pub fn update<R: Resource>(&self, id: &RecordId, draft: &R::Draft) -> Result<Option<R::Record>, ApiError> {
        let request = self.client.build_update::<R>(id, draft)?;
        self.call(request, |c, r| c.parse_saved::<R>(r))
    }

    pub fn delete<R: Resource>(&self, id: &RecordId) -> Result<(), ApiError> {
        self.call(self.client.build_delete::<R>(id), |c, r| c.parse_delete(r))
    }

    pub fn slots(&self, professional_id: &RecordId, date: &str) -> Result<Vec<Slot>, ApiError> {
        self.call(self.client.build_list_slots(professional_id, date), |c, r| {
            c.parse_list_slots(r)
        })
    }

    /// Reserved slot-creation endpoint. No page calls it.
    pub fn create_slots(&self, payload: &serde_json::Value) -> Result<Option<serde_json::Value>, ApiError> {
        let request = self.client.build_create_slots(payload)?;
        self.call(request, |c, r| c.parse_create_slots(r))
    }
}
