//! Scripted in-memory transport for unit tests.

use std::cell::RefCell;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::service::ApiService;
use crate::client::SchedulingClient;
use crate::transport::Transport;

pub(crate) const BASE_URL: &str = "http://backend.test/api";

/// Answers requests from a route table. The most recently added route for a
/// method/endpoint pair wins, so tests can change an answer mid-scenario.
/// Unrouted requests get a 404.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    routes: RefCell<Vec<(HttpMethod, String, HttpResponse)>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn respond(&self, method: HttpMethod, endpoint: &str, status: u16, body: &str) -> &Self {
        self.routes
            .borrow_mut()
            .push((method, format!("{BASE_URL}{endpoint}"), HttpResponse::new(status, body)));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn count(&self, method: HttpMethod, endpoint: &str) -> usize {
        let path = format!("{BASE_URL}{endpoint}");
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        let routes = self.routes.borrow();
        let response = routes
            .iter()
            .rev()
            .find(|(method, path, _)| *method == request.method && *path == request.path)
            .map(|(_, _, response)| response.clone())
            .unwrap_or_else(|| HttpResponse::new(404, "no route"));
        Ok(response)
    }
}

pub(crate) fn api() -> ApiService<ScriptedTransport> {
    ApiService::new(SchedulingClient::new(BASE_URL), ScriptedTransport::default())
}
