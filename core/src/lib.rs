//! Client core for the medical scheduling service.
//!
//! # Overview
//! Manages patients, professionals and appointments and shows a professional's
//! slot calendar, entirely through the backend's REST API. The crate is
//! headless: pages produce `View` values and the caller decides how to show
//! them.
//!
//! # Design
//! - `SchedulingClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network; `Transport` does the round-trip
//!   (`UreqTransport` over HTTP, scripted transports in tests).
//! - `Resource` describes the three CRUD entities once, so client calls, list
//!   pages and form pages are generic over it.
//! - `Navigator` is the page/editing-id state machine; `Shell` is its single
//!   writer and owns the mounted page.
//! - Types use owned `String` / `Vec` fields; DTOs are defined independently
//!   from the mock-server crate and integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod draft;
pub mod error;
pub mod http;
pub mod pages;
pub mod resource;
pub mod service;
pub mod shell;
pub mod transport;
pub mod types;
pub mod view;

#[cfg(test)]
mod fake;

pub use client::SchedulingClient;
pub use config::ClientConfig;
pub use draft::{Draft, DraftError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pages::{AgendaPage, AppointmentFormPage, Confirm, FormPage, ListPage, PageError};
pub use resource::{Appointments, Patients, Professionals, Resource};
pub use service::ApiService;
pub use shell::{Navigator, Page, Shell, Tab};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Appointment, AppointmentDraft, AppointmentKind, AppointmentStatus, Patient, PatientDraft, Professional,
    ProfessionalDraft, RecordId, Slot,
};
pub use view::View;
