//! Headless page models.
//!
//! # Design
//! Each page owns its local UI state (records, loading flag, error and
//! success banners) and talks to the backend only through `ApiService`.
//! Pages catch every `ApiError` and turn it into a banner string; nothing
//! escapes a page. Calls are blocking, so a page never observes a response
//! after it has been replaced by navigation.

mod agenda;
mod appointment_form;
mod form;
mod list;

pub use agenda::AgendaPage;
pub use appointment_form::AppointmentFormPage;
pub use form::FormPage;
pub use list::ListPage;

use thiserror::Error;

use crate::draft::DraftError;
use crate::error::ApiError;

/// Blocking yes/no prompt shown before destructive actions.
pub trait Confirm {
    fn confirm(&mut self, message: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, message: &str) -> bool {
        self(message)
    }
}

/// Rejections of user actions. Backend failures never appear here; they are
/// shown as banners by the page that hit them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("ação \"{action}\" indisponível na página {page}")]
    Unsupported { action: &'static str, page: &'static str },

    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("Horário não oferecido: {0}")]
    SlotNotOffered(String),
}

pub(crate) fn banner(prefix: &str, subject: &str, err: &ApiError) -> String {
    format!("{prefix} {subject}: {err}")
}
