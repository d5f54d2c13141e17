//! In-memory stand-in for the scheduling backend.
//!
//! Serves the REST contract the client consumes under `/api`: CRUD for
//! `pacientes`, `profissionais` and `consultas` (reads embed patient and
//! professional summaries) plus the slot calendar under
//! `/scripts/agenda/slots`.

pub mod handlers;
pub mod models;
pub mod slots;

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;

pub use models::{
    Appointment, AppointmentView, Patient, PatientSummary, Professional, ProfessionalSummary, Slot, SlotList,
    Store,
};

pub type Db = Arc<RwLock<Store>>;

/// Router over a fresh, empty store.
pub fn app() -> Router {
    app_with(Db::default())
}

/// Router over an existing store, so tests can seed or inspect it.
pub fn app_with(db: Db) -> Router {
    use handlers::*;

    let api = Router::new()
        .route("/pacientes", get(list_patients).post(create_patient))
        .route(
            "/pacientes/{id}",
            get(get_patient).put(update_patient).delete(delete_patient),
        )
        .route("/profissionais", get(list_professionals).post(create_professional))
        .route(
            "/profissionais/{id}",
            get(get_professional).put(update_professional).delete(delete_professional),
        )
        .route("/consultas", get(list_appointments).post(create_appointment))
        .route(
            "/consultas/{id}",
            get(get_appointment).put(update_appointment).delete(delete_appointment),
        )
        .route("/scripts/agenda/slots", get(slots::list_slots).post(slots::create_slots))
        .with_state(db);

    Router::new().nest("/api", api).layer(TraceLayer::new_for_http())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
