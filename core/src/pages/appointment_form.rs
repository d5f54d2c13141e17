use tracing::warn;

use crate::resource::{Appointments, Patients, Professionals};
use crate::service::ApiService;
use crate::transport::Transport;
use crate::types::{AppointmentDraft, AppointmentKind, Patient, Professional, RecordId, Slot};
use crate::view::{Body, Choice, Input, View};

use super::{FormPage, PageError};

/// Appointment form: the generic form plus patient/professional options and
/// the slot-driven time field.
#[derive(Debug)]
pub struct AppointmentFormPage {
    form: FormPage<Appointments>,
    patients: Vec<Patient>,
    professionals: Vec<Professional>,
    slots: Vec<Slot>,
}

impl AppointmentFormPage {
    /// Option lists load first and fail quietly; the edited record (if any)
    /// must be in place before slots are fetched for its professional/date.
    pub fn mount<T: Transport>(api: &ApiService<T>, editing_id: Option<RecordId>) -> Self {
        let patients = api.list::<Patients>().unwrap_or_else(|e| {
            warn!(error = %e, "Erro ao carregar pacientes");
            Vec::new()
        });
        let professionals = api.list::<Professionals>().unwrap_or_else(|e| {
            warn!(error = %e, "Erro ao carregar profissionais");
            Vec::new()
        });
        let mut page = Self {
            form: FormPage::mount(api, editing_id),
            patients,
            professionals,
            slots: Vec::new(),
        };
        page.refresh_slots(api);
        page
    }

    /// Assign a field; changing professional or date re-fetches the slots.
    /// While slots are offered the time must be one of their start times.
    pub fn set_field<T: Transport>(&mut self, api: &ApiService<T>, name: &str, value: &str) -> Result<(), PageError> {
        let value = value.trim();
        if name == "hora" && !value.is_empty() && !self.slots.is_empty() {
            // Offered start times are taken verbatim, whatever their format.
            let slot = self
                .slots
                .iter()
                .find(|s| s.start == value)
                .ok_or_else(|| PageError::SlotNotOffered(value.to_string()))?;
            self.form.draft_mut().time = slot.start.clone();
            return Ok(());
        }

        let before = self.slot_key();
        self.form.set_field(name, value)?;
        if self.slot_key() != before {
            self.refresh_slots(api);
        }
        Ok(())
    }

    fn slot_key(&self) -> (Option<RecordId>, String) {
        let draft = self.form.draft();
        (draft.professional_id.clone(), draft.date.clone())
    }

    fn refresh_slots<T: Transport>(&mut self, api: &ApiService<T>) {
        let draft = self.form.draft();
        self.slots = match (&draft.professional_id, draft.date.is_empty()) {
            (Some(professional_id), false) => api.slots(professional_id, &draft.date).unwrap_or_else(|e| {
                warn!(error = %e, "Erro ao carregar slots");
                Vec::new()
            }),
            _ => Vec::new(),
        };
    }

    pub fn submit<T: Transport>(&mut self, api: &ApiService<T>) -> bool {
        let creating = self.form.editing_id().is_none();
        let saved = self.form.submit(api);
        if saved && creating {
            self.slots.clear();
        }
        saved
    }

    pub fn form(&self) -> &FormPage<Appointments> {
        &self.form
    }

    pub fn draft(&self) -> &AppointmentDraft {
        self.form.draft()
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn professionals(&self) -> &[Professional] {
        &self.professionals
    }

    /// Slot selector when the backend offered slots, free time input otherwise.
    pub fn time_input(&self) -> Input {
        if self.slots.is_empty() {
            return Input::Time;
        }
        Input::Select(
            self.slots
                .iter()
                .map(|s| Choice::new(s.start.clone(), s.start.clone()))
                .collect(),
        )
    }

    pub fn view(&self) -> View {
        let mut view = self.form.view();
        let draft = self.form.draft();
        let editing = self.form.editing_id().is_some();

        if let Body::Form { fields, .. } = &mut view.body {
            fields.retain(|f| match f.name {
                "link_meet" => draft.kind == AppointmentKind::Online,
                "status" => editing,
                _ => true,
            });
            for field in fields.iter_mut() {
                match field.name {
                    "paciente_id" => {
                        field.input = Input::Select(
                            self.patients
                                .iter()
                                .map(|p| Choice::new(p.id.to_string(), format!("{} - {}", p.name, p.cpf)))
                                .collect(),
                        )
                    }
                    "profissional_id" => {
                        field.input = Input::Select(
                            self.professionals
                                .iter()
                                .map(|p| Choice::new(p.id.to_string(), format!("{} - {}", p.name, p.specialty)))
                                .collect(),
                        )
                    }
                    "hora" => field.input = self.time_input(),
                    _ => {}
                }
            }
        }

        if draft.professional_id.is_some() && !draft.date.is_empty() && self.slots.is_empty() {
            view.details.push("Nenhum slot disponível para esta data".to_string());
        }
        view
    }
}
