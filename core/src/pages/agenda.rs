use tracing::warn;

use crate::draft::DraftError;
use crate::resource::Professionals;
use crate::service::ApiService;
use crate::transport::Transport;
use crate::types::{Professional, RecordId, Slot};
use crate::view::{format_date, Body, Notice, SlotCell, View};

use super::banner;

const TITLE: &str = "Agenda de Horários";

/// Read-only slot calendar for one professional on one date.
#[derive(Debug, Default)]
pub struct AgendaPage {
    professionals: Vec<Professional>,
    professional_id: Option<RecordId>,
    date: String,
    slots: Vec<Slot>,
    loading: bool,
    error: Option<String>,
}

impl AgendaPage {
    pub fn mount<T: Transport>(api: &ApiService<T>) -> Self {
        let mut page = Self::default();
        match api.list::<Professionals>() {
            Ok(professionals) => page.professionals = professionals,
            Err(e) => page.error = Some(banner("Erro ao carregar", "profissionais", &e)),
        }
        page
    }

    pub fn select_professional<T: Transport>(&mut self, api: &ApiService<T>, professional_id: Option<RecordId>) {
        self.professional_id = professional_id;
        self.refresh(api);
    }

    pub fn select_date<T: Transport>(&mut self, api: &ApiService<T>, date: &str) -> Result<(), DraftError> {
        let date = date.trim();
        if !date.is_empty() && chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
            return Err(DraftError::Invalid {
                field: "data",
                value: date.to_string(),
            });
        }
        self.date = date.to_string();
        self.refresh(api);
        Ok(())
    }

    /// Fetch slots when both selections are present, clear them otherwise.
    pub fn refresh<T: Transport>(&mut self, api: &ApiService<T>) {
        let Some(professional_id) = self.professional_id.clone().filter(|_| !self.date.is_empty()) else {
            self.slots.clear();
            return;
        };
        self.loading = true;
        self.error = None;
        match api.slots(&professional_id, &self.date) {
            Ok(slots) => self.slots = slots,
            Err(e) => {
                warn!(professional = %professional_id, date = %self.date, error = %e, "slot load failed");
                self.error = Some(banner("Erro ao carregar", "horários", &e));
                self.slots.clear();
            }
        }
        self.loading = false;
    }

    /// The selected professional, matched by id text so numeric and string
    /// ids from different sources compare equal.
    pub fn selected_professional(&self) -> Option<&Professional> {
        let wanted = self.professional_id.as_ref()?.to_string();
        self.professionals.iter().find(|p| p.id.to_string() == wanted)
    }

    pub fn professionals(&self) -> &[Professional] {
        &self.professionals
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> View {
        let both = self.professional_id.is_some() && !self.date.is_empty();
        let body = if self.loading {
            Body::Loading("Carregando horários...")
        } else if both && self.slots.is_empty() {
            Body::Message("Nenhum horário disponível para esta data".to_string())
        } else if both {
            Body::Slots(
                self.slots
                    .iter()
                    .map(|s| SlotCell {
                        start: s.start.clone(),
                        available: s.available,
                    })
                    .collect(),
            )
        } else if self.professional_id.is_none() && self.date.is_empty() {
            Body::Message("Selecione um profissional e uma data para visualizar os horários disponíveis".to_string())
        } else {
            Body::Message(String::new())
        };

        let mut view = View::new(TITLE, body);
        if let Some(error) = &self.error {
            view.notices.push(Notice::Error(error.clone()));
        }
        if !self.professionals.is_empty() {
            view.details.push(format!(
                "Profissionais: {}",
                self.professionals
                    .iter()
                    .map(|p| format!("{} = {} - {}", p.id, p.name, p.specialty))
                    .collect::<Vec<_>>()
                    .join("; ")
            ));
        }
        if let (Some(professional), false) = (self.selected_professional(), self.date.is_empty()) {
            view.details.push(format!("Agenda de {}", professional.name));
            view.details.push(format!("Especialidade: {}", professional.specialty));
            view.details.push(format!("Data: {}", format_date(&self.date)));
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake;
    use crate::http::HttpMethod;

    const PROFESSIONALS: &str = r#"[{"id":"P1","nome":"Dra. Carla","especialidade":"Pediatria","crm":"1"}]"#;
    const SLOTS_URL: &str = "/scripts/agenda/slots?profissional_id=P1&data=2024-06-10";

    #[test]
    fn prompts_until_both_selected() {
        let api = fake::api();
        api.transport().respond(HttpMethod::Get, "/profissionais", 200, PROFESSIONALS);
        let mut page = AgendaPage::mount(&api);
        assert!(matches!(page.view().body, Body::Message(ref m) if m.starts_with("Selecione")));

        page.select_professional(&api, Some(RecordId::from("P1")));
        assert!(page.slots().is_empty());
        assert_eq!(api.transport().count(HttpMethod::Get, SLOTS_URL), 0);
    }

    #[test]
    fn renders_slot_availability() {
        let api = fake::api();
        api.transport()
            .respond(HttpMethod::Get, "/profissionais", 200, PROFESSIONALS)
            .respond(
                HttpMethod::Get,
                SLOTS_URL,
                200,
                r#"{"slots":[{"id":1,"hora_inicio":"09:00","disponivel":true},{"id":2,"hora_inicio":"09:30","disponivel":false}]}"#,
            );
        let mut page = AgendaPage::mount(&api);
        page.select_professional(&api, Some(RecordId::from("P1")));
        page.select_date(&api, "2024-06-10").unwrap();

        let view = page.view();
        assert_eq!(
            view.body,
            Body::Slots(vec![
                SlotCell { start: "09:00".into(), available: true },
                SlotCell { start: "09:30".into(), available: false },
            ])
        );
        assert!(view.details.contains(&"Agenda de Dra. Carla".to_string()));
        assert!(view.details.contains(&"Data: 10/06/2024".to_string()));
    }

    #[test]
    fn empty_slots_show_message() {
        let api = fake::api();
        api.transport()
            .respond(HttpMethod::Get, "/profissionais", 200, PROFESSIONALS)
            .respond(HttpMethod::Get, SLOTS_URL, 200, r#"{}"#);
        let mut page = AgendaPage::mount(&api);
        page.select_date(&api, "2024-06-10").unwrap();
        page.select_professional(&api, Some(RecordId::from("P1")));
        assert_eq!(
            page.view().body,
            Body::Message("Nenhum horário disponível para esta data".to_string())
        );
    }

    #[test]
    fn slot_failure_sets_banner_and_clears() {
        let api = fake::api();
        api.transport()
            .respond(HttpMethod::Get, "/profissionais", 200, PROFESSIONALS)
            .respond(HttpMethod::Get, SLOTS_URL, 502, "gateway");
        let mut page = AgendaPage::mount(&api);
        page.select_professional(&api, Some(RecordId::from("P1")));
        page.select_date(&api, "2024-06-10").unwrap();
        assert_eq!(page.error(), Some("Erro ao carregar horários: HTTP 502 - gateway"));
        assert!(page.slots().is_empty());
    }

    #[test]
    fn clearing_a_selection_clears_slots() {
        let api = fake::api();
        api.transport()
            .respond(HttpMethod::Get, "/profissionais", 200, PROFESSIONALS)
            .respond(
                HttpMethod::Get,
                SLOTS_URL,
                200,
                r#"{"slots":[{"id":1,"hora_inicio":"09:00","disponivel":true}]}"#,
            );
        let mut page = AgendaPage::mount(&api);
        page.select_professional(&api, Some(RecordId::from("P1")));
        page.select_date(&api, "2024-06-10").unwrap();
        assert_eq!(page.slots().len(), 1);

        page.select_date(&api, "").unwrap();
        assert!(page.slots().is_empty());
    }

    #[test]
    fn professional_load_failure_sets_banner() {
        let api = fake::api();
        api.transport().respond(HttpMethod::Get, "/profissionais", 500, "db down");
        let page = AgendaPage::mount(&api);
        assert_eq!(page.error(), Some("Erro ao carregar profissionais: HTTP 500 - db down"));
    }

    #[test]
    fn invalid_date_is_rejected() {
        let api = fake::api();
        let mut page = AgendaPage::mount(&api);
        assert!(page.select_date(&api, "10/06/2024").is_err());
    }
}
