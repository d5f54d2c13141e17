use std::marker::PhantomData;

use tracing::{info, warn};

use crate::draft::{Draft, DraftError};
use crate::resource::Resource;
use crate::service::ApiService;
use crate::transport::Transport;
use crate::types::RecordId;
use crate::view::{Body, Notice, View};

use super::banner;

/// Create/edit form for one record of `R`.
///
/// With an editing id the draft is seeded from the backend and submit
/// updates that record; without one the draft starts from defaults and
/// submit creates a record, then resets the draft.
#[derive(Debug)]
pub struct FormPage<R: Resource> {
    editing_id: Option<RecordId>,
    draft: R::Draft,
    loading: bool,
    error: Option<String>,
    success: Option<String>,
    _resource: PhantomData<R>,
}

impl<R: Resource> FormPage<R> {
    pub fn new(editing_id: Option<RecordId>) -> Self {
        Self {
            editing_id,
            draft: R::Draft::default(),
            loading: false,
            error: None,
            success: None,
            _resource: PhantomData,
        }
    }

    pub fn mount<T: Transport>(api: &ApiService<T>, editing_id: Option<RecordId>) -> Self {
        let mut page = Self::new(editing_id);
        if let Some(id) = page.editing_id.clone() {
            page.load(api, &id);
        }
        page
    }

    fn load<T: Transport>(&mut self, api: &ApiService<T>, id: &RecordId) {
        self.loading = true;
        match api.get::<R>(id) {
            Ok(record) => self.draft = R::seed(&record),
            Err(e) => {
                warn!(resource = R::LABELS.singular, %id, error = %e, "record load failed");
                self.error = Some(banner("Erro ao carregar", R::LABELS.singular, &e));
            }
        }
        self.loading = false;
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), DraftError> {
        self.draft.set_field(name, value)
    }

    /// Validate and send the draft. Returns true when the backend accepted
    /// it. On any failure the draft is left untouched for a retry.
    pub fn submit<T: Transport>(&mut self, api: &ApiService<T>) -> bool {
        self.error = None;
        self.success = None;

        if let Err(e) = self.draft.validate() {
            self.error = Some(e.to_string());
            return false;
        }

        self.loading = true;
        let outcome = match &self.editing_id {
            Some(id) => api.update::<R>(id, &self.draft).map(|_| R::LABELS.updated),
            None => api.create::<R>(&self.draft).map(|_| R::LABELS.created),
        };
        self.loading = false;

        match outcome {
            Ok(message) => {
                info!(resource = R::LABELS.singular, editing = self.editing_id.is_some(), "record saved");
                if self.editing_id.is_none() {
                    self.draft = R::Draft::default();
                }
                self.success = Some(message.to_string());
                true
            }
            Err(e) => {
                self.error = Some(banner("Erro ao salvar", R::LABELS.singular, &e));
                false
            }
        }
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        self.editing_id.as_ref()
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub(crate) fn draft_mut(&mut self) -> &mut R::Draft {
        &mut self.draft
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn view(&self) -> View {
        let (title, submit_label) = match self.editing_id {
            Some(_) => (R::LABELS.edit_title, "Atualizar"),
            None => (R::LABELS.new_title, "Criar"),
        };
        let submit_label = if self.loading { "Salvando..." } else { submit_label };
        let mut view = View::new(
            title,
            Body::Form {
                fields: self.draft.fields(),
                submit_label,
            },
        );
        if let Some(error) = &self.error {
            view.notices.push(Notice::Error(error.clone()));
        }
        if let Some(success) = &self.success {
            view.notices.push(Notice::Success(success.clone()));
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake;
    use crate::http::HttpMethod;
    use crate::resource::{Patients, Professionals};
    use crate::types::{PatientDraft, ProfessionalDraft};

    fn fill_patient(page: &mut FormPage<Patients>) {
        page.set_field("nome", "Ana").unwrap();
        page.set_field("cpf", "111").unwrap();
        page.set_field("data_nascimento", "1990-01-02").unwrap();
    }

    #[test]
    fn new_form_starts_blank() {
        let api = fake::api();
        let page = FormPage::<Patients>::mount(&api, None);
        assert_eq!(page.draft(), &PatientDraft::default());
        assert!(api.transport().requests().is_empty());
        assert_eq!(page.view().title, "Novo Paciente");
    }

    #[test]
    fn create_resets_draft_and_reports_success() {
        let api = fake::api();
        api.transport()
            .respond(HttpMethod::Post, "/pacientes", 201, r#"{"id":5,"nome":"Ana","cpf":"111"}"#);
        let mut page = FormPage::<Patients>::mount(&api, None);
        fill_patient(&mut page);

        assert!(page.submit(&api));
        assert_eq!(page.success(), Some("Paciente criado com sucesso!"));
        assert_eq!(page.draft(), &PatientDraft::default());

        let sent = &api.transport().requests()[0];
        let body: serde_json::Value = serde_json::from_str(sent.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["nome"], "Ana");
    }

    #[test]
    fn edit_seeds_draft_and_updates_same_id() {
        let api = fake::api();
        api.transport()
            .respond(
                HttpMethod::Get,
                "/profissionais/4",
                200,
                r#"{"id":4,"nome":"Dra. Carla","especialidade":"Pediatria","crm":"CRM-1","telefone":null}"#,
            )
            .respond(HttpMethod::Put, "/profissionais/4", 200, r#"{"message":"ok"}"#);
        let mut page = FormPage::<Professionals>::mount(&api, Some(RecordId::Int(4)));
        assert_eq!(page.draft().name, "Dra. Carla");
        assert_eq!(page.draft().phone, "");
        assert_eq!(page.view().title, "Editar Profissional");

        page.set_field("especialidade", "Neonatologia").unwrap();
        assert!(page.submit(&api));
        assert_eq!(page.success(), Some("Profissional atualizado com sucesso!"));
        assert_eq!(page.draft().specialty, "Neonatologia");

        let put = api
            .transport()
            .requests()
            .into_iter()
            .find(|r| r.method == HttpMethod::Put)
            .unwrap();
        let body: serde_json::Value = serde_json::from_str(put.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["especialidade"], "Neonatologia");
        assert_eq!(body["nome"], "Dra. Carla");
    }

    #[test]
    fn failed_save_keeps_draft() {
        let api = fake::api();
        api.transport().respond(HttpMethod::Post, "/pacientes", 400, "CPF já cadastrado");
        let mut page = FormPage::<Patients>::mount(&api, None);
        fill_patient(&mut page);
        let draft = page.draft().clone();

        assert!(!page.submit(&api));
        assert_eq!(
            page.error(),
            Some("Erro ao salvar paciente: HTTP 400 - CPF já cadastrado")
        );
        assert_eq!(page.draft(), &draft);
        assert!(page.success().is_none());
    }

    #[test]
    fn invalid_draft_is_not_sent() {
        let api = fake::api();
        let mut page = FormPage::<Professionals>::mount(&api, None);
        page.set_field("nome", "Dr. Davi").unwrap();

        assert!(!page.submit(&api));
        assert_eq!(page.error(), Some("Campo obrigatório: Especialidade"));
        assert!(api.transport().requests().is_empty());
        assert_eq!(page.draft(), &ProfessionalDraft {
            name: "Dr. Davi".into(),
            ..ProfessionalDraft::default()
        });
    }

    #[test]
    fn load_failure_shows_banner() {
        let api = fake::api();
        api.transport().respond(HttpMethod::Get, "/pacientes/9", 404, "Paciente não encontrado");
        let page = FormPage::<Patients>::mount(&api, Some(RecordId::Int(9)));
        assert_eq!(
            page.view().error(),
            Some("Erro ao carregar paciente: HTTP 404 - Paciente não encontrado")
        );
        assert_eq!(page.draft(), &PatientDraft::default());
    }
}
