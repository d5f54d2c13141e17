use std::marker::PhantomData;

use tracing::warn;

use crate::resource::Resource;
use crate::service::ApiService;
use crate::transport::Transport;
use crate::types::RecordId;
use crate::view::{Body, Notice, Row, Table, View};

use super::{banner, Confirm};

/// Table of every record of `R`, re-fetched in full after each mutation.
#[derive(Debug)]
pub struct ListPage<R: Resource> {
    records: Vec<R::Record>,
    loading: bool,
    error: Option<String>,
    _resource: PhantomData<R>,
}

impl<R: Resource> Default for ListPage<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            loading: true,
            error: None,
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> ListPage<R> {
    pub fn mount<T: Transport>(api: &ApiService<T>) -> Self {
        let mut page = Self::default();
        page.load(api);
        page
    }

    /// Replace the local records with the backend's full collection. On
    /// failure the previous records stay and the error banner is set until
    /// the next successful load.
    pub fn load<T: Transport>(&mut self, api: &ApiService<T>) {
        self.loading = true;
        match api.list::<R>() {
            Ok(records) => {
                self.records = records;
                self.error = None;
            }
            Err(e) => {
                warn!(resource = R::LABELS.plural, error = %e, "list load failed");
                self.error = Some(banner("Erro ao carregar", R::LABELS.plural, &e));
            }
        }
        self.loading = false;
    }

    /// Delete `id` after confirmation, then reload. Returns false when the
    /// user declined, in which case no request is made.
    pub fn delete<T: Transport>(&mut self, api: &ApiService<T>, id: &RecordId, confirm: &mut dyn Confirm) -> bool {
        if !confirm.confirm(R::LABELS.confirm_delete) {
            return false;
        }
        match api.delete::<R>(id) {
            Ok(()) => self.load(api),
            Err(e) => {
                warn!(resource = R::LABELS.singular, %id, error = %e, "delete failed");
                self.error = Some(banner("Erro ao excluir", R::LABELS.singular, &e));
            }
        }
        true
    }

    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> View {
        if self.loading {
            return View::new(R::LABELS.list_title, Body::Loading("Carregando..."));
        }
        let body = if self.records.is_empty() {
            Body::Message(R::LABELS.empty.to_string())
        } else {
            Body::Table(Table {
                columns: R::COLUMNS,
                rows: self
                    .records
                    .iter()
                    .map(|record| Row {
                        id: R::id(record).clone(),
                        cells: R::row(record),
                    })
                    .collect(),
            })
        };
        let mut view = View::new(R::LABELS.list_title, body);
        if let Some(error) = &self.error {
            view.notices.push(Notice::Error(error.clone()));
        }
        view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake;
    use crate::http::HttpMethod;
    use crate::resource::{Appointments, Patients};

    const TWO_PATIENTS: &str = r#"[
        {"id":1,"nome":"Ana","cpf":"111","data_nascimento":"1990-01-02"},
        {"id":2,"nome":"Bruno","cpf":"222","data_nascimento":"1985-05-06","telefone":"(11) 9999-0000"}
    ]"#;

    #[test]
    fn row_count_matches_collection() {
        let api = fake::api();
        api.transport().respond(HttpMethod::Get, "/pacientes", 200, TWO_PATIENTS);
        let page = ListPage::<Patients>::mount(&api);
        let view = page.view();
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.error(), None);
        match view.body {
            Body::Table(table) => assert_eq!(table.rows[1].cells[3], "(11) 9999-0000"),
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn row_with_null_cpf_is_still_listed() {
        let api = fake::api();
        api.transport().respond(
            HttpMethod::Get,
            "/pacientes",
            200,
            r#"[{"id":1,"nome":"Ana","cpf":"111"},{"id":2,"nome":"Bruno","cpf":null}]"#,
        );
        let view = ListPage::<Patients>::mount(&api).view();
        assert_eq!(view.error(), None);
        assert_eq!(view.row_count(), 2);
        match view.body {
            Body::Table(table) => assert_eq!(table.rows[1].cells[1], ""),
            other => panic!("expected table, got {other:?}"),
        }
    }

    #[test]
    fn empty_collection_shows_empty_state() {
        let api = fake::api();
        api.transport().respond(HttpMethod::Get, "/consultas", 200, "[]");
        let view = ListPage::<Appointments>::mount(&api).view();
        assert_eq!(view.body, Body::Message("Nenhuma consulta agendada".to_string()));
        assert_eq!(view.row_count(), 0);
    }

    #[test]
    fn server_error_shows_banner_and_no_rows() {
        let api = fake::api();
        api.transport().respond(HttpMethod::Get, "/pacientes", 500, "db down");
        let page = ListPage::<Patients>::mount(&api);
        let view = page.view();
        assert_eq!(view.row_count(), 0);
        let error = view.error().unwrap();
        assert!(error.starts_with("Erro ao carregar pacientes:"));
        assert!(error.contains("db down"));
    }

    #[test]
    fn banner_clears_on_next_successful_load() {
        let api = fake::api();
        api.transport().respond(HttpMethod::Get, "/pacientes", 500, "db down");
        let mut page = ListPage::<Patients>::mount(&api);
        assert!(page.error().is_some());

        api.transport().respond(HttpMethod::Get, "/pacientes", 200, TWO_PATIENTS);
        page.load(&api);
        assert!(page.error().is_none());
        assert_eq!(page.records().len(), 2);
    }

    #[test]
    fn declined_delete_issues_no_request() {
        let api = fake::api();
        api.transport().respond(HttpMethod::Get, "/pacientes", 200, TWO_PATIENTS);
        let mut page = ListPage::<Patients>::mount(&api);
        let before = api.transport().requests().len();

        let mut asked = Vec::new();
        let mut decline = |msg: &str| {
            asked.push(msg.to_string());
            false
        };
        assert!(!page.delete(&api, &RecordId::Int(1), &mut decline));
        assert_eq!(asked, vec!["Tem certeza que deseja excluir este paciente?"]);
        assert_eq!(api.transport().requests().len(), before);
    }

    #[test]
    fn confirmed_delete_refetches_full_list() {
        let api = fake::api();
        api.transport()
            .respond(HttpMethod::Get, "/pacientes", 200, TWO_PATIENTS)
            .respond(HttpMethod::Delete, "/pacientes/1", 204, "");
        let mut page = ListPage::<Patients>::mount(&api);
        api.transport().respond(
            HttpMethod::Get,
            "/pacientes",
            200,
            r#"[{"id":2,"nome":"Bruno","cpf":"222"}]"#,
        );

        assert!(page.delete(&api, &RecordId::Int(1), &mut |_: &str| true));
        assert_eq!(api.transport().count(HttpMethod::Delete, "/pacientes/1"), 1);
        assert_eq!(api.transport().count(HttpMethod::Get, "/pacientes"), 2);
        assert_eq!(page.records().len(), 1);
        assert_eq!(page.view().row_count(), 1);
    }

    #[test]
    fn failed_delete_keeps_rows_and_reports() {
        let api = fake::api();
        api.transport()
            .respond(HttpMethod::Get, "/pacientes", 200, TWO_PATIENTS)
            .respond(HttpMethod::Delete, "/pacientes/2", 409, "possui consultas");
        let mut page = ListPage::<Patients>::mount(&api);

        assert!(page.delete(&api, &RecordId::Int(2), &mut |_: &str| true));
        assert_eq!(page.records().len(), 2);
        assert_eq!(
            page.error(),
            Some("Erro ao excluir paciente: HTTP 409 - possui consultas")
        );
        assert_eq!(api.transport().count(HttpMethod::Get, "/pacientes"), 1);
    }

    #[test]
    fn unmounted_page_renders_loading() {
        let page = ListPage::<Patients>::default();
        assert_eq!(page.view().body, Body::Loading("Carregando..."));
    }
}
