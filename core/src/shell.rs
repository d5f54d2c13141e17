//! Navigation state machine and the App Shell that drives it.
//!
//! # Design
//! `Navigator` is the pure state: current page and editing id, with one
//! method per transition. `Shell` is its only writer. After every
//! transition the shell mounts a fresh page for the new state, so page
//! state never outlives navigation.

use std::fmt;

use crate::pages::{AgendaPage, AppointmentFormPage, Confirm, FormPage, ListPage, PageError};
use crate::resource::{Appointments, Patients, Professionals};
use crate::service::ApiService;
use crate::transport::Transport;
use crate::types::RecordId;
use crate::view::View;

/// Top-level navigation tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Patients,
    Professionals,
    Appointments,
    Agenda,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Patients, Tab::Professionals, Tab::Appointments, Tab::Agenda];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Patients => "Pacientes",
            Tab::Professionals => "Profissionais",
            Tab::Appointments => "Consultas",
            Tab::Agenda => "Agenda",
        }
    }

    /// The list (or agenda) page a tab opens.
    pub fn page(&self) -> Page {
        match self {
            Tab::Patients => Page::Patients,
            Tab::Professionals => Page::Professionals,
            Tab::Appointments => Page::Appointments,
            Tab::Agenda => Page::Agenda,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Patients,
    PatientForm,
    Professionals,
    ProfessionalForm,
    Appointments,
    AppointmentForm,
    Agenda,
}

impl Page {
    pub fn key(&self) -> &'static str {
        match self {
            Page::Patients => "pacientes",
            Page::PatientForm => "pacientes-form",
            Page::Professionals => "profissionais",
            Page::ProfessionalForm => "profissionais-form",
            Page::Appointments => "consultas",
            Page::AppointmentForm => "consultas-form",
            Page::Agenda => "agenda",
        }
    }

    /// Unknown keys fall back to the patients list.
    pub fn from_key(key: &str) -> Page {
        match key {
            "pacientes-form" => Page::PatientForm,
            "profissionais" => Page::Professionals,
            "profissionais-form" => Page::ProfessionalForm,
            "consultas" => Page::Appointments,
            "consultas-form" => Page::AppointmentForm,
            "agenda" => Page::Agenda,
            _ => Page::Patients,
        }
    }

    pub fn tab(&self) -> Tab {
        match self {
            Page::Patients | Page::PatientForm => Tab::Patients,
            Page::Professionals | Page::ProfessionalForm => Tab::Professionals,
            Page::Appointments | Page::AppointmentForm => Tab::Appointments,
            Page::Agenda => Tab::Agenda,
        }
    }

    /// Form reachable from this list page.
    fn form(&self) -> Option<Page> {
        match self {
            Page::Patients => Some(Page::PatientForm),
            Page::Professionals => Some(Page::ProfessionalForm),
            Page::Appointments => Some(Page::AppointmentForm),
            _ => None,
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, Page::PatientForm | Page::ProfessionalForm | Page::AppointmentForm)
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    page: Page,
    editing_id: Option<RecordId>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            page: Page::Patients,
            editing_id: None,
        }
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        self.editing_id.as_ref()
    }

    /// Always allowed; lands on the tab's list and drops any edit.
    pub fn select_tab(&mut self, tab: Tab) {
        self.page = tab.page();
        self.editing_id = None;
    }

    pub fn new_record(&mut self) -> Result<(), PageError> {
        let form = self.page.form().ok_or_else(|| unsupported(self.page, "new"))?;
        self.page = form;
        Ok(())
    }

    pub fn edit(&mut self, id: RecordId) -> Result<(), PageError> {
        let form = self.page.form().ok_or_else(|| unsupported(self.page, "edit"))?;
        self.editing_id = Some(id);
        self.page = form;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), PageError> {
        if !self.page.is_form() {
            return Err(unsupported(self.page, "cancel"));
        }
        self.page = self.page.tab().page();
        self.editing_id = None;
        Ok(())
    }
}

/// The page currently mounted by the shell.
#[derive(Debug)]
pub enum ActivePage {
    Patients(ListPage<Patients>),
    PatientForm(FormPage<Patients>),
    Professionals(ListPage<Professionals>),
    ProfessionalForm(FormPage<Professionals>),
    Appointments(ListPage<Appointments>),
    AppointmentForm(AppointmentFormPage),
    Agenda(AgendaPage),
}

impl ActivePage {
    pub fn mount<T: Transport>(api: &ApiService<T>, nav: &Navigator) -> Self {
        let editing_id = nav.editing_id().cloned();
        match nav.page() {
            Page::Patients => ActivePage::Patients(ListPage::mount(api)),
            Page::PatientForm => ActivePage::PatientForm(FormPage::mount(api, editing_id)),
            Page::Professionals => ActivePage::Professionals(ListPage::mount(api)),
            Page::ProfessionalForm => ActivePage::ProfessionalForm(FormPage::mount(api, editing_id)),
            Page::Appointments => ActivePage::Appointments(ListPage::mount(api)),
            Page::AppointmentForm => ActivePage::AppointmentForm(AppointmentFormPage::mount(api, editing_id)),
            Page::Agenda => ActivePage::Agenda(AgendaPage::mount(api)),
        }
    }

    pub fn view(&self) -> View {
        match self {
            ActivePage::Patients(page) => page.view(),
            ActivePage::PatientForm(page) => page.view(),
            ActivePage::Professionals(page) => page.view(),
            ActivePage::ProfessionalForm(page) => page.view(),
            ActivePage::Appointments(page) => page.view(),
            ActivePage::AppointmentForm(page) => page.view(),
            ActivePage::Agenda(page) => page.view(),
        }
    }
}

fn unsupported(page: Page, action: &'static str) -> PageError {
    PageError::Unsupported {
        action,
        page: page.key(),
    }
}

/// App Shell: owns the API service, the navigator and the mounted page, and
/// routes user actions to that page only.
pub struct Shell<T: Transport> {
    api: ApiService<T>,
    nav: Navigator,
    active: ActivePage,
}

impl<T: Transport> Shell<T> {
    /// Starts on the patients list, mounted immediately.
    pub fn new(api: ApiService<T>) -> Self {
        let nav = Navigator::new();
        let active = ActivePage::mount(&api, &nav);
        Self { api, nav, active }
    }

    fn remount(&mut self) {
        tracing::debug!(page = %self.nav.page(), editing = ?self.nav.editing_id(), "mounting page");
        self.active = ActivePage::mount(&self.api, &self.nav);
    }

    pub fn page(&self) -> Page {
        self.nav.page()
    }

    pub fn editing_id(&self) -> Option<&RecordId> {
        self.nav.editing_id()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.nav
    }

    pub fn active(&self) -> &ActivePage {
        &self.active
    }

    pub fn api(&self) -> &ApiService<T> {
        &self.api
    }

    pub fn view(&self) -> View {
        self.active.view()
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.nav.select_tab(tab);
        self.remount();
    }

    pub fn new_record(&mut self) -> Result<(), PageError> {
        self.nav.new_record()?;
        self.remount();
        Ok(())
    }

    pub fn edit(&mut self, id: RecordId) -> Result<(), PageError> {
        self.nav.edit(id)?;
        self.remount();
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), PageError> {
        self.nav.cancel()?;
        self.remount();
        Ok(())
    }

    /// Re-mount the current page, re-fetching everything it shows.
    pub fn refresh(&mut self) {
        self.remount();
    }

    /// Delete from the mounted list page. `Ok(false)` means the user declined.
    pub fn delete(&mut self, id: &RecordId, confirm: &mut dyn Confirm) -> Result<bool, PageError> {
        let (api, page) = (&self.api, self.nav.page());
        match &mut self.active {
            ActivePage::Patients(page) => Ok(page.delete(api, id, confirm)),
            ActivePage::Professionals(page) => Ok(page.delete(api, id, confirm)),
            ActivePage::Appointments(page) => Ok(page.delete(api, id, confirm)),
            _ => Err(unsupported(page, "delete")),
        }
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), PageError> {
        let (api, page) = (&self.api, self.nav.page());
        match &mut self.active {
            ActivePage::PatientForm(page) => Ok(page.set_field(name, value)?),
            ActivePage::ProfessionalForm(page) => Ok(page.set_field(name, value)?),
            ActivePage::AppointmentForm(page) => page.set_field(api, name, value),
            _ => Err(unsupported(page, "set")),
        }
    }

    /// Submit the mounted form. `Ok(false)` means validation or the backend
    /// rejected it; the reason is in the page's error banner.
    pub fn submit(&mut self) -> Result<bool, PageError> {
        let (api, page) = (&self.api, self.nav.page());
        match &mut self.active {
            ActivePage::PatientForm(page) => Ok(page.submit(api)),
            ActivePage::ProfessionalForm(page) => Ok(page.submit(api)),
            ActivePage::AppointmentForm(page) => Ok(page.submit(api)),
            _ => Err(unsupported(page, "submit")),
        }
    }

    pub fn select_professional(&mut self, professional_id: Option<RecordId>) -> Result<(), PageError> {
        let (api, page) = (&self.api, self.nav.page());
        match &mut self.active {
            ActivePage::Agenda(page) => {
                page.select_professional(api, professional_id);
                Ok(())
            }
            _ => Err(unsupported(page, "professional")),
        }
    }

    pub fn select_date(&mut self, date: &str) -> Result<(), PageError> {
        let (api, page) = (&self.api, self.nav.page());
        match &mut self.active {
            ActivePage::Agenda(page) => Ok(page.select_date(api, date)?),
            _ => Err(unsupported(page, "date")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{self, ScriptedTransport};
    use crate::http::HttpMethod;

    #[test]
    fn unknown_key_falls_back_to_patients() {
        assert_eq!(Page::from_key("relatorios"), Page::Patients);
        for page in [
            Page::Patients,
            Page::PatientForm,
            Page::Professionals,
            Page::ProfessionalForm,
            Page::Appointments,
            Page::AppointmentForm,
            Page::Agenda,
        ] {
            assert_eq!(Page::from_key(page.key()), page);
        }
    }

    #[test]
    fn edit_sets_id_and_cancel_clears_it() {
        let mut nav = Navigator::new();
        nav.select_tab(Tab::Professionals);
        nav.edit(RecordId::Int(3)).unwrap();
        assert_eq!(nav.page(), Page::ProfessionalForm);
        assert_eq!(nav.editing_id(), Some(&RecordId::Int(3)));

        nav.cancel().unwrap();
        assert_eq!(nav.page(), Page::Professionals);
        assert_eq!(nav.editing_id(), None);
    }

    #[test]
    fn tab_switch_from_form_clears_editing_id() {
        let mut nav = Navigator::new();
        nav.edit(RecordId::Int(1)).unwrap();
        nav.select_tab(Tab::Appointments);
        assert_eq!(nav.editing_id(), None);

        nav.new_record().unwrap();
        assert_eq!(nav.page(), Page::AppointmentForm);
        assert_eq!(nav.editing_id(), None);
    }

    #[test]
    fn undefined_transitions_leave_state_untouched() {
        let mut nav = Navigator::new();
        assert!(nav.cancel().is_err());

        nav.select_tab(Tab::Agenda);
        let before = nav.clone();
        assert_eq!(
            nav.new_record(),
            Err(PageError::Unsupported { action: "new", page: "agenda" })
        );
        assert!(nav.edit(RecordId::Int(1)).is_err());
        assert_eq!(nav, before);

        nav.select_tab(Tab::Patients);
        nav.new_record().unwrap();
        assert!(nav.new_record().is_err());
        assert_eq!(nav.page(), Page::PatientForm);
    }

    fn shell() -> Shell<ScriptedTransport> {
        let api = fake::api();
        api.transport()
            .respond(HttpMethod::Get, "/pacientes", 200, r#"[{"id":1,"nome":"Ana","cpf":"111"}]"#)
            .respond(HttpMethod::Get, "/pacientes/1", 200, r#"{"id":1,"nome":"Ana","cpf":"111"}"#)
            .respond(HttpMethod::Get, "/profissionais", 200, "[]")
            .respond(HttpMethod::Get, "/consultas", 200, "[]");
        Shell::new(api)
    }

    #[test]
    fn shell_starts_on_mounted_patient_list() {
        let shell = shell();
        assert_eq!(shell.page(), Page::Patients);
        assert_eq!(shell.view().row_count(), 1);
        assert_eq!(shell.api().transport().count(HttpMethod::Get, "/pacientes"), 1);
    }

    #[test]
    fn edit_mounts_seeded_form_and_new_after_cancel_is_blank() {
        let mut shell = shell();
        shell.edit(RecordId::Int(1)).unwrap();
        assert_eq!(shell.page(), Page::PatientForm);
        let view = shell.view();
        assert_eq!(view.title, "Editar Paciente");
        assert_eq!(view.field("nome").unwrap().value, "Ana");

        shell.cancel().unwrap();
        assert_eq!(shell.editing_id(), None);
        shell.new_record().unwrap();
        let view = shell.view();
        assert_eq!(view.title, "Novo Paciente");
        assert_eq!(view.field("nome").unwrap().value, "");
    }

    #[test]
    fn actions_are_routed_to_the_mounted_page_only() {
        let mut shell = shell();
        assert!(matches!(shell.submit(), Err(PageError::Unsupported { action: "submit", .. })));
        assert!(shell.select_date("2024-06-10").is_err());

        shell.select_tab(Tab::Agenda);
        assert!(shell.delete(&RecordId::Int(1), &mut |_: &str| true).is_err());
        assert!(shell.select_date("2024-06-10").is_ok());
    }

    #[test]
    fn shell_submit_updates_with_editing_id() {
        let mut shell = shell();
        shell
            .api()
            .transport()
            .respond(HttpMethod::Put, "/pacientes/1", 200, r#"{"id":1,"nome":"Ana Maria","cpf":"111"}"#);
        shell.edit(RecordId::Int(1)).unwrap();
        shell.set_field("nome", "Ana Maria").unwrap();
        shell.set_field("data_nascimento", "1990-01-02").unwrap();
        assert_eq!(shell.submit(), Ok(true));
        assert_eq!(shell.view().success(), Some("Paciente atualizado com sucesso!"));
        assert_eq!(shell.api().transport().count(HttpMethod::Put, "/pacientes/1"), 1);
        assert_eq!(shell.api().transport().count(HttpMethod::Post, "/pacientes"), 0);
    }
}
