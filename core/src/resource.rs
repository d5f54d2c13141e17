//! The three backend-owned CRUD entities as type-level descriptors.
//!
//! # Design
//! Patients, professionals and appointments share one contract: a collection
//! path, a record type read back from the backend, and a draft type sent on
//! create/update. `Resource` captures that contract once, so the client,
//! the list page and the form page are each written a single time and
//! instantiated per entity.

use std::fmt;

use serde::de::DeserializeOwned;

use crate::draft::Draft;
use crate::types::{
    Appointment, AppointmentDraft, Patient, PatientDraft, Professional, ProfessionalDraft, RecordId,
};
use crate::view::{format_date, or_dash};

/// User-facing wording of a resource, in the UI's language.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    /// Lower-case plural used in load errors ("pacientes").
    pub plural: &'static str,
    /// Lower-case singular used in delete/save errors ("paciente").
    pub singular: &'static str,
    pub list_title: &'static str,
    pub new_title: &'static str,
    pub edit_title: &'static str,
    pub empty: &'static str,
    pub confirm_delete: &'static str,
    pub created: &'static str,
    pub updated: &'static str,
}

pub trait Resource {
    /// Collection endpoint relative to the API base URL.
    const PATH: &'static str;
    const LABELS: Labels;
    const COLUMNS: &'static [&'static str];

    type Record: DeserializeOwned + Clone + fmt::Debug;
    type Draft: Draft;

    fn id(record: &Self::Record) -> &RecordId;

    /// Initial draft of an edit form.
    fn seed(record: &Self::Record) -> Self::Draft;

    /// Display cells matching `COLUMNS`.
    fn row(record: &Self::Record) -> Vec<String>;
}

#[derive(Debug, Clone, Copy)]
pub struct Patients;

#[derive(Debug, Clone, Copy)]
pub struct Professionals;

#[derive(Debug, Clone, Copy)]
pub struct Appointments;

impl Resource for Patients {
    const PATH: &'static str = "/pacientes";
    const LABELS: Labels = Labels {
        plural: "pacientes",
        singular: "paciente",
        list_title: "Pacientes",
        new_title: "Novo Paciente",
        edit_title: "Editar Paciente",
        empty: "Nenhum paciente cadastrado",
        confirm_delete: "Tem certeza que deseja excluir este paciente?",
        created: "Paciente criado com sucesso!",
        updated: "Paciente atualizado com sucesso!",
    };
    const COLUMNS: &'static [&'static str] = &["Nome", "CPF", "Data Nascimento", "Telefone", "Email"];

    type Record = Patient;
    type Draft = PatientDraft;

    fn id(record: &Patient) -> &RecordId {
        &record.id
    }

    fn seed(record: &Patient) -> PatientDraft {
        PatientDraft::from(record)
    }

    fn row(p: &Patient) -> Vec<String> {
        vec![
            p.name.clone(),
            p.cpf.clone(),
            p.birth_date.as_deref().map(format_date).unwrap_or_default(),
            or_dash(p.phone.as_deref()),
            or_dash(p.email.as_deref()),
        ]
    }
}

impl Resource for Professionals {
    const PATH: &'static str = "/profissionais";
    const LABELS: Labels = Labels {
        plural: "profissionais",
        singular: "profissional",
        list_title: "Profissionais",
        new_title: "Novo Profissional",
        edit_title: "Editar Profissional",
        empty: "Nenhum profissional cadastrado",
        confirm_delete: "Tem certeza que deseja excluir este profissional?",
        created: "Profissional criado com sucesso!",
        updated: "Profissional atualizado com sucesso!",
    };
    const COLUMNS: &'static [&'static str] = &["Nome", "Especialidade", "CRM", "Telefone", "Email"];

    type Record = Professional;
    type Draft = ProfessionalDraft;

    fn id(record: &Professional) -> &RecordId {
        &record.id
    }

    fn seed(record: &Professional) -> ProfessionalDraft {
        ProfessionalDraft::from(record)
    }

    fn row(p: &Professional) -> Vec<String> {
        vec![
            p.name.clone(),
            p.specialty.clone(),
            p.crm.clone(),
            or_dash(p.phone.as_deref()),
            or_dash(p.email.as_deref()),
        ]
    }
}

impl Resource for Appointments {
    const PATH: &'static str = "/consultas";
    const LABELS: Labels = Labels {
        plural: "consultas",
        singular: "consulta",
        list_title: "Consultas",
        new_title: "Nova Consulta",
        edit_title: "Editar Consulta",
        empty: "Nenhuma consulta agendada",
        confirm_delete: "Tem certeza que deseja excluir esta consulta?",
        created: "Consulta criada com sucesso!",
        updated: "Consulta atualizada com sucesso!",
    };
    const COLUMNS: &'static [&'static str] = &["Paciente", "Profissional", "Data", "Hora", "Tipo", "Status"];

    type Record = Appointment;
    type Draft = AppointmentDraft;

    fn id(record: &Appointment) -> &RecordId {
        &record.id
    }

    fn seed(record: &Appointment) -> AppointmentDraft {
        AppointmentDraft::from(record)
    }

    fn row(a: &Appointment) -> Vec<String> {
        let name = |party: &Option<crate::types::PartySummary>| {
            party
                .as_ref()
                .and_then(|p| p.name.clone())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| "N/A".to_string())
        };
        vec![
            name(&a.patient),
            name(&a.professional),
            format_date(&a.date),
            a.time.clone(),
            a.kind.as_str().to_string(),
            a.status.as_str().to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AppointmentKind, AppointmentStatus, PartySummary};

    #[test]
    fn appointment_row_falls_back_to_na() {
        let a = Appointment {
            id: RecordId::Int(1),
            patient_id: Some(RecordId::Int(1)),
            professional_id: None,
            date: "2024-06-10".into(),
            time: "09:00".into(),
            kind: AppointmentKind::Online,
            meeting_link: Some("https://meet.example/x".into()),
            notes: None,
            status: AppointmentStatus::Confirmada,
            patient: Some(PartySummary {
                name: Some("Ana".into()),
                ..PartySummary::default()
            }),
            professional: None,
        };
        assert_eq!(
            Appointments::row(&a),
            vec!["Ana", "N/A", "10/06/2024", "09:00", "online", "confirmada"]
        );
    }

    #[test]
    fn patient_row_dashes_missing_contacts() {
        let p = Patient {
            id: RecordId::Int(1),
            name: "Ana".into(),
            cpf: "123".into(),
            birth_date: Some("1990-01-02".into()),
            phone: None,
            email: Some(String::new()),
        };
        assert_eq!(Patients::row(&p), vec!["Ana", "123", "02/01/1990", "-", "-"]);
    }

    #[test]
    fn columns_match_row_width() {
        assert_eq!(Patients::COLUMNS.len(), 5);
        assert_eq!(Professionals::COLUMNS.len(), 5);
        assert_eq!(Appointments::COLUMNS.len(), 6);
    }
}
