//! Form-side behavior of the editable field sets.
//!
//! Validation here mirrors the input guards of the original forms (required
//! markers, date/time inputs). The backend stays authoritative; these checks
//! only keep obviously incomplete drafts from being sent.

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;
use thiserror::Error;

use crate::types::{
    AppointmentDraft, AppointmentKind, AppointmentStatus, PatientDraft, ProfessionalDraft, RecordId,
};
use crate::view::{Choice, Field, Input};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DraftError {
    #[error("Campo obrigatório: {0}")]
    Required(&'static str),

    #[error("Valor inválido para {field}: {value}")]
    Invalid { field: &'static str, value: String },

    #[error("Campo desconhecido: {0}")]
    UnknownField(String),
}

/// An editable record as held by a form page.
pub trait Draft: Serialize + Default + Clone + fmt::Debug {
    /// Field descriptors in display order.
    fn fields(&self) -> Vec<Field>;

    /// Assign a field by its wire name. Empty values clear the field.
    fn set_field(&mut self, name: &str, value: &str) -> Result<(), DraftError>;

    fn validate(&self) -> Result<(), DraftError>;
}

fn require(label: &'static str, value: &str) -> Result<(), DraftError> {
    if value.trim().is_empty() {
        return Err(DraftError::Required(label));
    }
    Ok(())
}

fn date_value(field: &'static str, value: &str) -> Result<String, DraftError> {
    let value = value.trim();
    if !value.is_empty() && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err(DraftError::Invalid {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

fn time_value(field: &'static str, value: &str) -> Result<String, DraftError> {
    let value = value.trim();
    let parses = |fmt: &str| NaiveTime::parse_from_str(value, fmt).is_ok();
    if !value.is_empty() && !parses("%H:%M") && !parses("%H:%M:%S") {
        return Err(DraftError::Invalid {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}

fn optional_id(value: &str) -> Option<RecordId> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse().ok()
}

impl Draft for PatientDraft {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("nome", "Nome", &self.name, Input::Text).required(),
            Field::new("cpf", "CPF", &self.cpf, Input::Text).required(),
            Field::new("data_nascimento", "Data de Nascimento", &self.birth_date, Input::Date).required(),
            Field::new("telefone", "Telefone", &self.phone, Input::Text),
            Field::new("email", "Email", &self.email, Input::Text),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), DraftError> {
        match name {
            "nome" => self.name = value.to_string(),
            "cpf" => self.cpf = value.to_string(),
            "data_nascimento" => self.birth_date = date_value("data_nascimento", value)?,
            "telefone" => self.phone = value.to_string(),
            "email" => self.email = value.to_string(),
            other => return Err(DraftError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), DraftError> {
        require("Nome", &self.name)?;
        require("CPF", &self.cpf)?;
        require("Data de Nascimento", &self.birth_date)
    }
}

impl Draft for ProfessionalDraft {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::new("nome", "Nome", &self.name, Input::Text).required(),
            Field::new("especialidade", "Especialidade", &self.specialty, Input::Text).required(),
            Field::new("crm", "CRM", &self.crm, Input::Text).required(),
            Field::new("telefone", "Telefone", &self.phone, Input::Text),
            Field::new("email", "Email", &self.email, Input::Text),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), DraftError> {
        match name {
            "nome" => self.name = value.to_string(),
            "especialidade" => self.specialty = value.to_string(),
            "crm" => self.crm = value.to_string(),
            "telefone" => self.phone = value.to_string(),
            "email" => self.email = value.to_string(),
            other => return Err(DraftError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), DraftError> {
        require("Nome", &self.name)?;
        require("Especialidade", &self.specialty)?;
        require("CRM", &self.crm)
    }
}

impl Draft for AppointmentDraft {
    /// Patient and professional selectors carry no choices here; the
    /// appointment form page fills them from its loaded collections.
    fn fields(&self) -> Vec<Field> {
        let id_text = |id: &Option<RecordId>| id.as_ref().map(ToString::to_string).unwrap_or_default();
        vec![
            Field::new("paciente_id", "Paciente", id_text(&self.patient_id), Input::Select(Vec::new())).required(),
            Field::new(
                "profissional_id",
                "Profissional",
                id_text(&self.professional_id),
                Input::Select(Vec::new()),
            )
            .required(),
            Field::new("data", "Data", &self.date, Input::Date).required(),
            Field::new("hora", "Horário", &self.time, Input::Time).required(),
            Field::new(
                "tipo",
                "Tipo",
                self.kind.as_str(),
                Input::Select(vec![
                    Choice::new("presencial", "Presencial"),
                    Choice::new("online", "Online"),
                ]),
            )
            .required(),
            Field::new("link_meet", "Link do Meet", &self.meeting_link, Input::Text).required(),
            Field::new(
                "status",
                "Status",
                self.status.as_str(),
                Input::Select(
                    AppointmentStatus::ALL
                        .iter()
                        .map(|s| Choice::new(s.as_str(), capitalize(s.as_str())))
                        .collect(),
                ),
            ),
            Field::new("observacoes", "Observações", &self.notes, Input::TextArea),
        ]
    }

    fn set_field(&mut self, name: &str, value: &str) -> Result<(), DraftError> {
        match name {
            "paciente_id" => self.patient_id = optional_id(value),
            "profissional_id" => self.professional_id = optional_id(value),
            "data" => self.date = date_value("data", value)?,
            "hora" => self.time = time_value("hora", value)?,
            "tipo" => {
                self.kind = value
                    .trim()
                    .parse::<AppointmentKind>()
                    .map_err(|value| DraftError::Invalid { field: "tipo", value })?
            }
            "link_meet" => self.meeting_link = value.to_string(),
            "observacoes" => self.notes = value.to_string(),
            "status" => {
                self.status = value
                    .trim()
                    .parse::<AppointmentStatus>()
                    .map_err(|value| DraftError::Invalid { field: "status", value })?
            }
            other => return Err(DraftError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), DraftError> {
        if self.patient_id.is_none() {
            return Err(DraftError::Required("Paciente"));
        }
        if self.professional_id.is_none() {
            return Err(DraftError::Required("Profissional"));
        }
        require("Data", &self.date)?;
        require("Horário", &self.time)?;
        if self.kind == AppointmentKind::Online {
            require("Link do Meet", &self.meeting_link)?;
        }
        Ok(())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_appointment() -> AppointmentDraft {
        let mut draft = AppointmentDraft::default();
        draft.set_field("paciente_id", "1").unwrap();
        draft.set_field("profissional_id", "2").unwrap();
        draft.set_field("data", "2024-06-10").unwrap();
        draft.set_field("hora", "09:00").unwrap();
        draft
    }

    #[test]
    fn online_appointment_requires_meeting_link() {
        let mut draft = complete_appointment();
        draft.set_field("tipo", "online").unwrap();
        assert_eq!(draft.validate(), Err(DraftError::Required("Link do Meet")));

        draft.set_field("link_meet", "https://meet.example/abc").unwrap();
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn in_person_appointment_ignores_meeting_link() {
        let mut draft = complete_appointment();
        assert_eq!(draft.validate(), Ok(()));
        draft.set_field("link_meet", "anything at all").unwrap();
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn appointment_ids_parse_and_clear() {
        let mut draft = complete_appointment();
        assert_eq!(draft.patient_id, Some(RecordId::Int(1)));
        draft.set_field("paciente_id", "").unwrap();
        assert_eq!(draft.patient_id, None);
        assert_eq!(draft.validate(), Err(DraftError::Required("Paciente")));
    }

    #[test]
    fn invalid_kind_and_time_are_rejected() {
        let mut draft = AppointmentDraft::default();
        assert!(matches!(
            draft.set_field("tipo", "telefone"),
            Err(DraftError::Invalid { field: "tipo", .. })
        ));
        assert!(matches!(
            draft.set_field("hora", "9h"),
            Err(DraftError::Invalid { field: "hora", .. })
        ));
        assert_eq!(draft.kind, AppointmentKind::Presencial);
    }

    #[test]
    fn free_time_accepts_optional_seconds() {
        let mut draft = AppointmentDraft::default();
        draft.set_field("hora", "14:30:00").unwrap();
        assert_eq!(draft.time, "14:30:00");
        draft.set_field("hora", "14:45").unwrap();
        assert_eq!(draft.time, "14:45");
    }

    #[test]
    fn patient_requires_name_cpf_and_birth_date() {
        let mut draft = PatientDraft::default();
        assert_eq!(draft.validate(), Err(DraftError::Required("Nome")));
        draft.set_field("nome", "Ana").unwrap();
        draft.set_field("cpf", "123.456.789-00").unwrap();
        assert_eq!(draft.validate(), Err(DraftError::Required("Data de Nascimento")));
        draft.set_field("data_nascimento", "1990-01-02").unwrap();
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn patient_birth_date_must_be_iso() {
        let mut draft = PatientDraft::default();
        assert!(draft.set_field("data_nascimento", "02/01/1990").is_err());
    }

    #[test]
    fn professional_rejects_unknown_field() {
        let mut draft = ProfessionalDraft::default();
        assert_eq!(
            draft.set_field("cpf", "1"),
            Err(DraftError::UnknownField("cpf".to_string()))
        );
    }

    #[test]
    fn appointment_fields_list_status_choices() {
        let fields = AppointmentDraft::default().fields();
        let status = fields.iter().find(|f| f.name == "status").unwrap();
        assert_eq!(status.value, "agendada");
        match &status.input {
            Input::Select(choices) => assert_eq!(choices.len(), 4),
            other => panic!("unexpected input {other:?}"),
        }
    }
}
