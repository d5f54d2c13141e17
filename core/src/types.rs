//! Domain DTOs for the scheduling API.
//!
//! # Design
//! Wire names follow the backend contract (Portuguese field names); Rust
//! field names are English and mapped with `#[serde(rename)]`. Records are
//! what the backend returns, drafts are what forms edit and send back.
//! The mock-server crate defines its own copies; integration tests catch
//! schema drift between the two.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier. The contract does not fix a representation, so both
/// JSON numbers and strings are accepted and echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    /// Numeric input becomes `Int`, anything else is kept as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(id) => RecordId::Int(id),
            Err(_) => RecordId::Text(s.to_string()),
        })
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId::Int(id)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        RecordId::Text(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Display text the backend may send as null or leave out; both read as "".
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: RecordId,
    #[serde(rename = "nome", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cpf: String,
    #[serde(rename = "data_nascimento", default)]
    pub birth_date: Option<String>,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Professional {
    pub id: RecordId,
    #[serde(rename = "nome", default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(rename = "especialidade", default, deserialize_with = "null_as_empty")]
    pub specialty: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub crm: String,
    #[serde(rename = "telefone", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Patient or professional summary embedded by the backend in appointment reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartySummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "nome", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(rename = "especialidade", default, skip_serializing_if = "Option::is_none")]
    pub specialty: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentKind {
    #[default]
    Presencial,
    Online,
}

impl AppointmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentKind::Presencial => "presencial",
            AppointmentKind::Online => "online",
        }
    }
}

impl FromStr for AppointmentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "presencial" => Ok(AppointmentKind::Presencial),
            "online" => Ok(AppointmentKind::Online),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    #[default]
    Agendada,
    Confirmada,
    Cancelada,
    Realizada,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Agendada,
        AppointmentStatus::Confirmada,
        AppointmentStatus::Cancelada,
        AppointmentStatus::Realizada,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Agendada => "agendada",
            AppointmentStatus::Confirmada => "confirmada",
            AppointmentStatus::Cancelada => "cancelada",
            AppointmentStatus::Realizada => "realizada",
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppointmentStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: RecordId,
    #[serde(rename = "paciente_id", default)]
    pub patient_id: Option<RecordId>,
    #[serde(rename = "profissional_id", default)]
    pub professional_id: Option<RecordId>,
    #[serde(rename = "data", default, deserialize_with = "null_as_empty")]
    pub date: String,
    #[serde(rename = "hora", default, deserialize_with = "null_as_empty")]
    pub time: String,
    #[serde(rename = "tipo", default)]
    pub kind: AppointmentKind,
    #[serde(rename = "link_meet", default)]
    pub meeting_link: Option<String>,
    #[serde(rename = "observacoes", default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: AppointmentStatus,
    #[serde(rename = "paciente", default, skip_serializing_if = "Option::is_none")]
    pub patient: Option<PartySummary>,
    #[serde(rename = "profissional", default, skip_serializing_if = "Option::is_none")]
    pub professional: Option<PartySummary>,
}

/// One time unit of a professional's day, computed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub id: RecordId,
    #[serde(rename = "hora_inicio")]
    pub start: String,
    #[serde(rename = "disponivel")]
    pub available: bool,
}

/// Envelope of the slot query. A missing `slots` key reads as no slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotList {
    #[serde(default)]
    pub slots: Vec<Slot>,
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// Editable field set of a patient form, sent verbatim on create/update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientDraft {
    #[serde(rename = "nome")]
    pub name: String,
    pub cpf: String,
    #[serde(rename = "data_nascimento")]
    pub birth_date: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub email: String,
}

impl From<&Patient> for PatientDraft {
    fn from(p: &Patient) -> Self {
        Self {
            name: p.name.clone(),
            cpf: p.cpf.clone(),
            birth_date: p.birth_date.clone().unwrap_or_default(),
            phone: p.phone.clone().unwrap_or_default(),
            email: p.email.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfessionalDraft {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "especialidade")]
    pub specialty: String,
    pub crm: String,
    #[serde(rename = "telefone")]
    pub phone: String,
    pub email: String,
}

impl From<&Professional> for ProfessionalDraft {
    fn from(p: &Professional) -> Self {
        Self {
            name: p.name.clone(),
            specialty: p.specialty.clone(),
            crm: p.crm.clone(),
            phone: p.phone.clone().unwrap_or_default(),
            email: p.email.clone().unwrap_or_default(),
        }
    }
}

/// Editable field set of an appointment form. The default shape is an
/// in-person appointment with status `agendada`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentDraft {
    #[serde(rename = "paciente_id")]
    pub patient_id: Option<RecordId>,
    #[serde(rename = "profissional_id")]
    pub professional_id: Option<RecordId>,
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "tipo")]
    pub kind: AppointmentKind,
    #[serde(rename = "link_meet")]
    pub meeting_link: String,
    #[serde(rename = "observacoes")]
    pub notes: String,
    pub status: AppointmentStatus,
}

impl From<&Appointment> for AppointmentDraft {
    fn from(a: &Appointment) -> Self {
        Self {
            patient_id: a.patient_id.clone(),
            professional_id: a.professional_id.clone(),
            date: a.date.clone(),
            time: a.time.clone(),
            kind: a.kind,
            meeting_link: a.meeting_link.clone().unwrap_or_default(),
            notes: a.notes.clone().unwrap_or_default(),
            status: a.status,
        }
    }
}
