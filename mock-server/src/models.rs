//! Wire types of the scheduling backend as the mock stores and serves them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub data_nascimento: Option<String>,
    pub telefone: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PatientInput {
    pub nome: String,
    pub cpf: String,
    #[serde(default)]
    pub data_nascimento: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Professional {
    pub id: i64,
    pub nome: String,
    pub especialidade: String,
    pub crm: String,
    pub telefone: Option<String>,
    pub email: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProfessionalInput {
    pub nome: String,
    pub especialidade: String,
    pub crm: String,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Appointment {
    pub id: i64,
    pub paciente_id: i64,
    pub profissional_id: i64,
    pub data: String,
    pub hora: String,
    pub tipo: String,
    pub link_meet: Option<String>,
    pub observacoes: Option<String>,
    pub status: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AppointmentInput {
    pub paciente_id: Option<i64>,
    pub profissional_id: Option<i64>,
    pub data: String,
    pub hora: String,
    #[serde(default = "default_kind")]
    pub tipo: String,
    #[serde(default)]
    pub link_meet: Option<String>,
    #[serde(default)]
    pub observacoes: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_kind() -> String {
    "presencial".to_string()
}

fn default_status() -> String {
    "agendada".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatientSummary {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfessionalSummary {
    pub id: i64,
    pub nome: String,
    pub especialidade: String,
}

/// Appointment as read back: the stored row plus resolved summaries.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub consulta: Appointment,
    pub paciente: Option<PatientSummary>,
    pub profissional: Option<ProfessionalSummary>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Slot {
    pub id: i64,
    pub hora_inicio: String,
    pub disponivel: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotList {
    pub slots: Vec<Slot>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SlotQuery {
    pub profissional_id: i64,
    pub data: String,
}

/// In-memory state of the mock. One id sequence is shared by all tables.
#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    pub pacientes: BTreeMap<i64, Patient>,
    pub profissionais: BTreeMap<i64, Professional>,
    pub consultas: BTreeMap<i64, Appointment>,
    /// Documents posted to the reserved slot-creation endpoint, kept verbatim.
    pub slot_requests: Vec<serde_json::Value>,
}

impl Store {
    pub fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn view(&self, consulta: &Appointment) -> AppointmentView {
        AppointmentView {
            consulta: consulta.clone(),
            paciente: self.pacientes.get(&consulta.paciente_id).map(|p| PatientSummary {
                id: p.id,
                nome: p.nome.clone(),
                cpf: p.cpf.clone(),
            }),
            profissional: self.profissionais.get(&consulta.profissional_id).map(|p| ProfessionalSummary {
                id: p.id,
                nome: p.nome.clone(),
                especialidade: p.especialidade.clone(),
            }),
        }
    }
}

/// Blank optional strings are stored as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
