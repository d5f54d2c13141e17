//! CRUD handlers for patients, professionals and appointments.
//!
//! Errors are plain-text bodies with the status code, the way the real
//! backend reports them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use crate::models::{
    non_blank, Appointment, AppointmentInput, AppointmentView, Patient, PatientInput, Professional,
    ProfessionalInput, Store,
};
use crate::Db;

pub type Rejection = (StatusCode, String);
pub type ApiResult<T> = Result<T, Rejection>;

pub(crate) fn bad_request(message: impl Into<String>) -> Rejection {
    (StatusCode::BAD_REQUEST, message.into())
}

fn not_found(message: &str) -> Rejection {
    (StatusCode::NOT_FOUND, message.to_string())
}

fn conflict(message: &str) -> Rejection {
    (StatusCode::CONFLICT, message.to_string())
}

pub(crate) fn check_date(value: &str) -> ApiResult<()> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| bad_request(format!("data inválida: {value}")))
}

fn check_time(value: &str) -> ApiResult<()> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| bad_request(format!("hora inválida: {value}")))
}

fn required(value: &str, field: &str) -> ApiResult<()> {
    if value.trim().is_empty() {
        return Err(bad_request(format!("{field} é obrigatório")));
    }
    Ok(())
}

// --- pacientes ---

fn patient_from(id: i64, input: PatientInput) -> ApiResult<Patient> {
    required(&input.nome, "nome")?;
    required(&input.cpf, "cpf")?;
    let data_nascimento = non_blank(input.data_nascimento);
    if let Some(date) = &data_nascimento {
        check_date(date)?;
    }
    Ok(Patient {
        id,
        nome: input.nome,
        cpf: input.cpf,
        data_nascimento,
        telefone: non_blank(input.telefone),
        email: non_blank(input.email),
    })
}

pub async fn list_patients(State(db): State<Db>) -> Json<Vec<Patient>> {
    let store = db.read().await;
    Json(store.pacientes.values().cloned().collect())
}

pub async fn create_patient(
    State(db): State<Db>,
    Json(input): Json<PatientInput>,
) -> ApiResult<(StatusCode, Json<Patient>)> {
    let mut store = db.write().await;
    let id = store.next_id();
    let patient = patient_from(id, input)?;
    store.pacientes.insert(id, patient.clone());
    info!(id, "paciente criado");
    Ok((StatusCode::CREATED, Json(patient)))
}

pub async fn get_patient(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Patient>> {
    let store = db.read().await;
    store
        .pacientes
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Paciente não encontrado"))
}

pub async fn update_patient(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<PatientInput>,
) -> ApiResult<Json<Patient>> {
    let mut store = db.write().await;
    if !store.pacientes.contains_key(&id) {
        return Err(not_found("Paciente não encontrado"));
    }
    let patient = patient_from(id, input)?;
    store.pacientes.insert(id, patient.clone());
    Ok(Json(patient))
}

pub async fn delete_patient(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if store.consultas.values().any(|c| c.paciente_id == id) {
        return Err(conflict("Paciente possui consultas"));
    }
    store
        .pacientes
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("Paciente não encontrado"))
}

// --- profissionais ---

fn professional_from(id: i64, input: ProfessionalInput) -> ApiResult<Professional> {
    required(&input.nome, "nome")?;
    required(&input.especialidade, "especialidade")?;
    required(&input.crm, "crm")?;
    Ok(Professional {
        id,
        nome: input.nome,
        especialidade: input.especialidade,
        crm: input.crm,
        telefone: non_blank(input.telefone),
        email: non_blank(input.email),
    })
}

pub async fn list_professionals(State(db): State<Db>) -> Json<Vec<Professional>> {
    let store = db.read().await;
    Json(store.profissionais.values().cloned().collect())
}

pub async fn create_professional(
    State(db): State<Db>,
    Json(input): Json<ProfessionalInput>,
) -> ApiResult<(StatusCode, Json<Professional>)> {
    let mut store = db.write().await;
    let id = store.next_id();
    let professional = professional_from(id, input)?;
    store.profissionais.insert(id, professional.clone());
    info!(id, "profissional criado");
    Ok((StatusCode::CREATED, Json(professional)))
}

pub async fn get_professional(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Professional>> {
    let store = db.read().await;
    store
        .profissionais
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Profissional não encontrado"))
}

pub async fn update_professional(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ProfessionalInput>,
) -> ApiResult<Json<Professional>> {
    let mut store = db.write().await;
    if !store.profissionais.contains_key(&id) {
        return Err(not_found("Profissional não encontrado"));
    }
    let professional = professional_from(id, input)?;
    store.profissionais.insert(id, professional.clone());
    Ok(Json(professional))
}

pub async fn delete_professional(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    if store.consultas.values().any(|c| c.profissional_id == id) {
        return Err(conflict("Profissional possui consultas"));
    }
    store
        .profissionais
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("Profissional não encontrado"))
}

// --- consultas ---

const KINDS: [&str; 2] = ["presencial", "online"];
const STATUSES: [&str; 4] = ["agendada", "confirmada", "cancelada", "realizada"];

/// Validate an appointment against the store. `id` is excluded from the
/// double-booking check so an update may keep its own time.
fn appointment_from(store: &Store, id: i64, input: AppointmentInput) -> ApiResult<Appointment> {
    let paciente_id = input.paciente_id.ok_or_else(|| bad_request("paciente_id é obrigatório"))?;
    let profissional_id = input
        .profissional_id
        .ok_or_else(|| bad_request("profissional_id é obrigatório"))?;
    if !store.pacientes.contains_key(&paciente_id) {
        return Err(bad_request(format!("paciente {paciente_id} não existe")));
    }
    if !store.profissionais.contains_key(&profissional_id) {
        return Err(bad_request(format!("profissional {profissional_id} não existe")));
    }
    check_date(&input.data)?;
    check_time(&input.hora)?;
    if !KINDS.contains(&input.tipo.as_str()) {
        return Err(bad_request(format!("tipo inválido: {}", input.tipo)));
    }
    if !STATUSES.contains(&input.status.as_str()) {
        return Err(bad_request(format!("status inválido: {}", input.status)));
    }
    let link_meet = non_blank(input.link_meet);
    if input.tipo == "online" && link_meet.is_none() {
        return Err(bad_request("link_meet é obrigatório para consultas online"));
    }
    let taken = store.consultas.values().any(|c| {
        c.id != id
            && c.profissional_id == profissional_id
            && c.data == input.data
            && c.hora == input.hora
            && c.status != "cancelada"
    });
    if taken && input.status != "cancelada" {
        return Err(conflict("Horário indisponível"));
    }

    Ok(Appointment {
        id,
        paciente_id,
        profissional_id,
        data: input.data,
        hora: input.hora,
        tipo: input.tipo,
        link_meet,
        observacoes: non_blank(input.observacoes),
        status: input.status,
    })
}

pub async fn list_appointments(State(db): State<Db>) -> Json<Vec<AppointmentView>> {
    let store = db.read().await;
    Json(store.consultas.values().map(|c| store.view(c)).collect())
}

pub async fn create_appointment(
    State(db): State<Db>,
    Json(input): Json<AppointmentInput>,
) -> ApiResult<(StatusCode, Json<AppointmentView>)> {
    let mut store = db.write().await;
    let id = store.next_id();
    let consulta = appointment_from(&store, id, input)?;
    store.consultas.insert(id, consulta.clone());
    info!(id, profissional = consulta.profissional_id, data = %consulta.data, hora = %consulta.hora, "consulta criada");
    Ok((StatusCode::CREATED, Json(store.view(&consulta))))
}

pub async fn get_appointment(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<AppointmentView>> {
    let store = db.read().await;
    store
        .consultas
        .get(&id)
        .map(|c| Json(store.view(c)))
        .ok_or_else(|| not_found("Consulta não encontrada"))
}

pub async fn update_appointment(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<AppointmentInput>,
) -> ApiResult<Json<AppointmentView>> {
    let mut store = db.write().await;
    if !store.consultas.contains_key(&id) {
        return Err(not_found("Consulta não encontrada"));
    }
    let consulta = appointment_from(&store, id, input)?;
    store.consultas.insert(id, consulta.clone());
    Ok(Json(store.view(&consulta)))
}

pub async fn delete_appointment(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .consultas
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("Consulta não encontrada"))
}
