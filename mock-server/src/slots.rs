//! Slot calendar: derived per (professional, date), never stored.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::handlers::{check_date, ApiResult};
use crate::models::{Slot, SlotList, SlotQuery, Store};
use crate::Db;

/// First slot of the day, in minutes after midnight (08:00).
pub const DAY_START_MINUTES: u32 = 8 * 60;
/// Day end, exclusive (18:00); the last slot starts at 17:30.
pub const DAY_END_MINUTES: u32 = 18 * 60;
pub const SLOT_MINUTES: u32 = 30;

/// Every slot of the day, unavailable where a non-cancelled appointment of
/// the professional already holds that start time.
pub fn day_slots(store: &Store, profissional_id: i64, data: &str) -> Vec<Slot> {
    (DAY_START_MINUTES..DAY_END_MINUTES)
        .step_by(SLOT_MINUTES as usize)
        .enumerate()
        .map(|(i, minutes)| {
            let hora_inicio = format!("{:02}:{:02}", minutes / 60, minutes % 60);
            let taken = store.consultas.values().any(|c| {
                c.profissional_id == profissional_id
                    && c.data == data
                    && c.hora == hora_inicio
                    && c.status != "cancelada"
            });
            Slot {
                id: i as i64 + 1,
                hora_inicio,
                disponivel: !taken,
            }
        })
        .collect()
}

pub async fn list_slots(State(db): State<Db>, Query(query): Query<SlotQuery>) -> ApiResult<Json<SlotList>> {
    check_date(&query.data)?;
    let store = db.read().await;
    if !store.profissionais.contains_key(&query.profissional_id) {
        return Err((StatusCode::NOT_FOUND, "Profissional não encontrado".to_string()));
    }
    Ok(Json(SlotList {
        slots: day_slots(&store, query.profissional_id, &query.data),
    }))
}

/// Reserved endpoint: the document is accepted and kept as-is, nothing is
/// derived from it.
pub async fn create_slots(
    State(db): State<Db>,
    Json(payload): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    db.write().await.slot_requests.push(payload.clone());
    (StatusCode::CREATED, Json(payload))
}
