use crate::schema::time_slots;
use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_COST: f64 = 5.0;

/// A bookable window of a doctor. `doctor_name` caches the doctor's current name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    #[serde(with = "crate::utils::wire_time")]
    pub time: NaiveDateTime,
    pub doctor_id: Uuid,
    pub doctor_name: String,
    pub is_reserved: bool,
    pub cost: f64,
}

/// Fields of a time slot that an update may overwrite. `None` leaves the field as is.
#[derive(Debug, Clone, Default)]
pub struct TimeSlotPatch {
    pub time: Option<NaiveDateTime>,
    pub doctor_id: Option<Uuid>,
    pub is_reserved: Option<bool>,
    pub cost: Option<f64>,
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = time_slots)]
pub struct TimeSlotData {
    pub id: String,
    pub time: NaiveDateTime,
    pub doctor_id: String,
    pub doctor_name: String,
    pub is_reserved: bool,
    pub cost: f64,
}

impl From<&TimeSlot> for TimeSlotData {
    fn from(slot: &TimeSlot) -> Self {
        Self {
            id: slot.id.to_string(),
            time: slot.time,
            doctor_id: slot.doctor_id.to_string(),
            doctor_name: slot.doctor_name.clone(),
            is_reserved: slot.is_reserved,
            cost: slot.cost,
        }
    }
}

impl TryFrom<TimeSlotData> for TimeSlot {
    type Error = anyhow::Error;

    fn try_from(data: TimeSlotData) -> anyhow::Result<Self> {
        Ok(Self {
            id: Uuid::parse_str(&data.id).context("Malformed time slot id")?,
            time: data.time,
            doctor_id: Uuid::parse_str(&data.doctor_id).context("Malformed doctor id")?,
            doctor_name: data.doctor_name,
            is_reserved: data.is_reserved,
            cost: data.cost,
        })
    }
}
