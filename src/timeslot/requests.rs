use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::time_slots::TimeSlotPatch;

#[derive(Debug, Deserialize)]
pub struct AddTimeSlotRequest {
    pub time: String,
    /// chrono format string for `time`; the wire format when absent.
    pub format: Option<String>,
    pub cost: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimeSlotRequest {
    pub id: Option<Uuid>,
    #[serde(default, with = "crate::utils::wire_time::option")]
    pub time: Option<NaiveDateTime>,
    pub doctor_id: Option<Uuid>,
    pub is_reserved: Option<bool>,
    pub cost: Option<f64>,
}

impl From<UpdateTimeSlotRequest> for TimeSlotPatch {
    fn from(req: UpdateTimeSlotRequest) -> Self {
        Self {
            time: req.time,
            doctor_id: req.doctor_id,
            is_reserved: req.is_reserved,
            cost: req.cost,
        }
    }
}
