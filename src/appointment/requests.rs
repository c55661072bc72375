use chrono::NaiveDateTime;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::appointments::{AppointmentPatch, AppointmentStatus};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAppointmentRequest {
    pub patient_id: Uuid,
    pub slot_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAppointmentRequest {
    pub id: Option<Uuid>,
    pub slot_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    #[serde(default, with = "crate::utils::wire_time::option")]
    pub reserved_at: Option<NaiveDateTime>,
    pub status: Option<AppointmentStatus>,
}

impl From<UpdateAppointmentRequest> for AppointmentPatch {
    fn from(req: UpdateAppointmentRequest) -> Self {
        Self {
            slot_id: req.slot_id,
            patient_id: req.patient_id,
            reserved_at: req.reserved_at,
            status: req.status,
        }
    }
}
