use crate::schema::appointments;
use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "Scheduled",
            AppointmentStatus::Completed => "Completed",
            AppointmentStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        [
            AppointmentStatus::Scheduled,
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
        ]
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
        .ok_or_else(|| anyhow::anyhow!("Unknown appointment status '{}'", s))
    }
}

/// Accepts any casing of the status name.
impl<'de> Deserialize<'de> for AppointmentStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A patient's booking of a time slot. `patient_name` caches the patient's current name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub patient_id: Uuid,
    pub patient_name: String,
    pub status: AppointmentStatus,
    #[serde(with = "crate::utils::wire_time")]
    pub reserved_at: NaiveDateTime,
    #[serde(with = "crate::utils::wire_time")]
    pub updated_at: NaiveDateTime,
}

/// Fields of an appointment that an update may overwrite. `updated_at` is always refreshed.
#[derive(Debug, Clone, Default)]
pub struct AppointmentPatch {
    pub slot_id: Option<Uuid>,
    pub patient_id: Option<Uuid>,
    pub reserved_at: Option<NaiveDateTime>,
    pub status: Option<AppointmentStatus>,
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = appointments)]
pub struct AppointmentData {
    pub id: String,
    pub slot_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub status: String,
    pub reserved_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&Appointment> for AppointmentData {
    fn from(appointment: &Appointment) -> Self {
        Self {
            id: appointment.id.to_string(),
            slot_id: appointment.slot_id.to_string(),
            patient_id: appointment.patient_id.to_string(),
            patient_name: appointment.patient_name.clone(),
            status: appointment.status.as_str().to_string(),
            reserved_at: appointment.reserved_at,
            updated_at: appointment.updated_at,
        }
    }
}

impl TryFrom<AppointmentData> for Appointment {
    type Error = anyhow::Error;

    fn try_from(data: AppointmentData) -> anyhow::Result<Self> {
        Ok(Self {
            id: Uuid::parse_str(&data.id).context("Malformed appointment id")?,
            slot_id: Uuid::parse_str(&data.slot_id).context("Malformed time slot id")?,
            patient_id: Uuid::parse_str(&data.patient_id).context("Malformed patient id")?,
            patient_name: data.patient_name,
            status: data.status.parse()?,
            reserved_at: data.reserved_at,
            updated_at: data.updated_at,
        })
    }
}
