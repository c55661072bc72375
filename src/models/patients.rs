use crate::schema::patients;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub name: String,
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = patients)]
pub struct PatientData {
    pub id: String,
    pub name: String,
}

impl From<&Patient> for PatientData {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id.to_string(),
            name: patient.name.clone(),
        }
    }
}

impl TryFrom<PatientData> for Patient {
    type Error = anyhow::Error;

    fn try_from(data: PatientData) -> anyhow::Result<Self> {
        Ok(Self {
            id: Uuid::parse_str(&data.id).context("Malformed patient id")?,
            name: data.name,
        })
    }
}
