use crate::schema::doctors;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
}

#[derive(Queryable, Insertable)]
#[diesel(table_name = doctors)]
pub struct DoctorData {
    pub id: String,
    pub name: String,
}

impl From<&Doctor> for DoctorData {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.to_string(),
            name: doctor.name.clone(),
        }
    }
}

impl TryFrom<DoctorData> for Doctor {
    type Error = anyhow::Error;

    fn try_from(data: DoctorData) -> anyhow::Result<Self> {
        Ok(Self {
            id: Uuid::parse_str(&data.id).context("Malformed doctor id")?,
            name: data.name,
        })
    }
}
