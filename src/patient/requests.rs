use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AddPatientRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePatientRequest {
    pub id: Option<Uuid>,
    pub name: String,
}
