use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AddDoctorRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDoctorRequest {
    pub id: Option<Uuid>,
    pub name: String,
}
