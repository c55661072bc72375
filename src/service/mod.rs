//! The booking workflow: business rules over a [`Store`].
//!
//! Every operation is synchronous and runs to completion against the store it
//! was constructed with. Handlers dispatch it through `web::block`.

mod appointments;
mod doctors;
mod patients;
mod time_slots;

use std::sync::Arc;

use crate::{
    error::{ServiceError, ServiceResult},
    models::{doctors::Doctor, patients::Patient},
    store::Store,
};
use uuid::Uuid;

pub struct Service {
    store: Arc<dyn Store>,
}

impl Service {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn require_doctor(&self, id: Uuid) -> ServiceResult<Doctor> {
        self.store
            .get_doctor(id)?
            .ok_or_else(|| ServiceError::NotFound(format!("Doctor with ID \"{}\" not found.", id)))
    }

    fn require_patient(&self, id: Uuid) -> ServiceResult<Patient> {
        self.store.get_patient(id)?.ok_or_else(|| {
            ServiceError::NotFound(format!("Patient with ID \"{}\" not found.", id))
        })
    }
}

fn validate_name(name: &str) -> ServiceResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ServiceError::Validation("Name must not be empty".to_string()));
    }
    Ok(name.to_string())
}
