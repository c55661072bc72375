use uuid::Uuid;

use super::{validate_name, Service};
use crate::{
    error::{ServiceError, ServiceResult},
    models::patients::Patient,
    store::AppointmentFilter,
};

impl Service {
    #[tracing::instrument(name = "Adding a patient", skip(self))]
    pub fn add_patient(&self, name: &str) -> ServiceResult<Patient> {
        let patient = Patient {
            id: Uuid::new_v4(),
            name: validate_name(name)?,
        };
        self.store.add_patient(&patient)?;
        tracing::info!(patient_id = %patient.id, "Patient added");
        Ok(patient)
    }

    pub fn get_patient(&self, id: Uuid) -> ServiceResult<Patient> {
        self.require_patient(id)
    }

    pub fn list_patients(&self) -> ServiceResult<Vec<Patient>> {
        Ok(self.store.list_patients()?)
    }

    pub fn patient_exists(&self, id: Uuid) -> ServiceResult<bool> {
        Ok(self.store.patient_exists(id)?)
    }

    /// Renames a patient and refreshes the cached name on each of the patient's appointments.
    #[tracing::instrument(name = "Renaming a patient", skip(self))]
    pub fn rename_patient(&self, id: Uuid, name: &str) -> ServiceResult<Patient> {
        let name = validate_name(name)?;
        let mut patient = self.require_patient(id)?;
        patient.name = name;
        if !self.store.update_patient(&patient)? {
            return Err(ServiceError::NotFound(format!(
                "Patient with ID \"{}\" not found.",
                id
            )));
        }

        let appointments = self.store.find_appointments(AppointmentFilter {
            patient_id: Some(id),
            ..Default::default()
        })?;
        let count = appointments.len();
        for mut appointment in appointments {
            appointment.patient_name = patient.name.clone();
            self.store.update_appointment(&appointment)?;
        }
        tracing::info!(patient_id = %id, appointments = count, "Patient renamed");

        Ok(patient)
    }

    /// Deletes the patient record only; the patient's appointments stay.
    #[tracing::instrument(name = "Deleting a patient", skip(self))]
    pub fn delete_patient(&self, id: Uuid) -> ServiceResult<()> {
        if !self.store.delete_patient(id)? {
            return Err(ServiceError::NotFound(format!(
                "Patient with ID \"{}\" not found.",
                id
            )));
        }
        tracing::info!(patient_id = %id, "Patient deleted");
        Ok(())
    }
}
