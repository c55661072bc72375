use uuid::Uuid;

use super::Service;
use crate::{
    error::{ServiceError, ServiceResult},
    models::appointments::{Appointment, AppointmentPatch, AppointmentStatus},
    store::{AppointmentFilter, SlotFilter},
    utils::now,
};

impl Service {
    /// Books a free slot for a patient.
    ///
    /// The slot is claimed with a compare-and-set on its reservation flag
    /// before the appointment is written, so two concurrent bookings of the
    /// same slot cannot both succeed. If writing the appointment fails the
    /// slot is released again.
    #[tracing::instrument(name = "Booking an appointment", skip(self))]
    pub fn create_appointment(&self, patient_id: Uuid, slot_id: Uuid) -> ServiceResult<Appointment> {
        let patient = self.require_patient(patient_id)?;
        let slot = self.get_time_slot(slot_id)?;

        let already_reserved = || {
            ServiceError::Conflict(format!(
                "Time slot with ID \"{}\" is already reserved.",
                slot_id
            ))
        };
        if slot.is_reserved {
            return Err(already_reserved());
        }
        if !self.store.reserve_time_slot(slot_id)? {
            tracing::warn!(slot_id = %slot_id, "Lost reservation race");
            return Err(already_reserved());
        }

        let timestamp = now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            slot_id,
            patient_id,
            patient_name: patient.name,
            status: AppointmentStatus::Scheduled,
            reserved_at: timestamp,
            updated_at: timestamp,
        };
        if let Err(err) = self.store.add_appointment(&appointment) {
            if let Err(release_err) = self.store.release_time_slot(slot_id) {
                tracing::error!(slot_id = %slot_id, error = ?release_err, "Failed to release time slot");
            }
            return Err(err.into());
        }
        tracing::info!(appointment_id = %appointment.id, "Appointment booked");

        Ok(appointment)
    }

    pub fn get_appointment(&self, id: Uuid) -> ServiceResult<Appointment> {
        self.store.get_appointment(id)?.ok_or_else(|| {
            ServiceError::NotFound(format!("Appointment with ID \"{}\" not found.", id))
        })
    }

    pub fn list_appointments(&self) -> ServiceResult<Vec<Appointment>> {
        Ok(self.store.find_appointments(AppointmentFilter::default())?)
    }

    pub fn patient_appointments(&self, patient_id: Uuid) -> ServiceResult<Vec<Appointment>> {
        self.require_patient(patient_id)?;
        Ok(self.store.find_appointments(AppointmentFilter {
            patient_id: Some(patient_id),
            ..Default::default()
        })?)
    }

    /// Scheduled appointments on any of the doctor's slots.
    pub fn upcoming_doctor_appointments(&self, doctor_id: Uuid) -> ServiceResult<Vec<Appointment>> {
        self.require_doctor(doctor_id)?;
        let slot_ids: Vec<Uuid> = self
            .store
            .find_time_slots(SlotFilter {
                doctor_id: Some(doctor_id),
                ..Default::default()
            })?
            .into_iter()
            .map(|slot| slot.id)
            .collect();
        if slot_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.find_appointments(AppointmentFilter {
            status: Some(AppointmentStatus::Scheduled),
            slot_ids: Some(slot_ids),
            ..Default::default()
        })?)
    }

    /// Applies the supplied fields and stamps `updated_at`. Referenced slot
    /// and patient must exist; a new patient refreshes the cached name.
    /// Reservation flags of the old and new slot are left untouched.
    #[tracing::instrument(name = "Updating an appointment", skip(self))]
    pub fn update_appointment(
        &self,
        id: Uuid,
        patch: AppointmentPatch,
    ) -> ServiceResult<Appointment> {
        let mut appointment = self.get_appointment(id)?;

        if let Some(slot_id) = patch.slot_id {
            if self.store.get_time_slot(slot_id)?.is_none() {
                return Err(ServiceError::Validation(format!(
                    "Invalid time slot ID \"{}\".",
                    slot_id
                )));
            }
            appointment.slot_id = slot_id;
        }
        if let Some(patient_id) = patch.patient_id {
            let patient = self.store.get_patient(patient_id)?.ok_or_else(|| {
                ServiceError::Validation(format!("Invalid patient ID \"{}\".", patient_id))
            })?;
            appointment.patient_id = patient.id;
            appointment.patient_name = patient.name;
        }
        if let Some(reserved_at) = patch.reserved_at {
            appointment.reserved_at = reserved_at;
        }
        if let Some(status) = patch.status {
            appointment.status = status;
        }
        appointment.updated_at = now();

        if !self.store.update_appointment(&appointment)? {
            return Err(ServiceError::NotFound(format!(
                "Appointment with ID \"{}\" not found.",
                id
            )));
        }
        tracing::info!(appointment_id = %id, status = %appointment.status, "Appointment updated");

        Ok(appointment)
    }

    /// Removes the appointment. Its slot stays reserved.
    #[tracing::instrument(name = "Deleting an appointment", skip(self))]
    pub fn delete_appointment(&self, id: Uuid) -> ServiceResult<()> {
        if !self.store.delete_appointment(id)? {
            return Err(ServiceError::NotFound(format!(
                "Appointment with ID \"{}\" not found.",
                id
            )));
        }
        tracing::info!(appointment_id = %id, "Appointment deleted");
        Ok(())
    }
}
