use uuid::Uuid;

use super::{validate_name, Service};
use crate::{
    error::{ServiceError, ServiceResult},
    models::doctors::Doctor,
    store::SlotFilter,
};

impl Service {
    #[tracing::instrument(name = "Adding a doctor", skip(self))]
    pub fn add_doctor(&self, name: &str) -> ServiceResult<Doctor> {
        let doctor = Doctor {
            id: Uuid::new_v4(),
            name: validate_name(name)?,
        };
        self.store.add_doctor(&doctor)?;
        tracing::info!(doctor_id = %doctor.id, "Doctor added");
        Ok(doctor)
    }

    pub fn get_doctor(&self, id: Uuid) -> ServiceResult<Doctor> {
        self.require_doctor(id)
    }

    pub fn list_doctors(&self) -> ServiceResult<Vec<Doctor>> {
        Ok(self.store.list_doctors()?)
    }

    pub fn doctor_exists(&self, id: Uuid) -> ServiceResult<bool> {
        Ok(self.store.doctor_exists(id)?)
    }

    /// Renames a doctor and refreshes the cached name on each of the doctor's time slots.
    #[tracing::instrument(name = "Renaming a doctor", skip(self))]
    pub fn rename_doctor(&self, id: Uuid, name: &str) -> ServiceResult<Doctor> {
        let name = validate_name(name)?;
        let mut doctor = self.require_doctor(id)?;
        doctor.name = name;
        if !self.store.update_doctor(&doctor)? {
            return Err(ServiceError::NotFound(format!(
                "Doctor with ID \"{}\" not found.",
                id
            )));
        }

        let slots = self.store.find_time_slots(SlotFilter {
            doctor_id: Some(id),
            ..Default::default()
        })?;
        let count = slots.len();
        for mut slot in slots {
            slot.doctor_name = doctor.name.clone();
            self.store.update_time_slot(&slot)?;
        }
        tracing::info!(doctor_id = %id, slots = count, "Doctor renamed");

        Ok(doctor)
    }

    /// Deletes a doctor together with every time slot of that doctor. Returns
    /// the number of slots removed.
    #[tracing::instrument(name = "Deleting a doctor", skip(self))]
    pub fn delete_doctor(&self, id: Uuid) -> ServiceResult<usize> {
        if !self.store.delete_doctor(id)? {
            return Err(ServiceError::NotFound(format!(
                "Doctor with ID \"{}\" not found.",
                id
            )));
        }

        let slots = self.store.find_time_slots(SlotFilter {
            doctor_id: Some(id),
            ..Default::default()
        })?;
        let mut removed = 0;
        for slot in slots {
            if self.store.delete_time_slot(slot.id)? {
                removed += 1;
            }
        }
        tracing::info!(doctor_id = %id, slots = removed, "Doctor deleted");

        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ServiceError, service::tests::service, utils::now};
    use chrono::Duration;

    #[test]
    fn rename_touches_only_that_doctors_slots() {
        let service = service();
        let a = service.add_doctor("Dr. A").unwrap();
        let other = service.add_doctor("Dr. Other").unwrap();
        let t = now() + Duration::hours(1);
        let a1 = service.add_time_slot(a.id, t, None).unwrap();
        let a2 = service.add_time_slot(a.id, t + Duration::hours(1), None).unwrap();
        let o1 = service.add_time_slot(other.id, t, None).unwrap();

        let renamed = service.rename_doctor(a.id, "Dr. B").unwrap();
        assert_eq!(renamed.name, "Dr. B");
        assert_eq!(service.get_doctor(a.id).unwrap().name, "Dr. B");

        for id in [a1.id, a2.id] {
            assert_eq!(service.get_time_slot(id).unwrap().doctor_name, "Dr. B");
        }
        assert_eq!(service.get_time_slot(o1.id).unwrap().doctor_name, "Dr. Other");
    }

    #[test]
    fn rename_rejects_unknown_doctor_and_blank_name() {
        let service = service();
        let a = service.add_doctor("Dr. A").unwrap();
        assert!(matches!(
            service.rename_doctor(uuid::Uuid::new_v4(), "Dr. B"),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.rename_doctor(a.id, " "),
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(service.get_doctor(a.id).unwrap().name, "Dr. A");
    }

    #[test]
    fn delete_cascades_to_own_slots_only() {
        let service = service();
        let a = service.add_doctor("Dr. A").unwrap();
        let other = service.add_doctor("Dr. Other").unwrap();
        let t = now() + Duration::hours(1);
        service.add_time_slot(a.id, t, None).unwrap();
        service.add_time_slot(a.id, t + Duration::hours(2), None).unwrap();
        let kept = service.add_time_slot(other.id, t, None).unwrap();

        assert_eq!(service.delete_doctor(a.id).unwrap(), 2);
        assert!(!service.doctor_exists(a.id).unwrap());

        let remaining = service.list_time_slots(false).unwrap();
        assert_eq!(remaining, vec![kept]);
        assert!(matches!(
            service.delete_doctor(a.id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn add_rejects_blank_name() {
        let service = service();
        assert!(matches!(
            service.add_doctor(""),
            Err(ServiceError::Validation(_))
        ));
        assert!(service.list_doctors().unwrap().is_empty());
    }
}
