use chrono::NaiveDateTime;
use uuid::Uuid;

use super::Service;
use crate::{
    error::{ServiceError, ServiceResult},
    models::time_slots::{TimeSlot, TimeSlotPatch, DEFAULT_COST},
    store::SlotFilter,
    utils::{format_time_str, now},
};

fn validate_cost(cost: f64) -> ServiceResult<f64> {
    let rounded = (cost * 100.0).round() / 100.0;
    if !rounded.is_finite() || rounded < 0.0 {
        return Err(ServiceError::Validation(format!(
            "Cost must be a non-negative amount, got {}",
            cost
        )));
    }
    Ok(rounded)
}

impl Service {
    /// Opens a new slot for a doctor. The time must lie in the future and must
    /// not coincide with another slot of the same doctor.
    #[tracing::instrument(name = "Adding a time slot", skip(self))]
    pub fn add_time_slot(
        &self,
        doctor_id: Uuid,
        time: NaiveDateTime,
        cost: Option<f64>,
    ) -> ServiceResult<TimeSlot> {
        let doctor = self.require_doctor(doctor_id)?;

        if time <= now() {
            return Err(ServiceError::Validation(
                "The time slot must be in the future.".to_string(),
            ));
        }
        let cost = validate_cost(cost.unwrap_or(DEFAULT_COST))?;

        let slot = TimeSlot {
            id: Uuid::new_v4(),
            time,
            doctor_id,
            doctor_name: doctor.name,
            is_reserved: false,
            cost,
        };
        if !self.store.add_time_slot_unless_clash(&slot)? {
            return Err(ServiceError::Conflict(format!(
                "A time slot already exists at {} for doctor \"{}\".",
                format_time_str(&time),
                doctor_id
            )));
        }
        tracing::info!(slot_id = %slot.id, "Time slot added");

        Ok(slot)
    }

    pub fn get_time_slot(&self, id: Uuid) -> ServiceResult<TimeSlot> {
        self.store.get_time_slot(id)?.ok_or_else(|| {
            ServiceError::NotFound(format!("Time slot with ID \"{}\" not found.", id))
        })
    }

    /// Every slot, or only unreserved ones when `available_only` is set.
    pub fn list_time_slots(&self, available_only: bool) -> ServiceResult<Vec<TimeSlot>> {
        Ok(self.store.find_time_slots(SlotFilter {
            doctor_id: None,
            is_reserved: if available_only { Some(false) } else { None },
        })?)
    }

    /// Slots of one doctor, optionally narrowed by reservation state.
    pub fn doctor_time_slots(
        &self,
        doctor_id: Uuid,
        is_reserved: Option<bool>,
    ) -> ServiceResult<Vec<TimeSlot>> {
        if !self.store.doctor_exists(doctor_id)? {
            return Err(ServiceError::NotFound(format!(
                "Doctor with ID \"{}\" does not exist.",
                doctor_id
            )));
        }
        Ok(self.store.find_time_slots(SlotFilter {
            doctor_id: Some(doctor_id),
            is_reserved,
        })?)
    }

    /// Applies the supplied fields to a slot. A new doctor refreshes the
    /// cached doctor name. Times are not re-checked for clashes here.
    #[tracing::instrument(name = "Updating a time slot", skip(self))]
    pub fn update_time_slot(&self, id: Uuid, patch: TimeSlotPatch) -> ServiceResult<TimeSlot> {
        let mut slot = self.get_time_slot(id)?;

        if let Some(time) = patch.time {
            slot.time = time;
        }
        if let Some(doctor_id) = patch.doctor_id {
            let doctor = self.store.get_doctor(doctor_id)?.ok_or_else(|| {
                ServiceError::Validation(format!("Doctor with ID \"{}\" not found.", doctor_id))
            })?;
            slot.doctor_id = doctor.id;
            slot.doctor_name = doctor.name;
        }
        if let Some(is_reserved) = patch.is_reserved {
            slot.is_reserved = is_reserved;
        }
        if let Some(cost) = patch.cost {
            slot.cost = validate_cost(cost)?;
        }

        if !self.store.update_time_slot(&slot)? {
            return Err(ServiceError::NotFound(format!(
                "Time slot with ID \"{}\" not found.",
                id
            )));
        }
        tracing::info!(slot_id = %id, "Time slot updated");

        Ok(slot)
    }

    #[tracing::instrument(name = "Deleting a time slot", skip(self))]
    pub fn delete_time_slot(&self, id: Uuid) -> ServiceResult<()> {
        if !self.store.delete_time_slot(id)? {
            return Err(ServiceError::NotFound(format!(
                "Time slot with ID \"{}\" not found.",
                id
            )));
        }
        tracing::info!(slot_id = %id, "Time slot deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        service::tests::service,
        store::{DbStore, MemoryStore, Store},
    };
    use chrono::{Duration, NaiveDate};
    use std::sync::{Arc, Barrier};

    fn future() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2999, 6, 1)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap()
    }

    #[test]
    fn new_slot_copies_doctor_name_and_defaults() {
        let service = service();
        let doctor = service.add_doctor("Dr. Smith").unwrap();
        let slot = service.add_time_slot(doctor.id, future(), None).unwrap();

        assert_eq!(slot.doctor_id, doctor.id);
        assert_eq!(slot.doctor_name, "Dr. Smith");
        assert!(!slot.is_reserved);
        assert_eq!(slot.cost, DEFAULT_COST);
        assert_eq!(service.get_time_slot(slot.id).unwrap(), slot);
    }

    #[test]
    fn duplicate_time_conflicts_for_same_doctor_only() {
        let service = service();
        let a = service.add_doctor("Dr. A").unwrap();
        let b = service.add_doctor("Dr. B").unwrap();
        service.add_time_slot(a.id, future(), Some(10.0)).unwrap();

        assert!(matches!(
            service.add_time_slot(a.id, future(), Some(10.0)),
            Err(ServiceError::Conflict(_))
        ));
        assert!(service.add_time_slot(b.id, future(), Some(10.0)).is_ok());
        assert_eq!(service.doctor_time_slots(a.id, None).unwrap().len(), 1);
    }

    #[test]
    fn past_time_is_rejected() {
        let service = service();
        let doctor = service.add_doctor("Dr. A").unwrap();
        assert!(matches!(
            service.add_time_slot(doctor.id, now() - Duration::hours(1), None),
            Err(ServiceError::Validation(_))
        ));
        assert!(service.list_time_slots(false).unwrap().is_empty());
    }

    #[test]
    fn unknown_doctor_is_not_found() {
        let service = service();
        assert!(matches!(
            service.add_time_slot(Uuid::new_v4(), future(), None),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.doctor_time_slots(Uuid::new_v4(), Some(false)),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn cost_is_validated_and_rounded() {
        let service = service();
        let doctor = service.add_doctor("Dr. A").unwrap();
        assert!(matches!(
            service.add_time_slot(doctor.id, future(), Some(-1.0)),
            Err(ServiceError::Validation(_))
        ));
        let slot = service
            .add_time_slot(doctor.id, future(), Some(12.346))
            .unwrap();
        assert_eq!(slot.cost, 12.35);
    }

    #[test]
    fn cost_overflowing_on_rounding_is_rejected() {
        let service = service();
        let doctor = service.add_doctor("Dr. A").unwrap();
        for cost in [1e307, f64::MAX, f64::INFINITY, f64::NAN] {
            assert!(matches!(
                service.add_time_slot(doctor.id, future(), Some(cost)),
                Err(ServiceError::Validation(_))
            ));
        }
        let slot = service.add_time_slot(doctor.id, future(), None).unwrap();
        assert!(matches!(
            service.update_time_slot(
                slot.id,
                TimeSlotPatch {
                    cost: Some(1e307),
                    ..Default::default()
                }
            ),
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(service.get_time_slot(slot.id).unwrap().cost, DEFAULT_COST);
    }

    fn race_for_one_time(store: Arc<dyn Store>) {
        let service = Arc::new(Service::new(store));
        let doctor = service.add_doctor("Dr. A").unwrap();

        for round in 0..20 {
            let time = future() + Duration::days(round);
            let barrier = Arc::new(Barrier::new(8));
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let service = Arc::clone(&service);
                    let barrier = Arc::clone(&barrier);
                    std::thread::spawn(move || {
                        barrier.wait();
                        service.add_time_slot(doctor.id, time, None)
                    })
                })
                .collect();
            let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            assert!(results
                .iter()
                .filter_map(|r| r.as_ref().err())
                .all(|err| matches!(err, ServiceError::Conflict(_))));
        }
        assert_eq!(service.doctor_time_slots(doctor.id, None).unwrap().len(), 20);
    }

    #[test]
    fn concurrent_adds_at_one_time_yield_one_slot() {
        race_for_one_time(Arc::new(MemoryStore::new()));
    }

    #[test]
    fn concurrent_adds_at_one_time_yield_one_slot_on_sqlite() {
        let pool = crate::database::build_pool(":memory:", 1).unwrap();
        race_for_one_time(Arc::new(DbStore::new(pool)));
    }

    #[test]
    fn update_moves_slot_to_another_doctor() {
        let service = service();
        let a = service.add_doctor("Dr. A").unwrap();
        let b = service.add_doctor("Dr. B").unwrap();
        let slot = service.add_time_slot(a.id, future(), None).unwrap();

        let updated = service
            .update_time_slot(
                slot.id,
                TimeSlotPatch {
                    doctor_id: Some(b.id),
                    cost: Some(7.5),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.doctor_id, b.id);
        assert_eq!(updated.doctor_name, "Dr. B");
        assert_eq!(updated.cost, 7.5);
        assert_eq!(updated.time, slot.time);
        assert_eq!(service.doctor_time_slots(b.id, None).unwrap(), vec![updated]);

        assert!(matches!(
            service.update_time_slot(
                slot.id,
                TimeSlotPatch {
                    doctor_id: Some(Uuid::new_v4()),
                    ..Default::default()
                }
            ),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn available_and_reserved_views_split_on_flag() {
        let service = service();
        let doctor = service.add_doctor("Dr. A").unwrap();
        let free = service.add_time_slot(doctor.id, future(), None).unwrap();
        let taken = service
            .add_time_slot(doctor.id, future() + Duration::hours(1), None)
            .unwrap();
        let taken = service
            .update_time_slot(
                taken.id,
                TimeSlotPatch {
                    is_reserved: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(service.list_time_slots(true).unwrap(), vec![free.clone()]);
        assert_eq!(
            service.doctor_time_slots(doctor.id, Some(false)).unwrap(),
            vec![free]
        );
        assert_eq!(
            service.doctor_time_slots(doctor.id, Some(true)).unwrap(),
            vec![taken]
        );
    }

    #[test]
    fn delete_reports_missing_slot() {
        let service = service();
        let doctor = service.add_doctor("Dr. A").unwrap();
        let slot = service.add_time_slot(doctor.id, future(), None).unwrap();
        service.delete_time_slot(slot.id).unwrap();
        assert!(matches!(
            service.delete_time_slot(slot.id),
            Err(ServiceError::NotFound(_))
        ));
    }
}
