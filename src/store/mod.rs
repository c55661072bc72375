//! Record storage behind the booking workflow.
//!
//! The workflow only talks to [`Store`]. [`DbStore`] keeps records in SQLite
//! through diesel, [`MemoryStore`] keeps them in process.

mod db;
mod memory;

pub use self::db::DbStore;
pub use self::memory::MemoryStore;

use crate::models::{
    appointments::{Appointment, AppointmentStatus},
    doctors::Doctor,
    patients::Patient,
    time_slots::TimeSlot,
};
use uuid::Uuid;

/// Predicate for time slot queries. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotFilter {
    pub doctor_id: Option<Uuid>,
    pub is_reserved: Option<bool>,
}

/// Predicate for appointment queries. Unset fields match everything.
#[derive(Debug, Clone, Default)]
pub struct AppointmentFilter {
    pub patient_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    pub slot_ids: Option<Vec<Uuid>>,
}

/// Per-kind record access.
///
/// Listings are ordered: doctors and patients by name, time slots by time,
/// appointments by reservation time. `update_*` and `delete_*` return
/// whether a record with that id existed.
pub trait Store: Send + Sync {
    fn add_doctor(&self, doctor: &Doctor) -> anyhow::Result<()>;
    fn get_doctor(&self, id: Uuid) -> anyhow::Result<Option<Doctor>>;
    fn doctor_exists(&self, id: Uuid) -> anyhow::Result<bool>;
    fn list_doctors(&self) -> anyhow::Result<Vec<Doctor>>;
    fn update_doctor(&self, doctor: &Doctor) -> anyhow::Result<bool>;
    fn delete_doctor(&self, id: Uuid) -> anyhow::Result<bool>;

    fn add_patient(&self, patient: &Patient) -> anyhow::Result<()>;
    fn get_patient(&self, id: Uuid) -> anyhow::Result<Option<Patient>>;
    fn patient_exists(&self, id: Uuid) -> anyhow::Result<bool>;
    fn list_patients(&self) -> anyhow::Result<Vec<Patient>>;
    fn update_patient(&self, patient: &Patient) -> anyhow::Result<bool>;
    fn delete_patient(&self, id: Uuid) -> anyhow::Result<bool>;

    /// Inserts the slot unless its doctor already has one at the same time,
    /// checking and inserting in one step. Returns whether it was inserted.
    fn add_time_slot_unless_clash(&self, slot: &TimeSlot) -> anyhow::Result<bool>;
    fn get_time_slot(&self, id: Uuid) -> anyhow::Result<Option<TimeSlot>>;
    fn find_time_slots(&self, filter: SlotFilter) -> anyhow::Result<Vec<TimeSlot>>;
    fn update_time_slot(&self, slot: &TimeSlot) -> anyhow::Result<bool>;
    fn delete_time_slot(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Flips `is_reserved` from false to true in one step. Returns false if
    /// the slot is missing or already reserved.
    fn reserve_time_slot(&self, id: Uuid) -> anyhow::Result<bool>;
    /// Clears `is_reserved`. Returns false if the slot is missing or was not reserved.
    fn release_time_slot(&self, id: Uuid) -> anyhow::Result<bool>;

    fn add_appointment(&self, appointment: &Appointment) -> anyhow::Result<()>;
    fn get_appointment(&self, id: Uuid) -> anyhow::Result<Option<Appointment>>;
    fn find_appointments(&self, filter: AppointmentFilter) -> anyhow::Result<Vec<Appointment>>;
    fn update_appointment(&self, appointment: &Appointment) -> anyhow::Result<bool>;
    fn delete_appointment(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[cfg(test)]
pub(crate) mod tests {
    //! Behaviour every store has to share, run against both implementations.

    use super::*;
    use chrono::NaiveDate;

    pub fn doctor(name: &str) -> Doctor {
        Doctor {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    pub fn slot(doctor: &Doctor, day: u32) -> TimeSlot {
        TimeSlot {
            id: Uuid::new_v4(),
            time: NaiveDate::from_ymd_opt(2999, 1, day)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            doctor_id: doctor.id,
            doctor_name: doctor.name.clone(),
            is_reserved: false,
            cost: 5.0,
        }
    }

    pub fn appointment(slot: &TimeSlot, patient: &Patient, day: u32) -> Appointment {
        let at = NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Appointment {
            id: Uuid::new_v4(),
            slot_id: slot.id,
            patient_id: patient.id,
            patient_name: patient.name.clone(),
            status: AppointmentStatus::Scheduled,
            reserved_at: at,
            updated_at: at,
        }
    }

    pub fn doctor_round_trip(store: &dyn Store) {
        let mut dr = doctor("Dr. House");
        store.add_doctor(&dr).unwrap();
        assert!(store.doctor_exists(dr.id).unwrap());
        assert_eq!(store.get_doctor(dr.id).unwrap(), Some(dr.clone()));

        dr.name = "Dr. Wilson".to_string();
        assert!(store.update_doctor(&dr).unwrap());
        assert_eq!(store.get_doctor(dr.id).unwrap().unwrap().name, "Dr. Wilson");

        assert!(!store.update_doctor(&doctor("Dr. Nobody")).unwrap());
        assert!(store.delete_doctor(dr.id).unwrap());
        assert!(!store.delete_doctor(dr.id).unwrap());
        assert_eq!(store.get_doctor(dr.id).unwrap(), None);
    }

    pub fn listings_are_ordered(store: &dyn Store) {
        let b = doctor("B");
        let a = doctor("A");
        store.add_doctor(&b).unwrap();
        store.add_doctor(&a).unwrap();
        let names: Vec<_> = store
            .list_doctors()
            .unwrap()
            .into_iter()
            .map(|d| d.name)
            .collect();
        assert_eq!(names, ["A", "B"]);

        let late = slot(&a, 20);
        let early = slot(&a, 3);
        assert!(store.add_time_slot_unless_clash(&late).unwrap());
        assert!(store.add_time_slot_unless_clash(&early).unwrap());
        let ids: Vec<_> = store
            .find_time_slots(SlotFilter::default())
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, [early.id, late.id]);
    }

    pub fn slot_filters(store: &dyn Store) {
        let a = doctor("A");
        let b = doctor("B");
        let a1 = slot(&a, 1);
        let mut a2 = slot(&a, 2);
        a2.is_reserved = true;
        let b1 = slot(&b, 1);
        for s in [&a1, &a2, &b1] {
            assert!(store.add_time_slot_unless_clash(s).unwrap());
        }

        let by_a = store
            .find_time_slots(SlotFilter {
                doctor_id: Some(a.id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_a, vec![a1.clone(), a2.clone()]);

        let free_a = store
            .find_time_slots(SlotFilter {
                doctor_id: Some(a.id),
                is_reserved: Some(false),
            })
            .unwrap();
        assert_eq!(free_a, vec![a1.clone()]);

        let reserved = store
            .find_time_slots(SlotFilter {
                is_reserved: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(reserved, vec![a2]);
    }

    pub fn reservation_is_compare_and_set(store: &dyn Store) {
        let dr = doctor("A");
        let s = slot(&dr, 1);
        assert!(store.add_time_slot_unless_clash(&s).unwrap());

        assert!(store.reserve_time_slot(s.id).unwrap());
        assert!(!store.reserve_time_slot(s.id).unwrap());
        assert!(store.get_time_slot(s.id).unwrap().unwrap().is_reserved);

        assert!(store.release_time_slot(s.id).unwrap());
        assert!(!store.release_time_slot(s.id).unwrap());
        assert!(!store.reserve_time_slot(Uuid::new_v4()).unwrap());
    }

    pub fn clashing_slot_is_not_inserted(store: &dyn Store) {
        let a = doctor("A");
        let b = doctor("B");
        let first = slot(&a, 1);
        assert!(store.add_time_slot_unless_clash(&first).unwrap());
        assert!(!store.add_time_slot_unless_clash(&slot(&a, 1)).unwrap());
        assert!(store.add_time_slot_unless_clash(&slot(&a, 2)).unwrap());
        assert!(store.add_time_slot_unless_clash(&slot(&b, 1)).unwrap());

        let by_a = store
            .find_time_slots(SlotFilter {
                doctor_id: Some(a.id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_a.len(), 2);
        assert_eq!(by_a[0], first);
    }

    pub fn appointment_filters(store: &dyn Store) {
        let dr = doctor("A");
        let jane = Patient {
            id: Uuid::new_v4(),
            name: "Jane".to_string(),
        };
        let joe = Patient {
            id: Uuid::new_v4(),
            name: "Joe".to_string(),
        };
        let s1 = slot(&dr, 1);
        let s2 = slot(&dr, 2);
        let first = appointment(&s1, &jane, 1);
        let mut second = appointment(&s2, &jane, 2);
        second.status = AppointmentStatus::Cancelled;
        let third = appointment(&s2, &joe, 3);
        for a in [&third, &first, &second] {
            store.add_appointment(a).unwrap();
        }

        let janes = store
            .find_appointments(AppointmentFilter {
                patient_id: Some(jane.id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(janes, vec![first.clone(), second.clone()]);

        let scheduled_on_s2 = store
            .find_appointments(AppointmentFilter {
                status: Some(AppointmentStatus::Scheduled),
                slot_ids: Some(vec![s2.id]),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(scheduled_on_s2, vec![third.clone()]);

        let none = store
            .find_appointments(AppointmentFilter {
                slot_ids: Some(Vec::new()),
                ..Default::default()
            })
            .unwrap();
        assert!(none.is_empty());

        let mut updated = third.clone();
        updated.status = AppointmentStatus::Completed;
        assert!(store.update_appointment(&updated).unwrap());
        assert_eq!(store.get_appointment(third.id).unwrap(), Some(updated));
        assert!(store.delete_appointment(first.id).unwrap());
        assert_eq!(store.find_appointments(AppointmentFilter::default()).unwrap().len(), 2);
    }
}
