use std::sync::{Mutex, MutexGuard};

use uuid::Uuid;

use super::{AppointmentFilter, SlotFilter, Store};
use crate::models::{
    appointments::Appointment, doctors::Doctor, patients::Patient, time_slots::TimeSlot,
};

#[derive(Default)]
struct Tables {
    doctors: Vec<Doctor>,
    patients: Vec<Patient>,
    time_slots: Vec<TimeSlot>,
    appointments: Vec<Appointment>,
}

/// [`Store`] holding every record in process. All tables share one lock, so
/// each call is atomic with respect to the others.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> anyhow::Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| anyhow::anyhow!("Memory store lock poisoned"))
    }
}

fn replace<T, F>(records: &mut [T], record: &T, same: F) -> bool
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    match records.iter_mut().find(|r| same(r)) {
        Some(existing) => {
            *existing = record.clone();
            true
        }
        None => false,
    }
}

fn remove<T, F>(records: &mut Vec<T>, same: F) -> bool
where
    F: Fn(&T) -> bool,
{
    let before = records.len();
    records.retain(|r| !same(r));
    records.len() != before
}

impl Store for MemoryStore {
    fn add_doctor(&self, doctor: &Doctor) -> anyhow::Result<()> {
        self.lock()?.doctors.push(doctor.clone());
        Ok(())
    }

    fn get_doctor(&self, id: Uuid) -> anyhow::Result<Option<Doctor>> {
        Ok(self.lock()?.doctors.iter().find(|d| d.id == id).cloned())
    }

    fn doctor_exists(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.lock()?.doctors.iter().any(|d| d.id == id))
    }

    fn list_doctors(&self) -> anyhow::Result<Vec<Doctor>> {
        let mut doctors = self.lock()?.doctors.clone();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(doctors)
    }

    fn update_doctor(&self, doctor: &Doctor) -> anyhow::Result<bool> {
        Ok(replace(&mut self.lock()?.doctors, doctor, |d| d.id == doctor.id))
    }

    fn delete_doctor(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(remove(&mut self.lock()?.doctors, |d| d.id == id))
    }

    fn add_patient(&self, patient: &Patient) -> anyhow::Result<()> {
        self.lock()?.patients.push(patient.clone());
        Ok(())
    }

    fn get_patient(&self, id: Uuid) -> anyhow::Result<Option<Patient>> {
        Ok(self.lock()?.patients.iter().find(|p| p.id == id).cloned())
    }

    fn patient_exists(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(self.lock()?.patients.iter().any(|p| p.id == id))
    }

    fn list_patients(&self) -> anyhow::Result<Vec<Patient>> {
        let mut patients = self.lock()?.patients.clone();
        patients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(patients)
    }

    fn update_patient(&self, patient: &Patient) -> anyhow::Result<bool> {
        Ok(replace(&mut self.lock()?.patients, patient, |p| {
            p.id == patient.id
        }))
    }

    fn delete_patient(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(remove(&mut self.lock()?.patients, |p| p.id == id))
    }

    fn add_time_slot_unless_clash(&self, slot: &TimeSlot) -> anyhow::Result<bool> {
        let mut tables = self.lock()?;
        if tables
            .time_slots
            .iter()
            .any(|s| s.doctor_id == slot.doctor_id && s.time == slot.time)
        {
            return Ok(false);
        }
        tables.time_slots.push(slot.clone());
        Ok(true)
    }

    fn get_time_slot(&self, id: Uuid) -> anyhow::Result<Option<TimeSlot>> {
        Ok(self.lock()?.time_slots.iter().find(|s| s.id == id).cloned())
    }

    fn find_time_slots(&self, filter: SlotFilter) -> anyhow::Result<Vec<TimeSlot>> {
        let mut slots: Vec<TimeSlot> = self
            .lock()?
            .time_slots
            .iter()
            .filter(|s| filter.doctor_id.map_or(true, |id| s.doctor_id == id))
            .filter(|s| filter.is_reserved.map_or(true, |r| s.is_reserved == r))
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.time);
        Ok(slots)
    }

    fn update_time_slot(&self, slot: &TimeSlot) -> anyhow::Result<bool> {
        Ok(replace(&mut self.lock()?.time_slots, slot, |s| {
            s.id == slot.id
        }))
    }

    fn delete_time_slot(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(remove(&mut self.lock()?.time_slots, |s| s.id == id))
    }

    fn reserve_time_slot(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut tables = self.lock()?;
        match tables
            .time_slots
            .iter_mut()
            .find(|s| s.id == id && !s.is_reserved)
        {
            Some(slot) => {
                slot.is_reserved = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn release_time_slot(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut tables = self.lock()?;
        match tables
            .time_slots
            .iter_mut()
            .find(|s| s.id == id && s.is_reserved)
        {
            Some(slot) => {
                slot.is_reserved = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn add_appointment(&self, appointment: &Appointment) -> anyhow::Result<()> {
        self.lock()?.appointments.push(appointment.clone());
        Ok(())
    }

    fn get_appointment(&self, id: Uuid) -> anyhow::Result<Option<Appointment>> {
        Ok(self.lock()?.appointments.iter().find(|a| a.id == id).cloned())
    }

    fn find_appointments(&self, filter: AppointmentFilter) -> anyhow::Result<Vec<Appointment>> {
        let mut appointments: Vec<Appointment> = self
            .lock()?
            .appointments
            .iter()
            .filter(|a| filter.patient_id.map_or(true, |id| a.patient_id == id))
            .filter(|a| filter.status.map_or(true, |status| a.status == status))
            .filter(|a| {
                filter
                    .slot_ids
                    .as_ref()
                    .map_or(true, |ids| ids.contains(&a.slot_id))
            })
            .cloned()
            .collect();
        appointments.sort_by_key(|a| a.reserved_at);
        Ok(appointments)
    }

    fn update_appointment(&self, appointment: &Appointment) -> anyhow::Result<bool> {
        Ok(replace(&mut self.lock()?.appointments, appointment, |a| {
            a.id == appointment.id
        }))
    }

    fn delete_appointment(&self, id: Uuid) -> anyhow::Result<bool> {
        Ok(remove(&mut self.lock()?.appointments, |a| a.id == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests as shared;

    #[test]
    fn doctor_round_trip() {
        shared::doctor_round_trip(&MemoryStore::new());
    }

    #[test]
    fn listings_are_ordered() {
        shared::listings_are_ordered(&MemoryStore::new());
    }

    #[test]
    fn slot_filters() {
        shared::slot_filters(&MemoryStore::new());
    }

    #[test]
    fn reservation_is_compare_and_set() {
        shared::reservation_is_compare_and_set(&MemoryStore::new());
    }

    #[test]
    fn clashing_slot_is_not_inserted() {
        shared::clashing_slot_is_not_inserted(&MemoryStore::new());
    }

    #[test]
    fn appointment_filters() {
        shared::appointment_filters(&MemoryStore::new());
    }
}
