use anyhow::Context;
use diesel::prelude::*;
use uuid::Uuid;

use super::{AppointmentFilter, SlotFilter, Store};
use crate::{
    database::{get_db_conn, DbPool},
    models::{
        appointments::{Appointment, AppointmentData},
        doctors::{Doctor, DoctorData},
        patients::{Patient, PatientData},
        time_slots::{TimeSlot, TimeSlotData},
    },
};

/// [`Store`] backed by diesel over an r2d2 SQLite pool.
#[derive(Clone)]
pub struct DbStore {
    pool: DbPool,
}

impl DbStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut SqliteConnection) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let mut conn = get_db_conn(&self.pool)?;
        f(&mut *conn)
    }
}

impl Store for DbStore {
    fn add_doctor(&self, doctor: &Doctor) -> anyhow::Result<()> {
        use crate::schema::doctors;

        let data = DoctorData::from(doctor);
        self.with_conn(|conn| {
            diesel::insert_into(doctors::table)
                .values(&data)
                .execute(conn)
                .context("DB error")?;
            Ok(())
        })
    }

    fn get_doctor(&self, id: Uuid) -> anyhow::Result<Option<Doctor>> {
        use crate::schema::doctors;

        self.with_conn(|conn| {
            doctors::table
                .filter(doctors::id.eq(id.to_string()))
                .get_result::<DoctorData>(conn)
                .optional()
                .context("DB error")?
                .map(Doctor::try_from)
                .transpose()
        })
    }

    fn doctor_exists(&self, id: Uuid) -> anyhow::Result<bool> {
        use crate::schema::doctors;

        self.with_conn(|conn| {
            let res = doctors::table
                .filter(doctors::id.eq(id.to_string()))
                .count()
                .get_result::<i64>(conn)
                .context("DB error")?;
            Ok(res > 0)
        })
    }

    fn list_doctors(&self) -> anyhow::Result<Vec<Doctor>> {
        use crate::schema::doctors;

        self.with_conn(|conn| {
            doctors::table
                .order(doctors::name.asc())
                .get_results::<DoctorData>(conn)
                .context("DB error")?
                .into_iter()
                .map(Doctor::try_from)
                .collect()
        })
    }

    fn update_doctor(&self, doctor: &Doctor) -> anyhow::Result<bool> {
        use crate::schema::doctors;

        self.with_conn(|conn| {
            let res = diesel::update(doctors::table.filter(doctors::id.eq(doctor.id.to_string())))
                .set(doctors::name.eq(&doctor.name))
                .execute(conn)
                .context("DB error")?;
            Ok(res > 0)
        })
    }

    fn delete_doctor(&self, id: Uuid) -> anyhow::Result<bool> {
        use crate::schema::doctors;

        self.with_conn(|conn| {
            let res = diesel::delete(doctors::table.filter(doctors::id.eq(id.to_string())))
                .execute(conn)
                .context("DB error")?;
            Ok(res > 0)
        })
    }

    fn add_patient(&self, patient: &Patient) -> anyhow::Result<()> {
        use crate::schema::patients;

        let data = PatientData::from(patient);
        self.with_conn(|conn| {
            diesel::insert_into(patients::table)
                .values(&data)
                .execute(conn)
                .context("DB error")?;
            Ok(())
        })
    }

    fn get_patient(&self, id: Uuid) -> anyhow::Result<Option<Patient>> {
        use crate::schema::patients;

        self.with_conn(|conn| {
            patients::table
                .filter(patients::id.eq(id.to_string()))
                .get_result::<PatientData>(conn)
                .optional()
                .context("DB error")?
                .map(Patient::try_from)
                .transpose()
        })
    }

    fn patient_exists(&self, id: Uuid) -> anyhow::Result<bool> {
        use crate::schema::patients;

        self.with_conn(|conn| {
            let res = patients::table
                .filter(patients::id.eq(id.to_string()))
                .count()
                .get_result::<i64>(conn)
                .context("DB error")?;
            Ok(res > 0)
        })
    }

    fn list_patients(&self) -> anyhow::Result<Vec<Patient>> {
        use crate::schema::patients;

        self.with_conn(|conn| {
            patients::table
                .order(patients::name.asc())
                .get_results::<PatientData>(conn)
                .context("DB error")?
                .into_iter()
                .map(Patient::try_from)
                .collect()
        })
    }

    fn update_patient(&self, patient: &Patient) -> anyhow::Result<bool> {
        use crate::schema::patients;

        self.with_conn(|conn| {
            let res =
                diesel::update(patients::table.filter(patients::id.eq(patient.id.to_string())))
                    .set(patients::name.eq(&patient.name))
                    .execute(conn)
                    .context("DB error")?;
            Ok(res > 0)
        })
    }

    fn delete_patient(&self, id: Uuid) -> anyhow::Result<bool> {
        use crate::schema::patients;

        self.with_conn(|conn| {
            let res = diesel::delete(patients::table.filter(patients::id.eq(id.to_string())))
                .execute(conn)
                .context("DB error")?;
            Ok(res > 0)
        })
    }

    fn add_time_slot_unless_clash(&self, slot: &TimeSlot) -> anyhow::Result<bool> {
        use crate::schema::time_slots;

        let data = TimeSlotData::from(slot);
        self.with_conn(|conn| {
            conn.immediate_transaction(|conn| {
                let res = time_slots::table
                    .filter(time_slots::doctor_id.eq(&data.doctor_id))
                    .filter(time_slots::time.eq(data.time))
                    .count()
                    .get_result::<i64>(conn)
                    .context("DB error")?;
                if res > 0 {
                    return Ok(false);
                }

                diesel::insert_into(time_slots::table)
                    .values(&data)
                    .execute(conn)
                    .context("DB error")?;
                Ok(true)
            })
        })
    }

    fn get_time_slot(&self, id: Uuid) -> anyhow::Result<Option<TimeSlot>> {
        use crate::schema::time_slots;

        self.with_conn(|conn| {
            time_slots::table
                .filter(time_slots::id.eq(id.to_string()))
                .get_result::<TimeSlotData>(conn)
                .optional()
                .context("DB error")?
                .map(TimeSlot::try_from)
                .transpose()
        })
    }

    fn find_time_slots(&self, filter: SlotFilter) -> anyhow::Result<Vec<TimeSlot>> {
        use crate::schema::time_slots;

        self.with_conn(|conn| {
            let mut query = time_slots::table.into_boxed();
            if let Some(doctor_id) = filter.doctor_id {
                query = query.filter(time_slots::doctor_id.eq(doctor_id.to_string()));
            }
            if let Some(is_reserved) = filter.is_reserved {
                query = query.filter(time_slots::is_reserved.eq(is_reserved));
            }
            query
                .order(time_slots::time.asc())
                .get_results::<TimeSlotData>(conn)
                .context("DB error")?
                .into_iter()
                .map(TimeSlot::try_from)
                .collect()
        })
    }

    fn update_time_slot(&self, slot: &TimeSlot) -> anyhow::Result<bool> {
        use crate::schema::time_slots;

        self.with_conn(|conn| {
            let res =
                diesel::update(time_slots::table.filter(time_slots::id.eq(slot.id.to_string())))
                    .set((
                        time_slots::time.eq(slot.time),
                        time_slots::doctor_id.eq(slot.doctor_id.to_string()),
                        time_slots::doctor_name.eq(&slot.doctor_name),
                        time_slots::is_reserved.eq(slot.is_reserved),
                        time_slots::cost.eq(slot.cost),
                    ))
                    .execute(conn)
                    .context("DB error")?;
            Ok(res > 0)
        })
    }

    fn delete_time_slot(&self, id: Uuid) -> anyhow::Result<bool> {
        use crate::schema::time_slots;

        self.with_conn(|conn| {
            let res = diesel::delete(time_slots::table.filter(time_slots::id.eq(id.to_string())))
                .execute(conn)
                .context("DB error")?;
            Ok(res > 0)
        })
    }

    fn reserve_time_slot(&self, id: Uuid) -> anyhow::Result<bool> {
        use crate::schema::time_slots;

        self.with_conn(|conn| {
            let res = diesel::update(
                time_slots::table
                    .filter(time_slots::id.eq(id.to_string()))
                    .filter(time_slots::is_reserved.eq(false)),
            )
            .set(time_slots::is_reserved.eq(true))
            .execute(conn)
            .context("DB error")?;
            Ok(res == 1)
        })
    }

    fn release_time_slot(&self, id: Uuid) -> anyhow::Result<bool> {
        use crate::schema::time_slots;

        self.with_conn(|conn| {
            let res = diesel::update(
                time_slots::table
                    .filter(time_slots::id.eq(id.to_string()))
                    .filter(time_slots::is_reserved.eq(true)),
            )
            .set(time_slots::is_reserved.eq(false))
            .execute(conn)
            .context("DB error")?;
            Ok(res == 1)
        })
    }

    fn add_appointment(&self, appointment: &Appointment) -> anyhow::Result<()> {
        use crate::schema::appointments;

        let data = AppointmentData::from(appointment);
        self.with_conn(|conn| {
            diesel::insert_into(appointments::table)
                .values(&data)
                .execute(conn)
                .context("DB error")?;
            Ok(())
        })
    }

    fn get_appointment(&self, id: Uuid) -> anyhow::Result<Option<Appointment>> {
        use crate::schema::appointments;

        self.with_conn(|conn| {
            appointments::table
                .filter(appointments::id.eq(id.to_string()))
                .get_result::<AppointmentData>(conn)
                .optional()
                .context("DB error")?
                .map(Appointment::try_from)
                .transpose()
        })
    }

    fn find_appointments(&self, filter: AppointmentFilter) -> anyhow::Result<Vec<Appointment>> {
        use crate::schema::appointments;

        self.with_conn(|conn| {
            let mut query = appointments::table.into_boxed();
            if let Some(patient_id) = filter.patient_id {
                query = query.filter(appointments::patient_id.eq(patient_id.to_string()));
            }
            if let Some(status) = filter.status {
                query = query.filter(appointments::status.eq(status.as_str()));
            }
            if let Some(slot_ids) = filter.slot_ids {
                if slot_ids.is_empty() {
                    return Ok(Vec::new());
                }
                let slot_ids: Vec<String> = slot_ids.iter().map(Uuid::to_string).collect();
                query = query.filter(appointments::slot_id.eq_any(slot_ids));
            }
            query
                .order(appointments::reserved_at.asc())
                .get_results::<AppointmentData>(conn)
                .context("DB error")?
                .into_iter()
                .map(Appointment::try_from)
                .collect()
        })
    }

    fn update_appointment(&self, appointment: &Appointment) -> anyhow::Result<bool> {
        use crate::schema::appointments;

        self.with_conn(|conn| {
            let res = diesel::update(
                appointments::table.filter(appointments::id.eq(appointment.id.to_string())),
            )
            .set((
                appointments::slot_id.eq(appointment.slot_id.to_string()),
                appointments::patient_id.eq(appointment.patient_id.to_string()),
                appointments::patient_name.eq(&appointment.patient_name),
                appointments::status.eq(appointment.status.as_str()),
                appointments::reserved_at.eq(appointment.reserved_at),
                appointments::updated_at.eq(appointment.updated_at),
            ))
            .execute(conn)
            .context("DB error")?;
            Ok(res > 0)
        })
    }

    fn delete_appointment(&self, id: Uuid) -> anyhow::Result<bool> {
        use crate::schema::appointments;

        self.with_conn(|conn| {
            let res =
                diesel::delete(appointments::table.filter(appointments::id.eq(id.to_string())))
                    .execute(conn)
                    .context("DB error")?;
            Ok(res > 0)
        })
    }
}
