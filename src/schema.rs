diesel::table! {
    appointments (id) {
        id -> Text,
        slot_id -> Text,
        patient_id -> Text,
        patient_name -> Text,
        status -> Text,
        reserved_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    doctors (id) {
        id -> Text,
        name -> Text,
    }
}

diesel::table! {
    patients (id) {
        id -> Text,
        name -> Text,
    }
}

diesel::table! {
    time_slots (id) {
        id -> Text,
        time -> Timestamp,
        doctor_id -> Text,
        doctor_name -> Text,
        is_reserved -> Bool,
        cost -> Double,
    }
}

diesel::allow_tables_to_appear_in_same_query!(appointments, doctors, patients, time_slots,);
