#[macro_use]
extern crate diesel;

pub mod appointment;
pub mod config;
pub mod database;
pub mod doctor;
pub mod error;
pub mod models;
pub mod patient;
pub mod protocol;
pub mod schema;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod timeslot;
pub mod utils;

use actix_web::web;

use crate::error::ServiceError;

/// Mounts every resource scope. Malformed JSON bodies and path ids are
/// reported as validation errors.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ServiceError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| ServiceError::Validation(err.to_string()).into()),
    )
    .service(web::scope("/doctors").configure(doctor::config))
    .service(web::scope("/patients").configure(patient::config))
    .service(web::scope("/timeslots").configure(timeslot::config))
    .service(web::scope("/appointments").configure(appointment::config));
}
