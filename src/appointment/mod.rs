mod requests;

use crate::{
    error::ServiceError,
    service::Service,
    utils::{blocking, ensure_same_id},
};
use actix_web::{delete, get, http::header, post, put, web, HttpResponse};
use uuid::Uuid;

use self::requests::{CreateAppointmentRequest, UpdateAppointmentRequest};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list_appointments)
        .service(create_appointment)
        .service(patient_appointments)
        .service(upcoming_doctor_appointments)
        .service(get_appointment)
        .service(update_appointment)
        .service(delete_appointment);
}

#[get("")]
async fn list_appointments(service: web::Data<Service>) -> Result<HttpResponse, ServiceError> {
    let appointments = blocking(&service, |s| s.list_appointments()).await?;
    Ok(HttpResponse::Ok().json(appointments))
}

#[post("")]
async fn create_appointment(
    service: web::Data<Service>,
    info: web::Json<CreateAppointmentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let CreateAppointmentRequest {
        patient_id,
        slot_id,
    } = info.into_inner();
    let appointment =
        blocking(&service, move |s| s.create_appointment(patient_id, slot_id)).await?;
    Ok(HttpResponse::Created()
        .insert_header((header::LOCATION, format!("/appointments/{}", appointment.id)))
        .json(appointment))
}

#[get("/patients/{patient_id}")]
async fn patient_appointments(
    service: web::Data<Service>,
    patient_id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let patient_id = patient_id.into_inner();
    let appointments = blocking(&service, move |s| s.patient_appointments(patient_id)).await?;
    Ok(HttpResponse::Ok().json(appointments))
}

#[get("/doctors/{doctor_id}/upcoming")]
async fn upcoming_doctor_appointments(
    service: web::Data<Service>,
    doctor_id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let doctor_id = doctor_id.into_inner();
    let appointments =
        blocking(&service, move |s| s.upcoming_doctor_appointments(doctor_id)).await?;
    Ok(HttpResponse::Ok().json(appointments))
}

#[get("/{id}")]
async fn get_appointment(
    service: web::Data<Service>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    let appointment = blocking(&service, move |s| s.get_appointment(id)).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[put("/{id}")]
async fn update_appointment(
    service: web::Data<Service>,
    id: web::Path<Uuid>,
    info: web::Json<UpdateAppointmentRequest>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    let info = info.into_inner();
    ensure_same_id(id, info.id)?;

    let appointment = blocking(&service, move |s| s.update_appointment(id, info.into())).await?;
    Ok(HttpResponse::Ok().json(appointment))
}

#[delete("/{id}")]
async fn delete_appointment(
    service: web::Data<Service>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    blocking(&service, move |s| s.delete_appointment(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
