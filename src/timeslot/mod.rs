mod requests;

use crate::{
    error::ServiceError,
    protocol::MessageResponse,
    service::Service,
    utils::{blocking, ensure_same_id, parse_time_str_with, TIME_FMT},
};
use actix_web::{delete, get, post, put, web, HttpResponse};
use uuid::Uuid;

use self::requests::{AddTimeSlotRequest, UpdateTimeSlotRequest};

pub fn config(cfg: &mut web::ServiceConfig) {
    // `/available` must be matched before `/{id}`.
    cfg.service(list_time_slots)
        .service(list_available_time_slots)
        .service(doctor_time_slots)
        .service(doctor_available_time_slots)
        .service(doctor_reserved_time_slots)
        .service(add_time_slot)
        .service(get_time_slot)
        .service(update_time_slot)
        .service(delete_time_slot);
}

#[get("")]
async fn list_time_slots(service: web::Data<Service>) -> Result<HttpResponse, ServiceError> {
    let slots = blocking(&service, |s| s.list_time_slots(false)).await?;
    Ok(HttpResponse::Ok().json(slots))
}

#[get("/available")]
async fn list_available_time_slots(
    service: web::Data<Service>,
) -> Result<HttpResponse, ServiceError> {
    let slots = blocking(&service, |s| s.list_time_slots(true)).await?;
    Ok(HttpResponse::Ok().json(slots))
}

async fn slots_of_doctor(
    service: web::Data<Service>,
    doctor_id: Uuid,
    is_reserved: Option<bool>,
) -> Result<HttpResponse, ServiceError> {
    let slots = blocking(&service, move |s| s.doctor_time_slots(doctor_id, is_reserved)).await?;
    Ok(HttpResponse::Ok().json(slots))
}

#[get("/doctors/{doctor_id}")]
async fn doctor_time_slots(
    service: web::Data<Service>,
    doctor_id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    slots_of_doctor(service, doctor_id.into_inner(), None).await
}

#[get("/doctors/{doctor_id}/available")]
async fn doctor_available_time_slots(
    service: web::Data<Service>,
    doctor_id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    slots_of_doctor(service, doctor_id.into_inner(), Some(false)).await
}

#[get("/doctors/{doctor_id}/reserved")]
async fn doctor_reserved_time_slots(
    service: web::Data<Service>,
    doctor_id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    slots_of_doctor(service, doctor_id.into_inner(), Some(true)).await
}

#[post("/doctors/{doctor_id}/add")]
async fn add_time_slot(
    service: web::Data<Service>,
    doctor_id: web::Path<Uuid>,
    info: web::Json<AddTimeSlotRequest>,
) -> Result<HttpResponse, ServiceError> {
    let doctor_id = doctor_id.into_inner();
    let info = info.into_inner();

    let format = info.format.as_deref().unwrap_or(TIME_FMT);
    let time = parse_time_str_with(&info.time, format)
        .map_err(|err| ServiceError::Validation(format!("{:#}", err)))?;

    let cost = info.cost;
    let slot = blocking(&service, move |s| s.add_time_slot(doctor_id, time, cost)).await?;
    Ok(HttpResponse::Created().json(slot))
}

#[get("/{id}")]
async fn get_time_slot(
    service: web::Data<Service>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    let slot = blocking(&service, move |s| s.get_time_slot(id)).await?;
    Ok(HttpResponse::Ok().json(slot))
}

#[put("/{id}")]
async fn update_time_slot(
    service: web::Data<Service>,
    id: web::Path<Uuid>,
    info: web::Json<UpdateTimeSlotRequest>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    let info = info.into_inner();
    ensure_same_id(id, info.id)?;

    let slot = blocking(&service, move |s| s.update_time_slot(id, info.into())).await?;
    Ok(HttpResponse::Ok().json(slot))
}

#[delete("/{id}")]
async fn delete_time_slot(
    service: web::Data<Service>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    blocking(&service, move |s| s.delete_time_slot(id)).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Time slot \"{}\" deleted.",
        id
    ))))
}
