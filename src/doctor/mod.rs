mod requests;

use crate::{error::ServiceError, protocol::MessageResponse, service::Service, utils::blocking};
use actix_web::{delete, web, HttpResponse};
use uuid::Uuid;

use self::requests::{AddDoctorRequest, UpdateDoctorRequest};

crate::person_handlers!(doctor, doctors, AddDoctorRequest, UpdateDoctorRequest, delete_doctor);

#[delete("/{id}")]
async fn delete_doctor(
    service: web::Data<Service>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    let removed = blocking(&service, move |s| s.delete_doctor(id)).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Doctor \"{}\" deleted together with {} time slot(s).",
        id, removed
    ))))
}
