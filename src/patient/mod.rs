mod requests;

use crate::{error::ServiceError, protocol::MessageResponse, service::Service, utils::blocking};
use actix_web::{delete, web, HttpResponse};
use uuid::Uuid;

use self::requests::{AddPatientRequest, UpdatePatientRequest};

crate::person_handlers!(patient, patients, AddPatientRequest, UpdatePatientRequest, delete_patient);

/// Appointments of the patient are kept.
#[delete("/{id}")]
async fn delete_patient(
    service: web::Data<Service>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let id = id.into_inner();
    blocking(&service, move |s| s.delete_patient(id)).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "Patient \"{}\" deleted.",
        id
    ))))
}
