/// Generates the list, create, exists, get and rename handlers shared by
/// the doctor and patient resources, plus `config` mounting them together
/// with the resource's own delete handler.
#[macro_export]
macro_rules! person_handlers {
    ($kind:ident, $plural:ident, $add_request:ty, $update_request:ty, $delete:ident $(,)?) => {
        paste::paste! {
            pub fn config(cfg: &mut actix_web::web::ServiceConfig) {
                cfg.service([<list_ $plural>])
                    .service([<add_ $kind>])
                    .service([<$kind _exists>])
                    .service([<get_ $kind>])
                    .service([<update_ $kind>])
                    .service($delete);
            }

            #[actix_web::get("")]
            async fn [<list_ $plural>](
                service: actix_web::web::Data<$crate::service::Service>,
            ) -> Result<actix_web::HttpResponse, $crate::error::ServiceError> {
                let records = $crate::utils::blocking(&service, |s| s.[<list_ $plural>]()).await?;
                Ok(actix_web::HttpResponse::Ok().json(records))
            }

            #[actix_web::post("")]
            async fn [<add_ $kind>](
                service: actix_web::web::Data<$crate::service::Service>,
                info: actix_web::web::Json<$add_request>,
            ) -> Result<actix_web::HttpResponse, $crate::error::ServiceError> {
                let info = info.into_inner();
                let record =
                    $crate::utils::blocking(&service, move |s| s.[<add_ $kind>](&info.name)).await?;
                Ok(actix_web::HttpResponse::Created()
                    .insert_header((
                        actix_web::http::header::LOCATION,
                        format!(concat!("/", stringify!($plural), "/{}"), record.id),
                    ))
                    .json(record))
            }

            #[actix_web::get("/exists/{id}")]
            async fn [<$kind _exists>](
                service: actix_web::web::Data<$crate::service::Service>,
                id: actix_web::web::Path<uuid::Uuid>,
            ) -> Result<actix_web::HttpResponse, $crate::error::ServiceError> {
                let id = id.into_inner();
                let exists =
                    $crate::utils::blocking(&service, move |s| s.[<$kind _exists>](id)).await?;
                Ok(actix_web::HttpResponse::Ok().json(exists))
            }

            #[actix_web::get("/{id}")]
            async fn [<get_ $kind>](
                service: actix_web::web::Data<$crate::service::Service>,
                id: actix_web::web::Path<uuid::Uuid>,
            ) -> Result<actix_web::HttpResponse, $crate::error::ServiceError> {
                let id = id.into_inner();
                let record = $crate::utils::blocking(&service, move |s| s.[<get_ $kind>](id)).await?;
                Ok(actix_web::HttpResponse::Ok().json(record))
            }

            #[actix_web::put("/{id}")]
            async fn [<update_ $kind>](
                service: actix_web::web::Data<$crate::service::Service>,
                id: actix_web::web::Path<uuid::Uuid>,
                info: actix_web::web::Json<$update_request>,
            ) -> Result<actix_web::HttpResponse, $crate::error::ServiceError> {
                let id = id.into_inner();
                let info = info.into_inner();
                $crate::utils::ensure_same_id(id, info.id)?;

                let record = $crate::utils::blocking(&service, move |s| {
                    s.[<rename_ $kind>](id, &info.name)
                })
                .await?;
                Ok(actix_web::HttpResponse::Ok().json(record))
            }
        }
    };
}

use actix_web::web;
use anyhow::Context;
use chrono::{NaiveDateTime, Utc};

use crate::{error::ServiceError, service::Service};

/// `dd/MM/yyyy hh:mm tt`, e.g. `05/03/2031 02:30 PM`.
pub const TIME_FMT: &str = "%d/%m/%Y %I:%M %p";

pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn parse_time_str<S: AsRef<str>>(s: S) -> anyhow::Result<NaiveDateTime> {
    parse_time_str_with(s, TIME_FMT)
}

pub fn parse_time_str_with<S: AsRef<str>>(s: S, fmt: &str) -> anyhow::Result<NaiveDateTime> {
    let s = s.as_ref();
    NaiveDateTime::parse_from_str(s.trim(), fmt)
        .with_context(|| format!("Time '{}' does not match format '{}'", s, fmt))
}

pub fn format_time_str(time: &NaiveDateTime) -> String {
    time.format(TIME_FMT).to_string()
}

/// Serde adapter for timestamps in the wire format.
pub mod wire_time {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time_str(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        super::parse_time_str(&s).map_err(de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => serializer.serialize_some(&super::super::format_time_str(time)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|s| super::super::parse_time_str(&s).map_err(de::Error::custom))
                .transpose()
        }
    }
}

/// Runs a workflow call on the blocking pool; the store behind the service is synchronous.
pub async fn blocking<F, T>(service: &web::Data<Service>, f: F) -> Result<T, ServiceError>
where
    F: FnOnce(&Service) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    let service = service.clone();
    web::block(move || f(&service))
        .await
        .map_err(|err| ServiceError::Internal(anyhow::anyhow!("Blocking task failed: {}", err)))?
}

pub fn ensure_same_id(path_id: uuid::Uuid, body_id: Option<uuid::Uuid>) -> Result<(), ServiceError> {
    match body_id {
        Some(body_id) if body_id != path_id => Err(ServiceError::Validation(format!(
            "ID mismatch: path has '{}' but body has '{}'",
            path_id, body_id
        ))),
        _ => Ok(()),
    }
}
