use actix_web::{web, App, HttpServer};
use anyhow::Context;
use booking::{
    config::{open_store, Settings},
    service::Service,
    telemetry::init_subscriber,
};
use tracing_actix_web::TracingLogger;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_subscriber("info");

    let settings = Settings::from_env()?;
    tracing::info!(
        bind = %settings.bind_address,
        storage = ?settings.storage,
        "Configuration loaded"
    );

    let store = open_store(&settings)?;
    let service = web::Data::new(Service::new(store));

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(service.clone())
            .configure(booking::routes)
    })
    .bind(&settings.bind_address)
    .with_context(|| format!("Failed to bind {}", settings.bind_address))?
    .run()
    .await
    .context("Server error")
}
