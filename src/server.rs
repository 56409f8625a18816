use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use crate::App;

#[derive(Debug, Error)]
#[error("Failed to start HTTP server")]
pub struct StartServerError;

/// Serves the JSON API until the server is stopped.
///
/// Must be called inside an actix system.
pub async fn run(app: App) -> Result<(), StartServerError> {
    let http = &app.config.http;
    let address = (http.address, http.port);
    let workers = http.workers;

    let data = web::Data::new(app);
    let mut server = HttpServer::new(move || {
        actix_web::App::new()
            .app_data(data.clone())
            .wrap(TracingLogger::default())
            .configure(crate::http::configure)
    });

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    let server = server
        .bind(address)
        .change_context(StartServerError)
        .attach_printable_lazy(|| format!("could not bind to {}:{}", address.0, address.1))?;

    tracing::info!("listening at http://{}:{}", address.0, address.1);
    server.run().await.change_context(StartServerError)
}
