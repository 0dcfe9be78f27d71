use actix_web::HttpServer;
use tracing::info;

use crate::infrastructure::config::AppConfig;
use crate::presentation::routes::{AppServices, build_app};

/// Serves the API until the process receives SIGINT/SIGTERM.
pub async fn start_http_server(config: &AppConfig, services: AppServices) -> std::io::Result<()> {
    let cors_origins = config.cors_origins.clone();

    info!(
        host = %config.host,
        port = config.port,
        upload_dir = %config.upload_dir.display(),
        "HTTP server starting"
    );

    HttpServer::new(move || build_app(services.clone(), cors_origins.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
