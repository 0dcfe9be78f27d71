mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use std::sync::Arc;

use application::auth_service::AuthService;
use application::cart_service::CartService;
use application::catalog_service::CatalogService;
use application::newsletter_service::NewsletterService;
use data::product_repository::PostgresProductRepository;
use data::subscriber_repository::PostgresSubscriberRepository;
use data::user_repository::PostgresUserRepository;
use infrastructure::config::AppConfig;
use infrastructure::database::{close_pool, create_pool, run_migrations};
use infrastructure::logging::init_logging;
use infrastructure::mailer::{LogMailer, Mailer, SmtpMailer};
use infrastructure::security::JwtKeys;
use infrastructure::storage::ImageStore;
use presentation::routes::AppServices;
use tracing::warn;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let user_repo = Arc::new(PostgresUserRepository::new(pool.clone()));
    let product_repo = Arc::new(PostgresProductRepository::new(pool.clone()));
    let subscriber_repo = Arc::new(PostgresSubscriberRepository::new(pool.clone()));

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(mail) => Arc::new(SmtpMailer::new(mail)?),
        None => {
            warn!("MAIL_HOST not set, newsletter emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let images = ImageStore::new(
        config.upload_dir.clone(),
        config.public_base_url.clone(),
        config.upload_max_bytes,
    );
    images.ensure_dir().await?;

    let services = AppServices {
        auth: AuthService::new(
            user_repo.clone(),
            JwtKeys::new(config.jwt_secret.clone()),
        ),
        carts: CartService::new(user_repo),
        catalog: CatalogService::new(product_repo),
        newsletter: NewsletterService::new(subscriber_repo, mailer),
        images,
    };

    let served = server::start_http_server(&config, services).await;
    close_pool(pool).await;
    served?;
    Ok(())
}
