use actix_cors::Cors;
use actix_files::Files;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, HeaderName};
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, Error, web};

use crate::application::auth_service::AuthService;
use crate::application::cart_service::CartService;
use crate::application::catalog_service::CatalogService;
use crate::application::newsletter_service::NewsletterService;
use crate::domain::error::{DomainError, FieldError};
use crate::infrastructure::storage::ImageStore;
use crate::presentation::handlers;
use crate::presentation::middleware::{AUTH_TOKEN_HEADER, RequestContextMiddleware};

/// Everything the route table needs, built once at start-up.
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub carts: CartService,
    pub catalog: CatalogService,
    pub newsletter: NewsletterService,
    pub images: ImageStore,
}

pub fn configure(services: AppServices) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let images_dir = services.images.dir().to_path_buf();

        cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
            DomainError::Validation(vec![FieldError::new("body", err.to_string())]).into()
        }))
        .app_data(web::Data::new(services.auth))
        .app_data(web::Data::new(services.carts))
        .app_data(web::Data::new(services.catalog))
        .app_data(web::Data::new(services.newsletter))
        .app_data(web::Data::new(services.images))
        .service(handlers::health::root)
        .service(handlers::health::health)
        .service(handlers::upload::upload_image)
        .service(handlers::catalog::add_product)
        .service(handlers::catalog::remove_product)
        .service(handlers::catalog::all_products)
        .service(handlers::catalog::new_collection)
        .service(handlers::catalog::popular_in_women)
        .service(handlers::catalog::related_products)
        .service(handlers::auth::signup)
        .service(handlers::auth::login)
        .service(handlers::cart::add_to_cart)
        .service(handlers::cart::remove_from_cart)
        .service(handlers::cart::get_cart)
        .service(handlers::newsletter::subscribe)
        .service(handlers::newsletter::send_newsletter)
        .service(Files::new(ImageStore::ROUTE_PREFIX, images_dir));
    }
}

/// Full application: middleware stack plus the route table.
pub fn build_app(
    services: AppServices,
    cors_origins: Vec<String>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(build_cors(&cors_origins))
        .wrap(RequestContextMiddleware)
        .wrap(
            DefaultHeaders::new()
                .add(("X-Content-Type-Options", "nosniff"))
                .add(("Referrer-Policy", "no-referrer"))
                .add(("Permissions-Policy", "geolocation=()"))
                .add(("Cross-Origin-Opener-Policy", "same-origin")),
        )
        .configure(configure(services))
}

fn build_cors(origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(AUTH_TOKEN_HEADER),
        ])
        .max_age(3600);

    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    cors = cors.supports_credentials();
    for origin in origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}
