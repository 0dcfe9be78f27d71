use actix_web::{HttpRequest, HttpResponse, post, web};
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{LoginRequest, SignupRequest, TokenResponse};
use crate::presentation::utils::request_id;

#[post("/signup")]
pub async fn signup(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, DomainError> {
    let SignupRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let token = service.signup(username, &email, password).await?;

    info!(request_id = %request_id(&req), email = %email, "user registered");

    Ok(HttpResponse::Ok().json(TokenResponse {
        success: true,
        token,
    }))
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let token = service.login(&payload.email, &payload.password).await?;

    info!(request_id = %request_id(&req), email = %payload.email, "user logged in");

    Ok(HttpResponse::Ok().json(TokenResponse {
        success: true,
        token,
    }))
}
