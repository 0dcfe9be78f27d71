use actix_web::{HttpRequest, HttpResponse, delete, post, web};
use tracing::info;

use crate::application::cart_service::CartService;
use crate::domain::error::DomainError;
use crate::presentation::dto::CartItemRequest;
use crate::presentation::middleware::TokenAuthMiddleware;
use crate::presentation::utils::{AuthenticatedUser, request_id};

#[post("/addtocart", wrap = "TokenAuthMiddleware")]
pub async fn add_to_cart(
    req: HttpRequest,
    user: AuthenticatedUser,
    carts: web::Data<CartService>,
    payload: web::Json<CartItemRequest>,
) -> Result<HttpResponse, DomainError> {
    carts.add_item(user.id, payload.item_id).await?;

    info!(request_id = %request_id(&req), user_id = %user.id, item_id = payload.item_id, "added to cart");

    Ok(HttpResponse::Ok().body("Added"))
}

#[delete("/removefromcart", wrap = "TokenAuthMiddleware")]
pub async fn remove_from_cart(
    req: HttpRequest,
    user: AuthenticatedUser,
    carts: web::Data<CartService>,
    payload: web::Json<CartItemRequest>,
) -> Result<HttpResponse, DomainError> {
    carts.remove_item(user.id, payload.item_id).await?;

    info!(request_id = %request_id(&req), user_id = %user.id, item_id = payload.item_id, "removed from cart");

    Ok(HttpResponse::Ok().body("Removed"))
}

#[post("/getcart", wrap = "TokenAuthMiddleware")]
pub async fn get_cart(
    user: AuthenticatedUser,
    carts: web::Data<CartService>,
) -> Result<HttpResponse, DomainError> {
    let cart = carts.get_cart(user.id).await?;
    Ok(HttpResponse::Ok().json(cart))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use crate::infrastructure::security::JwtKeys;
    use crate::presentation::routes::tests::{TestApp, test_services};

    async fn signed_up_token(services: &crate::presentation::routes::AppServices) -> String {
        services
            .auth
            .signup("cart".into(), "cart@x.com", "abcdef".into())
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn cart_routes_require_a_token() {
        let TestApp { services, .. } = test_services();
        let app = test::init_service(TestApp::app(services)).await;

        let req = test::TestRequest::post()
            .uri("/addtocart")
            .set_json(json!({ "itemId": 1 }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key("x-request-id"));
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"], "Please authenticate using valid token");

        let forged = JwtKeys::new("someone-else".into())
            .generate_token(Uuid::new_v4())
            .unwrap();
        let req = test::TestRequest::post()
            .uri("/getcart")
            .insert_header(("auth-token", forged))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn add_remove_and_read_the_cart() {
        let TestApp { services, .. } = test_services();
        let token = signed_up_token(&services).await;
        let app = test::init_service(TestApp::app(services)).await;

        for _ in 0..2 {
            let req = test::TestRequest::post()
                .uri("/addtocart")
                .insert_header(("auth-token", token.as_str()))
                .set_json(json!({ "itemId": 3 }))
                .to_request();
            let body = test::call_and_read_body(&app, req).await;
            assert_eq!(body, "Added");
        }

        // three removals against two units: the slot stops at zero
        for _ in 0..3 {
            let req = test::TestRequest::delete()
                .uri("/removefromcart")
                .insert_header(("auth-token", token.as_str()))
                .set_json(json!({ "itemId": 3 }))
                .to_request();
            let body = test::call_and_read_body(&app, req).await;
            assert_eq!(body, "Removed");
        }

        let req = test::TestRequest::post()
            .uri("/addtocart")
            .insert_header(("auth-token", token.as_str()))
            .set_json(json!({ "itemId": 7 }))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/getcart")
            .insert_header(("auth-token", token.as_str()))
            .to_request();
        let cart: Value = test::call_and_read_body_json(&app, req).await;
        let cart = cart.as_object().unwrap();
        assert_eq!(cart.len(), 300);
        assert_eq!(cart["3"], 0);
        assert_eq!(cart["7"], 1);
    }

    #[actix_web::test]
    async fn token_for_a_vanished_user_is_not_found() {
        let TestApp { services, .. } = test_services();
        let token = JwtKeys::new("test-secret".into()).generate_token(Uuid::new_v4()).unwrap();
        let app = test::init_service(TestApp::app(services)).await;

        let req = test::TestRequest::post()
            .uri("/getcart")
            .insert_header(("auth-token", token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
