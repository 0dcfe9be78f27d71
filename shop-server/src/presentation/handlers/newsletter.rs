use actix_web::{HttpRequest, HttpResponse, post, web};
use tracing::info;

use crate::application::newsletter_service::NewsletterService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{MessageResponse, SubscribeRequest};
use crate::presentation::utils::request_id;

#[post("/subscribe")]
pub async fn subscribe(
    req: HttpRequest,
    newsletter: web::Data<NewsletterService>,
    payload: web::Json<SubscribeRequest>,
) -> Result<HttpResponse, DomainError> {
    let subscriber = newsletter.subscribe(&payload.email).await?;

    info!(request_id = %request_id(&req), email = %subscriber.email, "subscribed");

    Ok(HttpResponse::Ok().json(MessageResponse::ok("Subscribed successfully")))
}

#[post("/sendnewsletter")]
pub async fn send_newsletter(
    newsletter: web::Data<NewsletterService>,
) -> Result<HttpResponse, DomainError> {
    newsletter.broadcast().await?;
    Ok(HttpResponse::Ok().json(MessageResponse::ok("Emails sent to all subscribers.")))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};

    use crate::presentation::routes::tests::{TestApp, test_services_with_mailer};
    use crate::infrastructure::mailer::tests::RecordingMailer;

    #[actix_web::test]
    async fn subscribe_twice_is_rejected() {
        let TestApp { services, .. } = test_services_with_mailer(RecordingMailer::default());
        let app = test::init_service(TestApp::app(services)).await;

        let req = test::TestRequest::post()
            .uri("/subscribe")
            .set_json(json!({ "email": "fan@x.com" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "success": true, "message": "Subscribed successfully" }));

        let req = test::TestRequest::post()
            .uri("/subscribe")
            .set_json(json!({ "email": "fan@x.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Email is already subscribed");
    }

    #[actix_web::test]
    async fn newsletter_reports_success_even_when_a_delivery_fails() {
        let TestApp { services, mailer } =
            test_services_with_mailer(RecordingMailer::failing_for(&["bounce@x.com"]));
        let app = test::init_service(TestApp::app(services)).await;

        for email in ["fan@x.com", "bounce@x.com"] {
            let req = test::TestRequest::post()
                .uri("/subscribe")
                .set_json(json!({ "email": email }))
                .to_request();
            test::call_service(&app, req).await;
        }

        let req = test::TestRequest::post().uri("/sendnewsletter").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Emails sent to all subscribers.");
        assert_eq!(mailer.recipients(), vec!["fan@x.com"]);
    }
}
