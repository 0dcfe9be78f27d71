use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use tracing::info;

use crate::application::catalog_service::CatalogService;
use crate::domain::error::DomainError;
use crate::domain::product::NewProduct;
use crate::presentation::dto::{
    ProductCreatedResponse, ProductRemovedResponse, RemoveProductRequest,
};
use crate::presentation::utils::request_id;

#[post("/addproduct")]
pub async fn add_product(
    req: HttpRequest,
    catalog: web::Data<CatalogService>,
    payload: web::Json<NewProduct>,
) -> Result<HttpResponse, DomainError> {
    let product = catalog.add_product(payload.into_inner()).await?;

    info!(request_id = %request_id(&req), product_id = product.id, "product added");

    Ok(HttpResponse::Ok().json(ProductCreatedResponse {
        success: true,
        message: "Product added successfully",
        product,
    }))
}

#[delete("/removeproduct")]
pub async fn remove_product(
    req: HttpRequest,
    catalog: web::Data<CatalogService>,
    payload: web::Json<RemoveProductRequest>,
) -> Result<HttpResponse, DomainError> {
    let RemoveProductRequest { id, name } = payload.into_inner();
    let removed = catalog.remove_product(id).await?;

    info!(request_id = %request_id(&req), product_id = removed.id, "product removed");

    Ok(HttpResponse::Ok().json(ProductRemovedResponse {
        success: true,
        message: "Product removed",
        name,
    }))
}

#[get("/allproducts")]
pub async fn all_products(catalog: web::Data<CatalogService>) -> Result<HttpResponse, DomainError> {
    Ok(HttpResponse::Ok().json(catalog.list_all().await?))
}

#[get("/newcollection")]
pub async fn new_collection(
    catalog: web::Data<CatalogService>,
) -> Result<HttpResponse, DomainError> {
    Ok(HttpResponse::Ok().json(catalog.new_collection().await?))
}

#[get("/popularinwomen")]
pub async fn popular_in_women(
    catalog: web::Data<CatalogService>,
) -> Result<HttpResponse, DomainError> {
    Ok(HttpResponse::Ok().json(catalog.popular_in_women().await?))
}

// path spelling is what deployed storefronts call
#[get("/reletedproducts")]
pub async fn related_products(
    catalog: web::Data<CatalogService>,
) -> Result<HttpResponse, DomainError> {
    Ok(HttpResponse::Ok().json(catalog.related_products().await?))
}
