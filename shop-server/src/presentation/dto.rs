use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

// ======================= AUTH =======================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

// ======================= CATALOG =======================

#[derive(Debug, Serialize)]
pub struct ProductCreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub product: Product,
}

#[derive(Debug, Deserialize)]
pub struct RemoveProductRequest {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProductRemovedResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub image_url: String,
}

// ======================= CART =======================

#[derive(Debug, Deserialize)]
pub struct CartItemRequest {
    #[serde(rename = "itemId")]
    pub item_id: u32,
}

// ======================= NEWSLETTER =======================

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: &'static str,
}

impl MessageResponse {
    pub fn ok(message: &'static str) -> Self {
        Self {
            success: true,
            message,
        }
    }
}
