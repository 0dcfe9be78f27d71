use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::ShopClientError;
use crate::models::{Cart, NewProduct, Product};

/// File the session token is persisted to between CLI invocations.
pub const TOKEN_FILE: &str = ".shop_token";

const AUTH_HEADER: &str = "auth-token";

#[derive(Clone)]
pub struct ShopClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    image_url: String,
}

#[derive(Debug, Deserialize)]
struct ProductCreatedResponse {
    product: Product,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    message: String,
}

impl ShopClient {
    pub async fn connect(endpoint: &str) -> Result<Self, ShopClientError> {
        let base_url = endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client: Client::builder().build()?,
            base_url,
            token: None,
        })
    }

    pub async fn set_token(&mut self, token: String) -> Result<(), ShopClientError> {
        tokio::fs::write(TOKEN_FILE, &token).await?;
        self.token = Some(token);
        Ok(())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Token from memory, falling back to the persisted file.
    async fn auth_token(&self) -> Result<String, ShopClientError> {
        let token = match &self.token {
            Some(t) if !t.is_empty() => t.clone(),
            _ => tokio::fs::read_to_string(TOKEN_FILE)
                .await
                .map_err(|_| ShopClientError::Unauthorized)?
                .trim()
                .to_string(),
        };
        if token.is_empty() {
            return Err(ShopClientError::Unauthorized);
        }
        Ok(token)
    }

    async fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ShopClientError> {
        let token = self.auth_token().await?;
        Ok(self
            .client
            .request(method, self.url(path))
            .header(AUTH_HEADER, token))
    }

    pub async fn signup(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ShopClientError> {
        let resp = self
            .client
            .post(self.url("/signup"))
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        let auth: TokenResponse = decode(resp).await?;
        self.set_token(auth.token).await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), ShopClientError> {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(&json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await?;

        let auth: TokenResponse = decode(resp).await?;
        self.set_token(auth.token).await
    }

    /// Uploads an image file and returns its public URL.
    pub async fn upload_image(&self, path: &Path) -> Result<String, ShopClientError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form = Form::new().part("product", Part::bytes(bytes).file_name(file_name));
        let resp = self
            .client
            .post(self.url("/upload"))
            .multipart(form)
            .send()
            .await?;

        let uploaded: UploadResponse = decode(resp).await?;
        Ok(uploaded.image_url)
    }

    pub async fn add_product(&self, product: &NewProduct) -> Result<Product, ShopClientError> {
        let resp = self
            .client
            .post(self.url("/addproduct"))
            .json(product)
            .send()
            .await?;

        let created: ProductCreatedResponse = decode(resp).await?;
        Ok(created.product)
    }

    pub async fn remove_product(&self, id: i64, name: Option<&str>) -> Result<(), ShopClientError> {
        let resp = self
            .client
            .delete(self.url("/removeproduct"))
            .json(&json!({ "id": id, "name": name }))
            .send()
            .await?;

        decode::<Value>(resp).await?;
        Ok(())
    }

    pub async fn all_products(&self) -> Result<Vec<Product>, ShopClientError> {
        self.list("/allproducts").await
    }

    pub async fn new_collection(&self) -> Result<Vec<Product>, ShopClientError> {
        self.list("/newcollection").await
    }

    pub async fn popular_in_women(&self) -> Result<Vec<Product>, ShopClientError> {
        self.list("/popularinwomen").await
    }

    pub async fn related_products(&self) -> Result<Vec<Product>, ShopClientError> {
        self.list("/reletedproducts").await
    }

    async fn list(&self, path: &str) -> Result<Vec<Product>, ShopClientError> {
        let resp = self.client.get(self.url(path)).send().await?;
        decode(resp).await
    }

    pub async fn add_to_cart(&self, item_id: u32) -> Result<(), ShopClientError> {
        let resp = self
            .authed(Method::POST, "/addtocart")
            .await?
            .json(&json!({ "itemId": item_id }))
            .send()
            .await?;

        read_text(resp).await?;
        Ok(())
    }

    pub async fn remove_from_cart(&self, item_id: u32) -> Result<(), ShopClientError> {
        let resp = self
            .authed(Method::DELETE, "/removefromcart")
            .await?
            .json(&json!({ "itemId": item_id }))
            .send()
            .await?;

        read_text(resp).await?;
        Ok(())
    }

    pub async fn get_cart(&self) -> Result<Cart, ShopClientError> {
        let resp = self.authed(Method::POST, "/getcart").await?.send().await?;
        decode(resp).await
    }

    /// Returns the server's confirmation message.
    pub async fn subscribe(&self, email: &str) -> Result<String, ShopClientError> {
        let resp = self
            .client
            .post(self.url("/subscribe"))
            .json(&json!({ "email": email }))
            .send()
            .await?;

        let ok: MessageResponse = decode(resp).await?;
        Ok(ok.message)
    }

    pub async fn send_newsletter(&self) -> Result<String, ShopClientError> {
        let resp = self.client.post(self.url("/sendnewsletter")).send().await?;
        let ok: MessageResponse = decode(resp).await?;
        Ok(ok.message)
    }
}

/// Decodes a success body, turning error statuses and `success:false`
/// payloads into [`ShopClientError`].
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ShopClientError> {
    if !resp.status().is_success() {
        return Err(ShopClientError::from_http_response(resp).await);
    }
    let status = resp.status();
    let body = resp.text().await?;
    decode_body(status, &body)
}

/// Cart mutations answer with a bare text body (`Added` / `Removed`).
async fn read_text(resp: Response) -> Result<String, ShopClientError> {
    if !resp.status().is_success() {
        return Err(ShopClientError::from_http_response(resp).await);
    }
    Ok(resp.text().await?)
}

fn decode_body<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<T, ShopClientError> {
    let value: Value = serde_json::from_str(body)?;
    if value.get("success").and_then(Value::as_bool) == Some(false) {
        return Err(ShopClientError::from_parts(status, body));
    }
    Ok(serde_json::from_value(value)?)
}
