mod error;
mod http_client;
mod models;

pub use error::ShopClientError;
pub use http_client::{ShopClient, TOKEN_FILE};
pub use models::{Cart, NewProduct, Product};
