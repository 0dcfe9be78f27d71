pub mod cart;
pub mod error;
pub mod product;
pub mod subscriber;
pub mod user;
pub mod validation;
