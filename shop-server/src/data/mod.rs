#[cfg(test)]
pub mod memory;
pub mod product_repository;
pub mod subscriber_repository;
pub mod user_repository;
