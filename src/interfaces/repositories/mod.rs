pub mod image;
pub mod sqlx_repo;
pub mod todo;
pub mod user;
