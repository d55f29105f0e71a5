pub mod auth;
pub mod extractors;
pub mod gallery;
pub mod todos;
