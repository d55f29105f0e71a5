mod domain;
mod infrastructure;
mod interfaces;

pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;

pub use domain::{entities, use_cases};
pub use infrastructure::{auth, db, storage};
pub use interfaces::{handlers, middlewares, repositories, routes};

use std::sync::Arc;

use auth::jwt::JwtService;
use repositories::image::ImageRepository;
use repositories::sqlx_repo::{SqlxImageRepo, SqlxTodoRepo, SqlxUserRepo};
use repositories::todo::TodoRepository;
use repositories::user::UserRepository;
use storage::disk::DiskStorage;
use use_cases::{auth::AuthHandler, gallery::GalleryHandler, todos::TodoHandler};

/// Explicitly constructed application context handed to every handler.
/// Stores are trait objects so tests can swap in fakes.
pub struct AppState {
    pub auth_handler: AuthHandler,
    pub todo_handler: TodoHandler,
    pub gallery_handler: GalleryHandler,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let user_repo: Arc<dyn UserRepository> = Arc::new(SqlxUserRepo::new(pool.clone()));
        let todo_repo: Arc<dyn TodoRepository> = Arc::new(SqlxTodoRepo::new(pool.clone()));
        let image_repo: Arc<dyn ImageRepository> = Arc::new(SqlxImageRepo::new(pool));

        Self::with_components(
            user_repo,
            todo_repo,
            image_repo,
            JwtService::new(config),
            DiskStorage::new(&config.upload_dir),
        )
    }

    pub fn with_components(
        user_repo: Arc<dyn UserRepository>,
        todo_repo: Arc<dyn TodoRepository>,
        image_repo: Arc<dyn ImageRepository>,
        jwt: JwtService,
        storage: DiskStorage,
    ) -> Self {
        AppState {
            auth_handler: AuthHandler::new(user_repo.clone(), jwt),
            todo_handler: TodoHandler::new(todo_repo, user_repo.clone()),
            gallery_handler: GalleryHandler::new(image_repo, user_repo, storage),
        }
    }
}
