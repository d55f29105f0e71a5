use actix_cors::Cors;
use actix_files::Files;
use actix_web::{middleware::NormalizePath, web, App, HttpServer};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use todo_gallery_backend::{
    db::postgres::{create_pool, run_migrations},
    graceful_shutdown::shutdown_signal,
    middlewares::auth::AuthMiddleware,
    routes::configure_routes,
    settings::AppConfig,
    storage::disk::DiskStorage,
    AppState,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::new() {
        Ok(cfg) => {
            tracing::info!("Loaded configuration: {:?}", cfg);
            cfg
        }
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = create_pool(&config.database_url).await?;
    run_migrations(&pool).await?;

    let storage = DiskStorage::new(&config.upload_dir);
    storage.ensure_root().await?;

    let app_state = web::Data::new(AppState::new(&config, pool));

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let workers = config.worker_count;
    let app_config = config.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(AuthMiddleware)
            .wrap(TracingLogger::default())
            .wrap(build_cors(&app_config))
            .wrap(NormalizePath::trim())
            .configure(configure_routes)
            .service(Files::new("/uploads", &app_config.upload_dir))
            .service(Files::new("/app", &app_config.frontend_dir).index_file("index.html"))
    })
    .workers(workers)
    .bind(server_addr)?
    .run();

    tokio::select! {
        res = server => res.map_err(anyhow::Error::from),
        _ = shutdown_signal() => Ok(()),
    }
}

fn build_cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();

    if origins.iter().any(|o| o == "*") {
        Cors::permissive()
    } else {
        origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allow_any_method()
            .allow_any_header()
    }
}
