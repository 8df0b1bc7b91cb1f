pub mod application;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod generator;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod state;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use db::{create_pool, DbPool};
pub use errors::SetupError;
pub use state::AppState;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), SetupError> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| SetupError::Migration(e.to_string()))?;
    if !applied.is_empty() {
        log::info!("applied {} migration(s)", applied.len());
    }
    Ok(())
}

/// Routes shared by the server and the handler tests.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/revenue", web::get().to(handlers::revenue::revenue_index))
        .service(
            web::scope("/api")
                .route("/revenue", web::get().to(handlers::revenue::revenue_summary))
                .route("/books", web::get().to(handlers::catalog::list_books))
                .route("/orders", web::get().to(handlers::catalog::list_orders))
                .route("/orders/{id}", web::get().to(handlers::catalog::get_order)),
        )
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}")
                .url("/api-docs/openapi.json", handlers::ApiDoc::openapi()),
        );
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: AppState,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let state = web::Data::new(state);
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(configure_routes)
    })
    .bind((host.to_string(), port))?
    .run())
}
