use bookstore::config::Settings;
use bookstore::{build_server, create_pool, run_migrations, AppState, SetupError};

#[actix_web::main]
async fn main() -> Result<(), SetupError> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env()?;
    let pool = create_pool(&settings.database_url, settings.pool_size)?;
    run_migrations(&pool)?;
    let state = AppState::with_pool(pool)?;

    log::info!("Starting server at http://{}:{}", settings.host, settings.port);

    build_server(state, &settings.host, settings.port)?.await?;
    Ok(())
}
