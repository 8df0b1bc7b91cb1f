use std::io;

use bookstore::cli::Menu;
use bookstore::config::Settings;
use bookstore::{create_pool, run_migrations, AppState, SetupError};

fn main() -> Result<(), SetupError> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let settings = Settings::from_env()?;
    let pool = create_pool(&settings.database_url, settings.pool_size)?;
    run_migrations(&pool)?;
    let state = AppState::with_pool(pool)?;

    let stdin = io::stdin();
    Menu::new(&state.inventory, stdin.lock(), io::stdout()).run()?;
    Ok(())
}
