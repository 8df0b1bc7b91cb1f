use std::process::ExitCode;

use bookstore::config::Settings;
use bookstore::generator::{generate_orders, GeneratorConfig, GeneratorError};
use bookstore::{create_pool, run_migrations, AppState, SetupError};

fn run() -> Result<Result<(), GeneratorError>, SetupError> {
    let settings = Settings::from_env()?;
    let pool = create_pool(&settings.database_url, settings.pool_size)?;
    run_migrations(&pool)?;
    let state = AppState::with_pool(pool)?;

    let config = GeneratorConfig {
        num_orders: settings.generator_orders,
        seed: settings.generator_seed,
        ..Default::default()
    };
    Ok(generate_orders(&state.inventory, &state.revenue, &config).map(|report| {
        println!(
            "Created {} orders with {} line entries.",
            report.order_ids.len(),
            report.line_count
        );
        println!("Expected revenue: ${}", report.expected_revenue);
        println!("Revenue from store: ${}", report.actual_revenue);
    }))
}

fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    match run() {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(GeneratorError::RevenueMismatch { expected, actual })) => {
            eprintln!("Revenue check failed: expected ${}, store reports ${}", expected, actual);
            ExitCode::FAILURE
        }
        Ok(Err(err)) => {
            eprintln!("Order generation failed: {}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Setup failed: {}", err);
            ExitCode::FAILURE
        }
    }
}
