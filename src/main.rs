use std::process::ExitCode;

use env_logger::Env;

pub mod availability;
pub mod config;
pub mod http_probe;
pub mod report;
pub mod scheduler;

use config::{load_config, parse_args, setup_client};
use scheduler::{CYCLE_INTERVAL, CycleScheduler};

const EXIT_USAGE: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let config_path = match parse_args(std::env::args()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let app_config = match load_config(&config_path) {
        Ok(app_config) => app_config,
        Err(e) => {
            eprintln!("{}", http_probe::report(&e));
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    let client = match setup_client() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create HTTP client: {}", http_probe::report(&e));
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    log::info!(
        "Loaded {} endpoint(s) from {}",
        app_config.endpoints.len(),
        app_config.config_path.display()
    );

    let scheduler = CycleScheduler::new(client, app_config.endpoints, CYCLE_INTERVAL);

    match scheduler.run_until(tokio::signal::ctrl_c()).await {
        Ok((scheduler, signalled)) => {
            if signalled {
                println!("\nCtrl+C detected. Exiting the program.");
            }
            log::info!(
                "Scheduler {:?} after {} cycle(s)",
                scheduler.state(),
                scheduler.cycle_count()
            );
            for domain in scheduler.aggregator().snapshot() {
                log::info!(
                    "{}: {}% lifetime availability ({}/{} UP)",
                    domain.domain,
                    domain.percentage,
                    domain.up_count,
                    domain.total_count
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Scheduler task failed: {e}");
            ExitCode::FAILURE
        }
    }
}
