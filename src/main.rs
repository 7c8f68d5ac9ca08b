use clap::Parser;
use log::{error, info};

use election_portal::Error;

mod cli;

/// Exit code for submissions blocked by client-side validation.
const VALIDATION_EXIT: i32 = 2;

fn main() {
    // Set up logging.
    log4rs::init_file("log4rs.yaml", Default::default())
        .expect("Failed to initialise logging");
    info!("Initialised logging");

    let args = cli::Args::parse();
    if let Err(err) = cli::run(args) {
        error!("{err:#}");
        eprintln!("Error: {err:#}");
        let code = match err.downcast_ref::<Error>() {
            Some(Error::Validation(_)) => VALIDATION_EXIT,
            _ => 1,
        };
        std::process::exit(code)
    }
}
