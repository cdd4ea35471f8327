//! citypop entry point
//!
//! Delegates everything to the CLI module, prints errors to stderr and
//! exits non-zero on failure.

use citypop::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
