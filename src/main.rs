//! Binary entrypoint for the `trellis` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // Settings such as RUST_LOG may come from a local .env file.
    dotenvy::dotenv().ok();
    match trellis::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
