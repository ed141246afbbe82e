//! `amc` binary entrypoint.

#[tokio::main]
async fn main() {
    std::process::exit(amc_cli::run().await);
}
