mod cli;
mod error;
mod infra;
mod routes;
mod server;

pub use error::ServeError;

pub async fn run() -> Result<(), ServeError> {
    cli::run().await
}
