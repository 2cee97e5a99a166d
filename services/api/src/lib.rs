mod cli;
mod infra;
mod routes;
mod server;

use ats_fit::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
