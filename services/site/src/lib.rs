mod cli;
mod infra;
mod organize;
mod pages;
mod routes;
mod server;

use gt_portal::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
