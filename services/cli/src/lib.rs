mod cli;
mod commands;
mod infra;

use solvestack::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
