use colored::Colorize;
use pastesign::cli::{actions, start};
use std::process;

#[tokio::main]
async fn main() {
    let result = match start() {
        Ok(action) => actions::handle(action).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("{} {e:#}", "Error:".red());
        process::exit(1);
    }
}
