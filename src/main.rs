use clap::Parser;

mod commands;
mod errors;
mod gitlab;
mod secrets;

use commands::sync::SyncCommand;

#[tokio::main]
async fn main() {
    let command = SyncCommand::parse();
    if let Err(e) = command.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
