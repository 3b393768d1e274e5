use aqs_processor::cli::{run, Cli};
use aqs_processor::error::Result;
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
