use agrisense_inference::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => cli::serve::run(args).await,
        Command::CheckModels => cli::check_models::run().await,
        Command::CheckImage(args) => cli::check_image::run(args).await,
    }
}
