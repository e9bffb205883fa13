use anyhow::Result;
use mf_cli::{Cli, Commands, Parser};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    mf_cli::init_tracing(cli.debug);

    match cli.command {
        Commands::Run(args) => args.run().await,
        Commands::Login(args) => args.run().await,
    }
}
