use clap::Parser;
use tracing::error;

use reqeval::adapter::inbound::cli::command::{Cli, Commands, ConfigCommand};
use reqeval::adapter::inbound::cli::output::{self, OutputConfig};
use reqeval::adapter::inbound::cli::{config, evaluate, harness, serve, usage};
use reqeval::error::Result;
use reqeval::infrastructure::config::settings::Config;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    output::configure(OutputConfig::new(cli.json, cli.quiet));

    if let Err(e) = run(cli).await {
        error!(error = %e, "Command failed");
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Config(ConfigCommand::Init(args)) = &cli.command {
        return config::execute_init(&args.path, args.force);
    }

    let settings = Config::load_or_default(&cli.config)?;
    settings.init_logging();

    match &cli.command {
        Commands::Serve => serve::execute(&settings).await,
        Commands::Evaluate(args) => evaluate::execute(&settings, args).await,
        Commands::Usage(args) => usage::execute(&settings, args).await,
        Commands::Harness(args) => harness::execute(&settings, args).await,
        Commands::Config(ConfigCommand::Check) => {
            config::execute_check(&cli.config, &settings);
            Ok(())
        }
        Commands::Config(ConfigCommand::Init(_)) => Ok(()),
    }
}
