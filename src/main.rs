use clap::Parser;

use sharelinker::cli::{Cli, Commands, ConfigCommands};
use sharelinker::config::{get_config, init_config};
use sharelinker::runtime::modes;
use sharelinker::system::{RunMode, init_logging, install_panic_hook};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_config(cli.config.as_deref());
    let config = get_config();

    match cli.command_or_default() {
        Commands::Serve => {
            install_panic_hook(RunMode::Server);
            let _guard = init_logging(&config.logging)?;
            modes::run_server(&config).await
        }
        Commands::Job { job } => {
            install_panic_hook(RunMode::Cli);
            let _guard = init_logging(&config.logging)?;
            modes::run_job(job, &config).await
        }
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => {
            install_panic_hook(RunMode::Cli);
            modes::config_generate(output_path, force)
        }
    }
}
