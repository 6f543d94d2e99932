mod catalog;
mod cli;
mod commands;
mod config;
mod ledger;
mod registry;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::Cli;
use commands::Dispatcher;
use ledger::Ledger;
use registry::RegistryClient;
use std::io;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        return Ok(ExitCode::SUCCESS);
    };

    // 加载配置并准备本地包目录
    let config = config::Config::load_or_default()?;
    config.ensure_dirs()?;
    log::debug!(
        "registry: {}, 本地目录: {}",
        config.registry_url,
        config.packages_dir.display()
    );

    let registry = RegistryClient::new(&config.registry_url)?;
    let ledger = Ledger::new(config.packages_dir.clone());
    let dispatcher = Dispatcher::new(registry, ledger, config.upload_page());

    let mut stdout = io::stdout().lock();
    let status = dispatcher.run(command, &mut stdout).await?;

    Ok(ExitCode::from(status.exit_code()))
}
