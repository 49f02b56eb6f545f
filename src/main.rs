//! Mikoko Guardian - mangrove conservation assistant CLI
//!
#![doc = "Main entry point for the Mikoko Guardian application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mikoko::cli::{Cli, Commands};
use mikoko::commands::{self, ask, chat, lookup, run};
use mikoko::config::Config;
use mikoko::domain::Catalog;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_tracing(cli.verbose);

    let config = Config::load(&cli.config, &cli)?;
    config.validate()?;

    let catalog = Catalog::kenya_coast();

    match cli.command {
        Commands::Chat => {
            chat::run_chat(config).await?;
        }
        Commands::Run { prompt } => {
            let answer = run::run_prompt(config, &prompt).await?;
            println!("{}", answer);
        }
        Commands::Species { name, list, json } => {
            println!("{}", lookup::species(&catalog, name.as_deref(), list, json)?);
        }
        Commands::Site {
            location,
            list,
            json,
        } => {
            println!(
                "{}",
                lookup::site(&catalog, location.as_deref(), list, json)?
            );
        }
        Commands::Carbon { area, age, json } => {
            println!(
                "{}",
                lookup::carbon(config.carbon.pricing(), area, age.as_deref(), json)?
            );
        }
        Commands::Plan {
            location,
            area,
            json,
        } => {
            println!("{}", lookup::plan(&catalog, &location, area, json)?);
        }
        Commands::Ask { question } => {
            println!("{}", ask::ask_question(&config, &question).await?);
        }
        Commands::Config => {
            print!("{}", commands::show_config(&config)?);
        }
    }

    Ok(())
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "mikoko=debug" } else { "mikoko=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
