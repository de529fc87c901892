mod catalog;
mod render;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "economia")]
#[command(about = "EconomiaMarket product price comparison")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the product list, restoring the saved one when present
    List {
        /// Load this many further pages after the list is shown
        #[arg(long, default_value_t = 0)]
        pages: usize,
    },
    /// Search products by name; an empty term returns to the listing
    Search { term: String },
    /// Load the next page of the current list
    More,
    /// Show every price for one product
    Show { id: String },
    /// Forget the saved list and search, then reload the first page
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = economia_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(env = %config.env, base_url = %config.api_base_url, "configuration loaded");

    let client = economia_client::CatalogClient::from_config(&config)?;
    let mut session = catalog::open_session(&config);

    let output = match cli.command {
        Some(Commands::List { pages }) => catalog::run_list(&mut session, &client, pages).await,
        None => catalog::run_list(&mut session, &client, 0).await,
        Some(Commands::Search { term }) => catalog::run_search(&mut session, &client, &term).await,
        Some(Commands::More) => catalog::run_more(&mut session, &client).await,
        Some(Commands::Show { id }) => catalog::run_show(&mut session, &client, &id).await,
        Some(Commands::Reset) => catalog::run_reset(&mut session, &client).await,
    };

    session.snapshot();
    print!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests;
