use anyhow::{Context, Result};
use clap::Parser;
use jokebooth::app::App;
use jokebooth::config::Config;
use jokebooth::logging;
use jokebooth::sources::{self, Category, FETCH_FAILED_MESSAGE};
use std::path::PathBuf;
use tracing::{error, info};

const PRINT_WIDTH: usize = 72;

#[derive(Parser, Debug)]
#[command(name = "jokebooth", version, about = "Step right up for a joke in your terminal")]
struct Cli {
    /// Path to the config file (default: ~/.jokebooth/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Category to start with, overriding the config
    #[arg(long, value_enum)]
    category: Option<Category>,

    /// Print one joke to stdout and exit
    #[arg(long)]
    print: bool,

    /// Write the default config file and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if cli.init_config {
        Config::default().save(&config_path)?;
        println!("Wrote default config to {}", config_path.display());
        return Ok(());
    }

    let config = Config::load(&config_path)?;
    let category = cli.category.unwrap_or(config.general.default_category);

    if cli.print {
        logging::init_stderr()?;
        return print_one(&config, category).await;
    }

    logging::init_file(&config.log_path()?)?;
    info!(%category, config = %config_path.display(), "starting jokebooth");

    let mut app = App::new(config, category);
    app.run().await.context("terminal session failed")
}

async fn print_one(config: &Config, category: Category) -> Result<()> {
    let source = sources::source_for(category, &config.sources);

    match source.fetch().await {
        Ok(joke) => {
            println!("{}", textwrap::fill(&joke.setup, PRINT_WIDTH));
            println!();
            println!("{}", textwrap::fill(&joke.delivery, PRINT_WIDTH));
            Ok(())
        }
        Err(err) => {
            error!(source = source.name(), error = %err, "error fetching joke");
            Err(anyhow::anyhow!(FETCH_FAILED_MESSAGE))
        }
    }
}
