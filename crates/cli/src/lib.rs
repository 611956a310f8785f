pub mod commands;
mod logging;

use clap::{Parser, Subcommand};
use recommend_core::config::{AppConfig, LoadOptions};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "recommend",
    about = "Hybrid recommendation engine CLI",
    long_about = "Manage the recommendation store and query related, homepage, and cart recommendations.",
    after_help = "Examples:\n  recommend seed\n  recommend related --item 1 --limit 3\n  recommend cart --items 1,4"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Load the deterministic demo catalog and interaction history")]
    Seed,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Append one interaction event to the log")]
    Record {
        #[arg(long, help = "User who interacted")]
        user: i64,
        #[arg(long, help = "Item interacted with")]
        item: i64,
        #[arg(long, help = "Action kind: view, add_to_cart, or purchase")]
        action: Option<String>,
        #[arg(long, help = "Explicit non-negative action score")]
        score: Option<u32>,
    },
    #[command(about = "Items most similar to the given item")]
    Related {
        #[arg(long, help = "Source item id")]
        item: i64,
        #[arg(long, help = "Maximum number of results")]
        limit: Option<usize>,
    },
    #[command(about = "Personalized feed for a user")]
    Homepage {
        #[arg(long, help = "User id")]
        user: i64,
        #[arg(long, help = "Maximum number of results")]
        limit: Option<usize>,
    },
    #[command(about = "Items frequently co-interacted with the cart contents")]
    Cart {
        #[arg(long, value_delimiter = ',', help = "Comma-separated cart item ids")]
        items: Vec<i64>,
        #[arg(long, help = "Maximum number of results")]
        limit: Option<usize>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Commands report config failures themselves; logging falls back to defaults.
    let logging_config = AppConfig::load(LoadOptions::default()).unwrap_or_default();
    logging::init(&logging_config);

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Seed => commands::seed::run(),
        Command::Config => commands::config::run(),
        Command::Record { user, item, action, score } => {
            commands::record::run(user, item, action, score)
        }
        Command::Related { item, limit } => commands::recommend::related(item, limit),
        Command::Homepage { user, limit } => commands::recommend::homepage(user, limit),
        Command::Cart { items, limit } => commands::recommend::cart(items, limit),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
