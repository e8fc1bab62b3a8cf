use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use colored::*;
use eyre::Result;
use planner::{Category, Config, FileKv, Item, ListStore, SystemClock, UuidIds};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "planner")]
#[command(about = "Daily, monthly, review and yearly task lists")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the saved lists (overrides config)
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show one list, or all four
    List { category: Option<Category> },

    /// Add an item, optionally with text
    Add { category: Category, text: Vec<String> },

    /// Flip an item between open and done
    Toggle { category: Category, id: String },

    /// Replace an item's text
    Edit {
        category: Category,
        id: String,
        text: Vec<String>,
    },

    /// Remove an item
    Delete { category: Category, id: String },

    /// Restore the review list to its fixed items, all open
    ResetReview,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_ref())?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir = Some(dir.clone());
    }

    // Setup tracing
    let level = if cli.verbose { tracing::Level::DEBUG } else { config.level()? };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    for (path, reason) in &config.skipped {
        warn!(file = ?path, reason = %reason, "Skipped unreadable config file");
    }
    if let Some(source) = &config.source {
        info!(file = ?source, "Loaded config");
    }

    let kv = FileKv::open(config.data_dir())?;
    let mut store = ListStore::open_with(
        kv,
        config.storage_key.clone(),
        Box::new(UuidIds),
        Box::new(SystemClock),
    );

    match cli.command {
        Commands::List { category } => match category {
            Some(category) => print_list(&store, category),
            None => {
                for category in Category::ALL {
                    print_list(&store, category);
                    println!();
                }
            }
        },
        Commands::Add { category, text } => {
            let id = store.add_item(category);
            if !text.is_empty() {
                store.update_text(category, &id, text.join(" "));
            }
            println!("Added {} to {}", id.cyan(), category.label());
        }
        Commands::Toggle { category, id } => {
            store.toggle_item(category, &id);
            match store.state().find(category, &id) {
                Some(item) => println!("{}", render_item(item)),
                None => println!("{}", format!("No item {} in {}", id, category).yellow()),
            }
        }
        Commands::Edit { category, id, text } => {
            store.update_text(category, &id, text.join(" "));
            match store.state().find(category, &id) {
                Some(item) => println!("{}", render_item(item)),
                None => println!("{}", format!("No item {} in {}", id, category).yellow()),
            }
        }
        Commands::Delete { category, id } => {
            let before = store.items(category).len();
            store.delete_item(category, &id);
            if store.items(category).len() < before {
                println!("Deleted {}", id);
            } else {
                println!("{}", format!("No item {} in {}", id, category).yellow());
            }
        }
        Commands::ResetReview => {
            store.reset_review();
            print_list(&store, Category::Review);
        }
    }

    Ok(())
}

fn print_list(store: &ListStore<FileKv>, category: Category) {
    let (done, total) = store.progress(category);
    println!(
        "{} ({}) {}",
        category.label().bold(),
        category,
        format!("{}/{}", done, total).dimmed()
    );

    let items = store.sorted_view(category);
    if items.is_empty() {
        println!("  {}", "(empty)".dimmed());
    }
    for item in &items {
        println!("{}", render_item(item));
    }
}

fn render_item(item: &Item) -> String {
    let when = Local
        .timestamp_millis_opt(item.timestamp)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let text = if item.text.is_empty() { "(no text)" } else { item.text.as_str() };

    if item.completed {
        format!(
            "  {} {} {} {}",
            "✔".green(),
            text.strikethrough().dimmed(),
            item.id.dimmed(),
            when.dimmed()
        )
    } else {
        format!("  {} {} {} {}", "○".normal(), text, item.id.dimmed(), when.dimmed())
    }
}
