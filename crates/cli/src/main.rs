//! Basket CLI - Inspect and edit a persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Add two tees and a cap
//! basket add --id 1 --price 10 --name "Pineapple Tee"
//! basket add --id 1 --price 10
//! basket add --id cap --price 5 --field color=red
//!
//! # Show lines, item count and total
//! basket show
//!
//! # Use another slot or directory
//! basket --dir /tmp/carts --key guest show
//! ```
//!
//! # Commands
//!
//! - `add` - Add one unit of a product
//! - `remove`, `inc`, `dec` - Edit a line by id
//! - `clear` - Empty the cart
//! - `show` - Print the cart
//! - `export` / `import` - Move raw snapshots in and out

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use basket_core::{Price, ProductId};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "basket")]
#[command(author, version, about = "Basket cart tools")]
struct Cli {
    /// Directory holding cart slots (overrides `BASKET_STORAGE_DIR`)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    /// Slot name (overrides `BASKET_STORAGE_KEY`)
    #[arg(short, long, global = true)]
    key: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add {
        /// Product id (numeric ids are stored as numbers)
        #[arg(long, value_parser = parse_id)]
        id: ProductId,

        /// Unit price
        #[arg(long)]
        price: Price,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// Extra display field as key=value (repeatable)
        #[arg(long = "field", value_parser = commands::cart::parse_field)]
        fields: Vec<(String, String)>,
    },
    /// Remove a line
    Remove {
        #[arg(value_parser = parse_id)]
        id: ProductId,
    },
    /// Add one unit to a line
    Inc {
        #[arg(value_parser = parse_id)]
        id: ProductId,
    },
    /// Take one unit off a line, removing it at zero
    Dec {
        #[arg(value_parser = parse_id)]
        id: ProductId,
    },
    /// Remove every line
    Clear,
    /// Print lines and totals
    Show,
    /// Print the raw persisted snapshot
    Export,
    /// Replace the cart with a snapshot file
    Import {
        /// Snapshot file
        path: PathBuf,
    },
}

fn parse_id(s: &str) -> Result<ProductId, std::convert::Infallible> {
    Ok(ProductId::parse_lenient(s))
}

fn init_tracing(json: bool) {
    // Defaults to info for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "basket=info,basket_cli=info,basket_store=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

#[allow(clippy::print_stdout)]
fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut cart = commands::cart::open(cli.dir, cli.key)?;

    match cli.command {
        Commands::Add {
            id,
            price,
            name,
            fields,
        } => commands::cart::add(&mut cart, id, price, name, fields),
        Commands::Remove { id } => cart.remove_from_cart(&id),
        Commands::Inc { id } => cart.increase_quantity(&id),
        Commands::Dec { id } => cart.decrease_quantity(&id),
        Commands::Clear => cart.clear_cart(),
        Commands::Show => print!("{}", commands::cart::render(&cart)),
        Commands::Export => println!("{}", commands::cart::export(&cart)?),
        Commands::Import { path } => commands::cart::import(&mut cart, &path)?,
    }
    Ok(())
}
