//! Tea Inventory CLI - manage a tea shop's stock from the terminal

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tea_inventory::config::{self, InventoryConfig};
use tea_inventory::output::{OutputMode, emit_error, emit_success};
use tea_inventory::ui::{self, Icons};
use tea_inventory::{
    ContentUri, InventoryService, Selection, SortOrder, TeaColumn, TeaStore, TeaType, TeaUris,
    TeaValues, UriMatch,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "tea-inventory")]
#[command(version)]
#[command(about = "Tea shop inventory - records addressed by content URIs")]
#[command(long_about = r#"
Tea Inventory keeps a tea shop's stock in a local SQLite database.
Every tea is addressed by a content URI:
  content://com.example.android.teainventory/teas      all teas
  content://com.example.android.teainventory/teas/7    the tea with id 7

Example usage:
  tea-inventory add --name Assam --type black --price 4.50 --quantity 12
  tea-inventory list --low-stock 5
  tea-inventory sell 1
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the database file (overrides config)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a config file and create the database
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },

    /// List teas
    List {
        /// Only teas of this type (black, green, herbal)
        #[arg(short, long)]
        r#type: Option<TeaType>,

        /// Only teas with fewer units than this
        #[arg(long)]
        low_stock: Option<i64>,

        /// Column to sort by
        #[arg(short, long)]
        sort: Option<TeaColumn>,

        /// Sort descending
        #[arg(long)]
        desc: bool,
    },

    /// Show one tea
    Show {
        /// Tea id or content URI
        target: String,
    },

    /// Add a tea
    Add {
        #[arg(short, long)]
        name: String,

        /// black, green, herbal, or a type code
        #[arg(short, long)]
        r#type: TeaType,

        #[arg(short, long)]
        price: Option<f64>,

        #[arg(short, long)]
        quantity: i64,

        /// Image reference, e.g. a file URI
        #[arg(short, long)]
        image: Option<String>,
    },

    /// Change fields of a tea, or of every tea when given the collection URI
    Update {
        /// Tea id or content URI
        target: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        r#type: Option<TeaType>,

        #[arg(short, long)]
        price: Option<f64>,

        #[arg(short, long, allow_negative_numbers = true)]
        quantity: Option<i64>,

        #[arg(short, long, conflicts_with = "clear_image")]
        image: Option<String>,

        /// Remove the image reference
        #[arg(long)]
        clear_image: bool,
    },

    /// Delete a tea, or every tea with --all
    Delete {
        /// Tea id or content URI
        #[arg(required_unless_present = "all")]
        target: Option<String>,

        #[arg(long, conflicts_with = "target")]
        all: bool,
    },

    /// Sell one unit of a tea
    Sell { id: i64 },

    /// Add units to a tea's stock
    Receive { id: i64, amount: u32 },

    /// Print the fields a restock request needs
    Restock { id: i64 },

    /// Classify a content URI
    Classify { uri: String },

    /// Print the content type of a content URI
    Describe { uri: String },

    /// Insert a sample tea
    Seed,

    /// Show inventory totals
    Stats,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Init { .. } => "init",
            Commands::List { .. } => "list",
            Commands::Show { .. } => "show",
            Commands::Add { .. } => "add",
            Commands::Update { .. } => "update",
            Commands::Delete { .. } => "delete",
            Commands::Sell { .. } => "sell",
            Commands::Receive { .. } => "receive",
            Commands::Restock { .. } => "restock",
            Commands::Classify { .. } => "classify",
            Commands::Describe { .. } => "describe",
            Commands::Seed => "seed",
            Commands::Stats => "stats",
        }
    }
}

/// Units below which a tea is flagged in listings
const LOW_STOCK: i64 = 5;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mode = if cli.json { OutputMode::Json } else { OutputMode::Human };
    let command = cli.command.name();

    if let Err(err) = run(cli, mode) {
        if mode.is_human() {
            ui::error(&format!("{:#}", err));
        } else if let Err(json_err) = emit_error(command, &err) {
            eprintln!("{:#} ({})", err, json_err);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli, mode: OutputMode) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);
    let loaded = config::load_config(Some(&config_path))
        .with_context(|| format!("reading {}", config_path.display()))?;
    let cfg = loaded.unwrap_or_default();

    let database = cli
        .database
        .clone()
        .or_else(|| cfg.database.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| config::default_database_path_in(Path::new(".")));
    let uris = cfg.uris();

    if let Commands::Init { force } = cli.command {
        return run_init(&config_path, &database, &uris, force, mode);
    }

    // Address-only commands need no database
    match &cli.command {
        Commands::Classify { uri } => return run_classify(&uris, uri, mode),
        Commands::Describe { uri } => return run_describe(&uris, uri, mode),
        _ => {}
    }

    config::ensure_db_dir(&database)?;
    let store = TeaStore::open_with(&database, uris)?;
    let service = InventoryService::new(&store);
    let teas = store.uris().collection_uri();

    match cli.command {
        Commands::List { r#type, low_stock, sort, desc } => {
            let mut selection = r#type.map(|t| Selection::eq(TeaColumn::Type, t.code()));
            if let Some(threshold) = low_stock {
                let low = Selection::lt(TeaColumn::Quantity, threshold);
                selection = Some(match selection {
                    Some(s) => s.and(low),
                    None => low,
                });
            }

            let column = match sort {
                Some(column) => column,
                None => cfg.sort_column()?.unwrap_or(TeaColumn::Id),
            };
            let order = if desc { SortOrder::desc(column) } else { SortOrder::asc(column) };

            let list = store
                .query(&teas, &[], selection.as_ref(), Some(&order))?
                .into_teas()?;

            if mode.is_human() {
                if list.is_empty() {
                    println!("{} No teas found.", Icons::EMPTY);
                } else {
                    println!("{}", ui::tea_table(&list, LOW_STOCK));
                }
            } else {
                emit_success("list", &list)?;
            }
        }

        Commands::Show { target } => {
            let uri = resolve_target(store.uris(), &target)?;
            let rows = store.query(&uri, &[], None, None)?.into_teas()?;

            if mode.is_human() {
                if rows.is_empty() {
                    println!("{} Nothing at {}", Icons::EMPTY, uri);
                } else {
                    for tea in &rows {
                        ui::tea_details(tea, LOW_STOCK);
                    }
                }
            } else {
                emit_success("show", &rows)?;
            }
        }

        Commands::Add { name, r#type, price, quantity, image } => {
            let mut values = TeaValues::new().name(name).tea_type(r#type).quantity(quantity);
            if let Some(price) = price {
                values = values.price(price);
            }
            if image.is_some() {
                values = values.image(image);
            }

            let uri = store.insert(&teas, &values)?;
            if mode.is_human() {
                ui::tea_added(&uri.to_uri_string());
            } else {
                emit_success("add", serde_json::json!({ "uri": uri }))?;
            }
        }

        Commands::Update { target, name, r#type, price, quantity, image, clear_image } => {
            let uri = resolve_target(store.uris(), &target)?;
            let values = TeaValues {
                name,
                type_code: r#type.map(|t| t.code()),
                price,
                quantity,
                image: if clear_image { Some(None) } else { image.map(Some) },
            };

            let rows = store.update(&uri, &values, None)?;
            if mode.is_human() {
                if rows == 0 {
                    ui::warn(&format!("No teas updated at {}", uri));
                } else {
                    ui::tea_updated(&uri.to_uri_string(), rows);
                }
            } else {
                emit_success("update", serde_json::json!({ "uri": uri, "rows": rows }))?;
            }
        }

        Commands::Delete { target, all } => {
            let uri = match target {
                Some(target) if !all => resolve_target(store.uris(), &target)?,
                _ => teas.clone(),
            };

            let rows = store.delete(&uri, None)?;
            if mode.is_human() {
                if rows == 0 {
                    ui::warn(&format!("No teas deleted at {}", uri));
                } else {
                    ui::tea_deleted(&uri.to_uri_string(), rows);
                }
            } else {
                emit_success("delete", serde_json::json!({ "uri": uri, "rows": rows }))?;
            }
        }

        Commands::Sell { id } => {
            let quantity = service
                .sell_one(id)?
                .ok_or_else(|| anyhow::anyhow!("no tea with id {}", id))?;
            if mode.is_human() {
                ui::stock_change(Icons::DOWN, id, quantity, LOW_STOCK);
            } else {
                emit_success("sell", serde_json::json!({ "id": id, "quantity": quantity }))?;
            }
        }

        Commands::Receive { id, amount } => {
            let quantity = service
                .receive(id, amount)?
                .ok_or_else(|| anyhow::anyhow!("no tea with id {}", id))?;
            if mode.is_human() {
                ui::stock_change(Icons::UP, id, quantity, LOW_STOCK);
            } else {
                emit_success("receive", serde_json::json!({ "id": id, "quantity": quantity }))?;
            }
        }

        Commands::Restock { id } => {
            let summary = service
                .restock_summary(id)?
                .ok_or_else(|| anyhow::anyhow!("no tea with id {}", id))?;
            if mode.is_human() {
                ui::section(&format!("{} Restock request", Icons::MAIL));
                ui::summary_row("Tea", &summary.name);
                ui::summary_row("Type", &ui::type_label(summary.tea_type));
                ui::summary_row("In stock", &summary.quantity.to_string());
            } else {
                emit_success("restock", &summary)?;
            }
        }

        Commands::Seed => {
            let uri = service.seed_sample()?;
            if mode.is_human() {
                ui::tea_added(&uri.to_uri_string());
            } else {
                emit_success("seed", serde_json::json!({ "uri": uri }))?;
            }
        }

        Commands::Stats => {
            let stats = store.stats()?;
            if mode.is_human() {
                ui::header(&format!("{} Inventory ({})", Icons::STATS, database.display()));
                println!(
                    "{}",
                    ui::stats_table(&[
                        ("Teas", stats.teas.to_string()),
                        ("Units in stock", stats.units.to_string()),
                        ("Stock value", format!("{:.2}", stats.stock_value)),
                        ("Out of stock", stats.out_of_stock.to_string()),
                    ])
                );
            } else {
                emit_success("stats", &stats)?;
            }
        }

        Commands::Init { .. } | Commands::Classify { .. } | Commands::Describe { .. } => {
            unreachable!("handled before the store is opened")
        }
    }

    Ok(())
}

fn run_init(
    config_path: &Path,
    database: &Path,
    uris: &TeaUris,
    force: bool,
    mode: OutputMode,
) -> anyhow::Result<()> {
    let cfg = InventoryConfig {
        database: Some(database.display().to_string()),
        authority: Some(uris.authority().to_string()),
        default_sort: Some(TeaColumn::Name.to_string()),
    };
    config::write_config(config_path, &cfg, force)?;
    config::ensure_db_dir(database)?;
    TeaStore::open_with(database, uris.clone())?;

    if mode.is_human() {
        ui::success(&format!("Wrote {}", config_path.display()));
        ui::info(Icons::DATABASE, "Database", &database.display().to_string());
        ui::info(Icons::LINK, "Collection", &uris.collection_uri().to_uri_string());
    } else {
        emit_success(
            "init",
            serde_json::json!({
                "config": config_path.display().to_string(),
                "database": database.display().to_string(),
                "collection": uris.collection_uri(),
            }),
        )?;
    }
    Ok(())
}

fn run_classify(uris: &TeaUris, uri: &str, mode: OutputMode) -> anyhow::Result<()> {
    let (shape, id) = match uris.classify_str(uri) {
        UriMatch::Collection => ("collection", None),
        UriMatch::Item(id) => ("item", Some(id)),
        UriMatch::Unrecognized => ("unrecognized", None),
    };

    if mode.is_human() {
        match id {
            Some(id) => ui::info(Icons::MAG, shape, &id.to_string()),
            None => ui::info(Icons::MAG, shape, uri),
        }
    } else {
        emit_success("classify", serde_json::json!({ "uri": uri, "match": shape, "id": id }))?;
    }
    Ok(())
}

fn run_describe(uris: &TeaUris, uri: &str, mode: OutputMode) -> anyhow::Result<()> {
    let parsed = ContentUri::parse(uri)?;
    let kind = uris.resource_kind(&parsed)?;
    let mime = uris.mime_type(kind);

    if mode.is_human() {
        ui::info(Icons::PACKAGE, "Content type", &mime);
    } else {
        emit_success("describe", serde_json::json!({ "uri": parsed, "kind": kind, "type": mime }))?;
    }
    Ok(())
}

/// A bare number is an id; anything else must be a content URI.
fn resolve_target(uris: &TeaUris, target: &str) -> anyhow::Result<ContentUri> {
    if let Ok(id) = target.parse::<i64>() {
        return Ok(uris.item_uri(id));
    }
    Ok(ContentUri::parse(target)?)
}
