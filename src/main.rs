use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use remnant_stock::app::{App, CatalogQuery, ManagerAction};
use remnant_stock::auth::StaticSecret;
use remnant_stock::error::StoreError;
use remnant_stock::image::create_image_resolver;
use remnant_stock::logging;
use remnant_stock::models::{ALL_MATERIALS, MaterialFilter, RemnantRecord, SortOrder};
use remnant_stock::storage::{
    Config, ConfigStorage, CsvInventoryStorage, TomlConfigStorage, ensure_directories,
};
use remnant_stock::ui;

#[derive(Parser)]
#[command(name = "remnant-stock")]
#[command(about = "Countertop remnant stock catalog and manager", long_about = None)]
struct Cli {
    /// Remnant table to use (overrides store.data_file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Configuration file (default: $XDG_CONFIG_HOME/remnant-stock/remnant-stock.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty remnant table if none exists
    Init,

    /// Browse available remnants (customer view)
    Catalog {
        /// Only show this material ("All" shows everything)
        #[arg(short, long, default_value = ALL_MATERIALS)]
        material: String,

        /// Case-insensitive text matched against name, material, and dimensions
        #[arg(short, long, default_value = "")]
        search: String,

        /// Ordering: as-stored, name, or id (default from config)
        #[arg(long)]
        sort: Option<SortOrder>,

        /// Fetch each remnant photo and report its status
        #[arg(long)]
        images: bool,
    },

    /// List the materials in stock
    Materials,

    /// Manage remnant stock (password required)
    Manage {
        /// Manager password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,

        #[command(subcommand)]
        action: ManageCommand,
    },
}

#[derive(Subcommand)]
enum ManageCommand {
    /// Show the current stock table
    Show,

    /// Update the dimensions of a remnant
    Update {
        id: i64,
        /// New dimensions, e.g. 46x97
        dimensions: String,
    },

    /// Delete every remnant with this ID
    Delete { id: i64 },

    /// Add a new remnant
    Add {
        /// New ID (default: highest existing ID + 1)
        #[arg(long)]
        id: Option<i64>,
        #[arg(long)]
        name: String,
        #[arg(long)]
        material: String,
        /// Dimensions, e.g. 46x97
        #[arg(long)]
        dimensions: String,
        /// Link to the remnant photo
        #[arg(long)]
        image_url: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (data_dir, config_dir) = ensure_directories()?;
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("remnant-stock.toml"));
    let config_storage = TomlConfigStorage::new(config_path);
    let created_config = config_storage.create_default()?;
    let config = config_storage.load()?;

    init_logging(&config, &data_dir)?;

    // Directories and config are resolved before any logger exists
    log::debug!("Data directory: {:?}", data_dir);
    log::debug!("Config directory: {:?}", config_dir);
    if created_config {
        log::info!(
            "Created default configuration at {:?}",
            config_storage.path()
        );
    }
    log::info!("Loaded configuration from {:?}", config_storage.path());
    log::debug!(
        "Config: data_file={:?}, sort={:?}, image timeout={}s",
        config.store.data_file,
        config.store.default_sort,
        config.images.timeout_secs
    );

    let data_file = cli
        .data
        .clone()
        .unwrap_or_else(|| config.store.data_file_or(&data_dir));
    log::debug!("Remnant table: {:?}", data_file);

    match cli.command {
        Some(Commands::Init) => cmd_init(data_file),
        Some(Commands::Catalog {
            material,
            search,
            sort,
            images,
        }) => {
            let query = CatalogQuery {
                material: parse_material(&material),
                search,
                sort: sort.unwrap_or(config.store.default_sort),
            };
            cmd_catalog(&config, data_file, &query, images)
        }
        Some(Commands::Materials) => cmd_materials(&config, data_file),
        Some(Commands::Manage { password, action }) => {
            cmd_manage(&config, data_file, password, action)
        }
        None => {
            // Default: the customer catalog
            let query = CatalogQuery {
                sort: config.store.default_sort,
                ..CatalogQuery::default()
            };
            cmd_catalog(&config, data_file, &query, false)
        }
    }
}

/// File logging when configured, env_logger otherwise
fn init_logging(config: &Config, data_dir: &Path) -> Result<()> {
    if config.logging.file_enabled {
        logging::init_logger(
            Some(&data_dir.join("remnant-stock.log")),
            &config.logging.file_level,
            &config.logging.console_level,
        )
    } else {
        env_logger::init();
        Ok(())
    }
}

fn build_app(config: &Config, data_file: PathBuf) -> App<CsvInventoryStorage, StaticSecret> {
    App::new(CsvInventoryStorage::new(data_file), StaticSecret::default())
        .with_material_match(config.store.material_match)
}

fn parse_material(value: &str) -> MaterialFilter {
    match value.parse() {
        Ok(filter) => filter,
        Err(never) => match never {},
    }
}

fn store_error(err: StoreError) -> anyhow::Error {
    anyhow!(ui::describe_store_error(&err))
}

fn cmd_init(data_file: PathBuf) -> Result<()> {
    let storage = CsvInventoryStorage::new(data_file.clone());
    if storage.create_empty().map_err(store_error)? {
        println!("Created empty remnant table at {}", data_file.display());
    } else {
        println!("Remnant table already exists at {}", data_file.display());
    }
    Ok(())
}

fn cmd_catalog(
    config: &Config,
    data_file: PathBuf,
    query: &CatalogQuery,
    images: bool,
) -> Result<()> {
    let mut app = build_app(config, data_file);
    let records = app.catalog(query).map_err(store_error)?;

    println!("Prime Countertops Remnant Stock");
    println!("{}", "=".repeat(60));
    println!("Browse our available remnant stock below.");
    println!();

    let resolved = if images && !records.is_empty() {
        let resolver = create_image_resolver(&config.images)
            .context("Failed to set up image fetching")?;
        let urls: Vec<&str> = records.iter().map(|r| r.image_url.as_str()).collect();
        Some(resolver.resolve_all(&urls, config.images.concurrent_fetch))
    } else {
        None
    };

    print!("{}", ui::render_catalog(&records, resolved.as_deref()));
    Ok(())
}

fn cmd_materials(config: &Config, data_file: PathBuf) -> Result<()> {
    let mut app = build_app(config, data_file);
    let materials = app.materials().map_err(store_error)?;

    println!("{}", ALL_MATERIALS);
    for material in materials {
        println!("{}", material);
    }
    Ok(())
}

fn cmd_manage(
    config: &Config,
    data_file: PathBuf,
    password: Option<String>,
    action: ManageCommand,
) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };

    let mut app = build_app(config, data_file);
    let mut session = app
        .manager(&password)
        .map_err(|_| anyhow!("Incorrect password. Please try again."))?;

    let action = match action {
        ManageCommand::Show => {
            let inventory = session.inventory().map_err(store_error)?;
            println!("Current Stock");
            print!("{}", ui::render_table(inventory.records()));
            return Ok(());
        }
        ManageCommand::Update { id, dimensions } => {
            ManagerAction::UpdateDimensions { id, dimensions }
        }
        ManageCommand::Delete { id } => ManagerAction::Delete { id },
        ManageCommand::Add {
            id,
            name,
            material,
            dimensions,
            image_url,
        } => {
            let inventory = session.inventory().map_err(store_error)?;
            let id = id.unwrap_or_else(|| inventory.next_id());
            if !inventory.materials().contains(&material) {
                log::info!("Adding remnant with new material {:?}", material);
            }
            ManagerAction::Add(RemnantRecord::new(id, name, material, dimensions, image_url))
        }
    };

    let outcome = session.apply(action).map_err(store_error)?;
    println!("{}", ui::describe_outcome(&outcome));
    Ok(())
}

/// Read the manager password from stdin
fn prompt_password() -> Result<String> {
    eprint!("Enter Password: ");
    io::stderr().flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
