//! Listr CLI application entry point
//!
//! Command-line front end for searching, filtering and paging through paper
//! and post listings kept in a local store.
//!
//! # Usage
//!
//! ```bash
//! # First page of papers (default command)
//! listr
//! listr list papers
//!
//! # Fuzzy search restricted to two tags, second page
//! listr list papers -s "data structures" -t "CAT 1" "CAT 2" -p 2
//!
//! # Literal title match on posts
//! listr list posts -s "'exam tips"
//!
//! # Load items into the store
//! listr import items.json
//!
//! # Quiet mode (only item ids)
//! listr -q list posts -s rust
//! ```
//!
//! # Configuration
//!
//! Settings live in `~/.config/listr/config.toml`; see [`listr::config`].
//! Logging goes to stderr and honours `RUST_LOG`.

use colored::Colorize;
use listr::cli::{Cli, Commands, ConfigCommands, DbCommands};
use listr::config::ListrConfig;
use listr::db::Database;
use listr::{ListingKind, ListingRequest, ListrError, PaginationOutcome, SearchPipeline, output};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, ListrError>;

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Run one listing request, following a single redirect to the canonical page
///
/// # Errors
///
/// Returns `ListrError` if the profile is invalid or the store cannot be read.
fn handle_list_command(
    db: &Database,
    config: &ListrConfig,
    kind: ListingKind,
    request: ListingRequest,
    quiet: bool,
) -> Result<()> {
    let pipeline = SearchPipeline::new(config.profile(kind))?;
    let repository = db.repository(kind);

    let outcome = match pipeline.run(&repository, &request)? {
        PaginationOutcome::Redirect { page, location } => {
            if !quiet {
                eprintln!("{}", output::redirect_notice(&location));
            }
            let canonical = ListingRequest {
                page: Some(page.to_string()),
                ..request
            };
            pipeline.run(&repository, &canonical)?
        }
        rendered => rendered,
    };

    match outcome {
        PaginationOutcome::Render {
            items,
            current_page,
            total_pages,
        } => {
            for line in output::render_page(kind, &items, current_page, total_pages, quiet) {
                println!("{line}");
            }
            Ok(())
        }
        PaginationOutcome::Redirect { location, .. } => Err(ListrError::InvalidInput(format!(
            "Listing kept redirecting (last location: {location})"
        ))),
    }
}

/// Import items from a JSON file
///
/// # Errors
///
/// Returns `ListrError` if the file cannot be read or parsed, or an item is invalid.
fn handle_import_command(db: &Database, file: &std::path::Path, quiet: bool) -> Result<()> {
    let imported = db.import_json(file)?;
    if !quiet {
        println!("Imported {imported} item(s) from {}", file.display());
    }
    Ok(())
}

/// List every tag with the number of items carrying it
///
/// # Errors
///
/// Returns `ListrError` if the tag index cannot be read.
fn handle_tags_command(db: &Database, quiet: bool) -> Result<()> {
    let tags = db.list_all_tags()?;
    if tags.is_empty() {
        if !quiet {
            println!("No tags in database.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Tags in database:");
    }
    for tag in tags {
        let count = db.find_by_tag(&tag)?.len();
        println!("{}", output::tag_with_count(&tag, count, quiet));
    }
    Ok(())
}

/// Handle the db command - manage named stores
///
/// # Errors
///
/// Returns `ListrError` if the named database is unknown or already exists,
/// or the configuration cannot be saved.
fn handle_db_command(mut config: ListrConfig, command: &DbCommands, quiet: bool) -> Result<()> {
    match command {
        DbCommands::Add { name, path } => {
            if config.get_database(name).is_some() {
                return Err(ListrError::InvalidInput(format!("Database '{name}' already exists")));
            }

            let resolved_path = if path.components().count() == 1 {
                let data_dir = dirs::data_local_dir().ok_or_else(|| {
                    ListrError::InvalidInput("Could not determine data directory".into())
                })?;
                data_dir.join("listr").join(path)
            } else {
                path.clone()
            };

            if !resolved_path.exists() {
                std::fs::create_dir_all(&resolved_path)?;
            }

            let was_empty = config.get_default_database().is_none();
            config.add_database(name.clone(), resolved_path.clone());
            config.save()?;

            if !quiet {
                println!("Database '{name}' added at {}", resolved_path.display());
                if was_empty {
                    println!("Set '{name}' as default database");
                }
            }
        }
        DbCommands::List => {
            if config.databases.is_empty() {
                if !quiet {
                    println!("No databases configured.");
                    println!("Add one with: listr db add <name> <path>");
                }
                return Ok(());
            }

            if !quiet {
                println!("Configured databases:");
            }

            let default_db = config.get_default_database();
            for name in config.list_databases() {
                if quiet {
                    println!("{name}");
                } else if let Some(path) = config.get_database(name) {
                    let marker = if default_db == Some(name) { " (default)" } else { "" };
                    println!("  {} -> {}{}", name, path.display(), marker);
                }
            }
        }
        DbCommands::Remove { name, delete_files } => {
            let is_default = config.get_default_database() == Some(name);
            let path = config.remove_database(name).ok_or_else(|| {
                ListrError::InvalidInput(format!("Database '{name}' does not exist"))
            })?;
            config.save()?;

            if !quiet {
                println!("Database '{name}' removed from configuration");
                if is_default {
                    println!(
                        "Warning: Removed the default database. You'll need to set a new default."
                    );
                }
            }

            if *delete_files {
                if path.exists() {
                    std::fs::remove_dir_all(&path)?;
                    if !quiet {
                        println!("Database files deleted from {}", path.display());
                    }
                } else if !quiet {
                    println!("Database files at {} do not exist (already deleted)", path.display());
                }
            } else if !quiet {
                println!("Note: Database files at {} were NOT deleted", path.display());
            }
        }
        DbCommands::SetDefault { name } => {
            config.set_default_database(name.clone())?;
            config.save()?;

            if !quiet {
                println!("Set '{name}' as default database");
            }
        }
    }
    Ok(())
}

/// Handle the config command - read and change settings
///
/// # Errors
///
/// Returns `ListrError` if the key is unknown, the value does not parse,
/// or the configuration cannot be saved.
fn handle_config_command(
    mut config: ListrConfig,
    command: &ConfigCommands,
    quiet: bool,
) -> Result<()> {
    match command {
        ConfigCommands::Set { setting } => {
            config.set_value(setting)?;
            config.save()?;
            if !quiet {
                println!("Set {setting}");
            }
        }
        ConfigCommands::Get { key } => {
            println!("{}", config.get_value(key)?);
        }
    }
    Ok(())
}

/// Open the store and dispatch the command
///
/// # Errors
///
/// Returns `ListrError` if the store cannot be opened or the command
/// handler fails.
fn run(cli: &Cli, config: ListrConfig) -> Result<()> {
    let quiet = cli.is_quiet(config.quiet);
    let command = cli.get_command();

    match &command {
        Commands::Db { command } => return handle_db_command(config, command, quiet),
        Commands::Config { command } => return handle_config_command(config, command, quiet),
        _ => {}
    }

    let db_path = config.resolve_database(cli.db.as_deref())?;
    let db = Database::open(&db_path)?;

    match &command {
        Commands::List { kind, .. } => {
            let request = command.listing_request().unwrap_or_default();
            handle_list_command(&db, &config, *kind, request, quiet)
        }
        Commands::Import { file } => handle_import_command(&db, file, quiet),
        Commands::Tags => handle_tags_command(&db, quiet),
        Commands::Db { .. } | Commands::Config { .. } => Ok(()),
    }
}

fn main() {
    let cli = Cli::parse_args();

    let result = ListrConfig::load().map_err(ListrError::from).and_then(|config| {
        init_logging(cli.log_level(config.quiet));
        run(&cli, config)
    });

    if let Err(e) = result {
        eprintln!("{} {e}", "Error:".red().bold());
        std::process::exit(1);
    }
}
