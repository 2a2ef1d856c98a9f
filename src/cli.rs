//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for listr using the `clap` crate.
//!
//! # Commands
//!
//! - **list**: Search, filter and page through papers or posts
//! - **import**: Load items from a JSON file into the store
//! - **tags**: Show every tag known to the store
//! - **db**: Manage multiple databases (add, remove, list, set-default)
//! - **config**: Read and change configuration values
//!
//! # Examples
//!
//! ```no_run
//! use listr::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_args();
//! if let Some(Commands::List { kind, .. }) = &cli.command {
//!     let request = cli.command.as_ref().and_then(Commands::listing_request);
//!     println!("{kind}: {request:?}");
//! }
//! ```

use crate::item::ListingKind;
use crate::pipeline::ListingRequest;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "listr")]
#[command(about = "Search, filter and paginate paper and post listings", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Database to use (overrides the configured default)
    #[arg(long = "db", value_name = "NAME", global = true)]
    pub db: Option<String>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log every pipeline stage to stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List one page of papers or posts
    #[command(visible_alias = "ls")]
    List {
        /// Which listing to query
        #[arg(value_enum)]
        kind: ListingKind,

        /// Free-text search; prefix with ' for a literal title match
        #[arg(short = 's', long = "search", value_name = "QUERY")]
        search: Option<String>,

        /// Only show items with any of these tags (repeat or comma-separate)
        #[arg(short = 't', long = "tags", value_name = "TAG", num_args = 0..)]
        tags: Vec<String>,

        /// Page to show (1-based)
        #[arg(short = 'p', long = "page", value_name = "PAGE", allow_hyphen_values = true)]
        page: Option<String>,
    },

    /// Import items from a JSON array file
    #[command(visible_alias = "i")]
    Import {
        /// JSON file containing an array of items
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List all tags in the store
    Tags,

    /// Manage databases
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Database management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum DbCommands {
    /// Add a new database
    Add {
        /// Name of the database
        name: String,

        /// Path to the database directory
        path: PathBuf,
    },

    /// List all databases
    List,

    /// Remove a database from configuration
    #[command(visible_alias = "rm")]
    Remove {
        /// Name of the database to remove
        name: String,

        /// Also delete database files from disk
        #[arg(short = 'd', long = "delete-files")]
        delete_files: bool,
    },

    /// Set the default database
    #[command(name = "set-default")]
    SetDefault {
        /// Name of the database to set as default
        name: String,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., papers.page_size=12)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., posts.score_threshold)
        #[arg(value_name = "KEY")]
        key: String,
    },
}

impl Cli {
    /// Parse command-line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Quiet mode from the flag or the configured default
    #[must_use]
    pub const fn is_quiet(&self, config_quiet: bool) -> bool {
        self.quiet || config_quiet
    }

    /// Default log level; quiet mode wins over `-v`, `RUST_LOG` over both
    #[must_use]
    pub const fn log_level(&self, config_quiet: bool) -> &'static str {
        if self.is_quiet(config_quiet) {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// The command to run; `list papers` when none was given
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::List {
            kind: ListingKind::Papers,
            search: None,
            tags: Vec::new(),
            page: None,
        })
    }
}

impl Commands {
    /// Build the listing request carried by a `list` command
    #[must_use]
    pub fn listing_request(&self) -> Option<ListingRequest> {
        match self {
            Self::List {
                search, tags, page, ..
            } => Some(ListingRequest {
                search: search.clone(),
                tags: tags.clone(),
                page: page.clone(),
            }),
            _ => None,
        }
    }
}
