pub mod catalogue;
pub mod cli;
pub mod config;
pub mod error;
pub mod io_utils;
pub mod matcher;
pub mod resolver;
pub mod scheme;
pub mod scheme_cmd;
pub mod store;
pub mod table;
pub mod validator;
pub mod verify;

pub use catalogue::{Catalogue, CompiledScheme};
pub use error::{SchemeError, SchemeResult};
pub use matcher::{HeaderMatch, match_header};
pub use resolver::{Resolution, resolve, verify as verify_header};
pub use scheme::{Attribute, ColumnDefinition, Header, Workbook};
pub use store::SchemeStore;
pub use validator::{ValidationPolicy, VerificationReport, validate};

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::cli::{Cli, Commands};
use crate::config::Settings;

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("workbook_schemes", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let policy = match &cli.command {
        Commands::Validate(args) => args.policy,
        _ => None,
    };
    let settings = Settings::resolve(cli.config.as_deref(), cli.schemes_dir.clone(), policy)?;
    debug!("Settings: {:?}", settings);
    let store = SchemeStore::new(&settings.schemes_dir);
    match &cli.command {
        Commands::List => scheme_cmd::list(&store),
        Commands::Show(args) => scheme_cmd::show(&store, &args.name),
        Commands::Validate(args) => verify::execute(args, &settings),
        Commands::Import(args) => scheme_cmd::import(&store, args),
        Commands::Column(command) => scheme_cmd::column(&store, command),
        Commands::Attribute(command) => scheme_cmd::attribute(&store, command),
    }
}
