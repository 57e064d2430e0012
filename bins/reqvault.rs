use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenvy::dotenv;
use tracing::{debug, error};

use configs::{AppConfig, LogFormat};
use models::{BodyType, Request};
use service::Storage;

#[derive(Parser)]
#[command(name = "reqvault")]
#[command(about = "Manage saved HTTP requests and their collections")]
struct Cli {
    /// Store directory; overrides the config file and $XDG_CONFIG_HOME/$HOME lookup.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Collections {
        #[command(subcommand)]
        action: CollectionAction,
    },
    Requests {
        #[command(subcommand)]
        action: RequestAction,
    },
    /// Print the whole store as JSON.
    Export,
}

#[derive(Subcommand)]
enum CollectionAction {
    List,
    Create { name: String },
    Rename { id: String, name: String },
    Delete {
        id: String,
        /// Also delete every request in the collection.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum RequestAction {
    List {
        #[arg(long, conflicts_with = "uncategorized")]
        collection: Option<String>,
        #[arg(long)]
        uncategorized: bool,
    },
    Show { id: String },
    Add(AddRequest),
    Delete { id: String },
    Move {
        id: String,
        /// Target collection; omit to make the request uncategorized.
        #[arg(long)]
        to: Option<String>,
    },
}

#[derive(Args)]
struct AddRequest {
    #[arg(long)]
    name: String,
    #[arg(long)]
    url: String,
    #[arg(long, default_value = "GET")]
    method: String,
    #[arg(long)]
    collection: Option<String>,
    /// `Key: Value`, repeatable.
    #[arg(long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,
    #[arg(long)]
    body: Option<String>,
    #[arg(long, value_parser = parse_body_type)]
    body_type: Option<BodyType>,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw.split_once(':').ok_or_else(|| format!("expected `Key: Value`, got {raw:?}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty header name in {raw:?}"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

fn parse_body_type(raw: &str) -> Result<BodyType, String> {
    raw.parse().map_err(|e: models::errors::ModelError| e.to_string())
}

fn init_logging(cfg: &AppConfig) {
    let filter = cfg.logging.filter.as_deref();
    match cfg.logging.format {
        LogFormat::Compact => common::utils::logging::init_logging_default(filter),
        LogFormat::Json => common::utils::logging::init_logging_json(filter),
    }
}

fn open_storage(cfg: &AppConfig, dir: Option<PathBuf>) -> Result<Storage> {
    let mut storage_cfg = cfg.storage.clone();
    if dir.is_some() {
        storage_cfg.dir = dir;
    }
    let storage = Storage::from_config(&storage_cfg).context("failed to open request store")?;
    debug!(path = %storage.path().display(), "store ready");
    Ok(storage)
}

fn run(cli: Cli, cfg: &AppConfig) -> Result<()> {
    let storage = open_storage(cfg, cli.dir)?;

    match cli.command {
        Command::Collections { action } => match action {
            CollectionAction::List => {
                for c in storage.list_collections() {
                    let count = storage.list_requests_by_collection(&c.id).len();
                    println!("{}\t{}\t{} request(s)", c.id, c.name, count);
                }
            }
            CollectionAction::Create { name } => {
                let c = storage.create_collection(&name)?;
                println!("{}", c.id);
            }
            CollectionAction::Rename { id, name } => {
                let c = storage.update_collection(&id, &name)?;
                println!("{}\t{}", c.id, c.name);
            }
            CollectionAction::Delete { id, force } => storage.delete_collection(&id, force)?,
        },
        Command::Requests { action } => match action {
            RequestAction::List { collection, uncategorized } => {
                let requests = match (collection, uncategorized) {
                    (Some(cid), _) => storage.list_requests_by_collection(&cid),
                    (None, true) => storage.list_requests_by_collection(""),
                    (None, false) => storage.list_requests(),
                };
                for r in requests {
                    println!("{}\t{}\t{}\t{}", r.id, r.method, r.name, r.url);
                }
            }
            RequestAction::Show { id } => {
                let r = storage.get_request(&id)?;
                println!("{}", serde_json::to_string_pretty(&r)?);
            }
            RequestAction::Add(add) => {
                let saved = storage.save_request(&build_request(add)?)?;
                println!("{}", saved.id);
            }
            RequestAction::Delete { id } => storage.delete_request(&id)?,
            RequestAction::Move { id, to } => {
                storage.move_request(&id, to.as_deref().unwrap_or(""))?;
            }
        },
        Command::Export => println!("{}", serde_json::to_string_pretty(&storage.snapshot())?),
    }
    Ok(())
}

fn build_request(add: AddRequest) -> Result<Request> {
    if add.body_type.is_some() && add.body.is_none() {
        return Err(anyhow!("--body-type needs --body"));
    }
    let mut req = Request::new(add.name, add.method.to_ascii_uppercase(), add.url);
    if let Some(cid) = add.collection {
        req = req.in_collection(cid);
    }
    for (k, v) in add.headers {
        req = req.with_header(k, v);
    }
    if let Some(body) = add.body {
        req = req.with_body(body, add.body_type.unwrap_or_default());
    }
    Ok(req)
}

fn main() -> ExitCode {
    dotenv().ok();
    let cli = Cli::parse();

    let cfg = match AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("reqvault: invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(&cfg);

    match run(cli, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "command failed");
            eprintln!("reqvault: {e:#}");
            ExitCode::FAILURE
        }
    }
}
