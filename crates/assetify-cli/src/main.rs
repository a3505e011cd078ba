//! `assetify` command-line tool
//!
//! Scans a JSON document snapshot for image and video assets, resolves
//! pages, and writes alt text or asset placements back to the snapshot.

mod commands;

use anyhow::Result;
use assetify_catalog::{AssetQuery, SourceFilter, StorageFilter};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn document_arg() -> Arg {
    Arg::new("document")
        .long("document")
        .short('d')
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Path to the JSON document snapshot")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(value_parser!(PathBuf))
        .help("Catalog settings (TOML)")
}

fn output_arg() -> Arg {
    Arg::new("output")
        .long("output")
        .short('o')
        .value_parser(value_parser!(PathBuf))
        .help("Where to write the updated document (defaults to --document)")
}

fn key_arg() -> Arg {
    Arg::new("key")
        .long("key")
        .required(true)
        .help("Asset key as printed by `scan`")
}

fn cli() -> Command {
    Command::new("assetify")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inventory and edit the assets of a design document")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(
            Command::new("scan")
                .about("List every asset in the document")
                .arg(document_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("search")
                        .long("search")
                        .short('s')
                        .help("Case-insensitive search across names, labels and URLs"),
                )
                .arg(
                    Arg::new("source")
                        .long("source")
                        .default_value("all")
                        .value_parser(|s: &str| s.parse::<SourceFilter>())
                        .help("all, canvas or cms"),
                )
                .arg(
                    Arg::new("storage")
                        .long("storage")
                        .default_value("all")
                        .value_parser(|s: &str| s.parse::<StorageFilter>())
                        .help("all, first-party or external"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("pages")
                .about("Resolve the page of each node")
                .arg(document_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("nodes")
                        .required(true)
                        .num_args(1..)
                        .help("Node ids"),
                ),
        )
        .subcommand(
            Command::new("set-alt")
                .about("Write alt text for an asset")
                .arg(document_arg())
                .arg(config_arg())
                .arg(key_arg())
                .arg(
                    Arg::new("text")
                        .long("text")
                        .required(true)
                        .help("New alt text"),
                )
                .arg(output_arg()),
        )
        .subcommand(
            Command::new("add")
                .about("Set an asset on the selection, or insert it")
                .arg(document_arg())
                .arg(config_arg())
                .arg(key_arg())
                .arg(output_arg()),
        )
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("assetify=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("assetify=info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn path<'a>(args: &'a ArgMatches, id: &str) -> Option<&'a PathBuf> {
    args.get_one::<PathBuf>(id)
}

fn string<'a>(args: &'a ArgMatches, id: &str) -> &'a str {
    args.get_one::<String>(id).map_or("", String::as_str)
}

async fn run(matches: &ArgMatches) -> Result<String> {
    let Some((name, args)) = matches.subcommand() else {
        anyhow::bail!("no command given");
    };
    let Some(document) = path(args, "document") else {
        anyhow::bail!("--document is required");
    };
    let doc = commands::load_document(document)?;
    let config = commands::load_config(path(args, "config").map(PathBuf::as_path))?;
    let output = path(args, "output").unwrap_or(document);

    match name {
        "scan" => {
            let mut query = AssetQuery::new();
            if let Some(search) = args.get_one::<String>("search") {
                query = query.with_search(search.as_str());
            }
            if let Some(source) = args.get_one::<SourceFilter>("source") {
                query = query.with_source(*source);
            }
            if let Some(storage) = args.get_one::<StorageFilter>("storage") {
                query = query.with_storage(*storage);
            }
            commands::scan(&doc, config, &query, args.get_flag("json")).await
        }
        "pages" => {
            let nodes: Vec<String> = args
                .get_many::<String>("nodes")
                .map(|ids| ids.cloned().collect())
                .unwrap_or_default();
            commands::pages(&doc, config, &nodes).await
        }
        "set-alt" => {
            let out =
                commands::set_alt(&doc, config, string(args, "key"), string(args, "text")).await?;
            commands::write_document(&doc, output)?;
            Ok(out)
        }
        "add" => {
            let out = commands::add(&doc, config, string(args, "key")).await?;
            commands::write_document(&doc, output)?;
            Ok(out)
        }
        other => anyhow::bail!("unknown command {other}"),
    }
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match run(&matches).await {
        Ok(out) => print!("{out}"),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(1);
        }
    }
}
