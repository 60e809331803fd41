//! CLI entry point for the Artifactory client.

use std::io;

use anyhow::{Context, Result};
use artifactory_core::{Artifactory, Checksums, ConnectionConfig, ListOptions, Properties};
use clap::Parser;
use serde::Serialize;
use tracing::{debug, info};

mod cli;

use cli::{Args, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr so stdout stays parseable JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let url = args.url.clone();
    let connect = || -> Result<Artifactory> {
        let config = ConnectionConfig::from_env_with_url(url.as_deref())
            .context("could not load connection settings")?;
        Ok(Artifactory::new(&config)?)
    };

    match args.command {
        Command::Info { path } => print_json(&connect()?.artifacts.info(&path).await?),
        Command::List {
            path,
            depth,
            shallow,
            no_folders,
        } => {
            let options = ListOptions {
                recursive: !shallow,
                depth,
                list_folders: !no_folders,
            };
            print_json(&connect()?.artifacts.list(&path, &options).await?)
        }
        Command::Download { path, dest, flat } => {
            let local = connect()?.artifacts.download(&path, &dest, flat).await?;
            info!(path = %local.display(), "download finished");
            println!("{}", local.display());
            Ok(())
        }
        Command::Deploy {
            local,
            remote,
            properties,
            checksum,
        } => {
            let properties: Properties = properties.into_iter().collect();
            let properties = (!properties.is_empty()).then_some(&properties);
            let deployed = connect()?
                .artifacts
                .deploy(&local, &remote, properties, checksum)
                .await?;
            print_json(&deployed)
        }
        Command::Props { path, names } => {
            let names: Vec<&str> = names.iter().map(String::as_str).collect();
            print_json(&connect()?.artifacts.properties(&path, &names).await?)
        }
        Command::Checksum { file } => {
            let checksums = Checksums::generate(&file)
                .await
                .with_context(|| format!("could not hash {}", file.display()))?;
            print_json(&checksums)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
