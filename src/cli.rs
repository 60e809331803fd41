//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect, download and deploy artifacts on an Artifactory server.
///
/// Connection settings come from the `ARTIFACTORY_*` environment variables
/// (`ARTIFACTORY_URL`, `ARTIFACTORY_USERNAME`, `ARTIFACTORY_PASSWORD`,
/// `ARTIFACTORY_ACCESS_TOKEN`, ...). Results are printed as JSON.
#[derive(Parser, Debug)]
#[command(name = "artifactory")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Server URL, overriding ARTIFACTORY_URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show file or folder information
    Info {
        /// Artifact path: <repo>/<path>
        path: String,
    },

    /// List files (and folders) under a path
    List {
        /// Artifact path: <repo>/<path>
        path: String,

        /// Maximum depth to descend
        #[arg(long)]
        depth: Option<u32>,

        /// List only direct children
        #[arg(long)]
        shallow: bool,

        /// Leave folders out of the listing
        #[arg(long)]
        no_folders: bool,
    },

    /// Download a file or folder tree
    Download {
        /// Artifact path: <repo>/<path>
        path: String,

        /// Destination directory
        #[arg(short, long, default_value = ".")]
        dest: PathBuf,

        /// Put every file directly into the destination directory
        #[arg(long)]
        flat: bool,
    },

    /// Upload a local file or directory tree
    Deploy {
        /// Local file or directory
        local: PathBuf,

        /// Target artifact path: <repo>/<path>
        remote: String,

        /// Property to attach, as key=value[,value...] (repeatable)
        #[arg(short, long = "property", value_parser = parse_property)]
        properties: Vec<(String, Vec<String>)>,

        /// Deploy by checksum without sending content
        #[arg(long)]
        checksum: bool,
    },

    /// Show properties of an artifact
    Props {
        /// Artifact path: <repo>/<path>
        path: String,

        /// Property names to fetch (all when omitted)
        names: Vec<String>,
    },

    /// Print the checksums of a local file
    Checksum {
        /// Local file
        file: PathBuf,
    },
}

/// Parses `key=v1,v2` into a key and its values.
fn parse_property(raw: &str) -> Result<(String, Vec<String>), String> {
    let (key, values) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {raw}"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("property key is empty in {raw}"));
    }
    let values = values.split(',').map(|value| value.trim().to_string()).collect();
    Ok((key.to_string(), values))
}
