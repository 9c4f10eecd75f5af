use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "frameline",
    about = "Frameline, a content-addressed photo store and sync suite",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the authoritative photo store server
    Serve(ServeArgs),
    /// Reconcile a local photo directory against a remote store
    Sync(SyncArgs),
    /// Keep a local photo gallery loaded and live-updated
    Gallery(GalleryArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// Address to listen on (overrides the config file)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Photo storage directory (overrides the config file)
    #[arg(long)]
    pub photos: Option<PathBuf>,
    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct SyncArgs {
    /// Base URL of the remote store, e.g. http://frame-server:8080
    #[arg(long)]
    pub server: String,
    /// Local replica directory
    #[arg(long, default_value = "photos")]
    pub photos: PathBuf,
    /// Keep syncing on an interval instead of exiting after one cycle
    #[arg(long)]
    pub watch: bool,
    /// Seconds between successful cycles in watch mode
    #[arg(long, default_value = "300")]
    pub interval: u64,
}

#[derive(Args)]
pub struct GalleryArgs {
    /// Local photo directory
    #[arg(long, default_value = "photos")]
    pub photos: PathBuf,
    /// Remote store to sync against; reloads the gallery after each cycle
    /// that changed something. Without it, the gallery follows filesystem
    /// events instead.
    #[arg(long)]
    pub server: Option<String>,
    /// Seconds between successful sync cycles
    #[arg(long, default_value = "300")]
    pub interval: u64,
}
