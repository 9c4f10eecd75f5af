use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use tracing::warn;

use frameline_gallery::{bulk_load, Gallery, GalleryConfig, GalleryWatcher};
use frameline_server::{PhotoServer, ServerConfig};
use frameline_sync::{HttpInventory, ItemAction, SyncConfig, SyncEngine, SyncReport};

use crate::cli::{Cli, Command, GalleryArgs, ServeArgs, SyncArgs};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Sync(args) => sync(args).await,
        Command::Gallery(args) => gallery(args).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(photos) = args.photos {
        config.photos_dir = photos;
    }
    PhotoServer::new(config).serve().await?;
    Ok(())
}

async fn sync(args: SyncArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.photos)?;
    let transport = Arc::new(HttpInventory::new(&args.server)?);
    let engine = SyncEngine::new(SyncConfig::new(&args.photos), transport);

    if !args.watch {
        let report = engine.sync().await?;
        print_report(&report);
        return Ok(());
    }

    let interval = Duration::from_secs(args.interval);
    loop {
        match engine.sync().await {
            Ok(report) => {
                print_report(&report);
                tokio::time::sleep(interval).await;
            }
            Err(err) => {
                let delay = engine.retry_delay();
                eprintln!(
                    "{} {err} (retrying in {}s)",
                    "sync failed:".red().bold(),
                    delay.as_secs()
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

async fn gallery(args: GalleryArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.photos)?;
    let gallery = Arc::new(Gallery::new());
    let config = GalleryConfig::default();

    let loaded = bulk_load(&gallery, &args.photos, &config).await?;
    println!(
        "{} {loaded} photos from {}",
        "loaded".green().bold(),
        args.photos.display()
    );

    match args.server {
        // Batch mode: each sync cycle that changed the directory triggers a
        // full gallery reload through the completion callback.
        Some(server) => {
            let transport = Arc::new(HttpInventory::new(&server)?);
            let reload_gallery = Arc::clone(&gallery);
            let reload_dir = args.photos.clone();
            let reload_config = config.clone();
            let engine = SyncEngine::new(SyncConfig::new(&args.photos), transport)
                .with_completion(move || {
                    let gallery = Arc::clone(&reload_gallery);
                    let dir = reload_dir.clone();
                    let config = reload_config.clone();
                    tokio::spawn(async move {
                        gallery.clear();
                        if let Err(err) = bulk_load(&gallery, &dir, &config).await {
                            warn!(error = %err, "gallery reload failed");
                        }
                    });
                });

            let interval = Duration::from_secs(args.interval);
            loop {
                match engine.sync().await {
                    Ok(report) => {
                        if report.changed() {
                            print_report(&report);
                        }
                        tokio::time::sleep(interval).await;
                    }
                    Err(err) => {
                        let delay = engine.retry_delay();
                        eprintln!(
                            "{} {err} (retrying in {}s)",
                            "sync failed:".red().bold(),
                            delay.as_secs()
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }
        // Streaming mode: follow filesystem events until interrupted.
        None => {
            let watcher = GalleryWatcher::spawn(Arc::clone(&gallery), &args.photos, config)?;
            tokio::signal::ctrl_c().await?;
            watcher.close().await;
            Ok(())
        }
    }
}

fn print_report(report: &SyncReport) {
    println!(
        "{} {} downloaded, {} deleted",
        "synced:".green().bold(),
        report.downloaded,
        report.deleted
    );
    for failure in &report.failures {
        let action = match failure.action {
            ItemAction::Delete => "delete",
            ItemAction::Download => "download",
        };
        println!(
            "  {} {action} {}: {}",
            "failed".red(),
            failure.hash.short_hex(),
            failure.reason
        );
    }
}
