use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use frameline_types::is_photo_path;

use crate::config::GalleryConfig;
use crate::error::GalleryResult;
use crate::gallery::Gallery;
use crate::loader::load_photo;

/// Streams filesystem change notifications into incremental gallery updates.
///
/// Creation of an eligible file triggers an asynchronous load + insert;
/// removal or rename-away triggers a remove. Errors from the watch
/// subscription itself are logged and terminate the event loop (fatal to
/// the loop, not to the process). Dropping the handle keeps the loop running
/// detached; call [`GalleryWatcher::close`] for a graceful stop.
pub struct GalleryWatcher {
    watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl GalleryWatcher {
    /// Subscribe to `dir` and start applying events to the gallery.
    pub fn spawn(
        gallery: Arc<Gallery>,
        dir: &Path,
        config: GalleryConfig,
    ) -> GalleryResult<Self> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut watcher =
            notify::recommended_watcher(move |event: Result<Event, notify::Error>| {
                // The channel closes when the loop exits; nothing to do then.
                let _ = tx.send(event);
            })?;
        watcher.watch(dir, RecursiveMode::NonRecursive)?;
        info!(dir = %dir.display(), "watching photo directory");

        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    Ok(event) => apply_event(&gallery, &config, event).await,
                    Err(err) => {
                        error!(error = %err, "watch stream failed, stopping watcher");
                        break;
                    }
                }
            }
        });

        Ok(Self { watcher, task })
    }

    /// Stop watching and wait for the event loop to drain.
    pub async fn close(self) {
        // Dropping the watcher drops the event sender, which ends the loop
        // once the queue is drained.
        drop(self.watcher);
        let _ = self.task.await;
    }
}

async fn apply_event(gallery: &Arc<Gallery>, config: &GalleryConfig, event: Event) {
    match event.kind {
        EventKind::Create(_) => {
            for path in event.paths {
                insert_if_eligible(gallery, config, path).await;
            }
        }
        EventKind::Remove(_) => {
            for path in event.paths {
                if is_photo_path(&path) {
                    gallery.remove(&path);
                }
            }
        }
        // Renames surface as name-modification events; the path tells us
        // which side of the rename we are seeing.
        EventKind::Modify(ModifyKind::Name(_)) => {
            for path in event.paths {
                if !is_photo_path(&path) {
                    continue;
                }
                if path.exists() {
                    insert_if_eligible(gallery, config, path).await;
                } else {
                    gallery.remove(&path);
                }
            }
        }
        _ => {}
    }
}

async fn insert_if_eligible(gallery: &Arc<Gallery>, config: &GalleryConfig, path: PathBuf) {
    if !is_photo_path(&path) {
        return;
    }
    match load_photo(&path, config).await {
        Ok(image) => {
            gallery.insert(path, image);
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "failed to load new photo");
        }
    }
}
