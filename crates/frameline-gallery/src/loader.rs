use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use image::{DynamicImage, RgbaImage};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

use frameline_types::is_photo_path;

use crate::config::GalleryConfig;
use crate::error::{GalleryError, GalleryResult};
use crate::gallery::Gallery;

/// Decode a photo off the async runtime and downscale it to the configured
/// display bounds.
pub async fn load_photo(path: &Path, config: &GalleryConfig) -> GalleryResult<RgbaImage> {
    let path = path.to_path_buf();
    let (max_width, max_height) = (config.max_width, config.max_height);
    tokio::task::spawn_blocking(move || -> GalleryResult<RgbaImage> {
        let img = image::open(&path)?;
        Ok(downscale_to_fit(img, max_width, max_height))
    })
    .await
    .map_err(|e| GalleryError::LoadTask(e.to_string()))?
}

/// Load every eligible photo in `dir` into the gallery through a
/// bounded-concurrency pool. A failure on one file is logged and skipped;
/// the batch never aborts. Returns the number of photos inserted.
pub async fn bulk_load(
    gallery: &Arc<Gallery>,
    dir: &Path,
    config: &GalleryConfig,
) -> GalleryResult<usize> {
    let mut eligible = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_photo_path(&path) {
            eligible.push(path);
        }
    }

    let semaphore = Arc::new(Semaphore::new(config.max_concurrent_loads));
    let mut tasks = JoinSet::new();
    for path in eligible {
        let semaphore = Arc::clone(&semaphore);
        let gallery = Arc::clone(gallery);
        let config = config.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            match load_photo(&path, &config).await {
                Ok(image) => gallery.insert(path, image),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "failed to load photo");
                    false
                }
            }
        });
    }

    let mut loaded = 0;
    while let Some(result) = tasks.join_next().await {
        if matches!(result, Ok(true)) {
            loaded += 1;
        }
    }
    info!(loaded, dir = %dir.display(), "bulk load finished");
    Ok(loaded)
}

fn downscale_to_fit(img: DynamicImage, max_width: u32, max_height: u32) -> RgbaImage {
    if img.width() <= max_width && img.height() <= max_height {
        return img.into_rgba8();
    }
    // resize() preserves aspect ratio within the bounding box.
    img.resize(max_width, max_height, FilterType::CatmullRom)
        .into_rgba8()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::path::PathBuf;

    fn save_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        RgbaImage::new(width, height).save(&path).unwrap();
        path
    }

    fn small_config() -> GalleryConfig {
        GalleryConfig {
            max_concurrent_loads: 2,
            max_width: 8,
            max_height: 8,
        }
    }

    #[tokio::test]
    async fn loads_a_photo_at_native_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_png(dir.path(), "a.png", 4, 4);

        let image = load_photo(&path, &small_config()).await.unwrap();
        assert_eq!((image.width(), image.height()), (4, 4));
    }

    #[tokio::test]
    async fn downscales_oversized_photos_preserving_aspect() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_png(dir.path(), "wide.png", 16, 8);

        let image = load_photo(&path, &small_config()).await.unwrap();
        assert_eq!((image.width(), image.height()), (8, 4));
    }

    #[tokio::test]
    async fn undecodable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.jpeg");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"not an image")
            .unwrap();

        let err = load_photo(&path, &small_config()).await.unwrap_err();
        assert!(matches!(err, GalleryError::Image(_)));
    }

    #[tokio::test]
    async fn bulk_load_inserts_every_eligible_photo() {
        let dir = tempfile::tempdir().unwrap();
        save_png(dir.path(), "a.png", 2, 2);
        save_png(dir.path(), "b.png", 2, 2);
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let gallery = Arc::new(Gallery::new());
        let loaded = bulk_load(&gallery, dir.path(), &small_config())
            .await
            .unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(gallery.len(), 2);
    }

    #[tokio::test]
    async fn bulk_load_skips_undecodable_files_without_aborting() {
        let dir = tempfile::tempdir().unwrap();
        save_png(dir.path(), "good.png", 2, 2);
        std::fs::write(dir.path().join("bad.jpeg"), b"not an image").unwrap();

        let gallery = Arc::new(Gallery::new());
        let loaded = bulk_load(&gallery, dir.path(), &small_config())
            .await
            .unwrap();
        assert_eq!(loaded, 1);
        assert_eq!(gallery.len(), 1);
        assert_eq!(gallery.paths(), vec![dir.path().join("good.png")]);
    }

    #[tokio::test]
    async fn bulk_load_of_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = Arc::new(Gallery::new());
        let err = bulk_load(&gallery, &dir.path().join("absent"), &small_config())
            .await
            .unwrap_err();
        assert!(matches!(err, GalleryError::Io(_)));
    }
}
