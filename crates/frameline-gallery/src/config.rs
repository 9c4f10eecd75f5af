/// Configuration for gallery loading. Passed in explicitly; there is no
/// process-wide default.
#[derive(Clone, Debug)]
pub struct GalleryConfig {
    /// Ceiling on simultaneous decodes during a bulk load. Caps file
    /// descriptors and decode memory, not throughput ordering.
    pub max_concurrent_loads: usize,
    /// Decoded photos larger than this are downscaled to fit.
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            max_concurrent_loads: 4,
            max_width: 1920,
            max_height: 1080,
        }
    }
}
