use std::path::Path;

/// File extensions treated as photos, lowercase.
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Prefix of in-flight upload files. A `tmp-` sibling exists only while an
/// upload is being written and is never a valid record.
pub const TMP_PREFIX: &str = "tmp-";

/// Returns `true` if the path names an eligible photo file.
///
/// Eligibility is decided by name alone: a recognized extension
/// (case-insensitive) and no `tmp-` prefix. Every directory scan in the
/// system (store startup, replica inventory, gallery load, watch events)
/// applies this same check.
pub fn is_photo_path(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.starts_with(TMP_PREFIX) {
        return false;
    }
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => PHOTO_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)),
        None => false,
    }
}
