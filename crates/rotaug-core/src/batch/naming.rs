//! Variant file names and source discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::geometry::Transform;
use crate::labels::LabelError;

/// Output name of one variant: `{stem}_{flip}{angle:03}.{ext}`.
///
/// Images and labels of the same source share the stem, so paired variants
/// differ only in extension and folder.
pub fn variant_name(path: &Path, transform: Transform) -> Result<String, LabelError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| LabelError::Validation(format!("no file stem in {}", path.display())))?;

    Ok(match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}_{}.{}", stem, transform.suffix(), ext),
        None => format!("{}_{}", stem, transform.suffix()),
    })
}

/// Replace the extension of a variant name, e.g. to name the paired image
/// of an annotation document.
pub(crate) fn with_extension(name: &str, ext: &str) -> String {
    Path::new(name)
        .with_extension(ext)
        .to_string_lossy()
        .into_owned()
}

/// Regular files directly inside `dir` accepted by `filter`, sorted by
/// path so runs are reproducible.
pub fn list_sources(
    dir: &Path,
    filter: impl Fn(&Path) -> bool,
) -> Result<Vec<PathBuf>, LabelError> {
    let entries = fs::read_dir(dir).map_err(|e| LabelError::io(dir, e))?;

    let mut sources = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| LabelError::io(dir, e))?.path();
        if path.is_file() && filter(&path) {
            sources.push(path);
        }
    }
    sources.sort();
    Ok(sources)
}

/// Filter matching one extension, case-insensitive.
pub(crate) fn has_extension(ext: &'static str) -> impl Fn(&Path) -> bool {
    move |path| {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(ext))
            .unwrap_or(false)
    }
}
