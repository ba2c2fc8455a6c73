//! Artifact compression
//!
//! Compresses a build directory into a deflate zip archive. Entries are
//! walked in sorted order so the same file set always produces the same
//! archive layout.

use crate::error::Result;
use std::fs::File;
use std::io::copy;
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Compress `src_dir` into a zip archive at `dest`, overwriting any
/// prior artifact at that path.
pub fn zip_directory(src_dir: &Path, dest: &Path) -> Result<()> {
    let file = File::create(dest)?;
    let mut writer = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let walker = WalkDir::new(src_dir)
        .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        .into_iter();

    let mut entries = 0usize;
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        let rel = match path.strip_prefix(src_dir) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel,
            _ => continue,
        };
        let name = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if entry.file_type().is_dir() {
            writer.add_directory(name, options)?;
        } else {
            writer.start_file(name, options)?;
            let mut src = File::open(path)?;
            copy(&mut src, &mut writer)?;
            entries += 1;
        }
    }

    writer.finish()?;
    debug!("wrote {entries} files to {}", dest.display());
    info!("created artifact {}", dest.display());
    Ok(())
}
