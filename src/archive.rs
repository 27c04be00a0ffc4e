//! Archive recognition and unit-name enumeration.
//!
//! An archive is a gzip-compressed tar bundle with the `.pack` extension.
//! The extension is the sole recognition signal; no manifest or index file
//! is consulted. Entries whose path ends in `.unit` name the loadable units
//! the archive carries — the entry path `acme/echo.unit` names the unit
//! `acme::echo`.

use std::fs::File;
use std::path::Path;

use flate2::read::GzDecoder;
use tar::Archive;

use crate::error::PluginError;

/// File extension recognizing plugin archives.
pub const ARCHIVE_EXTENSION: &str = "pack";

/// Entry suffix marking a loadable unit within an archive.
pub const UNIT_SUFFIX: &str = ".unit";

const NAMESPACE_SEP: &str = "::";

pub(crate) fn is_archive(path: &Path) -> bool {
    path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(ARCHIVE_EXTENSION)
}

/// Enumerate the fully-qualified unit names an archive lists, in entry order.
pub(crate) fn list_unit_names(path: &Path) -> Result<Vec<String>, PluginError> {
    let read_err = |source: std::io::Error| PluginError::ArchiveRead {
        archive: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(read_err)?;
    let mut archive = Archive::new(GzDecoder::new(file));

    let mut units = Vec::new();
    for entry in archive.entries().map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if entry.header().entry_type().is_dir() {
            continue;
        }

        let entry_path = entry.path().map_err(read_err)?;
        let Some(raw) = entry_path.to_str() else {
            return Err(read_err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "archive entry path is not valid UTF-8",
            )));
        };

        if let Some(stem) = raw.strip_suffix(UNIT_SUFFIX) {
            units.push(stem.replace('/', NAMESPACE_SEP));
        }
    }

    Ok(units)
}
