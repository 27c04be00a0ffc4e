use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::archive;
use crate::error::PluginError;
use crate::marker::Marker;
use crate::registry::{UnitRegistration, UnitRegistry};

/// A marked unit recorded in the catalog.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    unit: String,
    marker: Marker,
    registration: Arc<UnitRegistration>,
}

impl CatalogEntry {
    /// Fully-qualified unit name, as derived from the archive entry path.
    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub(crate) fn registration(&self) -> &UnitRegistration {
        &self.registration
    }
}

/// Read-only mapping from archive file name to its marked units, in
/// discovery order.
#[derive(Debug, Default)]
pub struct Catalog {
    archives: HashMap<String, Vec<CatalogEntry>>,
}

impl Catalog {
    /// Scan `directory` for archives and build the catalog against the
    /// registry's loading contexts.
    ///
    /// All-or-nothing: any unresolved unit or duplicate non-empty marker
    /// name aborts the whole build.
    pub(crate) fn build(directory: &Path, registry: &UnitRegistry) -> Result<Self, PluginError> {
        if !directory.is_dir() {
            return Err(PluginError::Configuration {
                path: directory.to_path_buf(),
                source: None,
            });
        }

        let listing_err = |source: std::io::Error| PluginError::Configuration {
            path: directory.to_path_buf(),
            source: Some(source),
        };

        let mut paths: Vec<_> = std::fs::read_dir(directory)
            .map_err(listing_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(listing_err)?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| archive::is_archive(path))
            .collect();
        // Deterministic construction order across platforms.
        paths.sort();

        let mut archives = HashMap::new();
        for path in paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                return Err(PluginError::ArchiveRead {
                    archive: path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        "archive file name is not valid UTF-8",
                    ),
                });
            };

            let entries = Self::scan_archive(&path, name, registry)?;
            tracing::debug!(archive = %name, plugins = entries.len(), "cataloged archive");
            archives.insert(name.to_string(), entries);
        }

        tracing::info!(archives = archives.len(), "plugin catalog built");
        Ok(Self { archives })
    }

    fn scan_archive(
        path: &Path,
        name: &str,
        registry: &UnitRegistry,
    ) -> Result<Vec<CatalogEntry>, PluginError> {
        let units = archive::list_unit_names(path)?;
        let context = registry.context_for(name);

        let mut seen: HashSet<String> = HashSet::new();
        let mut entries = Vec::new();

        for unit in units {
            let Some(registration) = context.resolve(&unit) else {
                return Err(PluginError::UnitResolution {
                    unit,
                    archive: name.to_string(),
                });
            };

            // Unmarked units are loadable but never cataloged.
            let Some(marker) = registration.marker() else {
                continue;
            };

            // Empty marker names are exempt from uniqueness.
            if !marker.name.is_empty() && !seen.insert(marker.name.clone()) {
                return Err(PluginError::DuplicateName {
                    name: marker.name.clone(),
                    archive: name.to_string(),
                });
            }

            entries.push(CatalogEntry {
                unit,
                marker: marker.clone(),
                registration: Arc::clone(registration),
            });
        }

        Ok(entries)
    }

    /// The marked units of one archive, in discovery order.
    pub fn entries(&self, archive: &str) -> Option<&[CatalogEntry]> {
        self.archives.get(archive).map(Vec::as_slice)
    }

    pub fn archive_names(&self) -> impl Iterator<Item = &str> {
        self.archives.keys().map(String::as_str)
    }

    pub fn archive_count(&self) -> usize {
        self.archives.len()
    }
}
