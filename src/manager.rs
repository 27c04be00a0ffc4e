use std::any::Any;
use std::path::Path;

use crate::catalog::Catalog;
use crate::error::PluginError;
use crate::registry::UnitRegistry;

/// Owns the unit registry and the catalog built from a plugin directory.
///
/// [`initialize`](Self::initialize) builds the catalog;
/// [`new_plugin`](Self::new_plugin) produces fresh instances against it.
/// Lookups take
/// `&self` and the manager is `Send + Sync`, so instance creation may run
/// concurrently from multiple callers. Concurrent initialization is the
/// caller's responsibility to serialize (it takes `&mut self`, so the
/// borrow checker enforces this within one process).
pub struct PluginManager {
    registry: UnitRegistry,
    catalog: Option<Catalog>,
}

impl PluginManager {
    /// A manager with no catalog installed. Lookups fail with
    /// [`PluginError::NotInitialized`] until [`initialize`](Self::initialize)
    /// succeeds.
    pub fn new(registry: UnitRegistry) -> Self {
        Self {
            registry,
            catalog: None,
        }
    }

    /// Build a catalog from `directory` and install it, fully replacing any
    /// prior catalog.
    ///
    /// All-or-nothing: on failure nothing is installed and a previously
    /// installed catalog remains usable.
    pub fn initialize(&mut self, directory: impl AsRef<Path>) -> Result<(), PluginError> {
        let catalog = Catalog::build(directory.as_ref(), &self.registry)?;
        self.catalog = Some(catalog);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.catalog.is_some()
    }

    pub fn archive_count(&self) -> usize {
        self.catalog.as_ref().map_or(0, Catalog::archive_count)
    }

    /// Names of all cataloged archives.
    pub fn archives(&self) -> Vec<&str> {
        self.catalog
            .as_ref()
            .map(|catalog| catalog.archive_names().collect())
            .unwrap_or_default()
    }

    /// Marker names of an archive's plugins, in discovery order.
    pub fn plugins_in(&self, archive: &str) -> Option<Vec<&str>> {
        self.catalog.as_ref().and_then(|catalog| {
            catalog.entries(archive).map(|entries| {
                entries
                    .iter()
                    .map(|entry| entry.marker().name.as_str())
                    .collect()
            })
        })
    }

    /// Construct a fresh instance of the plugin named `plugin_name` in
    /// `archive_name`, verified against `token` and cast to the expected
    /// capability `T`.
    ///
    /// The match is exact string equality on the marker name; the first
    /// match in discovery order wins. The marker's uuid must equal `token`
    /// exactly — the check runs before construction, so a mismatch never
    /// builds an instance. Every success is a freshly constructed instance;
    /// nothing is cached or pooled.
    pub fn new_plugin<T: Any>(
        &self,
        archive_name: &str,
        plugin_name: &str,
        token: &str,
    ) -> Result<T, PluginError> {
        let catalog = self.catalog.as_ref().ok_or(PluginError::NotInitialized)?;

        let entries = catalog
            .entries(archive_name)
            .ok_or_else(|| PluginError::ArchiveNotFound {
                archive: archive_name.to_string(),
            })?;

        let entry = entries
            .iter()
            .find(|entry| entry.marker().name == plugin_name)
            .ok_or_else(|| PluginError::PluginNotFound {
                plugin: plugin_name.to_string(),
                archive: archive_name.to_string(),
            })?;

        if entry.marker().uuid != token {
            return Err(PluginError::IdentityMismatch {
                plugin: plugin_name.to_string(),
                archive: archive_name.to_string(),
            });
        }

        let instance =
            entry
                .registration()
                .construct()
                .map_err(|source| PluginError::Instantiation {
                    unit: entry.unit().to_string(),
                    source,
                })?;

        tracing::debug!(
            archive = %archive_name,
            plugin = %plugin_name,
            unit = %entry.unit(),
            "constructed plugin instance"
        );

        instance
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| PluginError::CapabilityMismatch {
                plugin: plugin_name.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }
}

impl std::fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginManager")
            .field("initialized", &self.is_initialized())
            .field("archives", &self.archive_count())
            .finish_non_exhaustive()
    }
}
