//! # plugpack
//!
//! Archive-based plugin discovery and instantiation.
//!
//! Plugins are packaged as gzip-compressed tar archives with the `.pack`
//! extension, one or more per directory. Each archive lists its loadable
//! units as `.unit` entries; the entry path `acme/echo.unit` names the unit
//! `acme::echo`. Units the host process has registered with a [`Marker`]
//! (a plugin name plus an opaque identity token) become catalog entries;
//! everything else is skipped.
//!
//! # Directory Structure
//!
//! ```text
//! plugins/
//! ├── sample.pack
//! │   ├── acme/echo.unit      → unit acme::echo
//! │   └── acme/upper.unit     → unit acme::upper
//! └── extra.pack
//!     └── acme/stats.unit     → unit acme::stats
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use plugpack::{Marker, PluginManager, UnitRegistration, UnitRegistry};
//!
//! #[derive(Default)]
//! struct EchoPlugin;
//!
//! fn main() -> Result<(), plugpack::PluginError> {
//!     let mut registry = UnitRegistry::new();
//!     registry.register(
//!         "acme::echo",
//!         UnitRegistration::of::<EchoPlugin>().with_marker(Marker::new("Echo", "u1")),
//!     );
//!
//!     let mut manager = PluginManager::new(registry);
//!     manager.initialize("plugins/")?;
//!
//!     let echo: EchoPlugin = manager.new_plugin("sample.pack", "Echo", "u1")?;
//!     let _ = echo;
//!     Ok(())
//! }
//! ```
//!
//! The catalog is built once by [`PluginManager::initialize`] and read-only
//! afterwards; [`PluginManager::new_plugin`] returns a fresh instance on
//! every call, verified against the marker's identity token and downcast to
//! the caller's expected capability type.

mod archive;
mod catalog;
mod error;
mod manager;
mod marker;
mod registry;

pub use archive::{ARCHIVE_EXTENSION, UNIT_SUFFIX};
pub use catalog::{Catalog, CatalogEntry};
pub use error::PluginError;
pub use manager::PluginManager;
pub use marker::Marker;
pub use registry::{ConstructError, Instance, LoadingContext, UnitRegistration, UnitRegistry};
