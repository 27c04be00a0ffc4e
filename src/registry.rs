use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::marker::Marker;

/// Error produced by a unit constructor.
pub type ConstructError = Box<dyn std::error::Error + Send + Sync>;

/// A freshly constructed, type-erased plugin instance.
pub type Instance = Box<dyn Any + Send + Sync>;

type Constructor = dyn Fn() -> Result<Instance, ConstructError> + Send + Sync;

/// A loadable unit known to the process: its optional [`Marker`] plus the
/// zero-argument constructor that produces instances of its type.
///
/// Units without a marker are structurally loadable but never enter the
/// catalog.
pub struct UnitRegistration {
    marker: Option<Marker>,
    construct: Box<Constructor>,
}

impl UnitRegistration {
    pub fn new<F>(construct: F) -> Self
    where
        F: Fn() -> Result<Instance, ConstructError> + Send + Sync + 'static,
    {
        Self {
            marker: None,
            construct: Box::new(construct),
        }
    }

    /// Registration for a type constructed through its `Default` impl.
    pub fn of<T>() -> Self
    where
        T: Default + Any + Send + Sync,
    {
        Self::new(|| Ok(Box::new(T::default()) as Instance))
    }

    #[must_use]
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    pub(crate) fn construct(&self) -> Result<Instance, ConstructError> {
        (self.construct)()
    }
}

impl std::fmt::Debug for UnitRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitRegistration")
            .field("marker", &self.marker)
            .finish_non_exhaustive()
    }
}

/// Registration table populated at load time: unit name → registration.
///
/// Two tables back the lookup. The shared table is the process's default
/// loading context; the scoped table holds registrations bound to a single
/// archive by file name. Resolution through a [`LoadingContext`] prefers the
/// archive's own registrations, so unrelated archives can list the same unit
/// name without shadowing each other.
#[derive(Debug, Default)]
pub struct UnitRegistry {
    shared: HashMap<String, Arc<UnitRegistration>>,
    scoped: HashMap<String, HashMap<String, Arc<UnitRegistration>>>,
}

impl UnitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit in the shared (process default) context.
    pub fn register(&mut self, unit: impl Into<String>, registration: UnitRegistration) {
        self.shared.insert(unit.into(), Arc::new(registration));
    }

    /// Register a unit visible only when resolved through `archive`'s
    /// loading context.
    pub fn register_for_archive(
        &mut self,
        archive: impl Into<String>,
        unit: impl Into<String>,
        registration: UnitRegistration,
    ) {
        self.scoped
            .entry(archive.into())
            .or_default()
            .insert(unit.into(), Arc::new(registration));
    }

    /// The loading context bound to one archive, with the shared table as
    /// fallback.
    pub fn context_for<'a>(&'a self, archive: &'a str) -> LoadingContext<'a> {
        LoadingContext {
            archive,
            registry: self,
        }
    }
}

/// Archive-scoped resolution scope over a [`UnitRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct LoadingContext<'a> {
    archive: &'a str,
    registry: &'a UnitRegistry,
}

impl<'a> LoadingContext<'a> {
    pub fn resolve(&self, unit: &str) -> Option<&'a Arc<UnitRegistration>> {
        self.registry
            .scoped
            .get(self.archive)
            .and_then(|units| units.get(unit))
            .or_else(|| self.registry.shared.get(unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Widget {
        label: String,
    }

    #[test]
    fn test_register_and_resolve_shared() {
        let mut registry = UnitRegistry::new();
        registry.register("acme::widget", UnitRegistration::of::<Widget>());

        let context = registry.context_for("any.pack");
        assert!(context.resolve("acme::widget").is_some());
        assert!(context.resolve("acme::missing").is_none());
    }

    #[test]
    fn test_scoped_registration_shadows_shared() {
        let mut registry = UnitRegistry::new();
        registry.register(
            "acme::widget",
            UnitRegistration::of::<Widget>().with_marker(Marker::new("Shared", "s1")),
        );
        registry.register_for_archive(
            "a.pack",
            "acme::widget",
            UnitRegistration::of::<Widget>().with_marker(Marker::new("Scoped", "a1")),
        );

        let scoped = registry.context_for("a.pack");
        assert_eq!(
            scoped.resolve("acme::widget").unwrap().marker().unwrap().name,
            "Scoped"
        );

        // A different archive falls back to the shared table.
        let other = registry.context_for("b.pack");
        assert_eq!(
            other.resolve("acme::widget").unwrap().marker().unwrap().name,
            "Shared"
        );
    }

    #[test]
    fn test_default_constructor_produces_instance() {
        let registration = UnitRegistration::of::<Widget>();
        let instance = registration.construct().unwrap();
        let widget = instance.downcast::<Widget>().unwrap();
        assert!(widget.label.is_empty());
    }

    #[test]
    fn test_failing_constructor_surfaces_error() {
        let registration = UnitRegistration::new(|| Err("constructor refused".into()));
        let err = registration.construct().unwrap_err();
        assert!(err.to_string().contains("constructor refused"));
    }

    #[test]
    fn test_registration_without_marker() {
        let registration = UnitRegistration::of::<Widget>();
        assert!(registration.marker().is_none());

        let marked = registration.with_marker(Marker::new("W", "u1"));
        assert_eq!(marked.marker().unwrap().uuid, "u1");
    }
}
