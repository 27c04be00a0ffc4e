use std::path::PathBuf;

use crate::registry::ConstructError;

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("Plugin directory does not exist or is not a directory: {path}")]
    Configuration {
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Failed to read archive {archive}")]
    ArchiveRead {
        archive: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No registration for unit '{unit}' listed by archive {archive}")]
    UnitResolution { unit: String, archive: String },

    #[error("Duplicate plugin name '{name}' in archive {archive}")]
    DuplicateName { name: String, archive: String },

    #[error("Plugin catalog has not been initialized")]
    NotInitialized,

    #[error("Archive not found in catalog: {archive}")]
    ArchiveNotFound { archive: String },

    #[error("Plugin '{plugin}' not found in archive {archive}")]
    PluginNotFound { plugin: String, archive: String },

    #[error("Identity token mismatch for plugin '{plugin}' in archive {archive}")]
    IdentityMismatch { plugin: String, archive: String },

    #[error("Failed to construct unit '{unit}'")]
    Instantiation {
        unit: String,
        #[source]
        source: ConstructError,
    },

    #[error("Plugin '{plugin}' does not satisfy expected capability {expected}")]
    CapabilityMismatch {
        plugin: String,
        expected: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = PluginError::Configuration {
            path: PathBuf::from("/plugins/missing"),
            source: None,
        };
        assert!(err.to_string().contains("/plugins/missing"));

        let err = PluginError::DuplicateName {
            name: "Echo".into(),
            archive: "sample.pack".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Echo"));
        assert!(msg.contains("sample.pack"));

        let err = PluginError::IdentityMismatch {
            plugin: "Echo".into(),
            archive: "sample.pack".into(),
        };
        assert!(err.to_string().contains("Echo"));

        let err = PluginError::CapabilityMismatch {
            plugin: "Echo".into(),
            expected: "alloc::boxed::Box<dyn Greeter>",
        };
        assert!(err.to_string().contains("dyn Greeter"));
    }

    #[test]
    fn test_archive_read_preserves_cause() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = PluginError::ArchiveRead {
            archive: PathBuf::from("/plugins/broken.pack"),
            source: io_err,
        };
        let cause = err.source().expect("cause should be preserved");
        assert!(cause.to_string().contains("file missing"));
    }

    #[test]
    fn test_instantiation_preserves_cause() {
        let err = PluginError::Instantiation {
            unit: "acme::echo".into(),
            source: "constructor refused".into(),
        };
        let cause = err.source().expect("cause should be preserved");
        assert!(cause.to_string().contains("constructor refused"));
    }
}
